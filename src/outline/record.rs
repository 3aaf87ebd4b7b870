//! Persisted outline record, one per property.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::structure::Structure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub property_id: String,
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub satellite_image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub zoom_level: u8,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl OutlineRecord {
    /// Stamp a fresh record; `updated_at` is set to now.
    pub fn new(
        property_id: impl Into<String>,
        structures: Vec<Structure>,
        satellite_image_url: Option<String>,
        latitude: f64,
        longitude: f64,
        zoom_level: u8,
    ) -> Self {
        Self {
            property_id: property_id.into(),
            structures,
            satellite_image_url,
            latitude,
            longitude,
            zoom_level,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Point, StructureKind};

    #[test]
    fn test_record_roundtrip_keeps_structures() {
        let record = OutlineRecord::new(
            "prop-42",
            vec![Structure {
                id: "1-0".to_string(),
                kind: StructureKind::Porch,
                points: vec![
                    Point::new(1.0, 1.0),
                    Point::new(9.0, 1.0),
                    Point::new(9.0, 4.0),
                ],
                color: StructureKind::Porch.color_hex().to_string(),
                label: "Front porch".to_string(),
                visible: false,
            }],
            Some("https://example.test/tile.png".to_string()),
            40.7128,
            -74.006,
            20,
        );

        let json = serde_json::to_string(&record).unwrap();
        let parsed: OutlineRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_record_without_timestamp_or_url() {
        let json = r#"{
            "property_id": "p1",
            "structures": [],
            "latitude": 1.5,
            "longitude": 2.5,
            "zoom_level": 19
        }"#;
        let parsed: OutlineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.property_id, "p1");
        assert!(parsed.satellite_image_url.is_none());
        assert_eq!(parsed.zoom_level, 19);
    }
}
