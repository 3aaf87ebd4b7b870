//! Outline record stores.
//!
//! - [`LocalOutlineStore`]: one JSON document per property on disk
//! - [`RestOutlineStore`]: a Supabase (PostgREST) table keyed by `property_id`

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::outline::OutlineRecord;

use super::{OutlineStore, ServiceError};

/// File stem for a property id. ASCII alphanumerics and `-` pass through;
/// every other byte becomes `_XX` (hex), so distinct ids never share a file.
fn encode_property_id(property_id: &str) -> String {
    let mut encoded = String::with_capacity(property_id.len());
    for byte in property_id.trim().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("_{:02X}", byte));
        }
    }
    encoded
}

fn require_property_id(property_id: &str) -> Result<&str, ServiceError> {
    let trimmed = property_id.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::MissingPropertyId);
    }
    Ok(trimmed)
}

pub struct LocalOutlineStore {
    dir: PathBuf,
}

impl LocalOutlineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, property_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", encode_property_id(property_id)))
    }
}

impl OutlineStore for LocalOutlineStore {
    fn load_outline(&self, property_id: &str) -> Result<Option<OutlineRecord>, ServiceError> {
        let property_id = require_property_id(property_id)?;
        let path = self.record_path(property_id);
        if !path.exists() {
            debug!("No stored outline at {:?}", path);
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        let record: OutlineRecord = serde_json::from_str(&json)?;
        if record.property_id.trim() != property_id {
            warn!(
                "Outline at {:?} belongs to '{}', not '{}'",
                path, record.property_id, property_id
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn save_outline(&self, record: &OutlineRecord) -> Result<(), ServiceError> {
        let property_id = require_property_id(&record.property_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.record_path(property_id);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;

        info!("Outline for '{}' saved to {:?}", property_id, path);
        Ok(())
    }
}

pub struct RestOutlineStore {
    base_url: String,
    api_key: String,
    table: String,
}

impl RestOutlineStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    fn request(&self, method: &str) -> ureq::Request {
        ureq::request(method, &self.endpoint())
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("User-Agent", "groundplan")
    }

    fn property_filter(property_id: &str) -> String {
        format!("eq.{}", property_id)
    }

    fn record_exists(&self, property_id: &str) -> Result<bool, ServiceError> {
        let rows: Vec<serde_json::Value> = self
            .request("GET")
            .query("select", "property_id")
            .query("property_id", &Self::property_filter(property_id))
            .query("limit", "1")
            .call()?
            .into_json()?;
        Ok(!rows.is_empty())
    }
}

impl OutlineStore for RestOutlineStore {
    fn load_outline(&self, property_id: &str) -> Result<Option<OutlineRecord>, ServiceError> {
        let property_id = require_property_id(property_id)?;
        let rows: Vec<OutlineRecord> = self
            .request("GET")
            .query("select", "*")
            .query("property_id", &Self::property_filter(property_id))
            .query("order", "updated_at.desc")
            .query("limit", "1")
            .call()?
            .into_json()?;
        Ok(rows.into_iter().next())
    }

    fn save_outline(&self, record: &OutlineRecord) -> Result<(), ServiceError> {
        let property_id = require_property_id(&record.property_id)?;
        let body = serde_json::to_value(record)?;

        if self.record_exists(property_id)? {
            debug!("Updating outline row for '{}'", property_id);
            self.request("PATCH")
                .query("property_id", &Self::property_filter(property_id))
                .set("Prefer", "return=minimal")
                .send_json(body)?;
        } else {
            debug!("Inserting outline row for '{}'", property_id);
            self.request("POST")
                .set("Prefer", "return=minimal")
                .send_json(body)?;
        }

        info!("Outline for '{}' saved to {}", property_id, self.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Point, Structure, StructureKind};

    fn record(property_id: &str, label: &str) -> OutlineRecord {
        OutlineRecord::new(
            property_id,
            vec![Structure {
                id: "1-0".to_string(),
                kind: StructureKind::Foundation,
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                ],
                color: StructureKind::Foundation.color_hex().to_string(),
                label: label.to_string(),
                visible: true,
            }],
            None,
            35.0,
            -80.0,
            20,
        )
    }

    #[test]
    fn test_encode_property_id() {
        assert_eq!(encode_property_id("abc-123"), "abc-123");
        assert_eq!(encode_property_id("../etc/passwd"), "_2E_2E_2Fetc_2Fpasswd");
        assert_eq!(encode_property_id(" a b "), "a_20b");
        assert_eq!(encode_property_id("lot_1"), "lot_5F1");
    }

    #[test]
    fn test_local_similar_ids_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());
        store.save_outline(&record("lot_1", "Underscore")).unwrap();

        assert!(store.load_outline("lot/1").unwrap().is_none());
        assert!(store.load_outline("lot 1").unwrap().is_none());

        store.save_outline(&record("lot/1", "Slash")).unwrap();
        store.save_outline(&record("lot 1", "Space")).unwrap();
        let label = |id: &str| store.load_outline(id).unwrap().unwrap().structures[0].label.clone();
        assert_eq!(label("lot_1"), "Underscore");
        assert_eq!(label("lot/1"), "Slash");
        assert_eq!(label("lot 1"), "Space");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_local_record_for_other_id_is_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());
        store.save_outline(&record("prop-2", "Other")).unwrap();
        std::fs::rename(dir.path().join("prop-2.json"), dir.path().join("prop-1.json"))
            .unwrap();

        assert!(store.load_outline("prop-1").unwrap().is_none());
    }

    #[test]
    fn test_local_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());
        assert!(store.load_outline("prop-1").unwrap().is_none());
    }

    #[test]
    fn test_local_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path().join("outlines"));
        let saved = record("prop-1", "House");

        store.save_outline(&saved).unwrap();
        let loaded = store.load_outline("prop-1").unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_local_save_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());

        store.save_outline(&record("prop-1", "First")).unwrap();
        store.save_outline(&record("prop-1", "Second")).unwrap();

        let loaded = store.load_outline("prop-1").unwrap().unwrap();
        assert_eq!(loaded.structures[0].label, "Second");
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_local_keeps_properties_separate() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());
        store.save_outline(&record("a", "A")).unwrap();
        store.save_outline(&record("b", "B")).unwrap();

        assert_eq!(store.load_outline("a").unwrap().unwrap().structures[0].label, "A");
        assert_eq!(store.load_outline("b").unwrap().unwrap().structures[0].label, "B");
    }

    #[test]
    fn test_missing_property_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());
        assert!(matches!(
            store.save_outline(&record("  ", "x")),
            Err(ServiceError::MissingPropertyId)
        ));
        assert!(matches!(
            store.load_outline(""),
            Err(ServiceError::MissingPropertyId)
        ));
    }

    #[test]
    fn test_local_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutlineStore::new(dir.path());
        std::fs::write(dir.path().join("prop-1.json"), "{ not json").unwrap();
        assert!(matches!(
            store.load_outline("prop-1"),
            Err(ServiceError::Serialize(_))
        ));
    }

    #[test]
    fn test_rest_endpoint() {
        let store = RestOutlineStore::new("https://xyz.supabase.co/", "anon", "property_outlines");
        assert_eq!(
            store.endpoint(),
            "https://xyz.supabase.co/rest/v1/property_outlines"
        );
        assert_eq!(RestOutlineStore::property_filter("p-9"), "eq.p-9");
    }

    #[test]
    fn test_rest_row_with_extra_columns_parses() {
        let rows: Vec<OutlineRecord> = serde_json::from_str(
            r#"[{
                "id": "8c1f",
                "created_at": "2024-05-01T12:00:00Z",
                "property_id": "p-9",
                "structures": [],
                "satellite_image_url": null,
                "latitude": 1.0,
                "longitude": 2.0,
                "zoom_level": 20,
                "updated_at": "2024-05-02T08:30:00Z"
            }]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].property_id, "p-9");
    }
}
