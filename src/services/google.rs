//! Google Geocoding and Static Maps backends.

use serde::Deserialize;

use super::{GeoPoint, Geocoded, Geocoder, ServiceError, TileProvider};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const STATIC_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeoPoint,
}

fn interpret_geocode(address: &str, response: GeocodeResponse) -> Result<Geocoded, ServiceError> {
    match response.status.as_str() {
        "OK" => response
            .results
            .into_iter()
            .next()
            .map(|r| Geocoded {
                location: r.geometry.location,
                formatted_address: r.formatted_address,
            })
            .ok_or_else(|| ServiceError::NotFound(address.to_string())),
        "ZERO_RESULTS" => Err(ServiceError::NotFound(address.to_string())),
        other => Err(ServiceError::Status {
            service: "geocoding",
            status: match response.error_message {
                Some(msg) => format!("{}: {}", other, msg),
                None => other.to_string(),
            },
        }),
    }
}

pub struct GoogleGeocoder {
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> Result<Geocoded, ServiceError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ServiceError::BlankAddress);
        }
        let key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;

        let response: GeocodeResponse = ureq::get(GEOCODE_URL)
            .set("User-Agent", "groundplan")
            .query("address", address)
            .query("key", key)
            .call()?
            .into_json()?;

        interpret_geocode(address, response)
    }
}

fn with_key(url: &str, key: &str) -> String {
    if url.contains("key=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}key={}", url, separator, key)
}

pub struct GoogleStaticMaps {
    api_key: Option<String>,
}

impl GoogleStaticMaps {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

impl TileProvider for GoogleStaticMaps {
    /// The key is left off so the URL can be stored with a record.
    fn tile_url(&self, center: GeoPoint, zoom: u8, width: u32, height: u32) -> String {
        format!(
            "{}?center={:.6},{:.6}&zoom={}&size={}x{}&maptype=satellite",
            STATIC_MAP_URL, center.lat, center.lng, zoom, width, height
        )
    }

    fn fetch_tile(&self, url: &str) -> Result<super::RasterImage, ServiceError> {
        let key = self.api_key.as_deref().ok_or(ServiceError::MissingApiKey)?;
        super::imagery::fetch_image(&with_key(url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_geocode_ok_takes_first_result() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                        "geometry": {"location": {"lat": 37.422, "lng": -122.084}}
                    },
                    {
                        "formatted_address": "Elsewhere",
                        "geometry": {"location": {"lat": 1.0, "lng": 2.0}}
                    }
                ]
            }"#,
        );
        let geocoded = interpret_geocode("1600 Amphitheatre", response).unwrap();
        assert_eq!(geocoded.location, GeoPoint { lat: 37.422, lng: -122.084 });
        assert!(geocoded.formatted_address.starts_with("1600"));
    }

    #[test]
    fn test_geocode_zero_results() {
        let response = parse(r#"{"status": "ZERO_RESULTS", "results": []}"#);
        assert!(matches!(
            interpret_geocode("nowhere", response),
            Err(ServiceError::NotFound(addr)) if addr == "nowhere"
        ));
    }

    #[test]
    fn test_geocode_denied_reports_message() {
        let response = parse(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        );
        let err = interpret_geocode("x", response).unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_geocode_requires_address_and_key() {
        let geocoder = GoogleGeocoder::new(None);
        assert!(matches!(geocoder.geocode("   "), Err(ServiceError::BlankAddress)));
        assert!(matches!(
            geocoder.geocode("10 Main St"),
            Err(ServiceError::MissingApiKey)
        ));
    }

    #[test]
    fn test_tile_url() {
        let maps = GoogleStaticMaps::new(Some("KEY".to_string()));
        let url = maps.tile_url(GeoPoint { lat: 40.7128, lng: -74.006 }, 20, 640, 480);
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/staticmap?center=40.712800,-74.006000\
             &zoom=20&size=640x480&maptype=satellite"
        );
    }

    #[test]
    fn test_key_added_at_fetch_time() {
        assert_eq!(with_key("https://a/b?x=1", "K"), "https://a/b?x=1&key=K");
        assert_eq!(with_key("https://a/b", "K"), "https://a/b?key=K");
        assert_eq!(with_key("https://a/b?key=OLD", "K"), "https://a/b?key=OLD");
    }

    #[test]
    fn test_fetch_tile_without_key() {
        let maps = GoogleStaticMaps::new(None);
        let url = maps.tile_url(GeoPoint::default(), 18, 640, 640);
        assert!(!url.contains("key="));
        assert!(matches!(maps.fetch_tile(&url), Err(ServiceError::MissingApiKey)));
    }
}
