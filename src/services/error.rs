use thiserror::Error;

/// Failures talking to geocoding, tile, or storage backends.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Google Maps API key is not configured")]
    MissingApiKey,

    #[error("no property id; look up or enter a property first")]
    MissingPropertyId,

    #[error("address is empty")]
    BlankAddress,

    #[error("no results for '{0}'")]
    NotFound(String),

    #[error("{service} returned status {status}")]
    Status {
        service: &'static str,
        status: String,
    },

    #[error("request failed: {0}")]
    Http(String),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid outline data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ureq::Error> for ServiceError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => ServiceError::Status {
                service: "server",
                status: format!("{} {}", code, response.status_text()),
            },
            other => ServiceError::Http(redact_key(&other.to_string())),
        }
    }
}

/// Mask `key=...` query values so API keys never reach logs or alerts.
fn redact_key(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(pos) = rest.find("key=") {
        let (head, tail) = rest.split_at(pos + "key=".len());
        out.push_str(head);
        out.push_str("***");
        let end = tail
            .find(|c: char| c == '&' || c.is_whitespace() || c == ':')
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_key() {
        assert_eq!(
            redact_key("https://maps/x?zoom=20&key=SECRET: Connection refused"),
            "https://maps/x?zoom=20&key=***: Connection refused"
        );
        assert_eq!(redact_key("a?key=K1&b=2&key=K2"), "a?key=***&b=2&key=***");
        assert_eq!(redact_key("no secrets here"), "no secrets here");
    }
}
