//! Input validation helpers shared by the services.
//!
//! Each helper returns `CoreError::Validation` with a message naming the
//! offending field, so handlers can pass the error straight through.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::GeoPoint;
use crate::ports::CoreError;

/// Trim `value` and reject it when empty.
pub fn require_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text, mapping blank strings to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A base64 image as received, normalized and decoded.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Canonical base64 text (no data-URL prefix, no whitespace).
    pub base64: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 image, accepting an optional `data:...;base64,` prefix.
pub fn decode_image(raw: &str) -> Result<DecodedImage, CoreError> {
    let body = match raw.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => raw,
    };
    let base64: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if base64.is_empty() {
        return Err(CoreError::Validation("image_base64 is required".to_string()));
    }

    let bytes = STANDARD
        .decode(base64.as_bytes())
        .map_err(|e| CoreError::Validation(format!("image_base64 is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(CoreError::Validation("image_base64 is empty".to_string()));
    }

    Ok(DecodedImage { base64, bytes })
}

/// Validate a required coordinate pair.
pub fn require_point(latitude: f64, longitude: f64) -> Result<GeoPoint, CoreError> {
    GeoPoint::new(latitude, longitude).ok_or_else(|| {
        CoreError::Validation(format!(
            "invalid coordinates ({latitude}, {longitude}): latitude must be within ±90 and longitude within ±180"
        ))
    })
}

/// Validate an optional coordinate pair. Both halves or neither.
pub fn optional_point(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<GeoPoint>, CoreError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => require_point(lat, lon).map(Some),
        _ => Err(CoreError::Validation(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  Oak  ").unwrap(), "Oak");
        let err = require_text("title", "   ").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref m) if m == "title is required"));
    }

    #[test]
    fn test_optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" hi ".to_string())), Some("hi".to_string()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_decode_plain_base64() {
        let image = decode_image("aGVsbG8=").unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.base64, "aGVsbG8=");
    }

    #[test]
    fn test_decode_strips_data_url_and_whitespace() {
        let image = decode_image("data:image/jpeg;base64,aGVs\nbG8=").unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.base64, "aGVsbG8=");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image("not base64!!").is_err());
        assert!(decode_image("").is_err());
    }

    #[test]
    fn test_optional_point() {
        assert!(optional_point(None, None).unwrap().is_none());
        assert!(optional_point(Some(1.0), None).is_err());
        assert!(optional_point(Some(95.0), Some(0.0)).is_err());
        let p = optional_point(Some(45.0), Some(-120.0)).unwrap().unwrap();
        assert!((p.latitude - 45.0).abs() < f64::EPSILON);
    }
}
