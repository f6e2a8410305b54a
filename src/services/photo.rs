// SPDX-License-Identifier: MIT

//! Validation of embedded photo payloads.
//!
//! Capture and compression happen on the device; records arrive with photos
//! already re-encoded as base64 data URLs. We only check shape, decodability
//! and size before letting them into the ledger.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Photo payload rejections (user-input errors).
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo must be a base64 image data URL")]
    NotADataUrl,

    #[error("photo payload is not valid base64")]
    InvalidBase64,

    #[error("photo is too large: {actual} bytes (max {max})")]
    TooLarge { actual: usize, max: usize },
}

/// Validate a `data:image/...;base64,` payload against a decoded-size cap.
pub fn validate_photo(data_url: &str, max_bytes: usize) -> Result<(), PhotoError> {
    let rest = data_url
        .strip_prefix("data:image/")
        .ok_or(PhotoError::NotADataUrl)?;
    let (_, payload) = rest.split_once(";base64,").ok_or(PhotoError::NotADataUrl)?;

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| PhotoError::InvalidBase64)?;

    if decoded.len() > max_bytes {
        return Err(PhotoError::TooLarge {
            actual: decoded.len(),
            max: max_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_url(bytes: &[u8]) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_photo(&data_url(&[0xFF, 0xD8, 0xFF]), 1024).is_ok());
    }

    #[test]
    fn test_plain_string_is_rejected() {
        assert!(matches!(
            validate_photo("selfie.jpg", 1024),
            Err(PhotoError::NotADataUrl)
        ));
    }

    #[test]
    fn test_bad_base64_is_rejected() {
        assert!(matches!(
            validate_photo("data:image/jpeg;base64,@@not-base64@@", 1024),
            Err(PhotoError::InvalidBase64)
        ));
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let payload = data_url(&[0u8; 64]);
        assert!(matches!(
            validate_photo(&payload, 32),
            Err(PhotoError::TooLarge { actual: 64, max: 32 })
        ));
    }
}
