//! Photo payload validation and the storage collaborator seam.
//!
//! Inbound photos arrive as `data:image/...;base64,` URIs. Decoding happens
//! here, before any storage side effect, so an invalid payload can never
//! destroy previously stored photos.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::domain::OfficeId;

/// A decoded photo ready to be written by a [`PhotoStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPayload {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PhotoDecodeError {
    #[error("invalid photo format")]
    NotADataUri,
    #[error("photo payload is not valid base64")]
    Base64,
}

impl PhotoPayload {
    /// Parse a `data:image/<kind>;base64,<payload>` URI. jpeg/jpg, png, and
    /// gif map to their extensions; any other image kind falls back to jpg.
    pub fn from_data_uri(uri: &str) -> Result<Self, PhotoDecodeError> {
        if !uri.starts_with("data:image/") {
            return Err(PhotoDecodeError::NotADataUri);
        }
        let (header, payload) = uri.split_once(',').ok_or(PhotoDecodeError::NotADataUri)?;

        let extension = if header.contains("jpeg") || header.contains("jpg") {
            "jpg"
        } else if header.contains("png") {
            "png"
        } else if header.contains("gif") {
            "gif"
        } else {
            "jpg"
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| PhotoDecodeError::Base64)?;

        Ok(Self { extension, bytes })
    }

    /// Decode a whole submission, failing on the first bad entry.
    pub fn decode_all(uris: &[String]) -> Result<Vec<Self>, PhotoDecodeError> {
        uris.iter().map(|uri| Self::from_data_uri(uri)).collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoStoreError {
    #[error("photo storage failed: {0}")]
    Io(String),
}

/// Storage collaborator owning the per-office photo directories. The core
/// validates payloads and sequences calls; it never touches the filesystem
/// itself.
pub trait PhotoStore: Send + Sync {
    /// Replace the stored set for an office with the given payloads and
    /// return the stored relative paths.
    fn replace(
        &self,
        office: OfficeId,
        photos: &[PhotoPayload],
    ) -> Result<Vec<String>, PhotoStoreError>;

    /// Remove every stored photo for an office. Removing an office that has
    /// no stored photos is not an error.
    fn remove_all(&self, office: OfficeId) -> Result<(), PhotoStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_data_uri() {
        let payload =
            PhotoPayload::from_data_uri("data:image/png;base64,aGVsbG8=").expect("decodes");
        assert_eq!(payload.extension, "png");
        assert_eq!(payload.bytes, b"hello");
    }

    #[test]
    fn unknown_image_kind_falls_back_to_jpg() {
        let payload =
            PhotoPayload::from_data_uri("data:image/webp;base64,aGVsbG8=").expect("decodes");
        assert_eq!(payload.extension, "jpg");
    }

    #[test]
    fn rejects_non_data_uri() {
        assert_eq!(
            PhotoPayload::from_data_uri("https://example.com/a.png"),
            Err(PhotoDecodeError::NotADataUri)
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(
            PhotoPayload::from_data_uri("data:image/png;base64,???"),
            Err(PhotoDecodeError::Base64)
        );
    }

    #[test]
    fn decode_all_stops_at_first_invalid_entry() {
        let uris = vec![
            "data:image/png;base64,aGVsbG8=".to_string(),
            "broken".to_string(),
        ];
        assert!(PhotoPayload::decode_all(&uris).is_err());
    }
}
