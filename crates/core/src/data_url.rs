//! Data URL codec.
//!
//! Images travel between the backend and the storefront as base64 data URLs
//! (`data:image/jpeg;base64,/9j/4AAQ...`). Display surfaces render the full
//! string, while the try-on endpoint wants the mime type and the payload as
//! separate fields.

use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Errors that can occur when parsing a [`DataUrl`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    /// The input does not start with `data:`.
    #[error("data URL must start with \"data:\"")]
    MissingScheme,
    /// The input has no `;base64,` separator.
    #[error("data URL must contain a \";base64,\" marker")]
    MissingBase64Marker,
    /// Nothing between `data:` and `;base64,`.
    #[error("data URL mime type cannot be empty")]
    EmptyMimeType,
    /// Nothing after `;base64,`.
    #[error("data URL payload cannot be empty")]
    EmptyPayload,
    /// The payload is not valid standard base64.
    #[error("data URL payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// A parsed `data:<mime>;base64,<payload>` string.
///
/// ## Examples
///
/// ```
/// use fashionary_core::DataUrl;
///
/// let url = DataUrl::parse("data:image/jpeg;base64,abc123").unwrap();
/// assert_eq!(url.mime_type(), "image/jpeg");
/// assert_eq!(url.payload(), "abc123");
///
/// assert!(DataUrl::parse("abc123").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    mime_type: String,
    payload: String,
}

impl DataUrl {
    /// Build a data URL from an already-encoded payload.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    /// Build a data URL by base64-encoding raw bytes.
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// Parse a data URL string.
    ///
    /// The string is split at the first `;base64,` marker. The payload is not
    /// base64-validated here; use [`DataUrl::decode_bytes`] for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Does not start with `data:`
    /// - Has no `;base64,` marker
    /// - Has an empty mime type or an empty payload
    pub fn parse(s: &str) -> Result<Self, DataUrlError> {
        let rest = s
            .trim()
            .strip_prefix(SCHEME)
            .ok_or(DataUrlError::MissingScheme)?;

        let (mime_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or(DataUrlError::MissingBase64Marker)?;

        if mime_type.is_empty() {
            return Err(DataUrlError::EmptyMimeType);
        }

        if payload.is_empty() {
            return Err(DataUrlError::EmptyPayload);
        }

        Ok(Self::new(mime_type, payload))
    }

    /// Returns the declared mime type (e.g. `image/jpeg`).
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the base64 payload without the `data:` prefix.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Consumes the URL, returning `(mime_type, payload)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.mime_type, self.payload)
    }

    /// Decode the payload into raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::InvalidBase64`] if the payload is not standard base64.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DataUrlError> {
        STANDARD
            .decode(self.payload.as_bytes())
            .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))
    }

    /// Suggested file extension for the mime type.
    #[must_use]
    pub fn file_extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}{BASE64_MARKER}{}", self.mime_type, self.payload)
    }
}

impl std::str::FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = DataUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataUrl> for String {
    fn from(url: DataUrl) -> Self {
        url.to_string()
    }
}
