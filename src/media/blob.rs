use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::foundation::error::{PlannerError, PlannerResult};

pub const MIME_PNG: &str = "image/png";
pub const MIME_WAV: &str = "audio/wav";

/// Generated media held in memory: a mime type plus shared bytes.
///
/// Cloning is cheap; the payload is reference counted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaBlob {
    mime: String,
    bytes: Arc<Vec<u8>>,
}

impl MediaBlob {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes: Arc::new(bytes),
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime.starts_with("audio/")
    }

    /// Decode standard base64, ignoring embedded whitespace and line breaks.
    pub fn from_base64(mime: impl Into<String>, text: &str) -> PlannerResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| PlannerError::media(format!("invalid base64 payload: {e}")))?;
        Ok(Self::new(mime, bytes))
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes.as_slice())
    }

    /// `data:{mime};base64,{payload}`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    pub fn from_data_uri(uri: &str) -> PlannerResult<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| PlannerError::media("data URI must start with 'data:'"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PlannerError::media("data URI is missing ','"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| PlannerError::media("only base64 data URIs are supported"))?;
        if mime.is_empty() {
            return Err(PlannerError::media("data URI has an empty mime type"));
        }
        Self::from_base64(mime, payload)
    }
}

/// Best-effort image mime detection from magic bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

#[cfg(test)]
#[path = "../../tests/unit/media/blob.rs"]
mod tests;
