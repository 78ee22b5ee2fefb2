use serde::{Deserialize, Deserializer, Serialize};

use super::text::DiscoverySet;
use crate::error::{ExtractError, ExtractResult};

/// Payload a scanner sends over the IPC channel: `{"Text": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(
        rename = "Text",
        default,
        deserialize_with = "nullable_text",
        serialize_with = "serialize_text"
    )]
    pub text: DiscoverySet,
}

impl Document {
    pub fn new(text: DiscoverySet) -> Self {
        Self { text }
    }

    /// Decode a UTF-8 payload. An empty or blank payload means the scanner
    /// had nothing to say and yields `None`.
    pub fn parse(raw: &[u8]) -> ExtractResult<Option<Document>> {
        let json = std::str::from_utf8(raw)
            .map_err(|e| ExtractError::DecodeFailure(format!("payload is not UTF-8: {}", e)))?;
        if json.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(json)
            .map(Some)
            .map_err(|e| ExtractError::DecodeFailure(e.to_string()))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DiscoverySet, D::Error> {
    let text: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(text.into_iter().flatten().collect())
}

fn serialize_text<S: serde::Serializer>(text: &DiscoverySet, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(text.iter())
}
