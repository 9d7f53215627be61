//! Response envelope decoding.
//!
//! Every load call answers with a JSON document shaped either
//! `{"data": <value>}` or `{"error": {"cause": "...", ...}}`. Anything else is
//! a protocol violation on the bridge, reported as
//! [`YamlStarError::ProtocolDecode`] and never as a YAML content error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EngineFailure, Result, YamlStarError};

/// A decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Data(Value),
    Error(EngineFailure),
}

impl Envelope {
    /// Parse a response string.
    ///
    /// `error` wins when both keys are present; `"error": null` counts as
    /// absent.
    pub fn parse(response: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(response).map_err(|e| {
            YamlStarError::ProtocolDecode(format!("malformed JSON envelope: {}", e))
        })?;

        let mut fields = match document {
            Value::Object(fields) => fields,
            other => {
                return Err(YamlStarError::ProtocolDecode(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        match fields.remove("error") {
            None | Some(Value::Null) => {}
            Some(error) => {
                return serde_json::from_value::<EngineFailure>(error)
                    .map(Self::Error)
                    .map_err(|e| {
                        YamlStarError::ProtocolDecode(format!("malformed error object: {}", e))
                    });
            }
        }

        fields.remove("data").map(Self::Data).ok_or_else(|| {
            YamlStarError::ProtocolDecode(
                "unexpected response shape: neither 'data' nor 'error' present".to_string(),
            )
        })
    }

    /// `data` payload, or the engine failure as an error.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Self::Data(value) => Ok(value),
            Self::Error(failure) => Err(YamlStarError::Engine(failure)),
        }
    }
}

/// Decode a single-document response into `T`.
pub fn decode_one<T: DeserializeOwned>(response: &str) -> Result<T> {
    let value = Envelope::parse(response)?.into_value()?;
    serde_json::from_value(value).map_err(YamlStarError::Conversion)
}

/// Decode a multi-document response into one `T` per document.
///
/// A `null` payload means zero documents.
pub fn decode_many<T: DeserializeOwned>(response: &str) -> Result<Vec<T>> {
    match Envelope::parse(response)?.into_value()? {
        Value::Null => Ok(Vec::new()),
        Value::Array(documents) => documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(YamlStarError::Conversion))
            .collect(),
        other => Err(YamlStarError::ProtocolDecode(format!(
            "load_all: expected a list of documents, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
