//! `{status, message?, data}` response envelopes.

use portal_core::wire;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::repository::ApiError;

const SUCCESS: i64 = 200;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default, deserialize_with = "wire::opt_int")]
    status: Option<i64>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    message: Option<String>,
    #[serde(default)]
    data: Value,
    /// Sibling fields some operations put next to `data` (`countries_list`,
    /// `pending_amount`, ...).
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// The payload of an envelope whose `status` was 200.
#[derive(Debug)]
pub(crate) struct Success {
    data: Value,
    extra: Map<String, Value>,
}

impl Envelope {
    pub(crate) fn into_success(self) -> Result<Success, ApiError> {
        match self.status {
            Some(SUCCESS) => Ok(Success {
                data: self.data,
                extra: self.extra,
            }),
            status => Err(ApiError::Application {
                status: status.unwrap_or_default(),
                message: self
                    .message
                    .unwrap_or_else(|| "The request could not be completed.".to_owned()),
            }),
        }
    }
}

impl Success {
    /// Decode `data` as `T`; `null` decodes like an empty object would.
    pub(crate) fn data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        decode(self.data)
    }

    /// Decode `data` as a list; anything that is not an array is an empty list.
    pub(crate) fn data_list<T: DeserializeOwned>(self) -> Result<Vec<T>, ApiError> {
        Ok(decode_list("data", Some(&self.data)))
    }

    /// Decode a field of `data` as a list; missing or non-array values are empty.
    pub(crate) fn data_field_list<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Vec<T>, ApiError> {
        Ok(decode_list(name, self.data.get(name)))
    }

    /// Decode a sibling list of `data`; missing or non-array values are empty.
    pub(crate) fn extra_list<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, ApiError> {
        Ok(decode_list(name, self.extra.get(name)))
    }

    pub(crate) fn extra_value(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Elements that fail to decode are dropped with a warning; the rest of the list survives.
fn decode_list<T: DeserializeOwned>(field: &str, value: Option<&Value>) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let (decoded, dropped) = wire::decode_elements(items.clone());
    if dropped > 0 {
        warn!(field, dropped, "skipped list entries that did not decode");
    }
    decoded
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let value = if value.is_null() {
        Value::Object(Map::new())
    } else {
        value
    };
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
