use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every issue endpoint. Handled failures travel in the payload as an
/// `error` key next to a 200 status; only the transport layer picks other codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success(T),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// The `_id` exactly as the client sent it, which may not be a string.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// `{result, _id}` confirmation returned by mutations that do not echo the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub result: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success(data)
    }

    pub fn error(message: &str) -> Self {
        ApiResponse::Error(ErrorBody {
            error: message.to_string(),
            id: None,
        })
    }

    pub fn error_for(message: &str, id: impl Into<Value>) -> Self {
        ApiResponse::Error(ErrorBody {
            error: message.to_string(),
            id: Some(id.into()),
        })
    }
}

impl ApiResponse<Acknowledgement> {
    pub fn acknowledged(result: &str, id: impl Into<String>) -> Self {
        ApiResponse::Success(Acknowledgement {
            result: result.to_string(),
            id: id.into(),
        })
    }
}
