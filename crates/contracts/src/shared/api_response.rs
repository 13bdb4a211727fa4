use serde::{Deserialize, Serialize};

/// Envelope returned by every endpoint: `{status, message, data?, error?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>, error: Option<serde_json::Value>) -> Self {
        Self {
            status: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_data() {
        let resp = ApiResponse::failure("no data found", None);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], false);
        assert!(json.get("data").is_none());
        assert!(json.get("error").is_none());
    }
}
