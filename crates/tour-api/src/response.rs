//! API Response wrapper

use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 42);
        assert!(ok["error"].is_null());

        let err = serde_json::to_value(ApiResponse::<()>::error("CART_EMPTY", "Your cart is empty.")).unwrap();
        assert_eq!(err["success"], false);
        assert!(err["data"].is_null());
        assert_eq!(err["error"]["code"], "CART_EMPTY");
        assert_eq!(err["error"]["message"], "Your cart is empty.");
        assert!(err["timestamp"].as_str().is_some());
    }
}
