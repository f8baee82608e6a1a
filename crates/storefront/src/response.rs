//! Success envelopes.
//!
//! Error envelopes are rendered by [`crate::error::AppError`].

use axum::Json;
use serde::Serialize;

/// `{success: true, data}`
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub success: bool,
    pub data: T,
}

/// `{success: true, message}`
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

/// Wrap a payload in the success envelope.
pub fn data<T: Serialize>(data: T) -> Json<DataBody<T>> {
    Json(DataBody {
        success: true,
        data,
    })
}

/// A success envelope carrying only a message.
pub fn message(message: impl Into<String>) -> Json<MessageBody> {
    Json(MessageBody {
        success: true,
        message: message.into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_data_envelope() {
        let Json(body) = data(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"success": true, "data": [1, 2]})
        );
    }

    #[test]
    fn test_message_envelope() {
        let Json(body) = message("Logged out successfully!");
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"success": true, "message": "Logged out successfully!"})
        );
    }
}
