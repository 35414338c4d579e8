//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "data": ..., "message": ... }`.
//! Recommendation endpoints additionally report `cached`, `fallback` and
//! `limitReached`. Absent fields are omitted. Errors are rendered by
//! [`AppError`](crate::error::AppError) as `{ "success": false, "error", "code" }`.

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::data(slots)))
/// Ok(Json(ApiResponse::data(app).with_message("Application submitted successfully")))
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_reached: Option<bool>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            cached: None,
            fallback: None,
            limit_reached: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = Some(cached);
        self
    }

    pub fn with_fallback(mut self) -> Self {
        self.fallback = Some(true);
        self
    }

    pub fn with_limit_reached(mut self) -> Self {
        self.limit_reached = Some(true);
        self
    }
}

impl ApiResponse<()> {
    /// A success envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            cached: None,
            fallback: None,
            limit_reached: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_flags_are_omitted() {
        let json = serde_json::to_value(ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn fallback_flags_serialize_camel_case() {
        let json = serde_json::to_value(
            ApiResponse::data(Vec::<u8>::new())
                .with_cached(false)
                .with_fallback()
                .with_limit_reached(),
        )
        .unwrap();
        assert_eq!(json["cached"], false);
        assert_eq!(json["fallback"], true);
        assert_eq!(json["limitReached"], true);
    }

    #[test]
    fn message_only_has_no_data() {
        let json = serde_json::to_value(ApiResponse::message("Slot deleted successfully")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "Slot deleted successfully" })
        );
    }
}
