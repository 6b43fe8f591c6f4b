use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor whose rejections use the service's error shape.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::Validation("Failed to read request body".to_string()))?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        username: String,
    }

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_json_without_content_type() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(request(r#"{"username":"ann"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.username, "ann");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let err = JsonBody::<Payload>::from_request(request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));

        let err = JsonBody::<Payload>::from_request(request(""), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
