//! Request body extractor that turns axum's JSON rejections into `AppError`.
//!
//! axum's own `Json` rejects malformed bodies with a plain-text body and a
//! 415/422 status. Every endpoint here answers with `{"error": "..."}` and a
//! 400 instead, so handlers take `ApiJson<T>`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON body that rejects unknown shapes with a 400.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_error(&rejection)),
        }
    }
}

/// Describe a JSON rejection as a client error.
pub(crate) fn rejection_to_error(rejection: &JsonRejection) -> AppError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}
