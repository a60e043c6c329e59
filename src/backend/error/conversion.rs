/**
 * Error Conversion
 *
 * Turns a [`BackendError`] into an HTTP response. Server faults are logged
 * here with their full detail; the response body is only the canonical
 * reason phrase for the status, so no internal error text reaches the client.
 */

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}
