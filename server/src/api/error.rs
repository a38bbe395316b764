use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not render page")]
    Render(#[from] std::fmt::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error! {error = %self, "Request failed"};
        (self.status(), self.to_string()).into_response()
    }
}
