use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::CartError,
    catalog::CatalogError,
    checkout::CheckoutError,
    orders::OrderError,
    response::{ApiResponse, Meta},
    session::SessionError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Catalog error")]
    Catalog(#[from] CatalogError),

    #[error("Order store error")]
    Orders(#[from] OrderError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Cart(_) => StatusCode::BAD_REQUEST,
            AppError::Checkout(CheckoutError::OrderCreation(_)) => StatusCode::BAD_GATEWAY,
            AppError::Checkout(_) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::InvalidId) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Catalog(CatalogError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Orders(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Catalog(CatalogError::Validation(reason)) => reason.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let message = self.message();

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
