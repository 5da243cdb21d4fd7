use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json
};
use serde::Serialize;

use crate::core::LedgerError;
use crate::custody::CustodyError;

#[derive(Debug)]
pub enum ServerError {
    MissingIdentity,
    Ledger(LedgerError),
    InternalError(anyhow::Error)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str
}

impl ServerError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingIdentity => (StatusCode::UNAUTHORIZED, "missing_identity"),
            Self::Ledger(err) => match err {
                LedgerError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "unauthorized"),
                LedgerError::InsufficientFunds { .. } => (StatusCode::CONFLICT, "insufficient_funds"),
                LedgerError::InvalidAmount(..) => (StatusCode::BAD_REQUEST, "invalid_amount"),
                LedgerError::InvalidIdentity(..) => (StatusCode::BAD_REQUEST, "invalid_identity"),
                LedgerError::TransferFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "transfer_failed"),
                LedgerError::Inconsistent { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "inconsistent")
            },
            Self::InternalError(..) => (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let error = match self {
            Self::MissingIdentity => "caller identity header missing".to_owned(),
            Self::Ledger(err) => err.to_string(),
            Self::InternalError(err) => {
                log::error!("internal error: {:#}", err);
                format!("Internal error: {}", err)
            }
        };
        (status, Json(ErrorBody { error, kind })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<CustodyError> for ServerError {
    fn from(err: CustodyError) -> Self {
        match err {
            CustodyError::Ledger(err) => Self::Ledger(err),
            other => Self::InternalError(other.into())
        }
    }
}
