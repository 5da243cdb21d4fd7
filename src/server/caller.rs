//! Caller identity as supplied by the transport.
//!
//! The service sits behind whatever authenticates callers (a signing
//! gateway, a session proxy); that layer forwards the verified identity
//! in the `x-caller-identity` header. Nothing here verifies it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts
};

use crate::core::Identity;
use crate::server::error::ServerError;

pub const CALLER_IDENTITY_HEADER: &str = "x-caller-identity";

pub struct Caller(pub Identity);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers
            .get(CALLER_IDENTITY_HEADER)
            .ok_or(ServerError::MissingIdentity)?
            .to_str()
            .map_err(|_| ServerError::MissingIdentity)?;

        if header.trim().is_empty() {
            return Err(ServerError::MissingIdentity);
        }
        let identity = header.parse::<Identity>()?;
        Ok(Caller(identity))
    }
}
