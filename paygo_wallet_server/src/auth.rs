//! Caller identity.
//!
//! Request authentication is terminated upstream (the auth service verifies the bearer token and forwards the
//! resolved identity). Handlers receive that identity through the [`AuthenticatedUser`] extractor, which reads
//! the forwarded header. A request without a parseable identity never reaches a handler body.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::errors::ServerError;

/// Header set by the upstream authentication layer.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .map(|id| AuthenticatedUser { id })
            .ok_or(ServerError::Unauthenticated);
        ready(user)
    }
}
