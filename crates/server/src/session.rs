// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP Basic authentication at the server boundary.
//!
//! Every request is resolved to an optional caller. A request without an
//! `Authorization` header is anonymous; the handlers decide whether an
//! anonymous caller may proceed. A header that is present but malformed,
//! or that carries credentials matching no account, is rejected here.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chipwatch_api::{AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for the calling account.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionActor(actor): SessionActor,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: Option<AuthenticatedActor>
/// }
/// ```
///
/// # Authentication Flow
///
/// 1. No `Authorization` header: anonymous caller
/// 2. Decode `Basic <base64(email:password)>`
/// 3. Verify the pair with `AuthenticationService::authenticate`
///
/// # Errors
///
/// Rejects with HTTP 401 when the header is not valid Basic credentials
/// or the credentials do not match an account.
pub struct SessionActor(pub Option<AuthenticatedActor>);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            debug!("Anonymous request");
            return Ok(Self(None));
        };

        let header: &str = header.to_str().map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;
        let (email, password) = decode_basic(header).ok_or_else(|| {
            warn!("Authorization header is not valid Basic credentials");
            SessionError::InvalidAuthorizationHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::authenticate(&mut persistence, &email, &password).map_err(
                |e| {
                    warn!(error = %e, "Authentication failed");
                    SessionError::InvalidCredentials(e.to_string())
                },
            )?;

        Ok(Self(Some(actor)))
    }
}

/// Splits a `Basic` header value into its email and password.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded: &str = header.strip_prefix("Basic ")?;
    let decoded: Vec<u8> = STANDARD.decode(encoded.trim()).ok()?;
    let credentials: String = String::from_utf8(decoded).ok()?;
    let (email, password) = credentials.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

/// Authentication failures raised before a handler runs.
#[derive(Debug)]
pub enum SessionError {
    /// The header is not `Basic` followed by base64 `email:password`.
    InvalidAuthorizationHeader,
    /// The credentials do not match an account.
    InvalidCredentials(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::InvalidAuthorizationHeader => String::from(
                "Invalid Authorization header format. Expected: 'Basic <base64(email:password)>'",
            ),
            Self::InvalidCredentials(reason) => reason,
        };

        HttpError {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
        .into_response()
    }
}
