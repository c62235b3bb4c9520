//! Authorization code exchange
//!
//! One POST to the token endpoint named in the credentials file. The raw
//! response is converted into a [`Token`] whose expiry is an absolute
//! timestamp, which is the shape written to `token.json`.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::credentials::ClientCredentials;
use crate::error::{Error, Result};

/// Access/refresh token pair as persisted to disk.
///
/// Field names match the token files read by the Google client libraries.
/// `expiry` is absent when the server did not report a lifetime.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Value for the `Authorization` header.
    ///
    /// Servers are inconsistent about the case of `token_type`; any spelling
    /// of "bearer" (or none at all) is sent as `Bearer`.
    pub fn authorization_header(&self) -> String {
        let scheme = if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer")
        {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{scheme} {}", self.access_token)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("refresh_token", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

fn default_token_type() -> String {
    String::from("Bearer")
}

/// Body returned by the token endpoint.
///
/// `expires_in` is a delta in seconds from the response time.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Convert to a persisted token, anchoring `expires_in` at `issued_at`.
    pub fn into_token(self, issued_at: DateTime<Utc>) -> Token {
        let expiry = self
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(TimeDelta::try_seconds)
            .and_then(|delta| issued_at.checked_add_signed(delta));

        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self.refresh_token.unwrap_or_default(),
            expiry,
        }
    }
}

/// Exchange an authorization code for tokens.
///
/// `code_verifier` must be the PKCE verifier whose challenge went into the
/// authorization URL, or `None` if the URL carried no challenge.
pub async fn exchange_code(
    client: &reqwest::Client,
    credentials: &ClientCredentials,
    code: &str,
    code_verifier: Option<&str>,
) -> Result<Token> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", credentials.redirect_uri.as_str()),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.expose().as_str()),
    ];
    if let Some(verifier) = code_verifier {
        form.push(("code_verifier", verifier));
    }

    debug!(token_uri = %credentials.token_uri, "exchanging authorization code");

    let response = client
        .post(credentials.token_uri.clone())
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::TokenExchange(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let token_response = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))?;

    if token_response.access_token.is_empty() {
        return Err(Error::TokenExchange(
            "server response missing access_token".into(),
        ));
    }

    if token_response.refresh_token.is_none() {
        warn!("token endpoint did not return a refresh token");
    }

    let token = token_response.into_token(Utc::now());
    info!(expiry = ?token.expiry, "authorization code exchanged");
    Ok(token)
}
