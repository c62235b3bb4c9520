//! Token verification against the Drive API
//!
//! A single `about` lookup proves the fresh access token is accepted and
//! tells the operator which account it belongs to.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::DRIVE_ABOUT_PATH;
use crate::error::{Error, Result};
use crate::token::Token;

/// The authenticated principal as reported by Drive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUser {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: String,
}

#[derive(Deserialize)]
struct About {
    user: DriveUser,
}

/// Drive client that sends the token on every request.
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
}

impl DriveClient {
    /// Build a client authenticated with `token`.
    pub fn new(token: &Token, api_base: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&token.authorization_header())
            .map_err(|e| Error::ServiceInit(format!("access token is not a valid header: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ServiceInit(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetch the user behind the token (`about?fields=user`).
    pub async fn about_user(&self) -> Result<DriveUser> {
        let url = format!("{}{DRIVE_ABOUT_PATH}?fields=user", self.api_base);
        debug!(%url, "requesting Drive about");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::VerificationCall(format!("about request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(Error::VerificationCall(format!(
                "Drive API returned {status}: {body}"
            )));
        }

        let about = response
            .json::<About>()
            .await
            .map_err(|e| Error::VerificationCall(format!("invalid about response: {e}")))?;

        info!(email = %about.user.email_address, "token verified");
        Ok(about.user)
    }
}
