//! End-to-end token generation flow
//!
//! Drives the run through its stages in a fixed order:
//!
//! `Start → CredentialsLoaded → AuthUrlIssued → AwaitingUserCode →
//! TokenExchanged → TokenPersisted → Verified`
//!
//! Transitions are one-way and the first error ends the run. The token is
//! on disk before the verification call is made, so a failed verification
//! still leaves a usable file behind.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::authorize::build_authorization_url;
use crate::constants::{
    CREDENTIALS_FILE, DRIVE_FILE_SCOPE, GOOGLE_API_BASE, STATIC_STATE, TOKEN_FILE,
};
use crate::credentials::ClientCredentials;
use crate::error::Result;
use crate::pkce::PkcePair;
use crate::prompt::CodeSource;
use crate::store::save_token;
use crate::token::exchange_code;
use crate::verify::{DriveClient, DriveUser};

/// Progress through a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    CredentialsLoaded,
    AuthUrlIssued,
    AwaitingUserCode,
    TokenExchanged,
    TokenPersisted,
    Verified,
}

impl Stage {
    /// The stage that follows this one, or `None` once verified.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::CredentialsLoaded),
            Stage::CredentialsLoaded => Some(Stage::AuthUrlIssued),
            Stage::AuthUrlIssued => Some(Stage::AwaitingUserCode),
            Stage::AwaitingUserCode => Some(Stage::TokenExchanged),
            Stage::TokenExchanged => Some(Stage::TokenPersisted),
            Stage::TokenPersisted => Some(Stage::Verified),
            Stage::Verified => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::CredentialsLoaded => "credentials loaded",
            Stage::AuthUrlIssued => "authorization URL issued",
            Stage::AwaitingUserCode => "awaiting authorization code",
            Stage::TokenExchanged => "token exchanged",
            Stage::TokenPersisted => "token persisted",
            Stage::Verified => "verified",
        };
        f.write_str(name)
    }
}

/// Inputs for one run. The binary always uses [`Settings::default`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub scopes: Vec<String>,
    /// Base URL for the verification call
    pub api_base: String,
    pub state: String,
    pub use_pkce: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(CREDENTIALS_FILE),
            token_path: PathBuf::from(TOKEN_FILE),
            scopes: vec![DRIVE_FILE_SCOPE.to_owned()],
            api_base: GOOGLE_API_BASE.to_owned(),
            state: STATIC_STATE.to_owned(),
            use_pkce: true,
        }
    }
}

fn advance(stage: Stage) -> Stage {
    match stage.next() {
        Some(next) => {
            info!(from = %stage, to = %next, "stage transition");
            next
        }
        None => stage,
    }
}

/// Run the whole flow, writing operator-facing text to `out`.
///
/// Writes to `out` are best-effort; a broken stdout does not abort the run.
pub async fn run<S, W>(settings: &Settings, codes: &mut S, out: &mut W) -> Result<DriveUser>
where
    S: CodeSource,
    W: Write,
{
    let mut stage = Stage::Start;

    let scopes: Vec<&str> = settings.scopes.iter().map(String::as_str).collect();
    let credentials = ClientCredentials::load(&settings.credentials_path, &scopes).await?;
    stage = advance(stage);

    let pkce = settings.use_pkce.then(PkcePair::generate);
    let auth_url = build_authorization_url(
        &credentials,
        &settings.state,
        pkce.as_ref().map(|p| p.challenge.as_str()),
    );
    let _ = writeln!(out, "\nStep 1: Open this URL in your browser:\n{auth_url}\n");
    stage = advance(stage);

    let _ = writeln!(
        out,
        "Step 2: After authorizing, copy the authorization code from the browser"
    );
    let _ = write!(out, "Enter authorization code: ");
    let _ = out.flush();
    stage = advance(stage);
    let code = codes.read_code()?;

    let _ = writeln!(out, "\nExchanging authorization code for token...");
    let http = reqwest::Client::new();
    let token = exchange_code(
        &http,
        &credentials,
        &code,
        pkce.as_ref().map(|p| p.verifier.as_str()),
    )
    .await?;
    stage = advance(stage);

    let _ = writeln!(out, "Saving token to {}...", settings.token_path.display());
    save_token(&settings.token_path, &token).await?;
    stage = advance(stage);

    let _ = writeln!(out, "Testing token by making a Drive API call...");
    let drive = DriveClient::new(&token, &settings.api_base)?;
    let user = drive.about_user().await?;
    let stage = advance(stage);
    info!(%stage, "token generation complete");

    let _ = writeln!(
        out,
        "Token is valid! Authenticated as: {} ({})",
        user.display_name, user.email_address
    );
    Ok(user)
}

/// Step-by-step instructions shown when the credentials file is missing.
pub fn setup_instructions(credentials_path: &Path) -> String {
    let path = credentials_path.display();
    format!(
        "Error: {path} not found

Setup Instructions:
1. Go to https://console.cloud.google.com/
2. Navigate to APIs & Services > Credentials
3. Click 'Create Credentials' > 'OAuth 2.0 Client IDs'
4. Choose 'Desktop application'
5. Download the JSON file and save it as '{path}' in this directory
6. Make sure the Google Drive API is enabled in your project
"
    )
}
