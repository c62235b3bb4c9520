//! Google Drive OAuth token generation
//!
//! Runs the installed-app authorization-code flow once and writes the
//! resulting token pair to disk:
//! 1. `ClientCredentials::load()` reads `oauth-credentials.json`
//! 2. `authorize::build_authorization_url()` produces the consent URL
//! 3. The operator pastes the code back through a `CodeSource`
//! 4. `token::exchange_code()` trades it for a `Token`
//! 5. `store::save_token()` writes `token.json` (0600)
//! 6. `verify::DriveClient` confirms the token with one `about` call
//!
//! `flow::run()` ties the steps together in that order.

pub mod authorize;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod pkce;
pub mod prompt;
pub mod store;
pub mod token;
pub mod verify;

pub use authorize::build_authorization_url;
pub use constants::*;
pub use credentials::ClientCredentials;
pub use error::{Error, Result};
pub use flow::{Settings, Stage, run, setup_instructions};
pub use pkce::PkcePair;
pub use prompt::{CodeSource, LineCodeSource};
pub use store::{load_token, save_token};
pub use token::{Token, TokenResponse, exchange_code};
pub use verify::{DriveClient, DriveUser};
