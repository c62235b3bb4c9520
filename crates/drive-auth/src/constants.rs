//! Google OAuth and Drive API constants
//!
//! Endpoints for the authorization server come from the credentials file;
//! only the values the credentials file does not carry live here.

/// Credentials file downloaded from the Google Cloud console
pub const CREDENTIALS_FILE: &str = "oauth-credentials.json";

/// Destination for the generated token
pub const TOKEN_FILE: &str = "token.json";

/// Per-file Drive access: only files created or opened by the app.
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Base URL of the Google APIs front end
pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com";

/// Path of the Drive `about` resource, relative to the API base
pub const DRIVE_ABOUT_PATH: &str = "/drive/v3/about";

/// Opaque `state` value sent with the authorization request.
///
/// Static: the code comes back through the operator's clipboard, not a
/// redirect handler, so it is never compared against anything.
pub const STATIC_STATE: &str = "state-token";
