//! Client credentials loading
//!
//! Parses the client-secret JSON issued by the Google Cloud console. The file
//! wraps the client under a top-level `"installed"` (desktop app) or `"web"`
//! key; if both are present, `"web"` wins.

use std::path::Path;

use common::Secret;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// OAuth client configuration for the authorization-code flow.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub auth_uri: Url,
    pub token_uri: Url,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    web: Option<ClientSecretEntry>,
    installed: Option<ClientSecretEntry>,
}

#[derive(Deserialize)]
struct ClientSecretEntry {
    client_id: String,
    #[serde(default)]
    client_secret: Secret<String>,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientCredentials {
    /// Parse a client-secret JSON document and attach the requested scopes.
    pub fn from_json(data: &[u8], scopes: &[&str]) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_slice(data)
            .map_err(|e| Error::ConfigParse(format!("parsing client secret JSON: {e}")))?;

        let entry = file.web.or(file.installed).ok_or_else(|| {
            Error::ConfigParse("no \"installed\" or \"web\" client found".into())
        })?;

        let redirect_uri = entry.redirect_uris.into_iter().next().ok_or_else(|| {
            Error::ConfigParse("missing redirect URI in client credentials".into())
        })?;

        Ok(Self {
            client_id: entry.client_id,
            client_secret: entry.client_secret,
            auth_uri: parse_endpoint("auth_uri", &entry.auth_uri)?,
            token_uri: parse_endpoint("token_uri", &entry.token_uri)?,
            redirect_uri,
            scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
        })
    }

    /// Load credentials from the given file path.
    ///
    /// Existence is checked up front so a first run without the file reports
    /// `ConfigNotFound` rather than a generic I/O failure.
    pub async fn load(path: &Path, scopes: &[&str]) -> Result<Self> {
        if matches!(tokio::fs::try_exists(path).await, Ok(false)) {
            debug!(path = %path.display(), "credentials file missing");
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::ConfigParse(format!("reading {}: {e}", path.display())))?;
        let credentials = Self::from_json(&data, scopes)?;

        info!(
            path = %path.display(),
            client_id = %credentials.client_id,
            "loaded client credentials"
        );
        Ok(credentials)
    }
}

fn parse_endpoint(field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::ConfigParse(format!("invalid {field} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DRIVE_FILE_SCOPE;

    fn installed_json() -> &'static str {
        r#"{
  "installed": {
    "client_id": "1234-abc.apps.googleusercontent.com",
    "project_id": "drive-sync",
    "auth_uri": "https://accounts.google.com/o/oauth2/auth",
    "token_uri": "https://oauth2.googleapis.com/token",
    "auth_provider_x509_cert_url": "https://www.googleapis.com/oauth2/v1/certs",
    "client_secret": "GOCSPX-secret",
    "redirect_uris": ["http://localhost", "urn:ietf:wg:oauth:2.0:oob"]
  }
}"#
    }

    #[test]
    fn parses_installed_client() {
        let creds =
            ClientCredentials::from_json(installed_json().as_bytes(), &[DRIVE_FILE_SCOPE]).unwrap();
        assert_eq!(creds.client_id, "1234-abc.apps.googleusercontent.com");
        assert_eq!(creds.client_secret.expose(), "GOCSPX-secret");
        assert_eq!(
            creds.auth_uri.as_str(),
            "https://accounts.google.com/o/oauth2/auth"
        );
        assert_eq!(creds.token_uri.as_str(), "https://oauth2.googleapis.com/token");
        assert_eq!(creds.redirect_uri, "http://localhost");
        assert_eq!(creds.scopes, vec![DRIVE_FILE_SCOPE]);
    }

    #[test]
    fn web_entry_takes_precedence() {
        let json = r#"{
  "web": {"client_id": "web-id", "auth_uri": "https://a", "token_uri": "https://t", "redirect_uris": ["https://cb"]},
  "installed": {"client_id": "desktop-id", "auth_uri": "https://a", "token_uri": "https://t", "redirect_uris": ["http://localhost"]}
}"#;
        let creds = ClientCredentials::from_json(json.as_bytes(), &[]).unwrap();
        assert_eq!(creds.client_id, "web-id");
        assert_eq!(creds.redirect_uri, "https://cb");
    }

    #[test]
    fn missing_client_secret_is_empty() {
        let json = r#"{"installed": {"client_id": "id", "auth_uri": "https://a", "token_uri": "https://t", "redirect_uris": ["http://localhost"]}}"#;
        let creds = ClientCredentials::from_json(json.as_bytes(), &[]).unwrap();
        assert!(creds.client_secret.expose().is_empty());
    }

    #[test]
    fn rejects_file_without_client_entry() {
        let err = ClientCredentials::from_json(br#"{"service_account": {}}"#, &[]).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)), "got: {err:?}");
    }

    #[test]
    fn rejects_missing_redirect_uris() {
        let json = r#"{"installed": {"client_id": "id", "auth_uri": "https://a", "token_uri": "https://t"}}"#;
        let err = ClientCredentials::from_json(json.as_bytes(), &[]).unwrap_err();
        assert!(err.to_string().contains("redirect URI"), "got: {err}");
    }

    #[test]
    fn rejects_relative_token_uri() {
        let json = r#"{"installed": {"client_id": "id", "auth_uri": "https://a", "token_uri": "/token", "redirect_uris": ["http://localhost"]}}"#;
        let err = ClientCredentials::from_json(json.as_bytes(), &[]).unwrap_err();
        assert!(err.to_string().contains("token_uri"), "got: {err}");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ClientCredentials::from_json(b"not json", &[]).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)), "got: {err:?}");
    }

    #[test]
    fn debug_output_redacts_client_secret() {
        let creds =
            ClientCredentials::from_json(installed_json().as_bytes(), &[DRIVE_FILE_SCOPE]).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("GOCSPX-secret"), "secret leaked: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn load_missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oauth-credentials.json");

        let err = ClientCredentials::load(&path, &[DRIVE_FILE_SCOPE])
            .await
            .unwrap_err();
        match err {
            Error::ConfigNotFound(p) => assert_eq!(p, path),
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oauth-credentials.json");
        tokio::fs::write(&path, installed_json()).await.unwrap();

        let creds = ClientCredentials::load(&path, &[DRIVE_FILE_SCOPE])
            .await
            .unwrap();
        assert_eq!(creds.client_id, "1234-abc.apps.googleusercontent.com");
    }
}
