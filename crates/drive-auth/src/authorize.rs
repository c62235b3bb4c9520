//! Authorization URL construction

use crate::credentials::ClientCredentials;

/// Build the URL the operator opens to grant access.
///
/// Always requests an authorization code with offline access and a forced
/// consent prompt: Google only issues a refresh token on the first consent
/// unless `prompt=consent` is sent. `code_challenge` adds the PKCE S256
/// parameters when present. Parameters already on `auth_uri` are kept.
pub fn build_authorization_url(
    credentials: &ClientCredentials,
    state: &str,
    code_challenge: Option<&str>,
) -> String {
    let mut url = credentials.auth_uri.clone();
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("access_type", "offline")
            .append_pair("client_id", &credentials.client_id)
            .append_pair("prompt", "consent")
            .append_pair("redirect_uri", &credentials.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &credentials.scopes.join(" "))
            .append_pair("state", state);
        if let Some(challenge) = code_challenge {
            query
                .append_pair("code_challenge", challenge)
                .append_pair("code_challenge_method", "S256");
        }
    }
    url.into()
}
