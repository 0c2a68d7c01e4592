use serde::{Deserialize, Deserializer};

/// Google's consent page
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google's token endpoint, used for both code exchange and refresh
pub const GOOGLE_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
/// Out-of-band redirect: the provider shows the code to the user instead of redirecting
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
/// Read-only access to the user's Photos library
pub const SCOPE_PHOTOS_LIBRARY_READONLY: &str =
    "https://www.googleapis.com/auth/photoslibrary.readonly";

pub(crate) const RESPONSE_TYPE: &str = "code";
pub(crate) const ACCESS_TYPE: &str = "offline";
pub(crate) const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
pub(crate) const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

/// Client credentials and provider endpoints for a [`TokenAuthority`](crate::TokenAuthority)
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth client ID issued by the Google Cloud console
    pub client_id: String,
    /// OAuth client secret issued alongside the client ID
    pub client_secret: String,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Redirect URI (default: out-of-band)
    pub redirect_uri: String,
    /// Requested scopes
    pub scopes: Vec<String>,
}

impl AuthConfig {
    /// Create a new config builder
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Scopes as sent in the `scope` parameter, space separated
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Builder for AuthConfig
#[derive(Debug, Clone, Default)]
pub struct AuthConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
    redirect_uri: Option<String>,
    scopes: Vec<String>,
}

impl AuthConfigBuilder {
    /// Set the OAuth client ID
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth client secret
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Override the authorization endpoint URL
    pub fn auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = Some(auth_url.into());
        self
    }

    /// Override the token endpoint URL
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Set the redirect URI sent with the consent and code exchange requests
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Add one scope to the request
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Add several scopes at once
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Build the AuthConfig
    ///
    /// Client credentials have no default; missing ones are left empty and
    /// rejected by [`TokenAuthority::new`](crate::TokenAuthority::new).
    pub fn build(self) -> AuthConfig {
        AuthConfig {
            client_id: self.client_id.unwrap_or_default(),
            client_secret: self.client_secret.unwrap_or_default(),
            auth_url: self.auth_url.unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_url: self.token_url.unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            redirect_uri: self
                .redirect_uri
                .unwrap_or_else(|| OOB_REDIRECT_URI.to_string()),
            scopes: self.scopes,
        }
    }
}

/// Tokens currently held by a [`TokenAuthority`](crate::TokenAuthority)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    /// Bearer credential for API calls
    pub access_token: String,
    /// Lifetime of the access token in seconds, relative to when it was issued
    pub expires_in: i64,
    /// Long-lived credential used to mint new access tokens
    pub refresh_token: String,
    /// OpenID Connect ID token, when the provider sent one
    pub id_token: String,
    /// Token type reported by the provider (normally "Bearer")
    pub token_type: String,
}

/// Decode `null` as the type's empty value, the way a missing field is treated
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Token endpoint response; every field may be missing or null
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TokenResponse {
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub access_token: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub id_token: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub expires_in: i64,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub token_type: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub refresh_token: String,
}

/// Error body returned by the token endpoint on failure
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorBody {
    pub error: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_description: String,
}
