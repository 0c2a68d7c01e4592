use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::{Url, form_urlencoded};

use crate::jwt::{IdTokenClaims, decode_id_token};
use crate::transport::{HttpRequest, HttpResponse, Transport, ensure_active};
use crate::types::{
    ACCESS_TYPE, GRANT_TYPE_AUTHORIZATION_CODE, GRANT_TYPE_REFRESH_TOKEN, OAuthErrorBody,
    RESPONSE_TYPE, TokenResponse,
};
use crate::{AuthConfig, GPhotosError, Result, TokenState};

const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Google OAuth 2.0 desktop-flow client that owns the current tokens
///
/// The flow has three steps: show the user [`authorization_url`], exchange
/// the code they paste back with [`exchange_code`], then keep the access
/// token fresh with [`refresh_access_token`]. Token state lives in the
/// authority and is only changed by a successful call.
///
/// [`authorization_url`]: TokenAuthority::authorization_url
/// [`exchange_code`]: TokenAuthority::exchange_code
/// [`refresh_access_token`]: TokenAuthority::refresh_access_token
///
/// # Example
///
/// ```no_run
/// use gphotos_client::{
///     AuthConfig, CancellationToken, HttpTransport, TokenAuthority, SCOPE_PHOTOS_LIBRARY_READONLY,
/// };
/// use gphotos_client::transport::DEFAULT_TIMEOUT;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AuthConfig::builder()
///         .client_id("client-id")
///         .client_secret("client-secret")
///         .scope(SCOPE_PHOTOS_LIBRARY_READONLY)
///         .build();
///     let mut authority = TokenAuthority::new(config, HttpTransport::new(DEFAULT_TIMEOUT)?)?;
///
///     println!("Visit: {}", authority.authorization_url());
///     // User authorizes and pastes the code...
///
///     authority.exchange_code("code", &CancellationToken::new())?;
///     if authority.needs_reauthorization() {
///         println!("No refresh token issued, authorize again");
///     }
///     Ok(())
/// }
/// ```
pub struct TokenAuthority<T> {
    config: AuthConfig,
    auth_url: Url,
    transport: T,
    state: TokenState,
}

impl<T: Transport> TokenAuthority<T> {
    /// Create a new authority with the given configuration and transport
    ///
    /// # Errors
    ///
    /// Returns an error if the client credentials are empty or an endpoint
    /// URL does not parse
    pub fn new(config: AuthConfig, transport: T) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(GPhotosError::InvalidConfig("client_id is empty".to_string()));
        }
        if config.client_secret.is_empty() {
            return Err(GPhotosError::InvalidConfig(
                "client_secret is empty".to_string(),
            ));
        }
        let auth_url = Url::parse(&config.auth_url)?;
        Url::parse(&config.token_url)?;

        Ok(Self {
            config,
            auth_url,
            transport,
            state: TokenState::default(),
        })
    }

    /// Seed a refresh token obtained earlier, e.g. from configuration
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.state.refresh_token = refresh_token.into();
        self
    }

    /// Seed an access token obtained earlier
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.state.access_token = access_token.into();
        self
    }

    /// Build the consent URL the user should open
    ///
    /// Always yields the same string for the same configuration.
    pub fn authorization_url(&self) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope())
            .append_pair("access_type", ACCESS_TYPE)
            .append_pair("response_type", RESPONSE_TYPE);
        url.to_string()
    }

    /// Exchange an authorization code for tokens
    ///
    /// On success the access token, its expiry and the refresh token are all
    /// replaced by the provider's answer. Google only issues a refresh token
    /// on the first consent, so check [`needs_reauthorization`] afterwards and
    /// restart the flow when it returns `true`.
    ///
    /// # Errors
    ///
    /// Network errors, cancellation, a non-success status or a body that is
    /// not a token response. Token state is untouched on error.
    ///
    /// [`needs_reauthorization`]: TokenAuthority::needs_reauthorization
    pub fn exchange_code(&mut self, code: &str, cancel: &CancellationToken) -> Result<()> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("code", code)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("grant_type", GRANT_TYPE_AUTHORIZATION_CODE)
            .append_pair("access_type", ACCESS_TYPE)
            .finish();

        let response: TokenResponse = self.post_form(body, cancel)?;

        self.state = TokenState {
            access_token: response.access_token,
            expires_in: response.expires_in,
            refresh_token: response.refresh_token,
            id_token: response.id_token,
            token_type: response.token_type,
        };

        if self.needs_reauthorization() {
            warn!("authorization succeeded but no refresh token was issued");
        } else {
            info!(expires_in = self.state.expires_in, "authorization code exchanged");
        }
        Ok(())
    }

    /// Mint a new access token from `refresh_token`
    ///
    /// The provider may omit either token from its answer. A missing access
    /// token leaves the current one in place, and a missing refresh token
    /// keeps `refresh_token`, which is still valid.
    ///
    /// # Errors
    ///
    /// Same as [`exchange_code`](TokenAuthority::exchange_code). Token state is
    /// untouched on error.
    pub fn refresh_access_token(
        &mut self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("client_secret", &self.config.client_secret)
            .append_pair("grant_type", GRANT_TYPE_REFRESH_TOKEN)
            .append_pair("refresh_token", refresh_token)
            .finish();

        let response: TokenResponse = self.post_form(body, cancel)?;

        if response.access_token.is_empty() {
            warn!("refresh response carried no access token, keeping the current one");
        } else {
            self.state.access_token = response.access_token;
            self.state.expires_in = response.expires_in;
        }
        self.state.refresh_token = if response.refresh_token.is_empty() {
            refresh_token.to_string()
        } else {
            debug!("provider rotated the refresh token");
            response.refresh_token
        };
        if !response.id_token.is_empty() {
            self.state.id_token = response.id_token;
        }
        if !response.token_type.is_empty() {
            self.state.token_type = response.token_type;
        }

        info!(expires_in = self.state.expires_in, "access token refreshed");
        Ok(())
    }

    /// True while no refresh token is held; the authorization flow must be redone
    pub fn needs_reauthorization(&self) -> bool {
        self.state.refresh_token.is_empty()
    }

    /// Current access token; empty until a code exchange or refresh succeeds
    pub fn access_token(&self) -> &str {
        &self.state.access_token
    }

    /// Current refresh token; empty means the consent flow must be run
    pub fn refresh_token(&self) -> &str {
        &self.state.refresh_token
    }

    /// Access token lifetime in seconds, as reported when it was issued
    pub fn expires_in(&self) -> i64 {
        self.state.expires_in
    }

    /// Raw ID token JWT, empty if the provider never sent one
    pub fn id_token(&self) -> &str {
        &self.state.id_token
    }

    /// Token type reported by the provider, normally "Bearer"
    pub fn token_type(&self) -> &str {
        &self.state.token_type
    }

    /// Snapshot of all held tokens
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Credentials and endpoints this authority was built with
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Decode the identity claims of the held ID token
    ///
    /// # Errors
    ///
    /// Returns an error if no ID token is held or it is not a valid JWT
    pub fn id_token_claims(&self) -> Result<IdTokenClaims> {
        decode_id_token(&self.state.id_token)
    }

    fn post_form<R: DeserializeOwned>(&self, body: String, cancel: &CancellationToken) -> Result<R> {
        ensure_active(cancel)?;

        let request = HttpRequest::post(self.config.token_url.as_str())
            .header(CONTENT_TYPE, CONTENT_TYPE_FORM)?
            .body(body);

        debug!(url = %self.config.token_url, "requesting tokens");
        let response = self.transport.execute(request, cancel)?;
        parse_token_response(response)
    }
}

fn parse_token_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R> {
    if !response.is_success() {
        let status = response.status;
        if let Ok(body) = serde_json::from_slice::<OAuthErrorBody>(&response.body) {
            return Err(GPhotosError::OAuth {
                error: body.error,
                description: body.error_description,
            });
        }
        return Err(GPhotosError::Http {
            status,
            body: response.text(),
        });
    }

    serde_json::from_slice(&response.body).map_err(GPhotosError::Decode)
}
