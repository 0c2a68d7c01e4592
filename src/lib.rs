//! # gphotos-client
//!
//! Google OAuth 2.0 desktop authorization plus the Google Photos Library
//! media search, over blocking HTTP.
//!
//! ## Features
//!
//! - **Desktop OAuth flow**: out-of-band consent URL, code exchange and
//!   refresh, with the tokens held by a [`TokenAuthority`]
//! - **Media search**: typed `mediaItems:search` requests and responses via
//!   [`MediaSearchClient`], caller-driven pagination
//! - **Pluggable transport**: every request goes through the [`Transport`]
//!   trait; [`HttpTransport`] is the `reqwest` implementation
//! - **Cancellation**: each call takes a [`CancellationToken`] (re-exported from `tokio-util`)
//! - **Browser Integration**: open the consent URL automatically (default
//!   feature `browser`)
//! - **CLI**: the `gphotos-search` binary (feature `cli`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use gphotos_client::{
//!     AuthConfig, CancellationToken, ContentCategory, Filters, HttpTransport, MediaSearchClient,
//!     SearchRequest, TokenAuthority, SCOPE_PHOTOS_LIBRARY_READONLY,
//! };
//! use gphotos_client::transport::DEFAULT_TIMEOUT;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new(DEFAULT_TIMEOUT)?;
//!     let cancel = CancellationToken::new();
//!
//!     let config = AuthConfig::builder()
//!         .client_id("client-id")
//!         .client_secret("client-secret")
//!         .scope(SCOPE_PHOTOS_LIBRARY_READONLY)
//!         .build();
//!     let mut authority = TokenAuthority::new(config, &transport)?;
//!
//!     println!("Visit: {}", authority.authorization_url());
//!     // Get code from user...
//!     authority.exchange_code("code", &cancel)?;
//!
//!     let photos = MediaSearchClient::new(&transport, authority.access_token());
//!     let request = SearchRequest::new()
//!         .page_size(100)
//!         .filters(Filters::including_categories([ContentCategory::Pets]));
//!     let page = photos.search(&request, &cancel)?;
//!     println!("{} items", page.media_items.len());
//!     Ok(())
//! }
//! ```

mod authority;
mod error;
mod jwt;
mod search;
mod types;

pub mod media;
pub mod settings;
pub mod transport;

#[cfg(feature = "browser")]
mod browser;

// Public API exports
pub use authority::TokenAuthority;
pub use error::{GPhotosError, Result};
pub use jwt::{IdTokenClaims, decode_id_token};
pub use media::{
    ContentCategory, ContentFilter, Date, DateFilter, DateRange, Feature, FeatureFilter, Filters,
    MediaItem, MediaMetadata, MediaType, MediaTypeFilter, SearchRequest, SearchResponse,
};
pub use search::{MediaSearchClient, PHOTOS_LIBRARY_BASE_URL};
pub use settings::Settings;
pub use transport::{HttpTransport, Transport};
pub use types::{
    AuthConfig, AuthConfigBuilder, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, OOB_REDIRECT_URI,
    SCOPE_PHOTOS_LIBRARY_READONLY, TokenState,
};

pub use tokio_util::sync::CancellationToken;

#[cfg(feature = "browser")]
pub use browser::open_browser;
