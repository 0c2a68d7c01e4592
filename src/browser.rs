use crate::{GPhotosError, Result};

/// Open the consent page in the user's default web browser
///
/// The out-of-band flow still needs the user to paste the code back, so
/// this only saves copying the URL.
///
/// # Errors
///
/// Returns an error if the browser cannot be launched
///
/// # Example
///
/// ```no_run
/// use gphotos_client::{AuthConfig, HttpTransport, TokenAuthority, open_browser};
/// use gphotos_client::transport::DEFAULT_TIMEOUT;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AuthConfig::builder().client_id("id").client_secret("secret").build();
/// let authority = TokenAuthority::new(config, HttpTransport::new(DEFAULT_TIMEOUT)?)?;
///
/// open_browser(&authority.authorization_url())?;
/// # Ok(())
/// # }
/// ```
pub fn open_browser(url: &str) -> Result<()> {
    webbrowser::open(url).map_err(|e| GPhotosError::BrowserLaunch(e.to_string()))
}
