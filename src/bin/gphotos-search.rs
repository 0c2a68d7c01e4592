//! Search a Google Photos library from the terminal
//!
//! Reads `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` and optionally
//! `GOOGLE_REFRESH_TOKEN` from the environment (or a `.env` file). Without a
//! refresh token it walks the user through the consent flow first.
//!
//! Run with: cargo run --features cli --bin gphotos-search -- --category pets

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use gphotos_client::{
    AuthConfig, CancellationToken, ContentCategory, Filters, HttpTransport, MediaSearchClient,
    SCOPE_PHOTOS_LIBRARY_READONLY, SearchRequest, Settings, TokenAuthority, Transport,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Search a Google Photos library by content category
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Items per page
    #[arg(long, default_value_t = 100)]
    page_size: u32,

    /// Content category to match, e.g. PETS or LANDSCAPES
    #[arg(long, default_value = "PETS")]
    category: ContentCategory,

    /// List an album instead; the category filter is ignored
    #[arg(long)]
    album_id: Option<String>,

    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Open the consent page in the default browser
    #[cfg(feature = "browser")]
    #[arg(long)]
    open_browser: bool,

    /// Debug logging for the client library
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,gphotos_client=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

#[cfg(feature = "browser")]
fn launch_browser(url: &str) {
    if let Err(e) = gphotos_client::open_browser(url) {
        warn!(error = %e, "could not open browser");
    }
}

#[cfg(not(feature = "browser"))]
fn launch_browser(_url: &str) {
    warn!("built without the browser feature, open the URL manually");
}

/// Run the consent flow until the provider hands out a refresh token
fn authorize<T: Transport>(
    authority: &mut TokenAuthority<T>,
    open_browser: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<String> {
    let stdin = io::stdin();
    loop {
        let url = authority.authorization_url();
        println!("Open in your web browser:");
        println!("{}\n", url);
        if open_browser {
            launch_browser(&url);
        }

        print!("Input authorization code > ");
        io::stdout().flush()?;

        let mut code = String::new();
        if stdin.lock().read_line(&mut code)? == 0 {
            bail!("no authorization code entered");
        }

        info!("Authorizing...");
        authority
            .exchange_code(code.trim(), cancel)
            .context("authorization code exchange failed")?;

        if authority.needs_reauthorization() {
            println!("\nNo refresh token was issued, retry authorization.\n");
            continue;
        }

        println!(
            "\nSave this to skip authorization next time:\n{}={}\n",
            gphotos_client::settings::ENV_REFRESH_TOKEN,
            authority.refresh_token()
        );
        return Ok(authority.refresh_token().to_string());
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = Settings::from_env()?;
    let transport = HttpTransport::new(Duration::from_secs(args.timeout_secs))?;
    let cancel = CancellationToken::new();

    let config = AuthConfig::builder()
        .client_id(settings.client_id)
        .client_secret(settings.client_secret)
        .scope(SCOPE_PHOTOS_LIBRARY_READONLY)
        .build();
    let mut authority = TokenAuthority::new(config, &transport)?;

    #[cfg(feature = "browser")]
    let open_browser = args.open_browser;
    #[cfg(not(feature = "browser"))]
    let open_browser = false;

    let refresh_token = match settings.refresh_token {
        Some(token) => token,
        None => authorize(&mut authority, open_browser, &cancel)?,
    };

    info!("Refreshing access token...");
    authority
        .refresh_access_token(&refresh_token, &cancel)
        .context("access token refresh failed")?;
    println!("Authorized!");
    println!("Access token : {}", authority.access_token());
    println!("Refresh token: {}", authority.refresh_token());
    info!(expires_in = authority.expires_in(), "access token ready");
    match authority.id_token_claims() {
        Ok(claims) => info!(subject = %claims.sub, email = ?claims.email, "signed in"),
        Err(e) => debug!(error = %e, "no identity claims available"),
    }

    let photos = MediaSearchClient::new(&transport, authority.access_token());
    let first = SearchRequest::new().page_size(args.page_size);
    // The API rejects album searches that also carry filters.
    let first = match args.album_id {
        Some(album_id) => first.album_id(album_id),
        None => first.filters(Filters::including_categories([args.category])),
    };

    let mut next = Some(first);
    let mut fetched = 0;
    while let Some(request) = next.take() {
        if fetched == args.pages {
            break;
        }
        let page = photos.search(&request, &cancel)?;
        fetched += 1;
        info!(page = fetched, items = page.media_items.len(), "fetched page");

        for item in &page.media_items {
            println!("{}", item.product_url);
        }
        next = request.next_page(&page);
    }

    Ok(())
}
