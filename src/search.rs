use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::media::{SearchRequest, SearchResponse};
use crate::transport::{HttpRequest, Transport, ensure_active};
use crate::{GPhotosError, Result};

/// Photos Library API root
pub const PHOTOS_LIBRARY_BASE_URL: &str = "https://photoslibrary.googleapis.com/v1/";

const MEDIA_ITEMS_SEARCH_ENDPOINT: &str = "mediaItems:search";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Authenticated client for the Photos Library API
///
/// Holds one bearer token and never refreshes it; obtain a fresh one from a
/// [`TokenAuthority`](crate::TokenAuthority) and pass it to
/// [`set_access_token`](MediaSearchClient::set_access_token) when it expires.
///
/// # Example
///
/// ```no_run
/// use gphotos_client::{
///     CancellationToken, ContentCategory, Filters, HttpTransport, MediaSearchClient, SearchRequest,
/// };
/// use gphotos_client::transport::DEFAULT_TIMEOUT;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MediaSearchClient::new(HttpTransport::new(DEFAULT_TIMEOUT)?, "ya29.token");
/// let request = SearchRequest::new()
///     .page_size(100)
///     .filters(Filters::including_categories([ContentCategory::Pets]));
///
/// let page = client.search(&request, &CancellationToken::new())?;
/// for item in &page.media_items {
///     println!("{}", item.product_url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MediaSearchClient<T> {
    transport: T,
    token: String,
    base_url: String,
}

impl<T: Transport> MediaSearchClient<T> {
    pub fn new(transport: T, access_token: impl Into<String>) -> Self {
        Self {
            transport,
            token: access_token.into(),
            base_url: PHOTOS_LIBRARY_BASE_URL.to_string(),
        }
    }

    /// Point the client at another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the bearer token, e.g. after a refresh
    pub fn set_access_token(&mut self, access_token: impl Into<String>) {
        self.token = access_token.into();
    }

    pub fn access_token(&self) -> &str {
        &self.token
    }

    /// Search the library for one page of media items
    ///
    /// Pagination is up to the caller: feed `next_page_token` back in, e.g.
    /// with [`SearchRequest::next_page`].
    pub fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse> {
        self.request(MEDIA_ITEMS_SEARCH_ENDPOINT, request, cancel)
    }

    /// POST `body` as JSON to `endpoint` under the base URL and decode the reply
    ///
    /// # Errors
    ///
    /// - [`GPhotosError::Encoding`] if `body` cannot be serialized
    /// - network errors and [`GPhotosError::Cancelled`] from the transport
    /// - [`GPhotosError::Http`] for a non-success status
    /// - [`GPhotosError::Decode`] if the reply is not a `Resp`
    pub fn request<Req, Resp>(
        &self,
        endpoint: &str,
        body: &Req,
        cancel: &CancellationToken,
    ) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(GPhotosError::Encoding)?;
        ensure_active(cancel)?;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let request = HttpRequest::post(url)
            .header(AUTHORIZATION, &format!("Bearer {}", self.token))?
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)?
            .body(payload);

        debug!(endpoint, "calling Photos Library API");
        let response = self.transport.execute(request, cancel)?;
        if !response.is_success() {
            return Err(GPhotosError::Http {
                status: response.status,
                body: response.text(),
            });
        }

        serde_json::from_slice(&response.body).map_err(GPhotosError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::media::{ContentCategory, Filters};
    use crate::transport::stub::StubTransport;

    fn pets_request() -> SearchRequest {
        SearchRequest::new()
            .page_size(100)
            .filters(Filters::including_categories([ContentCategory::Pets]))
    }

    #[test]
    fn test_search_sends_authenticated_json() {
        let transport = StubTransport::new().respond(200, "{}");
        let client = MediaSearchClient::new(&transport, "ya29.token");

        let response = client
            .search(&pets_request(), &CancellationToken::new())
            .unwrap();
        assert_eq!(response, SearchResponse::default());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, reqwest::Method::POST);
        assert_eq!(
            request.url,
            "https://photoslibrary.googleapis.com/v1/mediaItems:search"
        );
        assert_eq!(request.header_str(&AUTHORIZATION), Some("Bearer ya29.token"));
        assert_eq!(request.header_str(&CONTENT_TYPE), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(
            body,
            json!({
                "pageSize": 100,
                "filters": {"contentFilter": {"includedContentCategories": ["PETS"]}}
            })
        );
    }

    #[test]
    fn test_search_decodes_page_in_order() {
        let transport = StubTransport::new().respond(
            200,
            r#"{
                "nextPageToken": "next-1",
                "mediaItems": [
                    {"id": "first", "productUrl": "https://photos.google.com/lr/photo/first"},
                    {"id": "second", "productUrl": "https://photos.google.com/lr/photo/second"}
                ]
            }"#,
        );
        let client = MediaSearchClient::new(&transport, "token");

        let response = client
            .search(&pets_request(), &CancellationToken::new())
            .unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("next-1"));
        let ids: Vec<&str> = response.media_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn test_base_url_override_and_token_swap() {
        let transport = StubTransport::new().respond(200, "{}");
        let mut client =
            MediaSearchClient::new(&transport, "old").with_base_url("http://127.0.0.1:8080/v1");
        client.set_access_token("new");
        assert_eq!(client.access_token(), "new");

        client
            .search(&SearchRequest::new(), &CancellationToken::new())
            .unwrap();
        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://127.0.0.1:8080/v1/mediaItems:search");
        assert_eq!(request.header_str(&AUTHORIZATION), Some("Bearer new"));
        assert_eq!(request.body, b"{}");
    }

    #[test]
    fn test_search_non_success_status() {
        let transport = StubTransport::new().respond(
            401,
            r#"{"error":{"code":401,"status":"UNAUTHENTICATED"}}"#,
        );
        let client = MediaSearchClient::new(&transport, "expired");

        let err = client
            .search(&pets_request(), &CancellationToken::new())
            .unwrap_err();
        assert!(err.is_protocol());
        match err {
            GPhotosError::Http { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("UNAUTHENTICATED"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_search_malformed_body() {
        let transport = StubTransport::new().respond(200, "<html>oops</html>");
        let client = MediaSearchClient::new(&transport, "token");

        let err = client
            .search(&pets_request(), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, GPhotosError::Decode(_)));
    }

    #[test]
    fn test_search_wrong_shape_is_protocol_error() {
        let transport = StubTransport::new().respond(200, r#"{"mediaItems": "nope"}"#);
        let client = MediaSearchClient::new(&transport, "token");

        let err = client
            .search(&pets_request(), &CancellationToken::new())
            .unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_search_cancelled_before_dispatch() {
        let transport = StubTransport::new().respond(200, "{}");
        let client = MediaSearchClient::new(&transport, "token");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client.search(&pets_request(), &cancel).unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.is_network());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_request_encoding_failure() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let mut body = HashMap::new();
        body.insert(vec![1u8], "value");

        let transport = StubTransport::new();
        let client = MediaSearchClient::new(&transport, "token");
        let err = client
            .request::<_, serde_json::Value>("anything", &body, &CancellationToken::new())
            .unwrap_err();
        assert!(err.is_encoding());
        assert!(transport.requests().is_empty());
    }
}
