//! A small client for JSON HTTP APIs, built on a `hyperdriver` tower stack.
//!
//! Individual API crates wrap an [ApiClient] with their own base URL,
//! authentication and typed endpoints.

use std::sync::Arc;

use http::{Method, Uri};
use hyperdriver::service::SharedService;
pub use secret::Secret;
use tower::ServiceExt;

mod authentication;
mod error;
pub mod request;
pub mod response;
pub mod uri;

pub use self::authentication::{
    Anonymous, Authentication, AuthenticationLayer, AuthenticationService, BearerAuth,
};
pub use self::error::{Error, HttpResponseError};
pub use self::request::RequestBuilder;
pub use self::response::Response;
use self::uri::UriExtension as _;

/// A client for accessing APIs over HTTP / HTTPS
///
/// Useful inner object to wrap for individual API clients.
#[derive(Debug, Clone)]
pub struct ApiClient<A> {
    base: Arc<Uri>,
    inner: hyperdriver::client::SharedClientService<hyperdriver::Body, hyperdriver::Body>,
    authentication: Arc<A>,
}

impl<A> ApiClient<A>
where
    A: Authentication + Send + Sync + 'static,
{
    /// Create a new API Client which sends requests through a custom service.
    ///
    /// Authentication is layered on top of `inner`.
    pub fn new_with_inner_service<S>(base: Uri, authentication: A, inner: S) -> Self
    where
        S: tower::Service<
                http::Request<hyperdriver::Body>,
                Response = http::Response<hyperdriver::Body>,
                Error = hyperdriver::client::Error,
            > + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let authentication = Arc::new(authentication);

        let service = tower::ServiceBuilder::new()
            .layer(SharedService::layer())
            .layer(AuthenticationLayer::new(authentication.clone()))
            .service(inner);

        ApiClient {
            base: Arc::new(base),
            inner: service,
            authentication,
        }
    }

    /// The authentication method applied to requests.
    pub fn auth(&self) -> &A {
        &self.authentication
    }

    /// The base URI endpoints are resolved against.
    pub fn base(&self) -> &Uri {
        &self.base
    }
}

impl<A> ApiClient<A>
where
    A: Authentication,
{
    /// Build a GET request against an endpoint relative to the base URI.
    pub fn get(&self, endpoint: &str) -> RequestBuilder<A> {
        let url = (*self.base).clone().join(endpoint).map_err(Error::from);
        RequestBuilder::new(self.clone(), url, Method::GET)
    }

    /// Send a fully built request.
    pub async fn execute(
        &self,
        req: http::Request<hyperdriver::Body>,
    ) -> Result<Response, hyperdriver::client::Error> {
        let parts = request::parts(&req);

        let response = self.inner.clone().oneshot(req).await?;
        Ok(Response::new(parts, response))
    }
}

/// Canned responses for exercising API clients without a network.
pub mod mock {
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// A response replayed by the [MockService].
    #[derive(Debug, Clone)]
    pub struct MockResponse {
        status: http::StatusCode,
        headers: http::HeaderMap,
        body: Bytes,
    }

    impl MockResponse {
        /// Create a response from its parts.
        pub fn new(
            status: http::StatusCode,
            headers: http::HeaderMap,
            body: impl Into<Bytes>,
        ) -> Self {
            Self {
                status,
                headers,
                body: body.into(),
            }
        }

        /// A `200 OK` response with a JSON body.
        pub fn json(body: impl Into<Bytes>) -> Self {
            let mut headers = http::HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            );
            Self::new(http::StatusCode::OK, headers, body)
        }
    }

    /// A request received by the [MockService].
    #[derive(Debug, Clone)]
    pub struct MockRequest {
        /// Request method
        pub method: http::Method,
        /// Full request URI, including the query
        pub uri: http::Uri,
        /// Request headers, after authentication was applied
        pub headers: http::HeaderMap,
    }

    /// A tower service which answers requests by path.
    ///
    /// Paths without a configured response get a `404 Not Found`.
    /// Every request received is recorded and available from [MockService::requests].
    #[derive(Debug, Default, Clone)]
    pub struct MockService {
        responses: HashMap<String, MockResponse>,
        requests: Arc<Mutex<Vec<MockRequest>>>,
    }

    impl MockService {
        /// Create a mock with no configured responses.
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer requests for `path` with `response`.
        pub fn add(&mut self, path: &str, response: MockResponse) {
            self.responses.insert(path.to_owned(), response);
        }

        /// Requests received so far, in order.
        pub fn requests(&self) -> Vec<MockRequest> {
            self.requests
                .lock()
                .map(|requests| requests.clone())
                .unwrap_or_default()
        }
    }

    impl tower::Service<http::Request<hyperdriver::Body>> for MockService {
        type Response = http::Response<hyperdriver::Body>;
        type Error = hyperdriver::client::Error;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(
            &mut self,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Result<(), Self::Error>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<hyperdriver::Body>) -> Self::Future {
            let path = req.uri().path().to_owned();
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(MockRequest {
                    method: req.method().clone(),
                    uri: req.uri().clone(),
                    headers: req.headers().clone(),
                });
            }

            let response = self.responses.get(&path).cloned().unwrap_or_else(|| {
                MockResponse::new(
                    http::StatusCode::NOT_FOUND,
                    http::HeaderMap::new(),
                    Bytes::from_static(b"{\"message\":\"Not Found\"}"),
                )
            });

            let mut builder = http::Response::builder()
                .status(response.status)
                .version(http::Version::HTTP_11);

            if let Some(headers) = builder.headers_mut() {
                headers.extend(response.headers);
            }

            let response = builder
                .body(hyperdriver::Body::from(response.body))
                .expect("mock response is valid");

            std::future::ready(Ok(response))
        }
    }
}
