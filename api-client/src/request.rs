use std::time::Duration;

use http::Uri;
use serde::Serialize;

use crate::error::Error;
use crate::uri::UriExtension as _;
use crate::{response::Response, ApiClient, Authentication};

/// Copy the method, URI and headers of a request, leaving the body behind.
pub(crate) fn parts<B>(req: &http::Request<B>) -> http::request::Parts {
    let (mut parts, _) = http::Request::new(()).into_parts();
    parts.method = req.method().clone();
    parts.uri = req.uri().clone();
    parts.headers = req.headers().clone();
    parts.version = req.version();
    parts
}

/// A client, the request to send through it, and the deadline.
type Prepared<A> = (ApiClient<A>, http::Request<hyperdriver::Body>, Option<Duration>);

/// A request under construction against an [ApiClient] endpoint.
#[derive(Debug)]
pub struct RequestBuilder<A> {
    client: ApiClient<A>,
    method: http::Method,
    uri: Result<Uri, Error>,
    query: Vec<String>,
    timeout: Option<Duration>,
}

impl<A> RequestBuilder<A> {
    pub(crate) fn new(client: ApiClient<A>, uri: Result<Uri, Error>, method: http::Method) -> Self {
        Self {
            client,
            method,
            uri,
            query: Vec::new(),
            timeout: None,
        }
    }

    /// Append URL-encoded query parameters to the request.
    ///
    /// May be called more than once, parameters accumulate in order.
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        match serde_urlencoded::to_string(query) {
            Ok(encoded) if encoded.is_empty() => {}
            Ok(encoded) => self.query.push(encoded),
            Err(error) => {
                if self.uri.is_ok() {
                    self.uri = Err(error.into());
                }
            }
        }
        self
    }

    /// Fail the request if it does not complete within `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn build(self) -> Result<Prepared<A>, Error> {
        let uri = self.uri?.with_query(&self.query.join("&"))?;

        let req = http::Request::builder()
            .method(self.method)
            .uri(uri)
            .body(hyperdriver::Body::empty())?;

        Ok((self.client, req, self.timeout))
    }

    /// Send the request.
    pub async fn send(self) -> Result<Response, Error>
    where
        A: Authentication,
    {
        let (client, req, timeout) = self.build()?;
        tracing::trace!(method = %req.method(), uri = %req.uri(), "Sending request");

        match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, client.execute(req)).await {
                Ok(res) => Ok(res?),
                Err(_) => Err(Error::Timeout(timeout)),
            },
            None => Ok(client.execute(req).await?),
        }
    }
}
