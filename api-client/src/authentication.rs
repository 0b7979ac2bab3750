//! Authentication for API clients.
//!
//! The `Authentication` trait is used to authenticate with an API queried via the `ApiClient`.
//!
//! Implementations are provided for:
//! - `BearerAuth` for Bearer token authentication
//! - `Anonymous` for no authentication
//! - `Option<A>`, which authenticates only when a method is present

use std::sync::Arc;

use http::HeaderValue;
use secret::Secret;
use tower::layer::Layer;

/// Trait to represent authenticating requests sent by an `ApiClient`.
pub trait Authentication: Clone {
    /// Called by the `ApiClient` to implement authorization.
    fn authenticate<B>(&self, req: http::Request<B>) -> http::Request<B>;
}

/// Authentication with a bearer token, often used with an API key.
///
/// The token is stored as a [Secret] to prevent it from being logged.
///
/// # Example
/// ```rust
/// use api_client::BearerAuth;
///
/// let auth = BearerAuth::new("my-secret");
/// let header = auth.header_value().unwrap();
///
/// assert_eq!(header.to_str().unwrap(), "Bearer my-secret");
/// ```
#[derive(Debug, Clone)]
pub struct BearerAuth(Secret);

impl BearerAuth {
    /// Create a new Bearer authentication with a given key.
    pub fn new<K: Into<Secret>>(key: K) -> Self {
        BearerAuth(key.into())
    }

    /// Get the header value for the Bearer token.
    pub fn header_value(&self) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
        self.0.bearer()
    }
}

impl Authentication for BearerAuth {
    fn authenticate<B>(&self, mut req: http::Request<B>) -> http::Request<B> {
        if req.headers().contains_key(http::header::AUTHORIZATION) {
            tracing::warn!("{} header already set", http::header::AUTHORIZATION);
            return req;
        }

        match self.header_value() {
            Ok(value) => {
                req.headers_mut().append(http::header::AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Bearer token is not a valid header value, sending unauthenticated");
            }
        }
        req
    }
}

/// No authentication. Requests are sent as they are built.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Authentication for Anonymous {
    fn authenticate<B>(&self, req: http::Request<B>) -> http::Request<B> {
        req
    }
}

impl<A> Authentication for Option<A>
where
    A: Authentication,
{
    fn authenticate<B>(&self, req: http::Request<B>) -> http::Request<B> {
        match self {
            Some(auth) => auth.authenticate(req),
            None => req,
        }
    }
}

/// A layer which applies an authentication method to every request.
#[derive(Debug)]
pub struct AuthenticationLayer<A> {
    auth: Arc<A>,
}

impl<A> Clone for AuthenticationLayer<A> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
        }
    }
}

impl<A> AuthenticationLayer<A> {
    pub(crate) fn new(auth: Arc<A>) -> Self {
        Self { auth }
    }
}

impl<A, S> Layer<S> for AuthenticationLayer<A> {
    type Service = AuthenticationService<A, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthenticationService {
            inner,
            auth: self.auth.clone(),
        }
    }
}

/// A service which applies an authentication method to every request.
#[derive(Debug)]
pub struct AuthenticationService<A, S> {
    inner: S,
    auth: Arc<A>,
}

impl<A, S: Clone> Clone for AuthenticationService<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<A, S, BIn, BOut> tower::Service<http::Request<BIn>> for AuthenticationService<A, S>
where
    A: Authentication,
    S: tower::Service<http::Request<BIn>, Response = http::Response<BOut>>,
    S::Future: Send + 'static,
{
    type Response = http::Response<BOut>;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<BIn>) -> Self::Future {
        let req = self.auth.authenticate(req);
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> http::Request<()> {
        http::Request::get("https://api.github.com/repos/rust-lang/rust")
            .body(())
            .unwrap()
    }

    #[test]
    fn bearer_sets_authorization() {
        let req = BearerAuth::new("token").authenticate(request());
        assert_eq!(
            req.headers().get(http::header::AUTHORIZATION).unwrap(),
            "Bearer token"
        );
    }

    #[test]
    fn bearer_keeps_existing_authorization() {
        let mut req = request();
        req.headers_mut().insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic abc"),
        );

        let req = BearerAuth::new("token").authenticate(req);
        assert_eq!(
            req.headers().get(http::header::AUTHORIZATION).unwrap(),
            "Basic abc"
        );
    }

    #[test]
    fn optional_authentication() {
        let none: Option<BearerAuth> = None;
        let req = none.authenticate(request());
        assert!(!req.headers().contains_key(http::header::AUTHORIZATION));

        let some = Some(BearerAuth::new("token"));
        let req = some.authenticate(request());
        assert!(req.headers().contains_key(http::header::AUTHORIZATION));
    }
}
