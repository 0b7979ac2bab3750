//! URI utilities.

use http::uri::PathAndQuery;
use http::Uri;

/// Extension trait for building endpoint URIs from a base.
pub trait UriExtension: Sized {
    /// Join a path to a URI.
    ///
    /// Relative paths are appended to the base path, absolute paths replace it.
    /// Any query on the base is dropped.
    fn join(self, path: &str) -> Result<Uri, http::Error>;

    /// Replace the query string of a URI.
    fn with_query(self, query: &str) -> Result<Uri, http::Error>;
}

impl UriExtension for Uri {
    fn join(self, path: &str) -> Result<Uri, http::Error> {
        let mut parts = self.into_parts();

        let joined = {
            let base = parts.path_and_query.as_ref().map_or("/", |pq| pq.path());
            if path.starts_with('/') {
                path.to_owned()
            } else if base.ends_with('/') {
                format!("{base}{path}")
            } else {
                format!("{base}/{path}")
            }
        };

        parts.path_and_query = Some(PathAndQuery::from_maybe_shared(joined)?);
        Ok(Uri::from_parts(parts)?)
    }

    fn with_query(self, query: &str) -> Result<Uri, http::Error> {
        if query.is_empty() {
            return Ok(self);
        }

        let mut parts = self.into_parts();
        let path = parts
            .path_and_query
            .as_ref()
            .map_or("/", |pq| pq.path())
            .to_owned();

        parts.path_and_query = Some(PathAndQuery::from_maybe_shared(format!("{path}?{query}"))?);
        Ok(Uri::from_parts(parts)?)
    }
}
