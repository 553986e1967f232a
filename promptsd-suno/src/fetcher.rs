use crate::error::Result;
use async_trait::async_trait;
use promptsd_core::{ResolveError, ResolverConfig};
use tracing::debug;

/// A fetched page after following redirects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the request finally landed on
    pub final_url: String,
    /// HTTP status of the final response
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Fetches a page, following redirects
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue one GET request for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ResolutionFailed`] on transport or body-read failure.
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, ResolveError>;
}

/// reqwest-backed fetcher. Redirects follow reqwest's default policy (up to 10 hops).
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Build a fetcher from resolver settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedPage, ResolveError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        debug!("Landed on {} ({})", final_url, status);

        let body = response.text().await?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Redirect;
    use axum::routing::get;
    use axum::Router;
    use std::net::SocketAddr;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let router = Router::new()
            .route("/s/xyz", get(|| async { Redirect::temporary("/song/ff99") }))
            .route("/song/ff99", get(|| async { "<html>track</html>" }));
        let addr = serve(router).await;

        let fetcher = HttpPageFetcher::new(&ResolverConfig::default()).unwrap();
        let page = fetcher.fetch(&format!("http://{addr}/s/xyz")).await.unwrap();

        assert_eq!(page.final_url, format!("http://{addr}/song/ff99"));
        assert!(page.is_success());
        assert_eq!(page.body, "<html>track</html>");
    }

    #[tokio::test]
    async fn test_error_status_is_reported_not_raised() {
        let router = Router::new().route(
            "/s/gone",
            get(|| async { (axum::http::StatusCode::NOT_FOUND, "missing") }),
        );
        let addr = serve(router).await;

        let fetcher = HttpPageFetcher::new(&ResolverConfig::default()).unwrap();
        let page = fetcher.fetch(&format!("http://{addr}/s/gone")).await.unwrap();

        assert_eq!(page.status, 404);
        assert!(!page.is_success());
    }

    #[tokio::test]
    async fn test_connection_failure_is_resolution_failed() {
        // Bind then drop so nothing listens on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpPageFetcher::new(&ResolverConfig::default()).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/s/xyz")).await.unwrap_err();

        assert!(matches!(err, ResolveError::ResolutionFailed { .. }));
    }
}
