//! External system integrations for the mediator.
//!
//! - [`openhim`] - OpenHIM core API (registration, config, heartbeat)
//! - [`dhis`] - DHIS2 metadata fetch
//!
//! # Design Pattern
//!
//! The lifecycle talks to OpenHIM only through the
//! [`SwitchApi`](openhim::SwitchApi) trait so it can be driven by an
//! in-memory switch in tests.
//!
//! ```rust,no_run
//! use dhis_mediator::adapters::openhim::{OpenHimClient, SwitchApi};
//! use dhis_mediator::config::OpenHimConfig;
//! use std::sync::Arc;
//!
//! # fn example() -> dhis_mediator::domain::Result<()> {
//! let switch: Arc<dyn SwitchApi> = Arc::new(OpenHimClient::new(&OpenHimConfig::default())?);
//! println!("OpenHIM API at {}", switch.api_url());
//! # Ok(())
//! # }
//! ```

pub mod dhis;
pub mod openhim;

/// Reads a non-success response body for error reporting
///
/// A body that cannot be read is logged and reported as empty.
pub(crate) async fn error_body_text(resp: reqwest::Response) -> String {
    let status = resp.status();
    let url = resp.url().clone();
    match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                error = %e,
                "Failed to read error response body"
            );
            String::new()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_body_text_reads_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let resp = reqwest::get(server.url()).await.unwrap();
        assert_eq!(error_body_text(resp).await, "boom");
    }

    #[tokio::test]
    async fn test_error_body_text_unreadable_body_is_empty() {
        let url = test_support::truncated_response_server("HTTP/1.1 500 Internal Server Error").await;

        let resp = reqwest::get(url).await.unwrap();
        assert_eq!(resp.status().as_u16(), 500);
        assert_eq!(error_body_text(resp).await, "");
    }
}
