//! Client setup for OpenAI-compatible chat endpoints.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for an OpenAI-compatible API at `api_base`.
///
/// The timeout bounds each request so a hung endpoint fails the question
/// instead of blocking it forever.
pub fn create_client(api_base: &str, api_key: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::config::Config;

    #[test]
    fn test_client_uses_given_base() {
        let client = create_client(
            "https://generativelanguage.googleapis.com/v1beta/openai/",
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.config().api_base(),
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
    }
}
