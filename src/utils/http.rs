use crate::error::AppResult;
use crate::proxy::config::UpstreamProxyConfig;
use reqwest::{Client, Proxy};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("branch-proxy/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client with the given timeout and outbound proxy configuration.
/// `timeout_secs = None` leaves requests unbounded.
pub fn create_client_with_proxy(
    timeout_secs: Option<u64>,
    proxy_config: Option<&UpstreamProxyConfig>,
) -> AppResult<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            match Proxy::all(&config.url) {
                Ok(proxy) => {
                    builder = builder.proxy(proxy);
                    tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
                }
                Err(e) => {
                    tracing::error!("Invalid proxy address: {}, error: {}", config.url, e);
                }
            }
        }
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_proxy_is_skipped() {
        let proxy = UpstreamProxyConfig {
            enabled: true,
            url: "not a url".to_string(),
        };
        assert!(create_client_with_proxy(Some(5), Some(&proxy)).is_ok());
    }

    #[test]
    fn test_disabled_proxy() {
        let proxy = UpstreamProxyConfig {
            enabled: false,
            url: "socks5://127.0.0.1:1080".to_string(),
        };
        assert!(create_client_with_proxy(None, Some(&proxy)).is_ok());
    }
}
