// src/config/stat_config.rs

use std::time::Duration;

/// 流量主数据接口地址
pub const DEFAULT_STAT_ENDPOINT: &str = "https://api.weixin.qq.com/publisher/stat";
/// access_token 接口地址
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.weixin.qq.com/cgi-bin/token";

/// 客户端配置
#[derive(Clone, Debug)]
pub struct StatConfig {
    pub endpoint: String,
    pub token_endpoint: String,
    /// 整个请求的超时（秒）
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STAT_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 3,
            user_agent: format!("publisher-stat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl StatConfig {
    /// 以 `base` 为根地址（如 mock 服务 `http://127.0.0.1:9002`）生成两个接口地址
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            endpoint: format!("{}/publisher/stat", base),
            token_endpoint: format!("{}/cgi-bin/token", base),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_api() {
        let config = StatConfig::default();
        assert_eq!(config.endpoint, DEFAULT_STAT_ENDPOINT);
        assert_eq!(config.token_endpoint, DEFAULT_TOKEN_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("publisher-stat/"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = StatConfig::with_base_url("http://127.0.0.1:9002/");
        assert_eq!(config.endpoint, "http://127.0.0.1:9002/publisher/stat");
        assert_eq!(config.token_endpoint, "http://127.0.0.1:9002/cgi-bin/token");
    }
}
