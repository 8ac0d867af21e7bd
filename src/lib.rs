//! 公众号流量主数据拉取客户端
//!
//! 封装 `publisher/stat` 接口的三个 action：
//! - `publisher_adpos_general`：分广告位数据
//! - `publisher_cps_general`：返佣商品数据
//! - `publisher_settlement`：结算收入数据及结算主体信息
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use publisher_stat::{StatConfig, StatsClient, StaticTokenProvider};
//!
//! let config = StatConfig::default();
//! let client = StatsClient::from_config(&config, Arc::new(StaticTokenProvider::new(token)))?;
//! let stats = client.fetch_cps_stats("2024-01-01", "2024-01-07", 1, 10).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock_publisher;
pub mod model;

pub use client::{
    AccessTokenProvider, CredentialTokenProvider, HttpTransport, ReqwestTransport,
    StaticTokenProvider, StatsClient,
};
pub use config::StatConfig;
pub use error::{ErrorLayer, StatError, TokenError, TransportError};
pub use model::{Action, AdSlot, RequestParams};
