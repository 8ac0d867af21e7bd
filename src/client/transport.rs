// src/client/transport.rs

use crate::config::StatConfig;
use crate::error::{strip_query, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::debug;

/// 发送 GET 请求并返回原始响应体
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// 基于 reqwest 的默认实现
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &StatConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.user_agent)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let endpoint = strip_query(url).to_string();
        let start = Instant::now();

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.clone(),
                source: source.without_url(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.clone(),
                source: source.without_url(),
            })?;

        debug!(
            endpoint = %endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "GET completed"
        );
        Ok(body.to_vec())
    }
}
