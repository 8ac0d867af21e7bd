// src/client/token.rs

use crate::config::StatConfig;
use crate::error::TokenError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 提前刷新的余量（秒），剩余有效期低于此值即重新获取
pub const REFRESH_MARGIN_SECS: u64 = 1500;

/// access_token 提供者，需可并发调用
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, TokenError>;
}

/// 固定 token，适合由外部系统统一刷新后注入的场景
#[derive(Clone, Debug)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, TokenError> {
        if self.token.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(self.token.clone())
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// 用 appid/secret 走 client_credential 获取 access_token，并缓存到过期前
pub struct CredentialTokenProvider {
    client: Client,
    token_endpoint: String,
    appid: String,
    secret: String,
    cached: RwLock<Option<CachedToken>>,
}

impl CredentialTokenProvider {
    pub fn new(
        config: &StatConfig,
        appid: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.user_agent)
            .build()
            .map_err(TokenError::Client)?;
        Ok(Self {
            client,
            token_endpoint: config.token_endpoint.clone(),
            appid: appid.into(),
            secret: secret.into(),
            cached: RwLock::new(None),
        })
    }

    fn fresh(cached: &Option<CachedToken>) -> Option<String> {
        cached
            .as_ref()
            .filter(|c| c.expires_at > Instant::now())
            .map(|c| c.token.clone())
    }

    async fn fetch(&self) -> Result<CachedToken, TokenError> {
        let resp = self
            .client
            .get(&self.token_endpoint)
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.appid.as_str()),
                ("secret", self.secret.as_str()),
            ])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|source| TokenError::Request {
                endpoint: self.token_endpoint.clone(),
                source: source.without_url(),
            })?;

        let body: TokenResponse = resp.json().await.map_err(|source| TokenError::Request {
            endpoint: self.token_endpoint.clone(),
            source: source.without_url(),
        })?;

        if body.errcode != 0 {
            return Err(TokenError::Remote {
                code: body.errcode,
                message: body.errmsg,
            });
        }
        if body.access_token.is_empty() {
            return Err(TokenError::Empty);
        }

        let lifetime = body.expires_in.saturating_sub(REFRESH_MARGIN_SECS);
        info!(expires_in = body.expires_in, "access token refreshed");
        Ok(CachedToken {
            token: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for CredentialTokenProvider {
    async fn access_token(&self) -> Result<String, TokenError> {
        if let Some(token) = Self::fresh(&*self.cached.read().await) {
            return Ok(token);
        }

        let mut cached = self.cached.write().await;
        // 等写锁期间可能已被其他调用刷新
        if let Some(token) = Self::fresh(&cached) {
            return Ok(token);
        }

        debug!(endpoint = %self.token_endpoint, "fetching access token");
        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
