// src/client/stat_client.rs

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::client::token::AccessTokenProvider;
use crate::client::transport::{HttpTransport, ReqwestTransport};
use crate::config::StatConfig;
use crate::error::{StatError, TransportError};
use crate::model::ad_slot::AdSlot;
use crate::model::params::{Action, RequestParams};
use crate::model::response::{self, AdPosStats, CpsStats, SettlementStats};

/// 流量主数据客户端。
///
/// 本身不持有可变状态，可以放进 `Arc` 在多个任务间共享；
/// token 提供者需自行保证并发安全。
#[derive(Clone)]
pub struct StatsClient {
    endpoint: String,
    tokens: Arc<dyn AccessTokenProvider>,
    transport: Arc<dyn HttpTransport>,
}

impl StatsClient {
    pub fn new(
        endpoint: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            tokens,
            transport,
        }
    }

    /// 用 reqwest 作为传输层
    pub fn from_config(
        config: &StatConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, StatError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(config.endpoint.clone(), tokens, Arc::new(transport)))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// **获取公众号分广告位数据**
    pub async fn fetch_ad_pos_stats(
        &self,
        start_date: &str,
        end_date: &str,
        page: u32,
        page_size: u32,
        ad_slot: Option<AdSlot>,
    ) -> Result<AdPosStats, StatError> {
        let params = RequestParams::new(Action::AdPosGeneral, start_date, end_date, page, page_size)
            .with_ad_slot(ad_slot);
        self.fetch(&params).await
    }

    /// **获取公众号返佣商品数据**
    pub async fn fetch_cps_stats(
        &self,
        start_date: &str,
        end_date: &str,
        page: u32,
        page_size: u32,
    ) -> Result<CpsStats, StatError> {
        let params = RequestParams::new(Action::CpsGeneral, start_date, end_date, page, page_size);
        self.fetch(&params).await
    }

    /// **获取公众号结算收入数据及结算主体信息**
    pub async fn fetch_settlement_stats(
        &self,
        start_date: &str,
        end_date: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SettlementStats, StatError> {
        let params = RequestParams::new(Action::Settlement, start_date, end_date, page, page_size);
        self.fetch(&params).await
    }

    /// 拉取并按 `T` 解析，统一做三层错误码检查
    pub async fn fetch<T>(&self, params: &RequestParams) -> Result<T, StatError>
    where
        T: DeserializeOwned,
    {
        let operation = params.action.operation();
        let span = tracing::info_span!(
            "publisher_stat",
            action = %params.action,
            request_id = %Uuid::new_v4(),
        );

        async move {
            let body = self.fetch_raw(params).await?;
            let result = response::decode::<T>(operation, &body);
            if let Err(err) = &result {
                warn!(error = %err, "{} failed", operation);
            }
            result
        }
        .instrument(span)
        .await
    }

    /// 取 token、拼查询串、发 GET，返回原始响应体
    pub async fn fetch_raw(&self, params: &RequestParams) -> Result<Vec<u8>, StatError> {
        let access_token = self.tokens.access_token().await.map_err(|err| {
            warn!(error = %err, "access token unavailable");
            StatError::Token(err)
        })?;

        let query = params
            .to_query(&access_token)
            .map_err(|err| TransportError::Other(format!("failed to encode query: {}", err)))?;
        let url = format!("{}?{}", self.endpoint, query);

        debug!(
            endpoint = %self.endpoint,
            page = params.page,
            page_size = params.page_size,
            start_date = %params.start_date,
            end_date = %params.end_date,
            ad_slot = params.ad_slot.map(|slot| slot.as_str()).unwrap_or(""),
            "requesting publisher stat"
        );

        let body = self.transport.get(&url).await.map_err(|err| {
            warn!(error = %err, "publisher stat request failed");
            StatError::Transport(err)
        })?;
        Ok(body)
    }
}
