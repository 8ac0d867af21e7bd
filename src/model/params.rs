// src/model/params.rs

use crate::model::ad_slot::AdSlot;
use serde::Serialize;
use std::fmt;

/// 统计接口的 action 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AdPosGeneral,
    CpsGeneral,
    Settlement,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AdPosGeneral => "publisher_adpos_general",
            Action::CpsGeneral => "publisher_cps_general",
            Action::Settlement => "publisher_settlement",
        }
    }

    /// 错误信息和日志中使用的操作名
    pub fn operation(&self) -> &'static str {
        match self {
            Action::AdPosGeneral => "GetPublisherAdPosGeneral",
            Action::CpsGeneral => "GetPublisherCpsGeneral",
            Action::Settlement => "GetPublisherSettlement",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单次拉取的请求参数，日期原样透传，不做格式校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub action: Action,
    pub start_date: String,
    pub end_date: String,
    pub page: u32,
    pub page_size: u32,
    /// `None` 表示全部广告位
    pub ad_slot: Option<AdSlot>,
}

/// 查询串字段，顺序即编码顺序
#[derive(Serialize)]
struct QueryPairs<'a> {
    action: &'static str,
    access_token: &'a str,
    page: u32,
    page_size: u32,
    start_date: &'a str,
    end_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_slot: Option<&'static str>,
}

impl RequestParams {
    pub fn new(
        action: Action,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        page: u32,
        page_size: u32,
    ) -> Self {
        Self {
            action,
            start_date: start_date.into(),
            end_date: end_date.into(),
            page,
            page_size,
            ad_slot: None,
        }
    }

    pub fn with_ad_slot(mut self, ad_slot: Option<AdSlot>) -> Self {
        self.ad_slot = ad_slot;
        self
    }

    /// 编码为 URL 查询串（不含 `?`）
    pub fn to_query(&self, access_token: &str) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(QueryPairs {
            action: self.action.as_str(),
            access_token,
            page: self.page,
            page_size: self.page_size,
            start_date: &self.start_date,
            end_date: &self.end_date,
            ad_slot: self.ad_slot.map(|slot| slot.as_str()),
        })
    }
}
