// src/model/response.rs

use crate::error::{ErrorLayer, StatError};
use serde::{Deserialize, Deserializer, Serialize};

/// 缺失字段和 `null` 都按零值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 嵌套的 base_resp
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BaseResp {
    #[serde(default, deserialize_with = "null_as_default")]
    pub err_msg: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ret: i64,
}

/// 统计接口的通用响应外壳。
///
/// 接口会在三个位置报告错误：顶层 `errcode`，平铺在响应体中的 `ret`，
/// 以及嵌套的 `base_resp.ret`。业务数据 `T` 平铺在同一层。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errcode: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errmsg: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ret: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub err_msg: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_resp: BaseResp,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            errcode: 0,
            errmsg: String::new(),
            ret: 0,
            err_msg: String::new(),
            base_resp: BaseResp::default(),
            payload,
        }
    }

    /// 按 errcode -> ret -> base_resp.ret 的顺序检查，返回第一个非零层
    pub fn first_error(&self) -> Option<(ErrorLayer, i64, &str)> {
        [
            (ErrorLayer::ErrCode, self.errcode, self.errmsg.as_str()),
            (ErrorLayer::Ret, self.ret, self.err_msg.as_str()),
            (ErrorLayer::BaseResp, self.base_resp.ret, self.base_resp.err_msg.as_str()),
        ]
        .into_iter()
        .find(|(_, code, _)| *code != 0)
    }

    /// 三层错误码全部为零时交出业务数据
    pub fn into_payload(self, operation: &'static str) -> Result<T, StatError> {
        if let Some((layer, code, message)) = self.first_error() {
            return Err(StatError::Remote {
                operation,
                layer,
                code,
                message: message.to_string(),
            });
        }
        Ok(self.payload)
    }
}

/// 解析响应体并做三层错误码检查
pub fn decode<T>(operation: &'static str, body: &[u8]) -> Result<T, StatError>
where
    T: for<'de> Deserialize<'de>,
{
    let envelope: Envelope<T> = serde_json::from_slice(body)
        .map_err(|source| StatError::Decode { operation, source })?;
    envelope.into_payload(operation)
}

// ── 分广告位数据 ──────────────────────────────────────────────────────────

/// 分广告位指标，明细与汇总共用
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AdPosMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub req_succ_count: i64, // 拉取量
    #[serde(default, deserialize_with = "null_as_default")]
    pub exposure_count: i64, // 曝光量
    #[serde(default, deserialize_with = "null_as_default")]
    pub exposure_rate: f64, // 曝光率
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_count: i64, // 点击量
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_rate: f64, // 点击率
    #[serde(default, deserialize_with = "null_as_default")]
    pub income: i64, // 收入（分）
    #[serde(default, deserialize_with = "null_as_default")]
    pub ecpm: f64, // 千次曝光收益（分）
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AdPosRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slot_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ad_slot: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(flatten)]
    pub metrics: AdPosMetrics,
}

/// 公众号分广告位数据
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AdPosStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<AdPosRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: AdPosMetrics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_num: i64,
}

// ── 返佣商品数据 ──────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CpsMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub exposure_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub click_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_count: i64, // 下单量
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_fee: i64, // 订单金额（分）
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_commission: i64, // 预估收入（分）
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CpsRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(flatten)]
    pub metrics: CpsMetrics,
}

/// 公众号返佣商品数据
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CpsStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<CpsRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: CpsMetrics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_num: i64,
}

// ── 结算收入数据 ──────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SlotRevenue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slot_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slot_settled_revenue: i64,
}

/// 单个结算周期
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SettlementEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub month: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64, // 1 = 上半月，2 = 下半月
    #[serde(default, deserialize_with = "null_as_default")]
    pub sett_status: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settled_revenue: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sett_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mail_send_cnt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slot_revenue: Vec<SlotRevenue>,
}

/// 公众号结算收入数据及结算主体信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SettlementStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String, // 结算主体名称
    #[serde(default, deserialize_with = "null_as_default")]
    pub penalty_all: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue_all: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settled_revenue_all: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settlement_list: Vec<SettlementEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_num: i64,
}
