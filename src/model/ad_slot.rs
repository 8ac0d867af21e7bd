// src/model/ad_slot.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 广告位类型（ad_slot）
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdSlot {
    #[serde(rename = "SLOT_ID_BIZ_BOTTOM")]
    BizBottom, // 公众号底部广告
    #[serde(rename = "SLOT_ID_BIZ_MID_CONTEXT")]
    BizMidContext, // 公众号文中广告
    #[serde(rename = "SLOT_ID_BIZ_VIDEO_END")]
    BizVideoEnd, // 公众号视频后贴
    #[serde(rename = "SLOT_ID_BIZ_SPONSOR")]
    BizSponsor, // 公众号互选广告
    #[serde(rename = "SLOT_ID_BIZ_CPS")]
    BizCps, // 公众号返佣商品
    #[serde(rename = "SLOT_ID_WEAPP_BANNER")]
    WeappBanner, // 小程序 banner
    #[serde(rename = "SLOT_ID_WEAPP_REWARD_VIDEO")]
    WeappRewardVideo, // 小程序激励视频
    #[serde(rename = "SLOT_ID_WEAPP_INTERSTITIAL")]
    WeappInterstitial, // 小程序插屏广告
    #[serde(rename = "SLOT_ID_WEAPP_VIDEO_FEEDS")]
    WeappVideoFeeds, // 小程序视频广告
    #[serde(rename = "SLOT_ID_WEAPP_VIDEO_BEGIN")]
    WeappVideoBegin, // 小程序视频前贴
    #[serde(rename = "SLOT_ID_WEAPP_BOX")]
    WeappBox, // 小程序格子广告
}

impl AdSlot {
    pub const ALL: [AdSlot; 11] = [
        AdSlot::BizBottom,
        AdSlot::BizMidContext,
        AdSlot::BizVideoEnd,
        AdSlot::BizSponsor,
        AdSlot::BizCps,
        AdSlot::WeappBanner,
        AdSlot::WeappRewardVideo,
        AdSlot::WeappInterstitial,
        AdSlot::WeappVideoFeeds,
        AdSlot::WeappVideoBegin,
        AdSlot::WeappBox,
    ];

    /// 接口上使用的广告位名称
    pub fn as_str(&self) -> &'static str {
        match self {
            AdSlot::BizBottom => "SLOT_ID_BIZ_BOTTOM",
            AdSlot::BizMidContext => "SLOT_ID_BIZ_MID_CONTEXT",
            AdSlot::BizVideoEnd => "SLOT_ID_BIZ_VIDEO_END",
            AdSlot::BizSponsor => "SLOT_ID_BIZ_SPONSOR",
            AdSlot::BizCps => "SLOT_ID_BIZ_CPS",
            AdSlot::WeappBanner => "SLOT_ID_WEAPP_BANNER",
            AdSlot::WeappRewardVideo => "SLOT_ID_WEAPP_REWARD_VIDEO",
            AdSlot::WeappInterstitial => "SLOT_ID_WEAPP_INTERSTITIAL",
            AdSlot::WeappVideoFeeds => "SLOT_ID_WEAPP_VIDEO_FEEDS",
            AdSlot::WeappVideoBegin => "SLOT_ID_WEAPP_VIDEO_BEGIN",
            AdSlot::WeappBox => "SLOT_ID_WEAPP_BOX",
        }
    }
}

impl fmt::Display for AdSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdSlot {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        AdSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == value)
            .ok_or_else(|| format!("Invalid value for AdSlot: {}", value))
    }
}
