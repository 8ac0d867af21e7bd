pub mod ad_slot;
pub mod params;
pub mod response;

pub use ad_slot::AdSlot;
pub use params::{Action, RequestParams};
pub use response::{
    AdPosMetrics, AdPosRecord, AdPosStats, BaseResp, CpsMetrics, CpsRecord, CpsStats, Envelope,
    SettlementEntry, SettlementStats, SlotRevenue,
};
