use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{PrizeType, SpinRecord, SpinStatus, SpinType, UserSpinState};

/// 抽奖记录查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SpinRecordQuery {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

/// 抽奖后返回给用户的奖品（快照字段, 隐藏目录内部信息）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WonPrizeResponse {
    /// 奖品ID
    pub prize_id: i64,
    pub name: String,
    pub prize_type: PrizeType,
    /// 奖品面值(美分) - 无金额为0
    pub value_cents: i64,
}

impl From<&SpinRecord> for WonPrizeResponse {
    fn from(r: &SpinRecord) -> Self {
        WonPrizeResponse {
            prize_id: r.prize_id,
            name: r.prize_snapshot.name.clone(),
            prize_type: r.prize_snapshot.prize_type,
            value_cents: r.prize_snapshot.value_cents,
        }
    }
}

/// 抽奖记录响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinRecordResponse {
    pub id: Uuid,
    pub user_id: i64,
    pub spin_type: SpinType,
    pub is_real: bool,
    pub prize_id: i64,
    /// 奖品名称 (历史快照)
    pub prize_name: String,
    pub prize_type: PrizeType,
    pub value_cents: i64,
    pub status: SpinStatus,
    pub spin_date: DateTime<Utc>,
}

impl From<SpinRecord> for SpinRecordResponse {
    fn from(r: SpinRecord) -> Self {
        SpinRecordResponse {
            id: r.id,
            user_id: r.user_id,
            spin_type: r.spin_type,
            is_real: r.is_real,
            prize_id: r.prize_id,
            prize_name: r.prize_snapshot.name,
            prize_type: r.prize_snapshot.prize_type,
            value_cents: r.prize_snapshot.value_cents,
            status: r.status,
            spin_date: r.spin_date,
        }
    }
}

/// 用户抽奖资格响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSpinStateResponse {
    pub user_id: i64,
    pub has_demo_available: bool,
    pub demo_spin_done: bool,
    pub has_real_available: bool,
    pub real_spin_done: bool,
    pub is_validated: bool,
    pub available_bonus_spins: i64,
    pub version: i64,
}

impl From<&UserSpinState> for UserSpinStateResponse {
    fn from(s: &UserSpinState) -> Self {
        UserSpinStateResponse {
            user_id: s.user_id,
            has_demo_available: s.has_demo_available(),
            demo_spin_done: s.demo_spin_done,
            has_real_available: s.has_real_available(),
            real_spin_done: s.real_spin_done,
            is_validated: s.is_validated,
            available_bonus_spins: s.available_bonus_spins,
            version: s.version,
        }
    }
}

/// 抽奖（Spin）响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpinResponse {
    /// 获得的奖品
    pub prize: WonPrizeResponse,
    pub record_id: Uuid,
    pub status: SpinStatus,
    /// 抽奖后的资格状态
    pub state: UserSpinStateResponse,
}
