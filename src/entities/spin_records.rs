use crate::entities::{PrizeBehavior, PrizeType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 抽奖类型
/// - Demo: 体验抽奖, 结果进入审核队列
/// - WelcomeReal: 审核通过后的真实回放抽奖
/// - Code: 历史站点导入的兑换码抽奖记录 (引擎本身不再写入该类型)
/// - Bonus: 兑换码发放的奖励抽奖, 始终按真实抽奖结算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpinType {
    Demo,
    WelcomeReal,
    Code,
    Bonus,
}

/// 抽奖记录状态机: PendingValidation -> Approved -> Paid / Rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpinStatus {
    PendingValidation,
    Approved,
    Rejected,
    Paid,
}

/// 抽奖时刻的奖品快照 (冗余存储, 目录后续修改或下线仍可回溯)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrizeSnapshot {
    pub name: String,
    pub prize_type: PrizeType,
    pub behavior: PrizeBehavior,
    pub value_cents: i64,
}

impl PrizeSnapshot {
    pub fn is_cash_bearing(&self) -> bool {
        self.prize_type == PrizeType::Cash
            && self.behavior == PrizeBehavior::InstantCash
            && self.value_cents > 0
    }
}

/// 抽奖记录实体
/// 说明:
/// - 每次消费一次抽奖资格产生一条记录, 与资格扣减同一事务提交
/// - 创建后不可变, 仅 status 由审核流程驱动迁移
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub spin_type: SpinType,
    /// 是否真实抽奖 (体验抽奖为 false)
    pub is_real: bool,
    /// 奖品ID (指向目录, 可能已被修改或删除)
    pub prize_id: i64,
    pub prize_snapshot: PrizeSnapshot,
    pub status: SpinStatus,
    pub spin_date: DateTime<Utc>,
}
