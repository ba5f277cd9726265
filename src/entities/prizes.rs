use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 概率基点刻度: 100% = 10000bp, 1bp = 0.01%
pub const PROBABILITY_SCALE_BP: i64 = 10_000;
/// 概率总和容差 (0.01 个百分点 = 1bp)
pub const PROBABILITY_EPSILON_BP: i64 = 1;

/// 奖品类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrizeType {
    Cash,
    Bonus,
    Points,
    Spin,
    Special,
}

/// 奖品发放行为
/// - InstantCash: 审核/结算通过后直接入账
/// - Bonus: 站内奖励, 人工或活动侧处理
/// - Manual: 管理员线下发放
/// - Custom: 自定义处理, 引擎不做任何自动动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrizeBehavior {
    InstantCash,
    Bonus,
    Manual,
    Custom,
}

/// 轮盘奖品配置实体
/// 概念说明:
/// - probability_bp: 概率 (basis points) 1% = 100bp, 100% = 10000bp
/// - position: 轮盘展示顺序, 也是累积分布的遍历顺序
/// - value_cents: 奖品面值(美分)，虚拟/谢谢参与类为 0
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub id: i64,
    /// 奖品名称
    pub name: String,
    pub prize_type: PrizeType,
    pub behavior: PrizeBehavior,
    /// 奖品面值(美分) - 无金额类为 0
    pub value_cents: i64,
    /// 概率 (basis points)
    pub probability_bp: i32,
    /// 轮盘扇区颜色 (展示用, 引擎不解释)
    pub color: String,
    /// 排序键
    pub position: i32,
    /// 是否启用
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Prize {
    /// 中奖后是否应当自动入账 (现金类 + 即时发放 + 面值为正)
    pub fn is_cash_bearing(&self) -> bool {
        self.prize_type == PrizeType::Cash
            && self.behavior == PrizeBehavior::InstantCash
            && self.value_cents > 0
    }

    /// 抽奖时刻的不可变快照 (目录后续修改不影响历史记录)
    pub fn snapshot(&self) -> crate::entities::PrizeSnapshot {
        crate::entities::PrizeSnapshot {
            name: self.name.clone(),
            prize_type: self.prize_type,
            behavior: self.behavior,
            value_cents: self.value_cents,
        }
    }
}

/// 百分比 (最多两位小数) -> 基点
pub fn percent_to_bp(percent: f64) -> AppResult<i32> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(AppError::ValidationError(format!(
            "Probability must be within [0, 100], got {percent}"
        )));
    }
    let scaled = percent * 100.0;
    let bp = scaled.round();
    if (scaled - bp).abs() > 1e-6 {
        return Err(AppError::ValidationError(format!(
            "Probability supports at most two decimals, got {percent}"
        )));
    }
    Ok(bp as i32)
}

/// 基点 -> 百分比
pub fn bp_to_percent(bp: i32) -> f64 {
    bp as f64 / 100.0
}
