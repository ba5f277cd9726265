use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{Prize, PrizeBehavior, PrizeType, bp_to_percent};

/// 新建奖品请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePrizeRequest {
    pub name: String,
    pub prize_type: PrizeType,
    pub behavior: PrizeBehavior,
    /// 面值(美分), 默认 0
    pub value_cents: Option<i64>,
    /// 概率 (百分比, 最多两位小数)
    pub probability: f64,
    /// 轮盘扇区颜色
    pub color: Option<String>,
    /// 排序键, 缺省追加到末尾
    pub position: Option<i32>,
    /// 默认启用
    pub is_active: Option<bool>,
}

/// 编辑奖品请求 (全部字段可选, 仅更新给出的字段)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub name: Option<String>,
    pub prize_type: Option<PrizeType>,
    pub behavior: Option<PrizeBehavior>,
    pub value_cents: Option<i64>,
    pub probability: Option<f64>,
    pub color: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// 批量调整概率中的一项
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProbabilityUpdate {
    pub prize_id: i64,
    /// 概率 (百分比, 最多两位小数)
    pub probability: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdjustProbabilitiesRequest {
    pub updates: Vec<ProbabilityUpdate>,
}

/// 奖品响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub name: String,
    pub prize_type: PrizeType,
    pub behavior: PrizeBehavior,
    pub value_cents: i64,
    /// 概率 (百分比)
    pub probability: f64,
    /// 概率 (basis points: 100% = 10000)
    pub probability_bp: i32,
    pub color: String,
    pub position: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Prize> for PrizeResponse {
    fn from(p: Prize) -> Self {
        PrizeResponse {
            id: p.id,
            name: p.name,
            prize_type: p.prize_type,
            behavior: p.behavior,
            value_cents: p.value_cents,
            probability: bp_to_percent(p.probability_bp),
            probability_bp: p.probability_bp,
            color: p.color,
            position: p.position,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}
