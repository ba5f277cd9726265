use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{PrizeType, SpinStatus, ValidationAction};

/// 单用户审核请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateRequest {
    pub action: ValidationAction,
    pub notes: Option<String>,
    /// 审核人标识, 缺省 "admin"
    pub decided_by: Option<String>,
}

/// 批量审核请求: 按用户独立执行, 单个失败不影响其他用户
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateBatchRequest {
    pub user_ids: Vec<i64>,
    pub action: ValidationAction,
    pub notes: Option<String>,
    pub decided_by: Option<String>,
}

/// 待审核条目 (FIFO 队列)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingValidationResponse {
    pub record_id: Uuid,
    pub user_id: i64,
    pub prize_name: String,
    pub prize_type: PrizeType,
    pub value_cents: i64,
    pub spin_date: DateTime<Utc>,
    /// 等待天数 (SLA 观测)
    pub days_waiting: i64,
}

/// 单用户审核结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationOutcomeResponse {
    pub user_id: i64,
    pub record_id: Uuid,
    pub action: ValidationAction,
    /// 审核后的记录状态
    pub status: SpinStatus,
    /// 审核通过且为现金类奖品时的入账金额(美分)
    pub credited_cents: Option<i64>,
}

/// 批量审核中单个用户的结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchValidationOutcome {
    pub user_id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SpinStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// 批量审核响应 (显式部分失败语义)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidateBatchResponse {
    pub results: Vec<BatchValidationOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}
