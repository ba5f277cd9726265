use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 审核动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationAction {
    Approve,
    Reject,
}

/// 审核决定 (追加写入的审计记录, 每条待审记录至多一条)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationDecision {
    pub spin_record_id: Uuid,
    pub user_id: i64,
    pub action: ValidationAction,
    pub notes: Option<String>,
    pub decided_by: String,
    pub decided_at: DateTime<Utc>,
}
