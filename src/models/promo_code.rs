use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::PromoCode;

/// 创建兑换码请求 (管理端)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePromoCodeRequest {
    pub code: String,
    pub max_uses: i64,
    pub expires_at: DateTime<Utc>,
}

/// 兑换请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RedeemCodeRequest {
    pub user_id: i64,
    /// 大小写不敏感, 前后空白会被去除
    pub code: String,
}

/// 兑换成功响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RedeemCodeResponse {
    pub code: String,
    /// 本次发放的奖励抽奖次数
    pub bonus_spins_granted: i64,
    /// 兑换后的剩余奖励抽奖次数
    pub available_bonus_spins: i64,
}

/// 兑换码响应 (管理端)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromoCodeResponse {
    pub code: String,
    pub max_uses: i64,
    pub uses_count: i64,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PromoCode> for PromoCodeResponse {
    fn from(c: PromoCode) -> Self {
        PromoCodeResponse {
            code: c.code,
            max_uses: c.max_uses,
            uses_count: c.uses_count,
            expires_at: c.expires_at,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}
