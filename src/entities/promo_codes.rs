use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 兑换码实体
/// code 以规范化形式存储 (去空白 + 大写), 全局唯一
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub max_uses: i64,
    /// 已使用次数, 只增不减
    pub uses_count: i64,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.uses_count >= self.max_uses
    }
}

/// 兑换记录: (code, user_id) 去重键, 保证每用户至多兑换一次
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeRedemption {
    pub code: String,
    pub user_id: i64,
    pub redeemed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_and_exhaustion() {
        let now = Utc::now();
        let code = PromoCode {
            code: "WELCOME10".to_string(),
            max_uses: 1,
            uses_count: 0,
            expires_at: now + Duration::days(1),
            is_active: true,
            created_at: now,
        };
        assert!(!code.is_expired(now));
        assert!(code.is_expired(now + Duration::days(2)));
        assert!(!code.is_exhausted());

        let used = PromoCode {
            uses_count: 1,
            ..code
        };
        assert!(used.is_exhausted());
    }
}
