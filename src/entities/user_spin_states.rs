use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户抽奖资格状态 (每用户一条, 首次请求时懒创建, 永不删除)
/// demo/real 生命周期: 体验抽奖 -> 审核 -> 真实抽奖
/// available_bonus_spins 独立于该生命周期, 由兑换码发放
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSpinState {
    pub user_id: i64,
    pub demo_spin_done: bool,
    pub real_spin_done: bool,
    /// 体验中奖是否已通过审核
    pub is_validated: bool,
    /// 剩余奖励抽奖次数 (非负)
    pub available_bonus_spins: i64,
    /// 乐观并发版本号, 任何资格变更都会自增
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSpinState {
    pub fn new(user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            demo_spin_done: false,
            real_spin_done: false,
            is_validated: false,
            available_bonus_spins: 0,
            version: 0,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn has_demo_available(&self) -> bool {
        !self.demo_spin_done
    }

    pub fn has_real_available(&self) -> bool {
        self.is_validated && !self.real_spin_done
    }

    /// 资格变更后调用: 版本号自增并刷新时间戳
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_demo_only() {
        let state = UserSpinState::new(7, Utc::now());
        assert!(state.has_demo_available());
        assert!(!state.has_real_available());
        assert_eq!(state.available_bonus_spins, 0);
        assert_eq!(state.version, 0);
    }

    #[test]
    fn test_touch_bumps_version() {
        let mut state = UserSpinState::new(7, Utc::now());
        state.demo_spin_done = true;
        state.touch(Utc::now());
        assert_eq!(state.version, 1);
        assert!(state.updated_at.is_some());
    }
}
