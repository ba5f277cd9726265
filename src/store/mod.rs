use crate::entities::{
    CodeRedemption, Prize, PromoCode, SpinRecord, SpinStatus, SpinType, UserSpinState,
    ValidationDecision,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// 引擎全部聚合的内存存储
/// 写锁即事务边界: 目录变更、资格扣减、兑换、审核
/// 都在一次写锁内完成校验与提交, 不存在可观察的中间状态。
/// 持久化引擎不在本引擎范围内 (站点侧负责落盘)。
#[derive(Default)]
pub struct StoreState {
    pub prizes: BTreeMap<i64, Prize>,
    next_prize_id: i64,
    pub spin_records: HashMap<Uuid, SpinRecord>,
    pub user_states: HashMap<i64, UserSpinState>,
    /// key 为规范化后的 code
    pub promo_codes: HashMap<String, PromoCode>,
    /// (code, user_id) 去重键
    pub redemptions: HashMap<(String, i64), CodeRedemption>,
    pub decisions: HashMap<Uuid, ValidationDecision>,
}

impl StoreState {
    pub fn alloc_prize_id(&mut self) -> i64 {
        self.next_prize_id += 1;
        self.next_prize_id
    }

    /// 启用奖品按 position 升序 (同位次按 id) 的快照
    pub fn active_prizes(&self) -> Vec<Prize> {
        let mut list: Vec<Prize> = self
            .prizes
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        list.sort_by_key(|p| (p.position, p.id));
        list
    }

    /// 懒创建用户抽奖资格状态
    pub fn ensure_user_state(&mut self, user_id: i64, now: DateTime<Utc>) -> &mut UserSpinState {
        self.user_states
            .entry(user_id)
            .or_insert_with(|| UserSpinState::new(user_id, now))
    }

    /// 用户的体验抽奖记录 (每用户至多一条)
    pub fn demo_record(&self, user_id: i64) -> Option<&SpinRecord> {
        self.spin_records
            .values()
            .find(|r| r.user_id == user_id && r.spin_type == SpinType::Demo)
    }

    pub fn demo_record_mut(&mut self, user_id: i64) -> Option<&mut SpinRecord> {
        self.spin_records
            .values_mut()
            .find(|r| r.user_id == user_id && r.spin_type == SpinType::Demo)
    }

    /// 待审核队列: 体验抽奖且仍为 PendingValidation, 按抽奖时间 FIFO
    pub fn pending_demo_records(&self) -> Vec<SpinRecord> {
        let mut list: Vec<SpinRecord> = self
            .spin_records
            .values()
            .filter(|r| {
                r.spin_type == SpinType::Demo && r.status == SpinStatus::PendingValidation
            })
            .cloned()
            .collect();
        list.sort_by_key(|r| (r.spin_date, r.id));
        list
    }

    /// 用户抽奖记录, 最新在前
    pub fn user_records(&self, user_id: i64) -> Vec<SpinRecord> {
        let mut list: Vec<SpinRecord> = self
            .spin_records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.spin_date.cmp(&a.spin_date).then(a.id.cmp(&b.id)));
        list
    }
}

#[derive(Clone, Default)]
pub struct RouletteStore {
    state: Arc<RwLock<StoreState>>,
}

impl RouletteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().await
    }
}
