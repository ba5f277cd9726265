use crate::entities::{Prize, PrizeType, SpinRecord, SpinStatus, SpinType};
use crate::error::{AppError, AppResult};
use crate::external::{BalanceLedger, Clock, RandomSource};
use crate::models::{
    PaginatedResponse, PaginationParams, SpinRecordQuery, SpinRecordResponse, SpinResponse,
    UserSpinStateResponse, WonPrizeResponse,
};
use crate::services::draw_engine;
use crate::services::probability_adjuster::check_active_sum;
use crate::store::RouletteStore;
use std::sync::Arc;
use uuid::Uuid;

/// 用户抽奖资格与抽奖执行
///
/// 三种资格消费 (demo / real / bonus) 都在一次存储写锁内完成
/// 校验 -> 抽取 -> 记录 -> 资格扣减, 同一用户的并发请求不可能
/// 重复消费同一份资格; 每次资格变更都会递增 version。
#[derive(Clone)]
pub struct SpinService {
    store: RouletteStore,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    ledger: Arc<dyn BalanceLedger>,
}

impl SpinService {
    pub fn new(
        store: RouletteStore,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        ledger: Arc<dyn BalanceLedger>,
    ) -> Self {
        Self {
            store,
            clock,
            random,
            ledger,
        }
    }

    /// 获取用户抽奖资格状态（不存在则初始化）
    pub async fn get_user_state(&self, user_id: i64) -> AppResult<UserSpinStateResponse> {
        let now = self.clock.now();
        let mut state = self.store.write().await;
        let user = state.ensure_user_state(user_id, now);
        Ok(UserSpinStateResponse::from(&*user))
    }

    /// 获取用户抽奖记录（分页, 最新在前）
    pub async fn list_records(
        &self,
        user_id: i64,
        query: &SpinRecordQuery,
    ) -> AppResult<PaginatedResponse<SpinRecordResponse>> {
        let params = PaginationParams {
            page: query.page,
            per_page: query.per_page,
        };
        let state = self.store.read().await;
        let all = state.user_records(user_id);
        let total = all.len() as i64;
        let items: Vec<SpinRecordResponse> = all
            .into_iter()
            .skip(params.get_offset())
            .take(params.get_limit())
            .map(Into::into)
            .collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 体验抽奖 (Demo)
    ///
    /// 逻辑:
    /// 1. 校验用户尚未使用过体验抽奖
    /// 2. 在启用奖品上按概率抽取
    /// 3. 写入带奖品快照的记录, 状态 PendingValidation 等待管理员审核
    /// 4. 标记 demo_spin_done, 与记录写入同一事务
    pub async fn consume_demo_spin(&self, user_id: i64) -> AppResult<SpinResponse> {
        let now = self.clock.now();
        let roll = self.random.next() * 100.0;
        let mut state = self.store.write().await;

        if state.ensure_user_state(user_id, now).demo_spin_done {
            return Err(AppError::AlreadySpun(format!(
                "User {user_id} already used the demo spin"
            )));
        }

        let prize = draw_from_catalog(&state.active_prizes(), roll)?;
        let record = SpinRecord {
            id: Uuid::new_v4(),
            user_id,
            spin_type: SpinType::Demo,
            is_real: false,
            prize_id: prize.id,
            prize_snapshot: prize.snapshot(),
            status: SpinStatus::PendingValidation,
            spin_date: now,
        };

        let user = state.ensure_user_state(user_id, now);
        user.demo_spin_done = true;
        user.touch(now);
        let user_response = UserSpinStateResponse::from(&*user);

        let response = SpinResponse {
            prize: WonPrizeResponse::from(&record),
            record_id: record.id,
            status: record.status,
            state: user_response,
        };
        state.spin_records.insert(record.id, record);

        log::info!("Demo spin: user_id={user_id} prize_id={}", prize.id);
        Ok(response)
    }

    /// 真实抽奖 (审核通过后的回放)
    ///
    /// 重放体验抽奖时捕获的奖品快照而不是重新抽取;
    /// 对应的现金入账已在审核通过时完成, 此处只消费资格并落记录。
    pub async fn consume_real_spin(&self, user_id: i64) -> AppResult<SpinResponse> {
        let now = self.clock.now();
        let mut state = self.store.write().await;

        let user = state
            .user_states
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} has no spin state")))?;
        if !user.is_validated {
            return Err(AppError::NotEligible(format!(
                "User {user_id} demo win is not validated"
            )));
        }
        if user.real_spin_done {
            return Err(AppError::AlreadySpun(format!(
                "User {user_id} already used the real spin"
            )));
        }

        let demo = state
            .demo_record(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} has no demo record")))?;
        if demo.status == SpinStatus::Rejected || demo.status == SpinStatus::PendingValidation {
            return Err(AppError::NotEligible(format!(
                "User {user_id} demo record is not approved"
            )));
        }

        let record = SpinRecord {
            id: Uuid::new_v4(),
            user_id,
            spin_type: SpinType::WelcomeReal,
            is_real: true,
            prize_id: demo.prize_id,
            prize_snapshot: demo.prize_snapshot.clone(),
            status: demo.status,
            spin_date: now,
        };

        let user = state.ensure_user_state(user_id, now);
        user.real_spin_done = true;
        user.touch(now);
        let user_response = UserSpinStateResponse::from(&*user);

        let response = SpinResponse {
            prize: WonPrizeResponse::from(&record),
            record_id: record.id,
            status: record.status,
            state: user_response,
        };
        state.spin_records.insert(record.id, record);

        log::info!("Real spin: user_id={user_id}");
        Ok(response)
    }

    /// 奖励抽奖 (兑换码发放, 始终真实结算)
    ///
    /// 独立抽取; 现金类奖品先入账再提交状态
    /// (入账失败则本次消费不留任何痕迹), spin 类奖品追加一次奖励抽奖。
    pub async fn consume_bonus_spin(&self, user_id: i64) -> AppResult<SpinResponse> {
        let now = self.clock.now();
        let roll = self.random.next() * 100.0;
        let mut state = self.store.write().await;

        if state.ensure_user_state(user_id, now).available_bonus_spins <= 0 {
            return Err(AppError::NotEligible(format!(
                "User {user_id} has no bonus spins available"
            )));
        }

        let prize = draw_from_catalog(&state.active_prizes(), roll)?;
        let snapshot = prize.snapshot();

        let mut status = SpinStatus::Approved;
        if snapshot.is_cash_bearing() {
            self.ledger
                .credit(user_id, snapshot.value_cents)
                .map_err(|e| AppError::CreditFailure(format!("Ledger credit failed: {e}")))?;
            status = SpinStatus::Paid;
        }

        let record = SpinRecord {
            id: Uuid::new_v4(),
            user_id,
            spin_type: SpinType::Bonus,
            is_real: true,
            prize_id: prize.id,
            prize_snapshot: snapshot,
            status,
            spin_date: now,
        };

        let user = state.ensure_user_state(user_id, now);
        user.available_bonus_spins -= 1;
        if prize.prize_type == PrizeType::Spin {
            // spin 类奖品: 再送一次奖励抽奖
            user.available_bonus_spins += 1;
        }
        user.touch(now);
        let user_response = UserSpinStateResponse::from(&*user);

        let response = SpinResponse {
            prize: WonPrizeResponse::from(&record),
            record_id: record.id,
            status: record.status,
            state: user_response,
        };
        state.spin_records.insert(record.id, record);

        log::info!("Bonus spin: user_id={user_id} prize_id={}", prize.id);
        Ok(response)
    }
}

/// 抽奖前置校验 + 纯函数选择
/// 空目录或概率总和未配置到 100% 的目录直接拒绝抽奖
fn draw_from_catalog(prizes: &[Prize], roll: f64) -> AppResult<Prize> {
    if prizes.is_empty() {
        return Err(AppError::InternalError(
            "No active prizes configured".into(),
        ));
    }
    let sum: i64 = prizes.iter().map(|p| p.probability_bp as i64).sum();
    check_active_sum(sum, prizes.len()).map_err(|_| {
        AppError::InternalError("Prize catalog probabilities are not fully configured".into())
    })?;
    draw_engine::select(prizes, roll)
        .cloned()
        .ok_or_else(|| AppError::InternalError("Prize selection failed".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PrizeBehavior;
    use crate::external::{FixedClock, InMemoryLedger, SequenceRandom};
    use crate::models::CreatePrizeRequest;
    use crate::services::PrizeCatalogService;
    use chrono::{TimeZone, Utc};

    struct Harness {
        store: RouletteStore,
        catalog: PrizeCatalogService,
        spins: SpinService,
        ledger: Arc<InMemoryLedger>,
        clock: Arc<FixedClock>,
    }

    fn harness(rolls: Vec<f64>) -> Harness {
        let store = RouletteStore::new();
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        ));
        let ledger = Arc::new(InMemoryLedger::new());
        let random = Arc::new(SequenceRandom::new(rolls));
        let catalog = PrizeCatalogService::new(store.clone(), clock.clone(), false);
        let spins = SpinService::new(store.clone(), clock.clone(), random, ledger.clone());
        Harness {
            store,
            catalog,
            spins,
            ledger,
            clock,
        }
    }

    async fn seed_catalog(h: &Harness) {
        // 60% 现金 $5 (即时入账), 40% 谢谢参与
        h.catalog
            .create_prize(CreatePrizeRequest {
                name: "Cash $5".to_string(),
                prize_type: PrizeType::Cash,
                behavior: PrizeBehavior::InstantCash,
                value_cents: Some(500),
                probability: 60.0,
                color: Some("#00aa00".to_string()),
                position: Some(1),
                is_active: Some(true),
            })
            .await
            .unwrap();
        h.catalog
            .create_prize(CreatePrizeRequest {
                name: "Thank You".to_string(),
                prize_type: PrizeType::Special,
                behavior: PrizeBehavior::Custom,
                value_cents: Some(0),
                probability: 40.0,
                color: Some("#888888".to_string()),
                position: Some(2),
                is_active: Some(true),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_demo_spin_creates_pending_record() {
        let h = harness(vec![0.1]); // roll 10% -> Cash $5
        seed_catalog(&h).await;

        let result = h.spins.consume_demo_spin(7).await.unwrap();
        assert_eq!(result.prize.name, "Cash $5");
        assert_eq!(result.status, SpinStatus::PendingValidation);
        assert!(result.state.demo_spin_done);
        assert_eq!(result.state.version, 1);

        // 体验抽奖不得入账
        assert_eq!(h.ledger.balance_of(7), 0);

        let state = h.store.read().await;
        assert_eq!(state.spin_records.len(), 1);
    }

    #[tokio::test]
    async fn test_demo_spin_twice_fails() {
        let h = harness(vec![0.1]);
        seed_catalog(&h).await;

        h.spins.consume_demo_spin(7).await.unwrap();
        let err = h.spins.consume_demo_spin(7).await.unwrap_err();
        assert_eq!(err.kind(), "ALREADY_SPUN");

        // 恰好一条记录
        let state = h.store.read().await;
        assert_eq!(state.user_records(7).len(), 1);
    }

    #[tokio::test]
    async fn test_demo_spin_requires_complete_catalog() {
        let h = harness(vec![0.1]);
        // 只配置到 60%
        h.catalog
            .create_prize(CreatePrizeRequest {
                name: "Partial".to_string(),
                prize_type: PrizeType::Points,
                behavior: PrizeBehavior::Custom,
                value_cents: Some(0),
                probability: 60.0,
                color: None,
                position: None,
                is_active: Some(true),
            })
            .await
            .unwrap();

        let err = h.spins.consume_demo_spin(7).await.unwrap_err();
        assert_eq!(err.kind(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_real_spin_requires_validation() {
        let h = harness(vec![0.1]);
        seed_catalog(&h).await;

        h.spins.consume_demo_spin(7).await.unwrap();
        let err = h.spins.consume_real_spin(7).await.unwrap_err();
        assert_eq!(err.kind(), "NOT_ELIGIBLE");
    }

    #[tokio::test]
    async fn test_real_spin_replays_demo_snapshot() {
        let h = harness(vec![0.1, 0.9]); // demo -> Cash $5; 第二个 roll 不应被消费
        seed_catalog(&h).await;

        h.spins.consume_demo_spin(7).await.unwrap();

        // 模拟审核通过 (validation service 的职责, 这里直接操作存储)
        {
            let mut state = h.store.write().await;
            let now = h.clock.now();
            if let Some(record) = state.demo_record_mut(7) {
                record.status = SpinStatus::Paid;
            }
            let user = state.ensure_user_state(7, now);
            user.is_validated = true;
            user.touch(now);
        }

        let result = h.spins.consume_real_spin(7).await.unwrap();
        // 即便第二个 roll 指向 Thank You, 回放仍是体验时的奖品
        assert_eq!(result.prize.name, "Cash $5");
        assert_eq!(result.status, SpinStatus::Paid);
        assert!(result.state.real_spin_done);

        // 入账发生在审核时, 回放不再入账
        assert_eq!(h.ledger.balance_of(7), 0);

        let err = h.spins.consume_real_spin(7).await.unwrap_err();
        assert_eq!(err.kind(), "ALREADY_SPUN");
    }

    #[tokio::test]
    async fn test_bonus_spin_consumes_counter_and_credits() {
        let h = harness(vec![0.1]); // -> Cash $5
        seed_catalog(&h).await;

        {
            let mut state = h.store.write().await;
            let now = h.clock.now();
            let user = state.ensure_user_state(7, now);
            user.available_bonus_spins = 2;
            user.touch(now);
        }

        let result = h.spins.consume_bonus_spin(7).await.unwrap();
        assert_eq!(result.status, SpinStatus::Paid);
        assert_eq!(result.state.available_bonus_spins, 1);
        assert_eq!(h.ledger.balance_of(7), 500);
    }

    #[tokio::test]
    async fn test_bonus_spin_without_counter_fails() {
        let h = harness(vec![0.1]);
        seed_catalog(&h).await;

        let err = h.spins.consume_bonus_spin(7).await.unwrap_err();
        assert_eq!(err.kind(), "NOT_ELIGIBLE");
    }

    #[tokio::test]
    async fn test_spin_prize_grants_extra_bonus_spin() {
        let h = harness(vec![0.95]);
        // 60% 现金 + 40% 再来一次
        h.catalog
            .create_prize(CreatePrizeRequest {
                name: "Cash $5".to_string(),
                prize_type: PrizeType::Cash,
                behavior: PrizeBehavior::InstantCash,
                value_cents: Some(500),
                probability: 60.0,
                color: None,
                position: Some(1),
                is_active: Some(true),
            })
            .await
            .unwrap();
        h.catalog
            .create_prize(CreatePrizeRequest {
                name: "Extra Spin".to_string(),
                prize_type: PrizeType::Spin,
                behavior: PrizeBehavior::Bonus,
                value_cents: Some(0),
                probability: 40.0,
                color: None,
                position: Some(2),
                is_active: Some(true),
            })
            .await
            .unwrap();

        {
            let mut state = h.store.write().await;
            let now = h.clock.now();
            let user = state.ensure_user_state(7, now);
            user.available_bonus_spins = 1;
            user.touch(now);
        }

        let result = h.spins.consume_bonus_spin(7).await.unwrap();
        assert_eq!(result.prize.name, "Extra Spin");
        // 消费一次 + 返还一次
        assert_eq!(result.state.available_bonus_spins, 1);
    }

    #[tokio::test]
    async fn test_concurrent_demo_spins_only_one_succeeds() {
        let h = harness(vec![0.1]);
        seed_catalog(&h).await;

        let (r1, r2) = tokio::join!(h.spins.consume_demo_spin(7), h.spins.consume_demo_spin(7));
        assert_eq!(
            [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count(),
            1
        );

        let state = h.store.read().await;
        assert_eq!(state.user_records(7).len(), 1);
    }

    #[tokio::test]
    async fn test_records_listing_pages_newest_first() {
        let h = harness(vec![0.1]);
        seed_catalog(&h).await;
        h.spins.consume_demo_spin(7).await.unwrap();

        let page = h
            .spins
            .list_records(
                7,
                &SpinRecordQuery {
                    page: None,
                    per_page: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].spin_type, SpinType::Demo);
    }
}
