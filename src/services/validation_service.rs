use crate::entities::{SpinStatus, ValidationAction, ValidationDecision};
use crate::error::{AppError, AppResult};
use crate::external::{BalanceLedger, Clock};
use crate::models::{
    BatchValidationOutcome, PaginatedResponse, PaginationParams, PendingValidationResponse,
    ValidateBatchRequest, ValidateBatchResponse, ValidateRequest, ValidationOutcomeResponse,
};
use crate::store::{RouletteStore, StoreState};
use std::sync::Arc;

/// 体验中奖的人工审核
///
/// 通过 = 确认中奖资格: 现金类奖品先入账再提交状态变更,
/// 入账失败时本次审核不留任何痕迹; 每条记录只允许裁决一次。
#[derive(Clone)]
pub struct ValidationService {
    store: RouletteStore,
    clock: Arc<dyn Clock>,
    ledger: Arc<dyn BalanceLedger>,
}

impl ValidationService {
    pub fn new(store: RouletteStore, clock: Arc<dyn Clock>, ledger: Arc<dyn BalanceLedger>) -> Self {
        Self {
            store,
            clock,
            ledger,
        }
    }

    /// 待审核队列 (FIFO, 分页)
    pub async fn pending_queue(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PendingValidationResponse>> {
        let now = self.clock.now();
        let state = self.store.read().await;
        let pending = state.pending_demo_records();
        let total = pending.len() as i64;
        let items: Vec<PendingValidationResponse> = pending
            .into_iter()
            .skip(params.get_offset())
            .take(params.get_limit())
            .map(|r| PendingValidationResponse {
                record_id: r.id,
                user_id: r.user_id,
                prize_name: r.prize_snapshot.name.clone(),
                prize_type: r.prize_snapshot.prize_type,
                value_cents: r.prize_snapshot.value_cents,
                spin_date: r.spin_date,
                days_waiting: (now - r.spin_date).num_days(),
            })
            .collect();
        Ok(PaginatedResponse::new(items, params, total))
    }

    /// 队列深度与最旧等待时长, 供后台巡检日志使用
    pub async fn queue_depth(&self) -> (usize, i64) {
        let now = self.clock.now();
        let state = self.store.read().await;
        let pending = state.pending_demo_records();
        let oldest_days = pending
            .first()
            .map(|r| (now - r.spin_date).num_days())
            .unwrap_or(0);
        (pending.len(), oldest_days)
    }

    /// 审核单个用户的体验中奖
    pub async fn validate_user(
        &self,
        user_id: i64,
        req: &ValidateRequest,
    ) -> AppResult<ValidationOutcomeResponse> {
        let mut state = self.store.write().await;
        self.decide(&mut state, user_id, req.action, &req.notes, &req.decided_by)
    }

    /// 批量审核: 同一把写锁下按顺序逐个执行, 单个失败不中断整批
    pub async fn validate_batch(
        &self,
        req: &ValidateBatchRequest,
    ) -> AppResult<ValidateBatchResponse> {
        if req.user_ids.is_empty() {
            return Err(AppError::ValidationError(
                "user_ids must not be empty".to_string(),
            ));
        }

        let mut state = self.store.write().await;
        let mut results = Vec::with_capacity(req.user_ids.len());
        for &user_id in &req.user_ids {
            match self.decide(&mut state, user_id, req.action, &req.notes, &req.decided_by) {
                Ok(outcome) => results.push(BatchValidationOutcome {
                    user_id,
                    success: true,
                    status: Some(outcome.status),
                    error_code: None,
                    error_message: None,
                }),
                Err(e) => results.push(BatchValidationOutcome {
                    user_id,
                    success: false,
                    status: None,
                    error_code: Some(e.kind().to_string()),
                    error_message: Some(e.to_string()),
                }),
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        log::info!(
            "Batch validation: total={} succeeded={succeeded} failed={failed}",
            results.len()
        );
        Ok(ValidateBatchResponse {
            results,
            succeeded,
            failed,
        })
    }

    /// 在已持有的写锁内完成一次裁决。
    /// 顺序: 校验 -> (通过且现金类) 入账 -> 提交状态与裁决记录;
    /// 入账失败在任何状态写入之前返回, 记录保持待审核。
    fn decide(
        &self,
        state: &mut StoreState,
        user_id: i64,
        action: ValidationAction,
        notes: &Option<String>,
        decided_by: &Option<String>,
    ) -> AppResult<ValidationOutcomeResponse> {
        let now = self.clock.now();

        let record = state
            .demo_record(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} has no demo spin")))?;
        if record.status != SpinStatus::PendingValidation {
            return Err(AppError::AlreadyDecided(format!(
                "User {user_id} demo win was already decided"
            )));
        }
        let record_id = record.id;
        let snapshot = record.prize_snapshot.clone();

        let (status, credited_cents) = match action {
            ValidationAction::Approve => {
                if snapshot.is_cash_bearing() {
                    self.ledger
                        .credit(user_id, snapshot.value_cents)
                        .map_err(|e| {
                            AppError::CreditFailure(format!("Ledger credit failed: {e}"))
                        })?;
                    (SpinStatus::Paid, Some(snapshot.value_cents))
                } else {
                    (SpinStatus::Approved, None)
                }
            }
            ValidationAction::Reject => (SpinStatus::Rejected, None),
        };

        if let Some(record) = state.demo_record_mut(user_id) {
            record.status = status;
        }
        let user = state.ensure_user_state(user_id, now);
        user.is_validated = action == ValidationAction::Approve;
        user.touch(now);

        state.decisions.insert(
            record_id,
            ValidationDecision {
                spin_record_id: record_id,
                user_id,
                action,
                notes: notes.clone(),
                decided_by: decided_by.clone().unwrap_or_else(|| "admin".to_string()),
                decided_at: now,
            },
        );

        log::info!("Validation: user_id={user_id} action={action:?} status={status:?}");
        Ok(ValidationOutcomeResponse {
            user_id,
            record_id,
            action,
            status,
            credited_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PrizeBehavior, PrizeType};
    use crate::external::{FixedClock, InMemoryLedger, LedgerError, SequenceRandom};
    use crate::models::CreatePrizeRequest;
    use crate::services::{PrizeCatalogService, SpinService};
    use chrono::{Duration, TimeZone, Utc};

    /// 永远拒绝入账的账本, 用于验证失败时不落任何状态
    struct FailingLedger;

    impl BalanceLedger for FailingLedger {
        fn credit(&self, _user_id: i64, _amount_cents: i64) -> Result<(), LedgerError> {
            Err(LedgerError("wallet offline".to_string()))
        }
    }

    struct Harness {
        store: RouletteStore,
        catalog: PrizeCatalogService,
        spins: SpinService,
        validation: ValidationService,
        ledger: Arc<InMemoryLedger>,
        clock: Arc<FixedClock>,
    }

    fn harness() -> Harness {
        let store = RouletteStore::new();
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        ));
        let ledger = Arc::new(InMemoryLedger::new());
        let random = Arc::new(SequenceRandom::new(vec![0.1]));
        let catalog = PrizeCatalogService::new(store.clone(), clock.clone(), false);
        let spins = SpinService::new(
            store.clone(),
            clock.clone(),
            random,
            ledger.clone(),
        );
        let validation = ValidationService::new(store.clone(), clock.clone(), ledger.clone());
        Harness {
            store,
            catalog,
            spins,
            validation,
            ledger,
            clock,
        }
    }

    async fn seed_catalog(h: &Harness) {
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
                name: "Thank You".to_string(),
                prize_type: PrizeType::Special,
                behavior: PrizeBehavior::Custom,
                value_cents: Some(0),
                probability: 40.0,
                color: None,
                position: Some(2),
                is_active: Some(true),
            })
            .await
            .unwrap();
    }

    fn approve_req() -> ValidateRequest {
        ValidateRequest {
            action: ValidationAction::Approve,
            notes: None,
            decided_by: Some("ops".to_string()),
        }
    }

    #[tokio::test]
    async fn test_approve_credits_cash_prize_once() {
        let h = harness();
        seed_catalog(&h).await;
        h.spins.consume_demo_spin(1).await.unwrap();

        let outcome = h.validation.validate_user(1, &approve_req()).await.unwrap();
        assert_eq!(outcome.status, SpinStatus::Paid);
        assert_eq!(outcome.credited_cents, Some(500));
        assert_eq!(h.ledger.balance_of(1), 500);

        // 二次审核必须拒绝且不得再次入账
        let err = h.validation.validate_user(1, &approve_req()).await.unwrap_err();
        assert_eq!(err.kind(), "ALREADY_DECIDED");
        assert_eq!(h.ledger.balance_of(1), 500);
    }

    #[tokio::test]
    async fn test_reject_leaves_user_unvalidated() {
        let h = harness();
        seed_catalog(&h).await;
        h.spins.consume_demo_spin(1).await.unwrap();

        let outcome = h
            .validation
            .validate_user(
                1,
                &ValidateRequest {
                    action: ValidationAction::Reject,
                    notes: Some("suspicious".to_string()),
                    decided_by: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.status, SpinStatus::Rejected);
        assert_eq!(h.ledger.balance_of(1), 0);

        let state = h.store.read().await;
        let user = state.user_states.get(&1).unwrap();
        assert!(!user.is_validated);
        let decision = state.decisions.get(&outcome.record_id).unwrap();
        assert_eq!(decision.decided_by, "admin");
    }

    #[tokio::test]
    async fn test_validate_without_demo_spin() {
        let h = harness();
        seed_catalog(&h).await;

        let err = h.validation.validate_user(99, &approve_req()).await.unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_credit_failure_keeps_record_pending() {
        let h = harness();
        seed_catalog(&h).await;
        h.spins.consume_demo_spin(1).await.unwrap();

        let failing = ValidationService::new(
            h.store.clone(),
            h.clock.clone(),
            Arc::new(FailingLedger),
        );
        let err = failing.validate_user(1, &approve_req()).await.unwrap_err();
        assert_eq!(err.kind(), "CREDIT_FAILURE");

        // 入账失败不留痕迹: 记录仍待审核, 可重试
        {
            let state = h.store.read().await;
            let record = state.demo_record(1).unwrap();
            assert_eq!(record.status, SpinStatus::PendingValidation);
            assert!(state.decisions.is_empty());
            assert!(!state.user_states.get(&1).unwrap().is_validated);
        }

        let outcome = h.validation.validate_user(1, &approve_req()).await.unwrap();
        assert_eq!(outcome.status, SpinStatus::Paid);
        assert_eq!(h.ledger.balance_of(1), 500);
    }

    #[tokio::test]
    async fn test_batch_partial_failure() {
        let h = harness();
        seed_catalog(&h).await;
        h.spins.consume_demo_spin(1).await.unwrap();
        h.spins.consume_demo_spin(2).await.unwrap();
        h.spins.consume_demo_spin(3).await.unwrap();

        // u2 先被单独审核
        h.validation.validate_user(2, &approve_req()).await.unwrap();

        let response = h
            .validation
            .validate_batch(&ValidateBatchRequest {
                user_ids: vec![1, 2, 3],
                action: ValidationAction::Approve,
                notes: None,
                decided_by: Some("ops".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.succeeded, 2);
        assert_eq!(response.failed, 1);
        assert!(response.results[0].success);
        assert!(!response.results[1].success);
        assert_eq!(
            response.results[1].error_code.as_deref(),
            Some("ALREADY_DECIDED")
        );
        assert!(response.results[2].success);

        // u1/u3 各入账一次, u2 保持首次审核的入账
        assert_eq!(h.ledger.balance_of(1), 500);
        assert_eq!(h.ledger.balance_of(2), 500);
        assert_eq!(h.ledger.balance_of(3), 500);
    }

    #[tokio::test]
    async fn test_batch_rejects_empty_user_ids() {
        let h = harness();
        let err = h
            .validation
            .validate_batch(&ValidateBatchRequest {
                user_ids: vec![],
                action: ValidationAction::Approve,
                notes: None,
                decided_by: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_pending_queue_fifo_and_days_waiting() {
        let h = harness();
        seed_catalog(&h).await;

        h.spins.consume_demo_spin(1).await.unwrap();
        h.clock.advance(Duration::days(3));
        h.spins.consume_demo_spin(2).await.unwrap();

        let params = PaginationParams {
            page: None,
            per_page: None,
        };
        let queue = h.validation.pending_queue(&params).await.unwrap();
        assert_eq!(queue.total, 2);
        // 先抽的排在前面
        assert_eq!(queue.data[0].user_id, 1);
        assert_eq!(queue.data[0].days_waiting, 3);
        assert_eq!(queue.data[1].user_id, 2);
        assert_eq!(queue.data[1].days_waiting, 0);

        let (depth, oldest) = h.validation.queue_depth().await;
        assert_eq!(depth, 2);
        assert_eq!(oldest, 3);

        // 审核后退出队列
        h.validation.validate_user(1, &approve_req()).await.unwrap();
        let queue = h.validation.pending_queue(&params).await.unwrap();
        assert_eq!(queue.total, 1);
        assert_eq!(queue.data[0].user_id, 2);
    }
}
