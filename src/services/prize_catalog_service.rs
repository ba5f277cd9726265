use crate::entities::{Prize, percent_to_bp};
use crate::error::{AppError, AppResult};
use crate::external::Clock;
use crate::models::{CreatePrizeRequest, PrizeResponse, UpdatePrizeRequest};
use crate::entities::{PROBABILITY_EPSILON_BP, PROBABILITY_SCALE_BP};
use crate::services::probability_adjuster::{check_active_sum, renormalize_bp};
use crate::store::{RouletteStore, StoreState};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 变更后的启用集合需要满足的总和约束
/// - RejectOverflow: 仅拒绝超出 100%+ε (新增/编辑允许欠额的组装中状态,
///   欠额目录在抽奖侧被拦截)
/// - RequireExact: 非空集合必须落在 100%±ε (删除/停用)
#[derive(Clone, Copy, PartialEq)]
enum SumCheck {
    RejectOverflow,
    RequireExact,
}

/// 奖品目录管理 (管理端)
///
/// 所有变更遵循 plan-then-commit: 先在写锁内完成全部校验与归一化计算,
/// 再一次性落库, 目录不存在可观察的中间状态。
#[derive(Clone)]
pub struct PrizeCatalogService {
    store: RouletteStore,
    clock: Arc<dyn Clock>,
    /// true 时概率总和不合法的变更会触发等比归一化而不是拒绝
    auto_normalize: bool,
}

impl PrizeCatalogService {
    pub fn new(store: RouletteStore, clock: Arc<dyn Clock>, auto_normalize: bool) -> Self {
        Self {
            store,
            clock,
            auto_normalize,
        }
    }

    /// 获取启用奖品 (按 position 排序), 供轮盘展示与抽奖使用
    pub async fn list_active(&self) -> AppResult<Vec<PrizeResponse>> {
        let state = self.store.read().await;
        Ok(state
            .active_prizes()
            .into_iter()
            .map(PrizeResponse::from)
            .collect())
    }

    /// 获取全部奖品 (含停用, 管理端)
    pub async fn list_all(&self) -> AppResult<Vec<PrizeResponse>> {
        let state = self.store.read().await;
        let mut list: Vec<Prize> = state.prizes.values().cloned().collect();
        list.sort_by_key(|p| (p.position, p.id));
        Ok(list.into_iter().map(PrizeResponse::from).collect())
    }

    /// 新建奖品
    /// position 缺省追加到末尾; 启用奖品概率总和必须保持 100%
    /// (auto_normalize 开启时自动归一化, 否则拒绝)
    pub async fn create_prize(&self, req: CreatePrizeRequest) -> AppResult<PrizeResponse> {
        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name must not be empty".into()));
        }
        let value_cents = req.value_cents.unwrap_or(0);
        if value_cents < 0 {
            return Err(AppError::ValidationError(
                "Value must be non-negative".into(),
            ));
        }
        let bp = percent_to_bp(req.probability)?;

        let now = self.clock.now();
        let mut state = self.store.write().await;

        let position = req.position.unwrap_or_else(|| {
            state
                .prizes
                .values()
                .map(|p| p.position)
                .max()
                .unwrap_or(0)
                + 1
        });
        let is_active = req.is_active.unwrap_or(true);
        let id = state.alloc_prize_id();

        let plan = if is_active {
            let mut weights = active_weights(&state);
            weights.push((id, bp));
            self.plan_for(weights, SumCheck::RejectOverflow)?
        } else {
            None
        };

        let prize = Prize {
            id,
            name,
            prize_type: req.prize_type,
            behavior: req.behavior,
            value_cents,
            probability_bp: bp,
            color: req.color.unwrap_or_else(|| "#ffffff".to_string()),
            position,
            is_active,
            created_at: now,
            updated_at: None,
        };
        state.prizes.insert(id, prize);
        apply_plan(&mut state, plan, now);

        log::info!("Created prize {id}");
        Ok(state.prizes[&id].clone().into())
    }

    /// 编辑奖品 (仅更新给出的字段), 概率变化同样受总和不变量约束
    pub async fn update_prize(&self, id: i64, req: UpdatePrizeRequest) -> AppResult<PrizeResponse> {
        let now = self.clock.now();
        let mut state = self.store.write().await;

        let mut next = state
            .prizes
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?
            .clone();

        if let Some(name) = &req.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::ValidationError("Name must not be empty".into()));
            }
            next.name = name.to_string();
        }
        if let Some(prize_type) = req.prize_type {
            next.prize_type = prize_type;
        }
        if let Some(behavior) = req.behavior {
            next.behavior = behavior;
        }
        if let Some(value_cents) = req.value_cents {
            if value_cents < 0 {
                return Err(AppError::ValidationError(
                    "Value must be non-negative".into(),
                ));
            }
            next.value_cents = value_cents;
        }
        if let Some(probability) = req.probability {
            next.probability_bp = percent_to_bp(probability)?;
        }
        if let Some(color) = req.color {
            next.color = color;
        }
        if let Some(position) = req.position {
            next.position = position;
        }

        let plan = if next.is_active {
            let weights: Vec<(i64, i32)> = active_weights(&state)
                .into_iter()
                .map(|(pid, bp)| {
                    if pid == id {
                        (pid, next.probability_bp)
                    } else {
                        (pid, bp)
                    }
                })
                .collect();
            self.plan_for(weights, SumCheck::RejectOverflow)?
        } else {
            None
        };

        next.updated_at = Some(now);
        state.prizes.insert(id, next);
        apply_plan(&mut state, plan, now);

        Ok(state.prizes[&id].clone().into())
    }

    /// 删除奖品; 删除启用奖品会破坏总和不变量时,
    /// auto_normalize 开启则对剩余奖品归一化, 否则拒绝
    pub async fn delete_prize(&self, id: i64) -> AppResult<()> {
        let now = self.clock.now();
        let mut state = self.store.write().await;

        let prize = state
            .prizes
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?;

        let plan = if prize.is_active {
            let weights: Vec<(i64, i32)> = active_weights(&state)
                .into_iter()
                .filter(|(pid, _)| *pid != id)
                .collect();
            self.plan_for(weights, SumCheck::RequireExact)?
        } else {
            None
        };

        state.prizes.remove(&id);
        apply_plan(&mut state, plan, now);

        log::info!("Deleted prize {id}");
        Ok(())
    }

    /// 启用 / 停用奖品 (对变更后的启用集合做同样的不变量检查)
    pub async fn set_active(&self, id: i64, is_active: bool) -> AppResult<PrizeResponse> {
        let now = self.clock.now();
        let mut state = self.store.write().await;

        let prize = state
            .prizes
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?
            .clone();

        let plan = {
            let mut weights: Vec<(i64, i32)> = active_weights(&state)
                .into_iter()
                .filter(|(pid, _)| *pid != id)
                .collect();
            if is_active {
                weights.push((id, prize.probability_bp));
            }
            let check = if is_active {
                SumCheck::RejectOverflow
            } else {
                SumCheck::RequireExact
            };
            self.plan_for(weights, check)?
        };

        let entry = state
            .prizes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Prize {id} not found")))?;
        entry.is_active = is_active;
        entry.updated_at = Some(now);
        apply_plan(&mut state, plan, now);

        Ok(state.prizes[&id].clone().into())
    }

    /// 给定变更后的启用权重集合, 返回 None (无需动作) 或归一化计划
    fn plan_for(
        &self,
        weights: Vec<(i64, i32)>,
        check: SumCheck,
    ) -> AppResult<Option<Vec<(i64, i32)>>> {
        let sum: i64 = weights.iter().map(|(_, bp)| *bp as i64).sum();
        let verdict = match check {
            SumCheck::RequireExact => check_active_sum(sum, weights.len()),
            SumCheck::RejectOverflow => {
                if sum > PROBABILITY_SCALE_BP + PROBABILITY_EPSILON_BP {
                    Err(AppError::InvariantViolation(format!(
                        "Active prize probabilities must not exceed 100%, got {}%",
                        sum as f64 / 100.0
                    )))
                } else {
                    Ok(())
                }
            }
        };
        match verdict {
            Ok(()) => Ok(None),
            Err(err) => {
                if !self.auto_normalize {
                    return Err(err);
                }
                renormalize_bp(&weights).map(Some).ok_or_else(|| {
                    AppError::InvariantViolation(
                        "Cannot normalize: total active probability is zero".into(),
                    )
                })
            }
        }
    }
}

fn active_weights(state: &StoreState) -> Vec<(i64, i32)> {
    state
        .prizes
        .values()
        .filter(|p| p.is_active)
        .map(|p| (p.id, p.probability_bp))
        .collect()
}

fn apply_plan(state: &mut StoreState, plan: Option<Vec<(i64, i32)>>, now: DateTime<Utc>) {
    let Some(plan) = plan else {
        return;
    };
    for (id, bp) in plan {
        if let Some(prize) = state.prizes.get_mut(&id) {
            prize.probability_bp = bp;
            prize.updated_at = Some(now);
        }
    }
}
