use crate::entities::{PROBABILITY_EPSILON_BP, PROBABILITY_SCALE_BP, percent_to_bp};
use crate::error::{AppError, AppResult};
use crate::external::Clock;
use crate::models::{PrizeResponse, ProbabilityUpdate};
use crate::store::RouletteStore;
use std::collections::HashMap;
use std::sync::Arc;

/// 校验启用集合概率总和是否落在 100%±ε 内 (空集合视为合法)
pub fn check_active_sum(sum_bp: i64, active_count: usize) -> AppResult<()> {
    if active_count == 0 {
        return Ok(());
    }
    if (sum_bp - PROBABILITY_SCALE_BP).abs() > PROBABILITY_EPSILON_BP {
        return Err(AppError::InvariantViolation(format!(
            "Active prize probabilities must total 100%, got {}%",
            sum_bp as f64 / 100.0
        )));
    }
    Ok(())
}

/// 最大余数法等比归一化: 把 (id, bp) 权重缩放到总和恰好 10000bp。
/// 输入总和为 0 时无法归一化, 返回 None。
pub fn renormalize_bp(weights: &[(i64, i32)]) -> Option<Vec<(i64, i32)>> {
    let total: i64 = weights.iter().map(|(_, bp)| *bp as i64).sum();
    if total <= 0 {
        return None;
    }

    let mut scaled: Vec<(i64, i32, i64)> = weights
        .iter()
        .map(|&(id, bp)| {
            let numerator = bp as i64 * PROBABILITY_SCALE_BP;
            let floor = numerator / total;
            let remainder = numerator % total;
            (id, floor as i32, remainder)
        })
        .collect();

    let assigned: i64 = scaled.iter().map(|(_, bp, _)| *bp as i64).sum();
    let mut leftover = PROBABILITY_SCALE_BP - assigned;

    // 余数最大的先补 1bp, 余数相同按 id 保证结果稳定
    scaled.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    for entry in scaled.iter_mut() {
        if leftover == 0 {
            break;
        }
        entry.1 += 1;
        leftover -= 1;
    }

    scaled.sort_by_key(|(id, _, _)| *id);
    Some(scaled.into_iter().map(|(id, bp, _)| (id, bp)).collect())
}

/// 批量概率调整: 全部校验通过后一次性提交, 否则整体拒绝。
#[derive(Clone)]
pub struct ProbabilityAdjuster {
    store: RouletteStore,
    clock: Arc<dyn Clock>,
}

impl ProbabilityAdjuster {
    pub fn new(store: RouletteStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn adjust_probabilities(
        &self,
        updates: &[ProbabilityUpdate],
    ) -> AppResult<Vec<PrizeResponse>> {
        if updates.is_empty() {
            return Err(AppError::ValidationError(
                "Updates must not be empty".to_string(),
            ));
        }

        // 先把请求转换为 bp 并查重
        let mut planned: HashMap<i64, i32> = HashMap::new();
        for update in updates {
            let bp = percent_to_bp(update.probability)?;
            if planned.insert(update.prize_id, bp).is_some() {
                return Err(AppError::ValidationError(format!(
                    "Duplicate prize id {} in updates",
                    update.prize_id
                )));
            }
        }

        let now = self.clock.now();
        let mut state = self.store.write().await;

        for prize_id in planned.keys() {
            if !state.prizes.contains_key(prize_id) {
                return Err(AppError::NotFound(format!("Prize {prize_id} not found")));
            }
        }

        // 计算应用后所有启用奖品的总和 (被更新的 + 未触及的)
        let mut sum_bp: i64 = 0;
        let mut active_count: usize = 0;
        for prize in state.prizes.values() {
            if !prize.is_active {
                continue;
            }
            active_count += 1;
            sum_bp += planned
                .get(&prize.id)
                .copied()
                .unwrap_or(prize.probability_bp) as i64;
        }
        check_active_sum(sum_bp, active_count)?;

        // 提交
        let mut touched = Vec::with_capacity(planned.len());
        for (prize_id, bp) in planned {
            let prize = state
                .prizes
                .get_mut(&prize_id)
                .ok_or_else(|| AppError::NotFound(format!("Prize {prize_id} not found")))?;
            prize.probability_bp = bp;
            prize.updated_at = Some(now);
            touched.push(prize.clone());
        }
        touched.sort_by_key(|p| p.id);

        log::info!("Adjusted probabilities for {} prizes", touched.len());
        Ok(touched.into_iter().map(PrizeResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renormalize_scales_to_exact_total() {
        let weights = vec![(1, 3000), (2, 3000), (3, 3000)];
        let normalized = renormalize_bp(&weights).unwrap();
        let total: i64 = normalized.iter().map(|(_, bp)| *bp as i64).sum();
        assert_eq!(total, 10_000);
        // 等权重应保持接近均分
        for (_, bp) in &normalized {
            assert!((*bp - 3333).abs() <= 1);
        }
    }

    #[test]
    fn test_renormalize_preserves_proportions() {
        let weights = vec![(1, 6000), (2, 2000)];
        let normalized = renormalize_bp(&weights).unwrap();
        assert_eq!(normalized, vec![(1, 7500), (2, 2500)]);
    }

    #[test]
    fn test_renormalize_zero_total() {
        assert!(renormalize_bp(&[(1, 0), (2, 0)]).is_none());
    }

    #[test]
    fn test_check_active_sum_tolerance() {
        assert!(check_active_sum(10_000, 2).is_ok());
        assert!(check_active_sum(10_001, 2).is_ok());
        assert!(check_active_sum(9_999, 2).is_ok());
        assert!(check_active_sum(10_002, 2).is_err());
        assert!(check_active_sum(0, 0).is_ok());
    }

    mod adjust {
        use super::*;
        use crate::entities::{PrizeBehavior, PrizeType};
        use crate::external::SystemClock;
        use crate::models::CreatePrizeRequest;
        use crate::services::PrizeCatalogService;

        async fn seeded() -> (ProbabilityAdjuster, Vec<i64>) {
            let store = RouletteStore::new();
            let catalog =
                PrizeCatalogService::new(store.clone(), Arc::new(SystemClock), false);
            let mut ids = Vec::new();
            for (name, probability) in [("A", 60.0), ("B", 40.0)] {
                let prize = catalog
                    .create_prize(CreatePrizeRequest {
                        name: name.to_string(),
                        prize_type: PrizeType::Points,
                        behavior: PrizeBehavior::Custom,
                        value_cents: Some(0),
                        probability,
                        color: None,
                        position: None,
                        is_active: Some(true),
                    })
                    .await
                    .unwrap();
                ids.push(prize.id);
            }
            (ProbabilityAdjuster::new(store, Arc::new(SystemClock)), ids)
        }

        #[tokio::test]
        async fn test_adjust_commits_valid_set() {
            let (adjuster, ids) = seeded().await;
            let touched = adjuster
                .adjust_probabilities(&[
                    ProbabilityUpdate {
                        prize_id: ids[0],
                        probability: 70.0,
                    },
                    ProbabilityUpdate {
                        prize_id: ids[1],
                        probability: 30.0,
                    },
                ])
                .await
                .unwrap();
            assert_eq!(touched.len(), 2);
            assert_eq!(touched[0].probability_bp, 7000);
            assert_eq!(touched[1].probability_bp, 3000);
        }

        #[tokio::test]
        async fn test_adjust_rejects_broken_sum() {
            let (adjuster, ids) = seeded().await;
            let err = adjuster
                .adjust_probabilities(&[ProbabilityUpdate {
                    prize_id: ids[0],
                    probability: 70.0,
                }])
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "INVARIANT_VIOLATION");
        }

        #[tokio::test]
        async fn test_adjust_rejects_duplicates_and_unknown() {
            let (adjuster, ids) = seeded().await;
            let err = adjuster
                .adjust_probabilities(&[
                    ProbabilityUpdate {
                        prize_id: ids[0],
                        probability: 50.0,
                    },
                    ProbabilityUpdate {
                        prize_id: ids[0],
                        probability: 50.0,
                    },
                ])
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "VALIDATION_ERROR");

            let err = adjuster
                .adjust_probabilities(&[ProbabilityUpdate {
                    prize_id: 999,
                    probability: 100.0,
                }])
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "NOT_FOUND");
        }
    }
}
