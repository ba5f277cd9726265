use crate::entities::{CodeRedemption, PromoCode};
use crate::error::{AppError, AppResult};
use crate::external::Clock;
use crate::models::{
    CreatePromoCodeRequest, PromoCodeResponse, RedeemCodeRequest, RedeemCodeResponse,
};
use crate::store::RouletteStore;
use crate::utils::normalize_code;
use std::sync::Arc;

/// 每次成功兑换发放的奖励抽奖次数
const BONUS_SPINS_PER_REDEMPTION: i64 = 1;

/// 兑换码管理与兑换
///
/// 兑换在一次写锁内完成全部校验与提交: 使用计数、兑换记录
/// 和奖励抽奖次数同时生效, 并发的重复兑换只会成功一次。
#[derive(Clone)]
pub struct PromoCodeService {
    store: RouletteStore,
    clock: Arc<dyn Clock>,
}

impl PromoCodeService {
    pub fn new(store: RouletteStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 创建兑换码 (管理端)
    pub async fn create_code(&self, req: &CreatePromoCodeRequest) -> AppResult<PromoCodeResponse> {
        let now = self.clock.now();
        let code = normalize_code(&req.code);
        if code.is_empty() {
            return Err(AppError::ValidationError(
                "Code must not be empty".to_string(),
            ));
        }
        if req.max_uses <= 0 {
            return Err(AppError::ValidationError(
                "max_uses must be positive".to_string(),
            ));
        }
        if req.expires_at <= now {
            return Err(AppError::ValidationError(
                "expires_at must be in the future".to_string(),
            ));
        }

        let mut state = self.store.write().await;
        if state.promo_codes.contains_key(&code) {
            return Err(AppError::ValidationError(format!(
                "Code {code} already exists"
            )));
        }

        let promo = PromoCode {
            code: code.clone(),
            max_uses: req.max_uses,
            uses_count: 0,
            expires_at: req.expires_at,
            is_active: true,
            created_at: now,
        };
        state.promo_codes.insert(code.clone(), promo.clone());

        log::info!("Created promo code: code={code} max_uses={}", req.max_uses);
        Ok(promo.into())
    }

    /// 兑换: 成功则发放奖励抽奖次数
    ///
    /// 失败优先级: 未知/停用 -> NotFound, 过期 -> Expired,
    /// 用尽 -> ExhaustedUses, 该用户已兑换过 -> AlreadyRedeemed
    pub async fn redeem_code(&self, req: &RedeemCodeRequest) -> AppResult<RedeemCodeResponse> {
        let now = self.clock.now();
        let code = normalize_code(&req.code);
        let user_id = req.user_id;

        let mut state = self.store.write().await;

        let promo = state
            .promo_codes
            .get(&code)
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Code {code} not found")))?;
        if promo.is_expired(now) {
            return Err(AppError::Expired(format!("Code {code} has expired")));
        }
        if promo.is_exhausted() {
            return Err(AppError::ExhaustedUses(format!(
                "Code {code} has no uses left"
            )));
        }
        if state.redemptions.contains_key(&(code.clone(), user_id)) {
            return Err(AppError::AlreadyRedeemed(format!(
                "User {user_id} already redeemed code {code}"
            )));
        }

        // 校验全部通过, 原子提交三项变更
        if let Some(promo) = state.promo_codes.get_mut(&code) {
            promo.uses_count += 1;
        }
        state.redemptions.insert(
            (code.clone(), user_id),
            CodeRedemption {
                code: code.clone(),
                user_id,
                redeemed_at: now,
            },
        );
        let user = state.ensure_user_state(user_id, now);
        user.available_bonus_spins += BONUS_SPINS_PER_REDEMPTION;
        user.touch(now);
        let available = user.available_bonus_spins;

        log::info!("Redeemed promo code: code={code} user_id={user_id}");
        Ok(RedeemCodeResponse {
            code,
            bonus_spins_granted: BONUS_SPINS_PER_REDEMPTION,
            available_bonus_spins: available,
        })
    }

    /// 全部兑换码 (管理端, 按创建时间倒序)
    pub async fn list_codes(&self) -> AppResult<Vec<PromoCodeResponse>> {
        let state = self.store.read().await;
        let mut codes: Vec<PromoCode> = state.promo_codes.values().cloned().collect();
        codes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.code.cmp(&b.code)));
        Ok(codes.into_iter().map(Into::into).collect())
    }
}
