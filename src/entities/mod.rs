pub mod promo_codes;
pub mod prizes;
pub mod spin_records;
pub mod user_spin_states;
pub mod validation_decisions;

pub use prizes::{
    PROBABILITY_EPSILON_BP, PROBABILITY_SCALE_BP, Prize, PrizeBehavior, PrizeType, bp_to_percent,
    percent_to_bp,
};
pub use promo_codes::{CodeRedemption, PromoCode};
pub use spin_records::{PrizeSnapshot, SpinRecord, SpinStatus, SpinType};
pub use user_spin_states::UserSpinState;
pub use validation_decisions::{ValidationAction, ValidationDecision};
