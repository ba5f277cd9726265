pub mod prize;
pub mod promo_code;
pub mod spin;
pub mod validation;

pub use prize::prize_config;
pub use promo_code::promo_code_config;
pub use spin::roulette_config;
pub use validation::validation_config;
