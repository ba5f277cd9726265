pub mod common;
pub mod pagination;
pub mod prize;
pub mod promo_code;
pub mod spin;
pub mod validation;

pub use common::*;
pub use pagination::*;
pub use prize::*;
pub use promo_code::*;
pub use spin::*;
pub use validation::*;
