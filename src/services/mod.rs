pub mod draw_engine;
pub mod prize_catalog_service;
pub mod probability_adjuster;
pub mod promo_code_service;
pub mod spin_service;
pub mod validation_service;

pub use prize_catalog_service::PrizeCatalogService;
pub use probability_adjuster::ProbabilityAdjuster;
pub use promo_code_service::PromoCodeService;
pub use spin_service::SpinService;
pub use validation_service::ValidationService;
