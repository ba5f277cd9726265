use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{PrizeBehavior, PrizeType, SpinStatus, SpinType, ValidationAction};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::spin::get_wheel_prizes,
        handlers::spin::get_user_state,
        handlers::spin::get_user_records,
        handlers::spin::spin_demo,
        handlers::spin::spin_real,
        handlers::spin::spin_bonus,
        handlers::promo_code::redeem_code,
        handlers::promo_code::create_code,
        handlers::promo_code::list_codes,
        handlers::prize::list_prizes,
        handlers::prize::create_prize,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::prize::set_prize_active,
        handlers::prize::adjust_probabilities,
        handlers::validation::get_pending_validations,
        handlers::validation::validate_user,
        handlers::validation::validate_batch,
    ),
    components(
        schemas(
            PrizeType,
            PrizeBehavior,
            SpinType,
            SpinStatus,
            ValidationAction,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            SetActiveRequest,
            ProbabilityUpdate,
            AdjustProbabilitiesRequest,
            PrizeResponse,
            SpinRecordQuery,
            WonPrizeResponse,
            SpinRecordResponse,
            UserSpinStateResponse,
            SpinResponse,
            CreatePromoCodeRequest,
            RedeemCodeRequest,
            RedeemCodeResponse,
            PromoCodeResponse,
            ValidateRequest,
            ValidateBatchRequest,
            PendingValidationResponse,
            ValidationOutcomeResponse,
            BatchValidationOutcome,
            ValidateBatchResponse,
            PaginationParams,
            PaginatedSpinRecords,
            PaginatedPendingValidations,
            PaginatedPromoCodes,
            ApiError,
        )
    ),
    tags(
        (name = "roulette", description = "Roulette wheel and spin API"),
        (name = "promo_codes", description = "Promo code redemption API"),
        (name = "admin_prizes", description = "Prize catalog admin API"),
        (name = "admin_validations", description = "Demo win validation admin API"),
        (name = "admin_promo_codes", description = "Promo code admin API"),
    ),
    info(
        title = "Ruleta Backend API",
        version = "1.0.0",
        description = "Reward roulette REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
