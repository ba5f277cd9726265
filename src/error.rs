use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// 业务错误分类:
/// - 入参 / 配置问题 -> ValidationError / InvariantViolation
/// - 资格类 -> AlreadySpun / NotEligible
/// - 冲突类 -> AlreadyDecided / AlreadyRedeemed / ExhaustedUses / Expired
/// - 外部账本失败 -> CreditFailure (可重试, 状态不会部分提交)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Already spun: {0}")]
    AlreadySpun(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already decided: {0}")]
    AlreadyDecided(String),

    #[error("Already redeemed: {0}")]
    AlreadyRedeemed(String),

    #[error("Exhausted uses: {0}")]
    ExhaustedUses(String),

    #[error("Expired: {0}")]
    Expired(String),

    #[error("Credit failure: {0}")]
    CreditFailure(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 稳定错误码, 供 HTTP 响应与批量校验结果复用。
    /// 适配层只映射, 不改写。
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            AppError::AlreadySpun(_) => "ALREADY_SPUN",
            AppError::NotEligible(_) => "NOT_ELIGIBLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyDecided(_) => "ALREADY_DECIDED",
            AppError::AlreadyRedeemed(_) => "ALREADY_REDEEMED",
            AppError::ExhaustedUses(_) => "EXHAUSTED_USES",
            AppError::Expired(_) => "EXPIRED",
            AppError::CreditFailure(_) => "CREDIT_FAILURE",
            AppError::SerdeJsonError(_) => "INTERNAL_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;

        let (status_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::InvariantViolation(msg) => {
                log::warn!("Invariant violation: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            AppError::AlreadySpun(msg)
            | AppError::NotEligible(msg)
            | AppError::AlreadyDecided(msg)
            | AppError::AlreadyRedeemed(msg)
            | AppError::ExhaustedUses(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Expired(msg) => (StatusCode::GONE, msg.clone()),
            AppError::CreditFailure(msg) => {
                log::error!("Credit failure: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": self.kind(),
                "message": message
            }
        }))
    }
}
