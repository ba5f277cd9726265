use crate::models::*;
use crate::services::ValidationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/validations/pending",
    tag = "admin_validations",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "获取待审核队列成功", body = PaginatedPendingValidations)
    )
)]
/// 待审核的体验中奖队列 (FIFO)
pub async fn get_pending_validations(
    service: web::Data<ValidationService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match service.pending_queue(&query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/validations/batch",
    tag = "admin_validations",
    request_body = ValidateBatchRequest,
    responses(
        (status = 200, description = "批量审核完成 (可能部分失败)", body = ValidateBatchResponse),
        (status = 400, description = "参数不合法")
    )
)]
/// 批量审核: 按用户独立执行, 单个失败不中断整批
pub async fn validate_batch(
    service: web::Data<ValidationService>,
    body: web::Json<ValidateBatchRequest>,
) -> Result<HttpResponse> {
    match service.validate_batch(&body.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/validations/{user_id}",
    tag = "admin_validations",
    params(("user_id" = i64, Path, description = "用户ID")),
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "审核完成", body = ValidationOutcomeResponse),
        (status = 404, description = "用户没有体验抽奖记录"),
        (status = 409, description = "该记录已被裁决"),
        (status = 502, description = "入账失败, 记录保持待审核")
    )
)]
/// 审核单个用户的体验中奖; 通过且为现金奖品时同步入账
pub async fn validate_user(
    service: web::Data<ValidationService>,
    path: web::Path<i64>,
    body: web::Json<ValidateRequest>,
) -> Result<HttpResponse> {
    match service
        .validate_user(path.into_inner(), &body.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn validation_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/validations")
            .route("/pending", web::get().to(get_pending_validations))
            // 先注册字面量路径, 避免被 {user_id} 吞掉
            .route("/batch", web::post().to(validate_batch))
            .route("/{user_id}", web::post().to(validate_user)),
    );
}
