use crate::models::*;
use crate::services::{PrizeCatalogService, ProbabilityAdjuster};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/prizes",
    tag = "admin_prizes",
    responses(
        (status = 200, description = "获取全部奖品成功", body = [PrizeResponse])
    )
)]
/// 获取全部奖品 (含停用, 按 position 排序)
pub async fn list_prizes(service: web::Data<PrizeCatalogService>) -> Result<HttpResponse> {
    match service.list_all().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/prizes",
    tag = "admin_prizes",
    request_body = CreatePrizeRequest,
    responses(
        (status = 200, description = "创建奖品成功", body = PrizeResponse),
        (status = 400, description = "参数不合法"),
        (status = 422, description = "启用奖品概率总和超出 100%")
    )
)]
/// 新建奖品; 启用集合的概率总和不得超过 100%
pub async fn create_prize(
    service: web::Data<PrizeCatalogService>,
    body: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.create_prize(body.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/prizes/{id}",
    tag = "admin_prizes",
    params(("id" = i64, Path, description = "奖品ID")),
    request_body = UpdatePrizeRequest,
    responses(
        (status = 200, description = "更新奖品成功", body = PrizeResponse),
        (status = 404, description = "奖品不存在"),
        (status = 422, description = "概率总和不变量被破坏")
    )
)]
/// 编辑奖品 (仅更新给出的字段)
pub async fn update_prize(
    service: web::Data<PrizeCatalogService>,
    path: web::Path<i64>,
    body: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    match service
        .update_prize(path.into_inner(), body.into_inner())
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/prizes/{id}",
    tag = "admin_prizes",
    params(("id" = i64, Path, description = "奖品ID")),
    responses(
        (status = 200, description = "删除奖品成功"),
        (status = 404, description = "奖品不存在"),
        (status = 422, description = "删除会破坏概率总和不变量")
    )
)]
/// 删除奖品
pub async fn delete_prize(
    service: web::Data<PrizeCatalogService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete_prize(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/prizes/{id}/active",
    tag = "admin_prizes",
    params(("id" = i64, Path, description = "奖品ID")),
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "启用/停用成功", body = PrizeResponse),
        (status = 404, description = "奖品不存在"),
        (status = 422, description = "变更会破坏概率总和不变量")
    )
)]
/// 启用 / 停用奖品
pub async fn set_prize_active(
    service: web::Data<PrizeCatalogService>,
    path: web::Path<i64>,
    body: web::Json<SetActiveRequest>,
) -> Result<HttpResponse> {
    match service.set_active(path.into_inner(), body.is_active).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/prizes/probabilities",
    tag = "admin_prizes",
    request_body = AdjustProbabilitiesRequest,
    responses(
        (status = 200, description = "批量调整概率成功", body = [PrizeResponse]),
        (status = 400, description = "参数不合法"),
        (status = 404, description = "存在未知奖品ID"),
        (status = 422, description = "调整后的概率总和不是 100%")
    )
)]
/// 批量调整概率: 全部通过校验才提交, 否则整体拒绝
pub async fn adjust_probabilities(
    adjuster: web::Data<ProbabilityAdjuster>,
    body: web::Json<AdjustProbabilitiesRequest>,
) -> Result<HttpResponse> {
    match adjuster.adjust_probabilities(&body.updates).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/prizes")
            .route("", web::get().to(list_prizes))
            .route("", web::post().to(create_prize))
            // 先注册字面量路径, 避免被 {id} 吞掉
            .route("/probabilities", web::put().to(adjust_probabilities))
            .route("/{id}", web::put().to(update_prize))
            .route("/{id}", web::delete().to(delete_prize))
            .route("/{id}/active", web::put().to(set_prize_active)),
    );
}
