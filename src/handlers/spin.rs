use crate::models::*;
use crate::services::{PrizeCatalogService, SpinService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/roulette/prizes",
    tag = "roulette",
    responses(
        (status = 200, description = "获取轮盘奖品成功", body = [PrizeResponse])
    )
)]
/// 获取当前启用的轮盘奖品 (按 position 排序)
pub async fn get_wheel_prizes(service: web::Data<PrizeCatalogService>) -> Result<HttpResponse> {
    match service.list_active().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/roulette/users/{user_id}/state",
    tag = "roulette",
    params(("user_id" = i64, Path, description = "用户ID")),
    responses(
        (status = 200, description = "获取资格状态成功", body = UserSpinStateResponse)
    )
)]
/// 获取用户抽奖资格状态 (首次访问自动初始化)
pub async fn get_user_state(
    service: web::Data<SpinService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_user_state(path.into_inner()).await {
        Ok(state) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": state }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/roulette/users/{user_id}/records",
    tag = "roulette",
    params(
        ("user_id" = i64, Path, description = "用户ID"),
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "获取抽奖记录成功", body = PaginatedSpinRecords)
    )
)]
/// 分页获取用户抽奖记录 (倒序)
pub async fn get_user_records(
    service: web::Data<SpinService>,
    path: web::Path<i64>,
    query: web::Query<SpinRecordQuery>,
) -> Result<HttpResponse> {
    match service
        .list_records(path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/roulette/users/{user_id}/spin/demo",
    tag = "roulette",
    params(("user_id" = i64, Path, description = "用户ID")),
    responses(
        (status = 200, description = "体验抽奖成功", body = SpinResponse),
        (status = 409, description = "体验抽奖已使用")
    )
)]
/// 体验抽奖: 每用户一次, 结果进入审核队列
pub async fn spin_demo(
    service: web::Data<SpinService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.consume_demo_spin(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/roulette/users/{user_id}/spin/real",
    tag = "roulette",
    params(("user_id" = i64, Path, description = "用户ID")),
    responses(
        (status = 200, description = "真实抽奖成功", body = SpinResponse),
        (status = 409, description = "真实抽奖已使用或尚无资格")
    )
)]
/// 真实抽奖: 审核通过后回放体验抽奖的奖品
pub async fn spin_real(
    service: web::Data<SpinService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.consume_real_spin(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/roulette/users/{user_id}/spin/bonus",
    tag = "roulette",
    params(("user_id" = i64, Path, description = "用户ID")),
    responses(
        (status = 200, description = "奖励抽奖成功", body = SpinResponse),
        (status = 409, description = "没有可用的奖励抽奖次数")
    )
)]
/// 奖励抽奖: 消费一次兑换码发放的次数, 现金奖品即时入账
pub async fn spin_bonus(
    service: web::Data<SpinService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.consume_bonus_spin(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn roulette_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roulette")
            .route("/prizes", web::get().to(get_wheel_prizes))
            .route("/users/{user_id}/state", web::get().to(get_user_state))
            .route("/users/{user_id}/records", web::get().to(get_user_records))
            .route("/users/{user_id}/spin/demo", web::post().to(spin_demo))
            .route("/users/{user_id}/spin/real", web::post().to(spin_real))
            .route("/users/{user_id}/spin/bonus", web::post().to(spin_bonus)),
    );
}
