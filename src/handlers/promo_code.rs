use crate::models::*;
use crate::services::PromoCodeService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/promo-codes/redeem",
    tag = "promo_codes",
    request_body = RedeemCodeRequest,
    responses(
        (status = 200, description = "兑换成功", body = RedeemCodeResponse),
        (status = 404, description = "兑换码不存在或已停用"),
        (status = 409, description = "已兑换过或使用次数已用尽"),
        (status = 410, description = "兑换码已过期")
    )
)]
/// 兑换: 大小写不敏感, 成功发放一次奖励抽奖
pub async fn redeem_code(
    service: web::Data<PromoCodeService>,
    body: web::Json<RedeemCodeRequest>,
) -> Result<HttpResponse> {
    match service.redeem_code(&body.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/promo-codes",
    tag = "admin_promo_codes",
    request_body = CreatePromoCodeRequest,
    responses(
        (status = 200, description = "创建兑换码成功", body = PromoCodeResponse),
        (status = 400, description = "参数不合法或兑换码已存在")
    )
)]
/// 创建兑换码 (管理端)
pub async fn create_code(
    service: web::Data<PromoCodeService>,
    body: web::Json<CreatePromoCodeRequest>,
) -> Result<HttpResponse> {
    match service.create_code(&body.into_inner()).await {
        Ok(code) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": code }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/promo-codes",
    tag = "admin_promo_codes",
    responses(
        (status = 200, description = "获取兑换码列表成功", body = [PromoCodeResponse])
    )
)]
/// 全部兑换码 (管理端, 按创建时间倒序)
pub async fn list_codes(service: web::Data<PromoCodeService>) -> Result<HttpResponse> {
    match service.list_codes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn promo_code_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/promo-codes").route("/redeem", web::post().to(redeem_code)));
    cfg.service(
        web::scope("/admin/promo-codes")
            .route("", web::post().to(create_code))
            .route("", web::get().to(list_codes)),
    );
}
