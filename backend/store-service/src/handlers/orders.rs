use crate::error::Result;
use crate::filters::OrderFilter;
use crate::middleware::{require_authenticated, Principal};
use crate::models::{CreateOrderRequest, PatchOrderRequest, ReplaceOrderRequest};
use crate::services::OrderService;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_orders(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    filter: web::Query<OrderFilter>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    let orders = OrderService::new(state.db.clone())
        .list(caller, &filter)
        .await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn get_order(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    order_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    let order = OrderService::new(state.db.clone())
        .get(caller, order_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn create_order(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    req: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    let order = OrderService::new(state.db.clone())
        .create(caller, &req)
        .await?;
    Ok(HttpResponse::Created().json(order))
}

pub async fn replace_order(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    order_id: web::Path<i64>,
    req: web::Json<ReplaceOrderRequest>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    let order = OrderService::new(state.db.clone())
        .replace(caller, order_id.into_inner(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn patch_order(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    order_id: web::Path<i64>,
    req: web::Json<PatchOrderRequest>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    let order = OrderService::new(state.db.clone())
        .patch(caller, order_id.into_inner(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn delete_order(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    order_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    OrderService::new(state.db.clone())
        .delete(caller, order_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
