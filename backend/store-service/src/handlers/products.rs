use crate::error::Result;
use crate::filters::ProductFilter;
use crate::middleware::{require_staff, Principal};
use crate::models::ProductPayload;
use crate::services::ProductService;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_products(
    state: web::Data<AppState>,
    filter: web::Query<ProductFilter>,
) -> Result<HttpResponse> {
    let products = ProductService::new(state.db.clone()).list(&filter).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn get_product(
    state: web::Data<AppState>,
    product_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let product = ProductService::new(state.db.clone())
        .get(product_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_product(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    payload: web::Json<ProductPayload>,
) -> Result<HttpResponse> {
    require_staff(principal.as_ref())?;
    let product = ProductService::new(state.db.clone()).create(&payload).await?;
    Ok(HttpResponse::Created().json(product))
}

pub async fn update_product(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    product_id: web::Path<i64>,
    payload: web::Json<ProductPayload>,
) -> Result<HttpResponse> {
    require_staff(principal.as_ref())?;
    let product = ProductService::new(state.db.clone())
        .update(product_id.into_inner(), &payload)
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn delete_product(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    product_id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_staff(principal.as_ref())?;
    ProductService::new(state.db.clone())
        .delete(product_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
