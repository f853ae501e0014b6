use crate::error::Result;
use crate::middleware::{require_staff, Principal};
use crate::models::CollectionPayload;
use crate::services::CollectionService;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_collections(state: web::Data<AppState>) -> Result<HttpResponse> {
    let collections = CollectionService::new(state.db.clone()).list().await?;
    Ok(HttpResponse::Ok().json(collections))
}

pub async fn get_collection(
    state: web::Data<AppState>,
    collection_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let collection = CollectionService::new(state.db.clone())
        .get(collection_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(collection))
}

pub async fn create_collection(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    payload: web::Json<CollectionPayload>,
) -> Result<HttpResponse> {
    require_staff(principal.as_ref())?;
    let collection = CollectionService::new(state.db.clone())
        .create(&payload)
        .await?;
    Ok(HttpResponse::Created().json(collection))
}

pub async fn update_collection(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    collection_id: web::Path<i64>,
    payload: web::Json<CollectionPayload>,
) -> Result<HttpResponse> {
    require_staff(principal.as_ref())?;
    let collection = CollectionService::new(state.db.clone())
        .update(collection_id.into_inner(), &payload)
        .await?;
    Ok(HttpResponse::Ok().json(collection))
}

pub async fn delete_collection(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    collection_id: web::Path<i64>,
) -> Result<HttpResponse> {
    require_staff(principal.as_ref())?;
    CollectionService::new(state.db.clone())
        .delete(collection_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
