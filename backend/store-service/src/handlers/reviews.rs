use crate::error::Result;
use crate::filters::ReviewFilter;
use crate::middleware::{require_authenticated, Principal};
use crate::models::{CreateReviewRequest, UpdateReviewRequest};
use crate::services::ReviewService;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_reviews(
    state: web::Data<AppState>,
    filter: web::Query<ReviewFilter>,
) -> Result<HttpResponse> {
    let reviews = ReviewService::new(state.db.clone()).list(&filter).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub async fn get_review(
    state: web::Data<AppState>,
    review_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let review = ReviewService::new(state.db.clone())
        .get(review_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn create_review(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    req: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse> {
    let author = require_authenticated(principal.as_ref())?;
    let review = ReviewService::new(state.db.clone())
        .create(author, &req)
        .await?;
    Ok(HttpResponse::Created().json(review))
}

pub async fn update_review(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    review_id: web::Path<i64>,
    req: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    let review = ReviewService::new(state.db.clone())
        .update(caller, review_id.into_inner(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

pub async fn delete_review(
    state: web::Data<AppState>,
    principal: Option<Principal>,
    review_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller = require_authenticated(principal.as_ref())?;
    ReviewService::new(state.db.clone())
        .delete(caller, review_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
