use crate::error::Result;
use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AccountService;
use crate::AppState;
use actix_web::{web, HttpResponse};

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let user = AccountService::new(state.db.clone()).register(&req).await?;
    Ok(HttpResponse::Created().json(user))
}

/// POST /auth/token
pub async fn token(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let token = AccountService::new(state.db.clone())
        .login(&req, state.token_ttl_secs)
        .await?;
    Ok(HttpResponse::Ok().json(token))
}
