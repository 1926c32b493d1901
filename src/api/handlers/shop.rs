//! Shop handlers: catalog and purchases.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{PurchaseRequest, PurchaseResponse, ShopItemDto, ShopItemListResponse};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::PetId;
use crate::error::{ErrorResponse, GameError};

/// `GET /api/shop/items` — Everything for sale.
#[utoipa::path(
    get,
    path = "/api/shop/items",
    tag = "Shop",
    summary = "List shop items",
    responses(
        (status = 200, description = "Item catalog", body = ShopItemListResponse),
    )
)]
pub async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    let response = ShopItemListResponse {
        items: state.shop.items().iter().map(ShopItemDto::from).collect(),
    };
    (StatusCode::OK, Json(response))
}

/// `POST /api/shop/purchase` — Buy items for a pet or for the caller.
///
/// # Errors
///
/// Returns [`GameError`] on a bad quantity, an unknown item or pet, or
/// too few coins.
#[utoipa::path(
    post,
    path = "/api/shop/purchase",
    tag = "Shop",
    summary = "Purchase items",
    description = "Deducts `price × quantity` and credits the items to the named pet's inventory, or the caller's own inventory without `petId`. Nothing changes if the balance is short.",
    security(("bearer" = [])),
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase completed", body = PurchaseResponse),
        (status = 400, description = "Quantity outside 1..=99", body = ErrorResponse),
        (status = 404, description = "Item or pet not found", body = ErrorResponse),
        (status = 422, description = "Insufficient coins", body = ErrorResponse),
    )
)]
pub async fn purchase(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<PurchaseRequest>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state
        .shop
        .purchase(
            user_id,
            &req.item_id,
            req.pet_id.map(PetId::from),
            req.quantity,
        )
        .await?;
    Ok((StatusCode::OK, Json(PurchaseResponse::from(&outcome))))
}

/// Shop routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shop/items", get(list_items))
        .route("/shop/purchase", post(purchase))
}
