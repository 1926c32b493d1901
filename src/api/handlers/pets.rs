//! Pet handlers: adoption, care actions, renaming, moving, breeding.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    ActionResponse, AdoptPetRequest, BreedRequest, FeedRequest, GiveItemRequest, PetListResponse,
    PetResponse, PetTypeDto, PetTypeListResponse, PositionDto, RenamePetRequest, UseItemRequest,
};
use crate::api::extract::{ApiJson, ApiPath};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::{PetId, UserId};
use crate::domain::pet::PetAction;
use crate::error::{ErrorResponse, GameError};

/// `GET /api/pets/my-pets` — The caller's pets.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/pets/my-pets",
    tag = "Pets",
    summary = "List my pets",
    description = "Returns every pet of the caller with stat decay applied up to now.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's pets", body = PetListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn my_pets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let pets = state.pets.list(user_id).await?;
    Ok((StatusCode::OK, Json(PetListResponse::from(pets.as_slice()))))
}

/// `GET /api/pets/types` — Adoptable pet types.
#[utoipa::path(
    get,
    path = "/api/pets/types",
    tag = "Pets",
    summary = "List pet types",
    responses(
        (status = 200, description = "Pet type catalog", body = PetTypeListResponse),
    )
)]
pub async fn pet_types(State(state): State<AppState>) -> impl IntoResponse {
    let response = PetTypeListResponse {
        pet_types: state.pets.types().iter().map(PetTypeDto::from).collect(),
    };
    (StatusCode::OK, Json(response))
}

/// `GET /api/pets/{id}` — One of the caller's pets.
///
/// # Errors
///
/// Returns [`GameError::NotFound`] if the pet is not the caller's.
#[utoipa::path(
    get,
    path = "/api/pets/{id}",
    tag = "Pets",
    summary = "Get a pet",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "The pet", body = PetResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
    )
)]
pub async fn get_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    let pet = state.pets.get(user_id, PetId::from(id)).await?;
    Ok((StatusCode::OK, Json(PetResponse::from(&pet))))
}

/// `POST /api/pets` — Adopt a pet for its type price.
///
/// # Errors
///
/// Returns [`GameError`] on an invalid name, unknown type, or too few coins.
#[utoipa::path(
    post,
    path = "/api/pets",
    tag = "Pets",
    summary = "Adopt a pet",
    security(("bearer" = [])),
    request_body = AdoptPetRequest,
    responses(
        (status = 201, description = "Pet adopted", body = PetResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Unknown pet type", body = ErrorResponse),
        (status = 422, description = "Insufficient coins", body = ErrorResponse),
    )
)]
pub async fn adopt_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<AdoptPetRequest>,
) -> Result<impl IntoResponse, GameError> {
    let pet = state.pets.adopt(user_id, &req.name, &req.pet_type_id).await?;
    Ok((StatusCode::CREATED, Json(PetResponse::from(&pet))))
}

/// `PATCH /api/pets/{id}/name` — Rename a pet.
///
/// # Errors
///
/// Returns [`GameError`] on an invalid name or an unknown pet.
#[utoipa::path(
    patch,
    path = "/api/pets/{id}/name",
    tag = "Pets",
    summary = "Rename a pet",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = RenamePetRequest,
    responses(
        (status = 200, description = "Renamed", body = PetResponse),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
    )
)]
pub async fn rename_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<RenamePetRequest>,
) -> Result<impl IntoResponse, GameError> {
    let pet = state.pets.rename(user_id, PetId::from(id), &req.name).await?;
    Ok((StatusCode::OK, Json(PetResponse::from(&pet))))
}

/// `PATCH /api/pets/{id}/position` — Move a pet in the play area.
///
/// # Errors
///
/// Returns [`GameError`] on out-of-range coordinates or an unknown pet.
#[utoipa::path(
    patch,
    path = "/api/pets/{id}/position",
    tag = "Pets",
    summary = "Move a pet",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = PositionDto,
    responses(
        (status = 200, description = "Moved", body = PetResponse),
        (status = 400, description = "Coordinates outside [0, 100]", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
    )
)]
pub async fn move_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<PositionDto>,
) -> Result<impl IntoResponse, GameError> {
    let pet = state
        .pets
        .set_position(user_id, PetId::from(id), req.x, req.y)
        .await?;
    Ok((StatusCode::OK, Json(PetResponse::from(&pet))))
}

/// `POST /api/pets/{id}/feed` — Feed a pet, optionally with a food item.
///
/// # Errors
///
/// Returns [`GameError`] for unknown pets, items not held, or non-food items.
#[utoipa::path(
    post,
    path = "/api/pets/{id}/feed",
    tag = "Pets",
    summary = "Feed a pet",
    description = "Without a body: hunger +30, happiness +10. With `foodItemId`: consumes one unit of that food from the pet's inventory and applies its effects.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body(content = FeedRequest, description = "Optional food item"),
    responses(
        (status = 200, description = "Fed", body = ActionResponse),
        (status = 400, description = "Item is not food", body = ErrorResponse),
        (status = 404, description = "Pet or item not found", body = ErrorResponse),
    )
)]
pub async fn feed_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    body: Option<ApiJson<FeedRequest>>,
) -> Result<impl IntoResponse, GameError> {
    let req = body.map(|ApiJson(req)| req).unwrap_or_default();
    let outcome = state
        .pets
        .feed(user_id, PetId::from(id), req.food_item_id.as_deref())
        .await?;
    Ok((
        StatusCode::OK,
        Json(ActionResponse::new(&outcome.pet, outcome.level_up)),
    ))
}

/// `POST /api/pets/{id}/play` — Play with a pet.
///
/// # Errors
///
/// Returns [`GameError::InsufficientResource`] if energy is below 20.
#[utoipa::path(
    post,
    path = "/api/pets/{id}/play",
    tag = "Pets",
    summary = "Play with a pet",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Played", body = ActionResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
        (status = 422, description = "Pet is too tired", body = ErrorResponse),
    )
)]
pub async fn play_with_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    interact(&state, user_id, id, PetAction::Play).await
}

/// `POST /api/pets/{id}/sleep` — Put a pet to sleep.
///
/// # Errors
///
/// Returns [`GameError::NotFound`] if the pet is not the caller's.
#[utoipa::path(
    post,
    path = "/api/pets/{id}/sleep",
    tag = "Pets",
    summary = "Put a pet to sleep",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Rested", body = ActionResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
    )
)]
pub async fn sleep_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    interact(&state, user_id, id, PetAction::Sleep).await
}

/// `POST /api/pets/{id}/pet` — Pat a pet.
///
/// # Errors
///
/// Returns [`GameError::NotFound`] if the pet is not the caller's.
#[utoipa::path(
    post,
    path = "/api/pets/{id}/pet",
    tag = "Pets",
    summary = "Pat a pet",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Patted", body = ActionResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
    )
)]
pub async fn pat_pet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    interact(&state, user_id, id, PetAction::Pat).await
}

async fn interact(
    state: &AppState,
    user_id: UserId,
    pet_id: Uuid,
    action: PetAction,
) -> Result<(StatusCode, Json<ActionResponse>), GameError> {
    let outcome = state
        .pets
        .interact(user_id, PetId::from(pet_id), action)
        .await?;
    Ok((
        StatusCode::OK,
        Json(ActionResponse::new(&outcome.pet, outcome.level_up)),
    ))
}

/// `POST /api/pets/{id}/use-item` — Use a toy, medicine or training item.
///
/// # Errors
///
/// Returns [`GameError`] for unknown pets, items not held, or food/accessories.
#[utoipa::path(
    post,
    path = "/api/pets/{id}/use-item",
    tag = "Pets",
    summary = "Use an item on a pet",
    description = "Toys stay in the inventory; medicine and training items are consumed.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = UseItemRequest,
    responses(
        (status = 200, description = "Item used", body = ActionResponse),
        (status = 400, description = "Item cannot be used this way", body = ErrorResponse),
        (status = 404, description = "Pet or item not found", body = ErrorResponse),
    )
)]
pub async fn use_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UseItemRequest>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state
        .pets
        .use_item(user_id, PetId::from(id), &req.item_id)
        .await?;
    Ok((
        StatusCode::OK,
        Json(ActionResponse::new(&outcome.pet, outcome.level_up)),
    ))
}

/// `POST /api/pets/{id}/give-item` — Hand items from the caller's inventory to a pet.
///
/// # Errors
///
/// Returns [`GameError`] for unknown pets, items not held, or a bad quantity.
#[utoipa::path(
    post,
    path = "/api/pets/{id}/give-item",
    tag = "Pets",
    summary = "Give an item to a pet",
    description = "Moves items bought without a target pet into that pet's inventory.",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Pet id")),
    request_body = GiveItemRequest,
    responses(
        (status = 200, description = "Items moved", body = PetResponse),
        (status = 400, description = "Quantity outside 1..=99", body = ErrorResponse),
        (status = 404, description = "Pet or item not found", body = ErrorResponse),
        (status = 422, description = "Too few units held", body = ErrorResponse),
    )
)]
pub async fn give_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<GiveItemRequest>,
) -> Result<impl IntoResponse, GameError> {
    let pet = state
        .shop
        .give_item(user_id, PetId::from(id), &req.item_id, req.quantity)
        .await?;
    Ok((StatusCode::OK, Json(PetResponse::from(&pet))))
}

/// `POST /api/pets/breed` — Breed two of the caller's pets.
///
/// # Errors
///
/// Returns [`GameError`] if either pet is unknown, the same, or not ready.
#[utoipa::path(
    post,
    path = "/api/pets/breed",
    tag = "Pets",
    summary = "Breed two pets",
    description = "Both parents need health ≥ 50, energy ≥ 20 and no running cooldown. Each parent loses 30 health and 20 happiness; the offspring inherits rarity, color, pattern and traits.",
    security(("bearer" = [])),
    request_body = BreedRequest,
    responses(
        (status = 201, description = "Offspring born", body = PetResponse),
        (status = 400, description = "Same pet twice", body = ErrorResponse),
        (status = 404, description = "Pet not found", body = ErrorResponse),
        (status = 422, description = "A parent is not ready to breed", body = ErrorResponse),
    )
)]
pub async fn breed_pets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(req): ApiJson<BreedRequest>,
) -> Result<impl IntoResponse, GameError> {
    let child = state
        .pets
        .breed(user_id, PetId::from(req.pet1_id), PetId::from(req.pet2_id))
        .await?;
    Ok((StatusCode::CREATED, Json(PetResponse::from(&child))))
}

/// `GET /api/pets/breed/available` — Pets ready to breed now.
///
/// # Errors
///
/// Returns [`GameError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/pets/breed/available",
    tag = "Pets",
    summary = "List pets ready to breed",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Eligible pets", body = PetListResponse),
    )
)]
pub async fn breeding_available(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, GameError> {
    let pets = state.pets.breeding_available(user_id).await?;
    Ok((StatusCode::OK, Json(PetListResponse::from(pets.as_slice()))))
}

/// Pet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pets", post(adopt_pet))
        .route("/pets/my-pets", get(my_pets))
        .route("/pets/types", get(pet_types))
        .route("/pets/breed", post(breed_pets))
        .route("/pets/breed/available", get(breeding_available))
        .route("/pets/{id}", get(get_pet))
        .route("/pets/{id}/name", patch(rename_pet))
        .route("/pets/{id}/position", patch(move_pet))
        .route("/pets/{id}/feed", post(feed_pet))
        .route("/pets/{id}/play", post(play_with_pet))
        .route("/pets/{id}/sleep", post(sleep_pet))
        .route("/pets/{id}/pet", post(pat_pet))
        .route("/pets/{id}/use-item", post(use_item))
        .route("/pets/{id}/give-item", post(give_item))
}
