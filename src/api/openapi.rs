//! OpenAPI document assembled from the handler annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{auth, coins, daily_tasks, minigames, pets, shop, system, user};
use crate::error::ErrorResponse;

/// The complete API description served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "petrealm",
        description = "Virtual pet game backend: pets with decaying stats, passive coin income, shop, breeding, minigames and daily tasks."
    ),
    paths(
        system::health_handler,
        auth::register,
        auth::login,
        auth::me,
        pets::my_pets,
        pets::pet_types,
        pets::get_pet,
        pets::adopt_pet,
        pets::rename_pet,
        pets::move_pet,
        pets::feed_pet,
        pets::play_with_pet,
        pets::sleep_pet,
        pets::pat_pet,
        pets::use_item,
        pets::give_item,
        pets::breed_pets,
        pets::breeding_available,
        shop::list_items,
        shop::purchase,
        minigames::list_games,
        minigames::progress,
        minigames::start_game,
        minigames::finish_game,
        coins::balance,
        coins::collect_offline,
        coins::daily_streak,
        daily_tasks::today,
        daily_tasks::update_progress,
        daily_tasks::claim_streak,
        user::profile,
        user::update_profile,
        user::stats,
    ),
    components(schemas(ErrorResponse)),
    modifiers(&BearerAuth),
    tags(
        (name = "System", description = "Service health"),
        (name = "Auth", description = "Registration and login"),
        (name = "Pets", description = "Pet care and breeding"),
        (name = "Shop", description = "Item catalog and purchases"),
        (name = "Minigames", description = "Timed games that pay coins and experience"),
        (name = "Coins", description = "Balance and streak rewards"),
        (name = "Daily Tasks", description = "Per-day goals with coin rewards"),
        (name = "User", description = "Profile and statistics"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::new);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("HMAC")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/pets/{id}/feed"));
        assert!(doc.paths.paths.contains_key("/api/daily-tasks/{id}/progress"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/user/profile"));
        assert!(doc.paths.paths.contains_key("/api/pets/{id}/give-item"));
        let has_bearer = doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer"));
        assert!(has_bearer);
    }
}
