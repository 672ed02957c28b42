use axum::{
    Router,
    routing::{get, patch, post},
};

pub mod auth;
pub mod species;
pub mod system;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new().route("/api/auth/login", post(auth::login))
}

/// Endpoints behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/me", get(auth::me))
        .route("/api/species", get(species::list_species).post(species::create_species))
        .route(
            "/api/species/:id",
            get(species::get_species)
                .put(species::update_species)
                .delete(species::delete_species),
        )
        .route("/api/species/:id/quantity", patch(species::update_quantity))
}
