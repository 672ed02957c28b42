use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use rainforest_core::SpeciesId;
use rainforest_inventory::{NewSpecies, SpeciesFilter, SpeciesInput, SpeciesPatch, apply_quantity_change};

use crate::app::dto::{MessageResponse, QuantityRequest, SpeciesQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::{Operation, authorize_operation};
use crate::context::CurrentPrincipal;

/// Unparseable ids cannot name an existing record, so they read as absent.
fn species_id(raw: &str) -> Result<SpeciesId, ApiError> {
    raw.parse().map_err(|_| ApiError::species_not_found())
}

pub async fn create_species(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    body: Result<Json<SpeciesInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::CreateSpecies)?;

    let Json(input) = body?;
    let new = NewSpecies::try_from(input)?;
    let species = services.species.create(new).await?;

    info!(species_id = %species.id, actor = %principal.user_id, name = %species.name, "species created");
    Ok((StatusCode::CREATED, Json(species)))
}

pub async fn list_species(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    query: Result<Query<SpeciesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::ListSpecies)?;

    let Query(query) = query?;

    let filter = SpeciesFilter::from_query(
        query.search.as_deref(),
        query.kind.as_deref(),
        query.status.as_deref(),
    )?;

    Ok(Json(services.species.list(&filter).await?))
}

pub async fn get_species(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::GetSpecies)?;

    let id = species_id(&id)?;
    let species = services.species.get(id).await?.ok_or_else(ApiError::species_not_found)?;

    Ok(Json(species))
}

pub async fn update_species(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<String>,
    body: Result<Json<SpeciesInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::UpdateSpecies)?;

    let Json(input) = body?;
    let patch = SpeciesPatch::try_from(input)?;
    let id = species_id(&id)?;

    let species = services
        .species
        .update(id, &patch)
        .await?
        .ok_or_else(ApiError::species_not_found)?;

    info!(species_id = %species.id, actor = %principal.user_id, "species updated");
    Ok(Json(species))
}

/// Set the stock level; status follows the count and a low-stock signal is
/// raised when the new count is at or below the threshold.
pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<String>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::UpdateQuantity)?;

    let Json(request) = body?;
    let id = species_id(&id)?;

    let current = services.species.get(id).await?.ok_or_else(ApiError::species_not_found)?;
    let change = apply_quantity_change(&current, request.quantity.as_ref())?;

    let updated = services
        .species
        .update(id, &change.to_patch())
        .await?
        .ok_or_else(ApiError::species_not_found)?;

    info!(
        species_id = %updated.id,
        actor = %principal.user_id,
        quantity = updated.quantity,
        status = %updated.status,
        "species quantity updated"
    );

    if let Some(signal) = change.low_stock_signal(&updated, Utc::now()) {
        services.notifier.notify(&signal);
    }

    Ok(Json(updated))
}

pub async fn delete_species(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::DeleteSpecies)?;

    let id = species_id(&id)?;
    if !services.species.delete(id).await? {
        return Err(ApiError::species_not_found());
    }

    info!(species_id = %id, actor = %principal.user_id, "species deleted");
    Ok(Json(MessageResponse {
        message: "Species deleted successfully",
    }))
}
