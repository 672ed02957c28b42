//! Postgres-backed species store.
//!
//! `type` and `status` are stored as their upper-case wire strings and
//! guarded by CHECK constraints; `habitat_requirements` and `certifications`
//! are JSONB documents passed through untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use rainforest_core::SpeciesId;
use rainforest_inventory::{JsonMap, NewSpecies, Species, SpeciesFilter, SpeciesPatch};

use super::SpeciesStore;
use crate::error::{StoreError, StoreResult, map_sqlx_error};

const COLUMNS: &str = "id, name, type, scientific_name, quantity, status, minimum_threshold, \
                       habitat_requirements, certifications, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresSpeciesStore {
    pool: PgPool,
}

impl PostgresSpeciesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpeciesStore for PostgresSpeciesStore {
    #[instrument(skip(self, new), fields(name = %new.name))]
    async fn create(&self, new: NewSpecies) -> StoreResult<Species> {
        let id = SpeciesId::new();
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO species (
                id, name, type, scientific_name, quantity, status, minimum_threshold,
                habitat_requirements, certifications, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(*id.as_uuid())
        .bind(&new.name)
        .bind(new.kind.as_str())
        .bind(&new.scientific_name)
        .bind(new.quantity)
        .bind(new.status.as_str())
        .bind(new.minimum_threshold)
        .bind(Json(&new.habitat_requirements))
        .bind(Json(&new.certifications))
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_species", e))?;

        species_from_row(&row)
    }

    #[instrument(skip(self), fields(species_id = %id))]
    async fn get(&self, id: SpeciesId) -> StoreResult<Option<Species>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM species WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_species", e))?;

        row.as_ref().map(species_from_row).transpose()
    }

    #[instrument(skip(self), fields(row_count))]
    async fn list(&self, filter: &SpeciesFilter) -> StoreResult<Vec<Species>> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS}
            FROM species
            WHERE ($1::text IS NULL OR type = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL
                   OR name ILIKE $3 ESCAPE '\'
                   OR scientific_name ILIKE $3 ESCAPE '\')
            ORDER BY created_at, id
            "#
        ))
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_species", e))?;

        Span::current().record("row_count", rows.len());
        rows.iter().map(species_from_row).collect()
    }

    #[instrument(skip(self, patch), fields(species_id = %id))]
    async fn update(&self, id: SpeciesId, patch: &SpeciesPatch) -> StoreResult<Option<Species>> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let row = sqlx::query(&format!(
            r#"
            UPDATE species SET
                name = COALESCE($2, name),
                type = COALESCE($3, type),
                scientific_name = COALESCE($4, scientific_name),
                quantity = COALESCE($5, quantity),
                status = COALESCE($6, status),
                minimum_threshold = COALESCE($7, minimum_threshold),
                habitat_requirements = COALESCE($8, habitat_requirements),
                certifications = COALESCE($9, certifications),
                updated_at = $10
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(*id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.scientific_name.as_deref())
        .bind(patch.quantity)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.minimum_threshold)
        .bind(patch.habitat_requirements.as_ref().map(Json))
        .bind(patch.certifications.as_ref().map(Json))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_species", e))?;

        row.as_ref().map(species_from_row).transpose()
    }

    #[instrument(skip(self), fields(species_id = %id))]
    async fn delete(&self, id: SpeciesId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM species WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_species", e))?;

        Ok(result.rows_affected() > 0)
    }
}

/// `%term%` with LIKE metacharacters escaped, so a search for `50%` matches
/// the literal text.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn species_from_row(row: &PgRow) -> StoreResult<Species> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| map_sqlx_error("decode_species", e))?;
    let get_str = |col: &str| -> StoreResult<String> {
        row.try_get::<String, _>(col).map_err(|e| map_sqlx_error("decode_species", e))
    };
    let get_i64 = |col: &str| -> StoreResult<i64> {
        row.try_get::<i64, _>(col).map_err(|e| map_sqlx_error("decode_species", e))
    };
    let get_ts = |col: &str| -> StoreResult<DateTime<Utc>> {
        row.try_get::<DateTime<Utc>, _>(col).map_err(|e| map_sqlx_error("decode_species", e))
    };

    let habitat: Json<JsonMap> = row
        .try_get("habitat_requirements")
        .map_err(|e| map_sqlx_error("decode_species", e))?;
    let certifications: Json<Vec<serde_json::Value>> = row
        .try_get("certifications")
        .map_err(|e| map_sqlx_error("decode_species", e))?;

    Ok(Species {
        id: SpeciesId::from_uuid(id),
        name: get_str("name")?,
        kind: get_str("type")?.parse().map_err(corrupt)?,
        scientific_name: get_str("scientific_name")?,
        quantity: get_i64("quantity")?,
        status: get_str("status")?.parse().map_err(corrupt)?,
        minimum_threshold: get_i64("minimum_threshold")?,
        habitat_requirements: habitat.0,
        certifications: certifications.0,
        created_at: get_ts("created_at")?,
        updated_at: get_ts("updated_at")?,
    })
}

fn corrupt(err: rainforest_core::DomainError) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("fic"), "%fic%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
