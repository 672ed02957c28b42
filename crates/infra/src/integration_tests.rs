//! Store contract tests.
//!
//! Every scenario runs against the in-memory store; when `DATABASE_URL` is
//! set the same scenarios also run against Postgres.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use rainforest_core::SpeciesId;
    use rainforest_inventory::{NewSpecies, SpeciesFilter, SpeciesKind, SpeciesPatch, SpeciesStatus};

    use crate::species_store::{InMemorySpeciesStore, PostgresSpeciesStore, SpeciesStore};

    async fn postgres_store() -> Option<PostgresSpeciesStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = crate::db::connect(&url, 2).await.ok()?;
        crate::db::ensure_schema(&pool).await.ok()?;
        Some(PostgresSpeciesStore::new(pool))
    }

    fn ficus(tag: &str) -> NewSpecies {
        NewSpecies::new(format!("Ficus {tag}"), SpeciesKind::Plant, format!("Ficus lyrata {tag}"))
    }

    fn gecko(tag: &str) -> NewSpecies {
        NewSpecies::new(format!("Gecko {tag}"), SpeciesKind::Animal, format!("Uroplatus {tag}"))
    }

    /// A per-run tag keeps rows from separate runs apart in a shared database.
    fn run_tag() -> String {
        SpeciesId::new().to_string().replace('-', "")
    }

    async fn create_assigns_unique_ids(store: &dyn SpeciesStore) {
        let tag = run_tag();
        let mut seen = HashSet::new();
        for _ in 0..5 {
            let created = store.create(ficus(&tag)).await.unwrap();
            assert!(seen.insert(created.id), "id {} reused", created.id);
            assert_eq!(created.quantity, 0);
            assert_eq!(created.status, SpeciesStatus::Available);
            assert_eq!(created.minimum_threshold, 5);
        }
    }

    async fn list_filters_by_type_and_search(store: &dyn SpeciesStore) {
        let tag = run_tag();
        let plant = store.create(ficus(&tag)).await.unwrap();
        let animal = store.create(gecko(&tag)).await.unwrap();

        let scoped = SpeciesFilter::default().with_search(tag.clone());
        let all = store.list(&scoped).await.unwrap();
        assert_eq!(all.len(), 2);

        let plants = store.list(&scoped.clone().with_kind(SpeciesKind::Plant)).await.unwrap();
        assert_eq!(plants.iter().map(|s| s.id).collect::<Vec<_>>(), vec![plant.id]);

        let by_name = store
            .list(&SpeciesFilter::default().with_search(format!("FICUS {tag}")))
            .await
            .unwrap();
        assert_eq!(by_name.iter().map(|s| s.id).collect::<Vec<_>>(), vec![plant.id]);

        let by_scientific = store
            .list(&SpeciesFilter::default().with_search(format!("uroplatus {tag}")))
            .await
            .unwrap();
        assert_eq!(by_scientific.iter().map(|s| s.id).collect::<Vec<_>>(), vec![animal.id]);

        let reserved = store
            .list(&scoped.with_status(SpeciesStatus::Reserved))
            .await
            .unwrap();
        assert!(reserved.is_empty());
    }

    async fn search_treats_wildcards_literally(store: &dyn SpeciesStore) {
        let tag = run_tag();
        store.create(ficus(&tag)).await.unwrap();

        let wildcard = store
            .list(&SpeciesFilter::default().with_search(format!("{tag}%_")))
            .await
            .unwrap();
        assert!(wildcard.is_empty());
    }

    async fn update_changes_only_supplied_fields(store: &dyn SpeciesStore) {
        let tag = run_tag();
        let mut new = ficus(&tag);
        new.habitat_requirements = json!({"humidity": "high"}).as_object().cloned().unwrap();
        new.certifications = vec![json!("CITES")];
        let created = store.create(new).await.unwrap();

        let patch = SpeciesPatch {
            name: Some(format!("Fiddle-leaf {tag}")),
            status: Some(SpeciesStatus::Reserved),
            ..Default::default()
        };
        let updated = store.update(created.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, format!("Fiddle-leaf {tag}"));
        assert_eq!(updated.status, SpeciesStatus::Reserved);
        assert_eq!(updated.scientific_name, created.scientific_name);
        assert_eq!(updated.habitat_requirements, created.habitat_requirements);
        assert_eq!(updated.certifications, created.certifications);
        assert!(updated.updated_at >= created.updated_at);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    async fn delete_reports_existence(store: &dyn SpeciesStore) {
        let tag = run_tag();
        let created = store.create(gecko(&tag)).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
        assert!(store.update(created.id, &SpeciesPatch { quantity: Some(1), ..Default::default() })
            .await
            .unwrap()
            .is_none());
    }

    async fn run_contract(store: &dyn SpeciesStore) {
        create_assigns_unique_ids(store).await;
        list_filters_by_type_and_search(store).await;
        search_treats_wildcards_literally(store).await;
        update_changes_only_supplied_fields(store).await;
        delete_reports_existence(store).await;
    }

    #[tokio::test]
    async fn in_memory_store_honours_contract() {
        run_contract(&InMemorySpeciesStore::new()).await;
    }

    #[tokio::test]
    async fn postgres_store_honours_contract() {
        let Some(store) = postgres_store().await else {
            eprintln!("DATABASE_URL not set or unreachable; skipping postgres contract");
            return;
        };
        run_contract(&store).await;
    }
}
