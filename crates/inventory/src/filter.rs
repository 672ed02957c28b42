use rainforest_core::DomainResult;

use crate::species::{Species, SpeciesKind, SpeciesStatus};

/// List filter over species records.
///
/// `kind` and `status` are equality filters; `search` is a case-insensitive
/// substring match against `name` OR `scientific_name`. All present criteria
/// must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesFilter {
    pub kind: Option<SpeciesKind>,
    pub status: Option<SpeciesStatus>,
    pub search: Option<String>,
}

impl SpeciesFilter {
    /// Build a filter from raw query parameters. Empty values count as absent.
    pub fn from_query(search: Option<&str>, kind: Option<&str>, status: Option<&str>) -> DomainResult<Self> {
        Ok(Self {
            kind: present(kind).map(str::parse::<SpeciesKind>).transpose()?,
            status: present(status).map(str::parse::<SpeciesStatus>).transpose()?,
            search: present(search).map(str::to_owned),
        })
    }

    pub fn with_kind(mut self, kind: SpeciesKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_status(mut self, status: SpeciesStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, species: &Species) -> bool {
        if self.kind.is_some_and(|k| k != species.kind) {
            return false;
        }
        if self.status.is_some_and(|s| s != species.status) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                species.name.to_lowercase().contains(&needle)
                    || species.scientific_name.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::NewSpecies;
    use chrono::Utc;
    use rainforest_core::DomainError;

    fn ficus() -> Species {
        Species::create(NewSpecies::new("Ficus", SpeciesKind::Plant, "Ficus benjamina"), Utc::now())
    }

    fn gecko() -> Species {
        Species::create(NewSpecies::new("Gecko", SpeciesKind::Animal, "Gekko gecko"), Utc::now())
    }

    #[test]
    fn type_filter_is_exact() {
        let filter = SpeciesFilter::from_query(None, Some("PLANT"), None).unwrap();
        assert!(filter.matches(&ficus()));
        assert!(!filter.matches(&gecko()));
    }

    #[test]
    fn search_is_case_insensitive_over_both_names() {
        let filter = SpeciesFilter::default().with_search("fic");
        assert!(filter.matches(&ficus()));
        assert!(!filter.matches(&gecko()));

        let by_scientific = SpeciesFilter::default().with_search("GEKKO");
        assert!(by_scientific.matches(&gecko()));
        assert!(!by_scientific.matches(&ficus()));
    }

    #[test]
    fn criteria_combine_with_and() {
        let filter = SpeciesFilter::default()
            .with_kind(SpeciesKind::Animal)
            .with_search("fic");
        assert!(!filter.matches(&ficus()));
        assert!(!filter.matches(&gecko()));
    }

    #[test]
    fn status_filter() {
        let mut sold_out = gecko();
        sold_out.status = SpeciesStatus::OutOfStock;
        let filter = SpeciesFilter::default().with_status(SpeciesStatus::OutOfStock);
        assert!(filter.matches(&sold_out));
        assert!(!filter.matches(&gecko()));
    }

    #[test]
    fn empty_params_are_absent() {
        let filter = SpeciesFilter::from_query(Some(""), Some(""), Some("")).unwrap();
        assert_eq!(filter, SpeciesFilter::default());
    }

    #[test]
    fn unknown_filter_values_are_rejected() {
        let err = SpeciesFilter::from_query(None, Some("FUNGUS"), None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "type", .. }));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any substring of either name matches, whatever its case.
            #[test]
            fn substring_of_name_matches(
                name in "[A-Za-z ]{1,24}",
                start in 0usize..24,
                len in 1usize..8,
                upper in any::<bool>(),
            ) {
                let species = Species::create(
                    NewSpecies::new(name.clone(), SpeciesKind::Plant, "x"),
                    Utc::now(),
                );
                let start = start.min(name.len() - 1);
                let end = (start + len).min(name.len());
                let term = &name[start..end];
                let term = if upper { term.to_uppercase() } else { term.to_lowercase() };

                prop_assert!(SpeciesFilter::default().with_search(term).matches(&species));
            }

            /// Property: the default filter admits every record.
            #[test]
            fn empty_filter_matches_all(name in "\\PC{0,16}", animal in any::<bool>()) {
                let kind = if animal { SpeciesKind::Animal } else { SpeciesKind::Plant };
                let species = Species::create(NewSpecies::new(name, kind, "y"), Utc::now());
                prop_assert!(SpeciesFilter::default().matches(&species));
            }
        }
    }
}
