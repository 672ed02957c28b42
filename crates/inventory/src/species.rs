use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use rainforest_core::{DomainError, DomainResult, Entity, SpeciesId};

use crate::quantity::parse_count;

/// Opaque key-value document (habitat requirements).
pub type JsonMap = serde_json::Map<String, Value>;

/// Threshold applied when a create payload omits `minimumThreshold`.
pub const DEFAULT_MINIMUM_THRESHOLD: i64 = 5;

/// Kind of organism a species record tracks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeciesKind {
    Plant,
    Animal,
}

impl SpeciesKind {
    pub const ALL: [SpeciesKind; 2] = [SpeciesKind::Plant, SpeciesKind::Animal];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesKind::Plant => "PLANT",
            SpeciesKind::Animal => "ANIMAL",
        }
    }
}

impl core::fmt::Display for SpeciesKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeciesKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::invalid_field("type", format!("'{s}' is not one of PLANT, ANIMAL")))
    }
}

/// Availability status of a species record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeciesStatus {
    #[default]
    Available,
    Reserved,
    OutOfStock,
}

impl SpeciesStatus {
    pub const ALL: [SpeciesStatus; 3] = [
        SpeciesStatus::Available,
        SpeciesStatus::Reserved,
        SpeciesStatus::OutOfStock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesStatus::Available => "AVAILABLE",
            SpeciesStatus::Reserved => "RESERVED",
            SpeciesStatus::OutOfStock => "OUT_OF_STOCK",
        }
    }
}

impl core::fmt::Display for SpeciesStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeciesStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|st| st.as_str() == s).ok_or_else(|| {
            DomainError::invalid_field(
                "status",
                format!("'{s}' is not one of AVAILABLE, RESERVED, OUT_OF_STOCK"),
            )
        })
    }
}

/// A tracked plant or animal species.
///
/// # Invariants
/// - `id` is assigned once at creation and never changes.
/// - `quantity` and `minimum_threshold` are never negative.
/// - `status == OutOfStock` iff `quantity == 0` holds only after a quantity
///   update; a full update may store any combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SpeciesKind,
    pub scientific_name: String,
    pub quantity: i64,
    pub status: SpeciesStatus,
    pub minimum_threshold: i64,
    pub habitat_requirements: JsonMap,
    pub certifications: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Species {
    /// Materialize a validated create payload under a fresh identifier.
    pub fn create(new: NewSpecies, now: DateTime<Utc>) -> Self {
        Self::with_id(SpeciesId::new(), new, now)
    }

    pub fn with_id(id: SpeciesId, new: NewSpecies, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            kind: new.kind,
            scientific_name: new.scientific_name,
            quantity: new.quantity,
            status: new.status,
            minimum_threshold: new.minimum_threshold,
            habitat_requirements: new.habitat_requirements,
            certifications: new.certifications,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every field present in `patch`.
    ///
    /// Does not recompute `status` from `quantity`.
    pub fn apply_patch(&mut self, patch: &SpeciesPatch, now: DateTime<Utc>) {
        if patch.is_empty() {
            return;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(scientific_name) = &patch.scientific_name {
            self.scientific_name = scientific_name.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(threshold) = patch.minimum_threshold {
            self.minimum_threshold = threshold;
        }
        if let Some(habitat) = &patch.habitat_requirements {
            self.habitat_requirements = habitat.clone();
        }
        if let Some(certifications) = &patch.certifications {
            self.certifications = certifications.clone();
        }
        self.updated_at = now;
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_threshold
    }
}

impl Entity for Species {
    type Id = SpeciesId;

    fn id(&self) -> SpeciesId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Raw species payload as submitted by a client.
///
/// Enum and count fields stay loosely typed here so that bad values surface
/// as field-level validation errors instead of opaque decode failures.
/// Unknown fields (including `id`, `createdAt`) are ignored.
///
/// The non-nullable columns keep an explicit `null` (`Some(None)`) apart
/// from an absent field (`None`) so that it can be rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesInput {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(
        default,
        rename = "type",
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Option<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_threshold: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habitat_requirements: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Value>,
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpecies {
    pub name: String,
    pub kind: SpeciesKind,
    pub scientific_name: String,
    pub quantity: i64,
    pub status: SpeciesStatus,
    pub minimum_threshold: i64,
    pub habitat_requirements: JsonMap,
    pub certifications: Vec<Value>,
}

impl NewSpecies {
    /// Minimal valid payload; remaining fields take their defaults.
    pub fn new(name: impl Into<String>, kind: SpeciesKind, scientific_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            scientific_name: scientific_name.into(),
            quantity: 0,
            status: SpeciesStatus::default(),
            minimum_threshold: DEFAULT_MINIMUM_THRESHOLD,
            habitat_requirements: JsonMap::new(),
            certifications: Vec::new(),
        }
    }
}

impl TryFrom<SpeciesInput> for NewSpecies {
    type Error = DomainError;

    fn try_from(input: SpeciesInput) -> Result<Self, Self::Error> {
        let name = required_text("name", not_null("name", input.name)?)?;
        let kind = match not_null("type", input.kind)? {
            Some(raw) => raw.parse()?,
            None => return Err(DomainError::validation("type is required")),
        };
        let scientific_name =
            required_text("scientificName", not_null("scientificName", input.scientific_name)?)?;
        let quantity = not_null("quantity", input.quantity)?;

        Ok(Self {
            name,
            kind,
            scientific_name,
            quantity: quantity_field(quantity.as_ref())?.unwrap_or(0),
            status: optional_enum(input.status)?.unwrap_or_default(),
            minimum_threshold: threshold_field(input.minimum_threshold.as_ref())?
                .unwrap_or(DEFAULT_MINIMUM_THRESHOLD),
            habitat_requirements: habitat_field(input.habitat_requirements)?.unwrap_or_default(),
            certifications: certifications_field(input.certifications)?.unwrap_or_default(),
        })
    }
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesPatch {
    pub name: Option<String>,
    pub kind: Option<SpeciesKind>,
    pub scientific_name: Option<String>,
    pub quantity: Option<i64>,
    pub status: Option<SpeciesStatus>,
    pub minimum_threshold: Option<i64>,
    pub habitat_requirements: Option<JsonMap>,
    pub certifications: Option<Vec<Value>>,
}

impl SpeciesPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TryFrom<SpeciesInput> for SpeciesPatch {
    type Error = DomainError;

    fn try_from(input: SpeciesInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name: not_null("name", input.name)?
                .map(|v| non_empty("name", v))
                .transpose()?,
            kind: optional_enum(not_null("type", input.kind)?)?,
            scientific_name: not_null("scientificName", input.scientific_name)?
                .map(|v| non_empty("scientificName", v))
                .transpose()?,
            quantity: quantity_field(not_null("quantity", input.quantity)?.as_ref())?,
            status: optional_enum(input.status)?,
            minimum_threshold: threshold_field(input.minimum_threshold.as_ref())?,
            habitat_requirements: habitat_field(input.habitat_requirements)?,
            certifications: certifications_field(input.certifications)?,
        })
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn not_null<T>(field: &'static str, value: Option<Option<T>>) -> DomainResult<Option<T>> {
    match value {
        Some(None) => Err(DomainError::validation(format!("{field} cannot be null"))),
        Some(Some(v)) => Ok(Some(v)),
        None => Ok(None),
    }
}

fn required_text(field: &'static str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) => non_empty(field, v),
        None => Err(DomainError::validation(format!("{field} is required"))),
    }
}

fn non_empty(field: &'static str, value: String) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

fn optional_enum<T>(value: Option<String>) -> DomainResult<Option<T>>
where
    T: FromStr<Err = DomainError>,
{
    value.map(|raw| raw.parse()).transpose()
}

fn quantity_field(value: Option<&Value>) -> DomainResult<Option<i64>> {
    value
        .map(|v| parse_count(v).ok_or(DomainError::InvalidQuantity))
        .transpose()
}

fn threshold_field(value: Option<&Value>) -> DomainResult<Option<i64>> {
    value
        .map(|v| {
            parse_count(v).ok_or_else(|| {
                DomainError::invalid_field("minimumThreshold", "must be a non-negative integer")
            })
        })
        .transpose()
}

fn habitat_field(value: Option<Value>) -> DomainResult<Option<JsonMap>> {
    match value {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(DomainError::invalid_field(
            "habitatRequirements",
            "must be a JSON object",
        )),
    }
}

fn certifications_field(value: Option<Value>) -> DomainResult<Option<Vec<Value>>> {
    match value {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(DomainError::invalid_field("certifications", "must be a JSON array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> SpeciesInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_applies_defaults() {
        let new = NewSpecies::try_from(input(json!({
            "name": "Ficus",
            "type": "PLANT",
            "scientificName": "Ficus benjamina",
        })))
        .unwrap();

        assert_eq!(new.quantity, 0);
        assert_eq!(new.status, SpeciesStatus::Available);
        assert_eq!(new.minimum_threshold, DEFAULT_MINIMUM_THRESHOLD);
        assert!(new.habitat_requirements.is_empty());
        assert!(new.certifications.is_empty());
    }

    #[test]
    fn create_requires_name_type_and_scientific_name() {
        let missing_name = NewSpecies::try_from(input(json!({
            "type": "PLANT", "scientificName": "Ficus benjamina",
        })));
        assert_eq!(missing_name, Err(DomainError::validation("name is required")));

        let missing_type = NewSpecies::try_from(input(json!({
            "name": "Ficus", "scientificName": "Ficus benjamina",
        })));
        assert_eq!(missing_type, Err(DomainError::validation("type is required")));

        let blank_scientific = NewSpecies::try_from(input(json!({
            "name": "Ficus", "type": "PLANT", "scientificName": "  ",
        })));
        assert_eq!(
            blank_scientific,
            Err(DomainError::validation("scientificName cannot be empty"))
        );
    }

    #[test]
    fn create_rejects_unknown_enum_values() {
        let err = NewSpecies::try_from(input(json!({
            "name": "Ficus", "type": "FUNGUS", "scientificName": "Ficus benjamina",
        })))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "type", .. }));

        let err = NewSpecies::try_from(input(json!({
            "name": "Ficus", "type": "PLANT", "scientificName": "Ficus benjamina",
            "status": "available",
        })))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "status", .. }));
    }

    #[test]
    fn create_accepts_numeric_strings_from_form_inputs() {
        let new = NewSpecies::try_from(input(json!({
            "name": "Gecko", "type": "ANIMAL", "scientificName": "Gekko gecko",
            "quantity": "12", "minimumThreshold": "3",
        })))
        .unwrap();
        assert_eq!(new.quantity, 12);
        assert_eq!(new.minimum_threshold, 3);
    }

    #[test]
    fn create_rejects_negative_counts() {
        let err = NewSpecies::try_from(input(json!({
            "name": "Gecko", "type": "ANIMAL", "scientificName": "Gekko gecko",
            "quantity": -1,
        })))
        .unwrap_err();
        assert_eq!(err, DomainError::InvalidQuantity);

        let err = NewSpecies::try_from(input(json!({
            "name": "Gecko", "type": "ANIMAL", "scientificName": "Gekko gecko",
            "minimumThreshold": -4,
        })))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "minimumThreshold", .. }));
    }

    #[test]
    fn opaque_documents_pass_through() {
        let new = NewSpecies::try_from(input(json!({
            "name": "Orchid", "type": "PLANT", "scientificName": "Phalaenopsis",
            "habitatRequirements": { "humidity": "70%", "light": { "lux": 1200 } },
            "certifications": ["CITES-II", { "issuer": "EU" }, 7],
        })))
        .unwrap();
        assert_eq!(new.habitat_requirements["light"]["lux"], json!(1200));
        assert_eq!(new.certifications.len(), 3);

        let err = NewSpecies::try_from(input(json!({
            "name": "Orchid", "type": "PLANT", "scientificName": "Phalaenopsis",
            "habitatRequirements": ["humid"],
        })))
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "habitatRequirements", .. }));
    }

    #[test]
    fn patch_ignores_id_and_unknown_fields() {
        let patch = SpeciesPatch::try_from(input(json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "createdAt": "2024-01-01T00:00:00Z",
            "name": "Weeping fig",
        })))
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Weeping fig"));
        assert_eq!(patch.kind, None);
        assert_eq!(patch.quantity, None);
    }

    #[test]
    fn explicit_null_on_required_columns_is_rejected() {
        for (field, body) in [
            ("name", json!({ "name": null })),
            ("type", json!({ "type": null })),
            ("scientificName", json!({ "scientificName": null })),
            ("quantity", json!({ "quantity": null })),
        ] {
            assert_eq!(
                SpeciesPatch::try_from(input(body)),
                Err(DomainError::validation(format!("{field} cannot be null")))
            );
        }

        let err = NewSpecies::try_from(input(json!({
            "name": "Gecko", "type": "ANIMAL", "scientificName": "Gekko gecko",
            "quantity": null,
        })))
        .unwrap_err();
        assert_eq!(err, DomainError::validation("quantity cannot be null"));
    }

    #[test]
    fn null_on_optional_columns_counts_as_absent() {
        let patch = SpeciesPatch::try_from(input(json!({
            "status": null, "minimumThreshold": null,
        })))
        .unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn full_update_keeps_contradictory_status() {
        let now = Utc::now();
        let mut species = Species::create(NewSpecies::new("Ficus", SpeciesKind::Plant, "Ficus benjamina"), now);
        let patch = SpeciesPatch {
            quantity: Some(0),
            status: Some(SpeciesStatus::Available),
            ..Default::default()
        };

        species.apply_patch(&patch, now);

        assert_eq!(species.quantity, 0);
        assert_eq!(species.status, SpeciesStatus::Available);
    }

    #[test]
    fn empty_patch_leaves_timestamps_alone() {
        let created = Utc::now() - chrono::Duration::minutes(5);
        let mut species = Species::create(NewSpecies::new("Ficus", SpeciesKind::Plant, "Ficus benjamina"), created);
        let id = species.id;

        species.apply_patch(&SpeciesPatch::default(), Utc::now());

        assert_eq!(species.updated_at, created);
        assert_eq!(species.id, id);
    }

    #[test]
    fn wire_format_uses_camel_case_and_type() {
        let species = Species::create(NewSpecies::new("Gecko", SpeciesKind::Animal, "Gekko gecko"), Utc::now());
        let json = serde_json::to_value(&species).unwrap();
        assert_eq!(json["type"], "ANIMAL");
        assert_eq!(json["scientificName"], "Gekko gecko");
        assert_eq!(json["minimumThreshold"], 5);
        assert_eq!(json["status"], "AVAILABLE");
        assert!(json.get("createdAt").is_some());
    }
}
