//! Create/edit form state for a species record.

use serde_json::Value;
use thiserror::Error;

use rainforest_core::SpeciesId;
use rainforest_inventory::{
    DEFAULT_MINIMUM_THRESHOLD, JsonMap, Species, SpeciesInput, SpeciesKind, SpeciesStatus,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid {field}: {value}")]
    InvalidChoice { field: &'static str, value: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(SpeciesId),
}

/// Editable fields; counts are held as typed text until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesForm {
    pub mode: FormMode,
    pub name: String,
    pub kind: SpeciesKind,
    pub scientific_name: String,
    pub quantity: String,
    pub status: SpeciesStatus,
    pub minimum_threshold: String,
    pub habitat_requirements: JsonMap,
    pub certifications: Vec<Value>,
}

impl SpeciesForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            kind: SpeciesKind::Plant,
            scientific_name: String::new(),
            quantity: "0".to_string(),
            status: SpeciesStatus::Available,
            minimum_threshold: DEFAULT_MINIMUM_THRESHOLD.to_string(),
            habitat_requirements: JsonMap::new(),
            certifications: Vec::new(),
        }
    }

    /// Pre-filled with the record's current values.
    pub fn edit(species: &Species) -> Self {
        Self {
            mode: FormMode::Update(species.id),
            name: species.name.clone(),
            kind: species.kind,
            scientific_name: species.scientific_name.clone(),
            quantity: species.quantity.to_string(),
            status: species.status,
            minimum_threshold: species.minimum_threshold.to_string(),
            habitat_requirements: species.habitat_requirements.clone(),
            certifications: species.certifications.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Species",
            FormMode::Update(_) => "Edit Species",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create",
            FormMode::Update(_) => "Update",
        }
    }

    /// Set a field by its wire name, as an input change handler would.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "name" => self.name = value.to_string(),
            "scientificName" => self.scientific_name = value.to_string(),
            "quantity" => self.quantity = value.to_string(),
            "minimumThreshold" => self.minimum_threshold = value.to_string(),
            "type" => {
                self.kind = value.parse().map_err(|_| FormError::InvalidChoice {
                    field: "type",
                    value: value.to_string(),
                })?
            }
            "status" => {
                self.status = value.parse().map_err(|_| FormError::InvalidChoice {
                    field: "status",
                    value: value.to_string(),
                })?
            }
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Only presence is checked here; everything else is left to the server.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Required("name"));
        }
        if self.scientific_name.trim().is_empty() {
            return Err(FormError::Required("scientificName"));
        }
        Ok(())
    }

    pub fn to_input(&self) -> Result<SpeciesInput, FormError> {
        self.validate()?;
        Ok(SpeciesInput {
            name: Some(Some(self.name.clone())),
            kind: Some(Some(self.kind.as_str().to_string())),
            scientific_name: Some(Some(self.scientific_name.clone())),
            quantity: Some(Some(count_value(&self.quantity))),
            status: Some(self.status.as_str().to_string()),
            minimum_threshold: Some(count_value(&self.minimum_threshold)),
            habitat_requirements: Some(Value::Object(self.habitat_requirements.clone())),
            certifications: Some(Value::Array(self.certifications.clone())),
        })
    }
}

impl Default for SpeciesForm {
    fn default() -> Self {
        Self::create()
    }
}

/// Integers go out as numbers; anything else is sent verbatim for the server
/// to reject.
fn count_value(raw: &str) -> Value {
    match raw.trim().parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(raw.to_string()),
    }
}
