//! Species table rows, status badges and the inline quantity editor.

use rainforest_auth::Role;
use rainforest_core::SpeciesId;
use rainforest_inventory::{Species, SpeciesKind, SpeciesStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Yellow,
    Red,
}

pub fn badge_tone(status: SpeciesStatus) -> BadgeTone {
    match status {
        SpeciesStatus::Available => BadgeTone::Green,
        SpeciesStatus::Reserved => BadgeTone::Yellow,
        SpeciesStatus::OutOfStock => BadgeTone::Red,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRow {
    pub id: SpeciesId,
    pub name: String,
    pub kind: SpeciesKind,
    pub scientific_name: String,
    pub quantity: i64,
    pub status: SpeciesStatus,
    pub badge: BadgeTone,
    /// Edit and delete controls are shown to admins only.
    pub can_manage: bool,
}

impl SpeciesRow {
    pub fn new(species: &Species, role: Role) -> Self {
        Self {
            id: species.id,
            name: species.name.clone(),
            kind: species.kind,
            scientific_name: species.scientific_name.clone(),
            quantity: species.quantity,
            status: species.status,
            badge: badge_tone(species.status),
            can_manage: role.is_admin(),
        }
    }
}

pub fn rows(species: &[Species], role: Role) -> Vec<SpeciesRow> {
    species.iter().map(|s| SpeciesRow::new(s, role)).collect()
}

/// Inline editor for a single row's quantity. Open to every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityEditor {
    pub id: SpeciesId,
    pub draft: String,
}

impl QuantityEditor {
    pub fn begin(species: &Species) -> Self {
        Self {
            id: species.id,
            draft: species.quantity.to_string(),
        }
    }

    pub fn set_draft(&mut self, value: &str) {
        self.draft = value.to_string();
    }

    /// Leading integer of the draft, if there is one (`"12abc"` gives 12).
    pub fn parsed(&self) -> Option<i64> {
        let s = self.draft.trim_start();
        let sign_len = usize::from(s.starts_with(['-', '+']));
        let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        s[..sign_len + digits].parse().ok()
    }
}
