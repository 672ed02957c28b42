//! Dashboard state: filters, the species list, the open form, pending delete
//! confirmation and user-facing notifications.
//!
//! Every successful mutation re-fetches the list with the current filters;
//! failed ones leave the list as it was.

use tracing::warn;

use rainforest_auth::Role;
use rainforest_core::SpeciesId;
use rainforest_inventory::{Species, SpeciesFilter, SpeciesKind, SpeciesStatus};

use crate::api::SpeciesBackend;
use crate::error::ClientError;
use crate::form::{FormMode, SpeciesForm};
use crate::table::{self, QuantityEditor, SpeciesRow};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

pub struct Dashboard<B> {
    backend: B,
    role: Role,
    filter: SpeciesFilter,
    species: Vec<Species>,
    form: Option<SpeciesForm>,
    quantity_editor: Option<QuantityEditor>,
    pending_delete: Option<SpeciesId>,
    notifications: Vec<Notification>,
}

impl<B: SpeciesBackend> Dashboard<B> {
    pub fn new(backend: B, role: Role) -> Self {
        Self {
            backend,
            role,
            filter: SpeciesFilter::default(),
            species: Vec::new(),
            form: None,
            quantity_editor: None,
            pending_delete: None,
            notifications: Vec::new(),
        }
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn rows(&self) -> Vec<SpeciesRow> {
        table::rows(&self.species, self.role)
    }

    pub fn filter(&self) -> &SpeciesFilter {
        &self.filter
    }

    pub fn form(&self) -> Option<&SpeciesForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut SpeciesForm> {
        self.form.as_mut()
    }

    pub fn quantity_editor_mut(&mut self) -> Option<&mut QuantityEditor> {
        self.quantity_editor.as_mut()
    }

    pub fn pending_delete(&self) -> Option<SpeciesId> {
        self.pending_delete
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Empty search text clears the criterion.
    pub async fn set_search(&mut self, text: &str) {
        self.filter.search = (!text.is_empty()).then(|| text.to_string());
        self.refresh().await;
    }

    pub async fn set_kind_filter(&mut self, kind: Option<SpeciesKind>) {
        self.filter.kind = kind;
        self.refresh().await;
    }

    pub async fn set_status_filter(&mut self, status: Option<SpeciesStatus>) {
        self.filter.status = status;
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        match self.backend.list(&self.filter).await {
            Ok(species) => self.species = species,
            Err(e) => {
                warn!(error = %e, "failed to fetch species");
                self.notifications.push(Notification::error("Failed to fetch species"));
            }
        }
    }

    /// Open the create form. Admin only; returns whether the form opened.
    pub fn open_create_form(&mut self) -> bool {
        if !self.role.is_admin() {
            return false;
        }
        self.form = Some(SpeciesForm::create());
        true
    }

    pub fn open_edit_form(&mut self, id: SpeciesId) -> bool {
        if !self.role.is_admin() {
            return false;
        }
        match self.species.iter().find(|s| s.id == id) {
            Some(species) => {
                self.form = Some(SpeciesForm::edit(species));
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form. Missing required fields stop the submit before
    /// any request is made; the form stays open on failure.
    pub async fn submit_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };

        let input = match form.to_input() {
            Ok(input) => input,
            Err(e) => {
                self.notifications.push(Notification::error(e.to_string()));
                return;
            }
        };

        let (result, success) = match form.mode {
            FormMode::Create => (
                self.backend.create(&input).await,
                "Species created successfully",
            ),
            FormMode::Update(id) => (
                self.backend.update(id, &input).await,
                "Species updated successfully",
            ),
        };

        match result {
            Ok(_) => {
                self.notifications.push(Notification::success(success));
                self.form = None;
                self.refresh().await;
            }
            Err(e) => self.fail(e, "Operation failed"),
        }
    }

    /// First step of a delete; nothing is sent until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: SpeciesId) -> bool {
        if !self.role.is_admin() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        match self.backend.delete(id).await {
            Ok(()) => {
                self.notifications
                    .push(Notification::success("Species deleted successfully"));
                self.refresh().await;
            }
            Err(e) => self.fail(e, "Failed to delete species"),
        }
    }

    pub fn begin_quantity_edit(&mut self, id: SpeciesId) -> bool {
        match self.species.iter().find(|s| s.id == id) {
            Some(species) => {
                self.quantity_editor = Some(QuantityEditor::begin(species));
                true
            }
            None => false,
        }
    }

    pub fn cancel_quantity_edit(&mut self) {
        self.quantity_editor = None;
    }

    /// Save the inline editor's draft; the editor closes either way.
    pub async fn save_quantity_edit(&mut self) {
        if let Some(editor) = self.quantity_editor.take() {
            self.change_quantity(editor.id, editor.parsed()).await;
        }
    }

    pub async fn change_quantity(&mut self, id: SpeciesId, quantity: Option<i64>) {
        match self.backend.update_quantity(id, quantity).await {
            Ok(_) => {
                self.notifications
                    .push(Notification::success("Quantity updated successfully"));
                self.refresh().await;
            }
            Err(e) => self.fail(e, "Failed to update quantity"),
        }
    }

    fn fail(&mut self, error: ClientError, fallback: &str) {
        warn!(error = %error, "species operation failed");
        let message = error.server_message().unwrap_or(fallback).to_string();
        self.notifications.push(Notification::error(message));
    }
}
