use serde::{Deserialize, Serialize};

use rainforest_core::UserId;

use crate::Role;

/// The authenticated caller of a single request.
///
/// Built from verified token claims and passed explicitly to whatever needs
/// to know who is acting; never stored in process-wide state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
