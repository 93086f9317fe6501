use uuid::Uuid;

use huddle_types::models::Identity;

/// Stored user record. Distinct from the huddle-types `Identity` so the
/// password hash never leaves the store layer by accident.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}
