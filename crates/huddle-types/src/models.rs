use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public identity of a user: what goes into JWT claims and what other
/// users are allowed to see. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Uuid,
    pub name: String,
}

/// A team as stored: member and admin lists hold user ids.
/// Both lists have set semantics; `admin` is always a subset of `members`
/// and non-empty while the team exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<Uuid>,
    pub admin: Vec<Uuid>,
    pub channels: Vec<Channel>,
}

impl Team {
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }

    pub fn is_admin(&self, user_id: Uuid) -> bool {
        self.admin.contains(&user_id)
    }
}

/// A team as returned by the API: members populated with usernames so
/// clients can render them without extra lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamView {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<Identity>,
    pub admin: Vec<Uuid>,
    pub channels: Vec<Channel>,
}
