use anyhow::Result;
use uuid::Uuid;

use crate::Store;
use crate::models::User;

impl Store {
    /// Create a user. Returns `None` when the username is already taken:
    /// the uniqueness check and the insert share one critical section, so
    /// concurrent registrations cannot both slip past the check.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<User>> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password_hash.to_string(),
        };

        self.with_write(|tables| {
            if tables.users.values().any(|u| u.username == user.username) {
                return Ok(None);
            }

            tables.users.insert(user.id, user.clone());
            Ok(Some(user))
        })
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.with_read(|tables| Ok(tables.users.values().cloned().collect()))
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_read(|tables| {
            Ok(tables
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        })
    }

    pub fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.with_read(|tables| Ok(tables.users.get(&id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use crate::Store;

    #[test]
    fn duplicate_username_is_rejected_by_the_store() {
        let store = Store::new();

        assert!(store.create_user("alice", "hash-a").unwrap().is_some());
        assert!(store.create_user("alice", "hash-b").unwrap().is_none());

        let users = store.users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[0].password, "hash-a");
    }

    #[test]
    fn distinct_usernames_both_insert() {
        let store = Store::new();

        assert!(store.create_user("alice", "hash").unwrap().is_some());
        assert!(store.create_user("bob", "hash").unwrap().is_some());
        assert_eq!(store.users().unwrap().len(), 2);
    }
}
