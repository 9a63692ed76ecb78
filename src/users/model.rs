//! User record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_round_trip_keeps_timestamp() {
        let user = User::new(1, "Ada", "ada@example.com");

        let json = serde_json::to_value(&user).unwrap();
        let back: User = serde_json::from_value(json).unwrap();

        assert_eq!(back, user);
    }
}
