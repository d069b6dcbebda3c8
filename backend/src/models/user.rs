use serde::Serialize;

use crate::auth::identity::Caller;

/// Advisory profile kept in the hosted `users` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&Caller> for UserRecord {
    fn from(c: &Caller) -> Self {
        Self {
            id: c.id,
            username: c.username.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
        }
    }
}
