use std::fmt;

use sqlx::FromRow;

/// User record in the `users` table.
#[derive(Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,                      // store-assigned rowid
    pub username: String,             // unique login name
    #[sqlx(rename = "password")]
    pub password_hash: String,        // adaptive hash, redacted in Debug
    pub phone: Option<String>,        // free-form contact
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("phone", &self.phone)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: 7,
            username: "alice".into(),
            password_hash: "$argon2id$v=19$secret-material".into(),
            phone: Some("555-0100".into()),
        }
    }

    #[test]
    fn debug_output_redacts_hash() {
        let out = format!("{:?}", record());
        assert!(out.contains("alice"));
        assert!(!out.contains("secret-material"));
    }
}
