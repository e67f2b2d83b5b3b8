/// User model
///
/// Users own tasks via the `tasks.user_id` foreign key introduced by the
/// `add_user_id_to_tasks` migration. The query API never writes users; rows
/// are created operationally and the `set_admin_role` migration promotes
/// the designated admin account.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     nickname VARCHAR(50) UNIQUE NOT NULL,
///     email VARCHAR(100) UNIQUE NOT NULL,
///     hashed_password VARCHAR(255) NOT NULL,
///     role VARCHAR(10) NOT NULL DEFAULT 'user'
/// );
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role stored in `users.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UserRole {
    /// Regular account (database default)
    #[sqlx(rename = "user")]
    #[serde(rename = "user")]
    User,

    /// Administrator account
    #[sqlx(rename = "ADMIN")]
    #[serde(rename = "ADMIN")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Sequential user id
    pub id: i32,

    /// Unique display name
    pub nickname: String,

    /// Unique email address
    pub email: String,

    /// Password hash; never serialized into API responses
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// Account role
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(UserRole::User.as_str(), "user");
        assert_eq!(UserRole::Admin.as_str(), "ADMIN");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            nickname: "artem".to_string(),
            email: "admin@example.com".to_string(),
            hashed_password: "argon2-hash".to_string(),
            role: UserRole::Admin,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["role"], "ADMIN");
    }
}
