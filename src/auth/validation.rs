use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Pre-service check on incoming credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Accept whatever the client sent, including empty strings.
    #[default]
    Permissive,
    /// Reject blank usernames and empty passwords.
    NonEmpty,
}

/// Field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Username => f.write_str("username"),
            Field::Password => f.write_str("password"),
        }
    }
}

impl ValidationPolicy {
    pub fn check(&self, username: &str, password: &str) -> Result<(), Field> {
        match self {
            ValidationPolicy::Permissive => Ok(()),
            ValidationPolicy::NonEmpty => {
                if username.trim().is_empty() {
                    return Err(Field::Username);
                }
                if password.is_empty() {
                    return Err(Field::Password);
                }
                Ok(())
            }
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" | "none" => Ok(Self::Permissive),
            "non-empty" | "nonempty" | "strict" => Ok(Self::NonEmpty),
            other => Err(format!("unknown validation policy '{other}'")),
        }
    }
}
