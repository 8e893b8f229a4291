//! Account model
//!
//! An account is an identifier plus its credential state. A freshly created
//! account has no password until its owner's first login.

use std::fmt;

use super::ids::UserId;

/// Whether an account has a password yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Created but never logged in
    Unset,
    /// Argon2id PHC string
    Hashed(String),
}

impl Credential {
    /// Parse the stored form; an empty field means "no password yet"
    pub fn from_stored(value: &str) -> Self {
        if value.is_empty() {
            Self::Unset
        } else {
            Self::Hashed(value.to_string())
        }
    }

    /// The stored form
    pub fn as_stored(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Hashed(hash) => hash,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub credential: Credential,
}

impl Account {
    /// Create an account without a password
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            credential: Credential::Unset,
        }
    }

    /// Render as one line of the account file (without newline)
    pub fn to_line(&self) -> String {
        format!("{}:{}", self.id, self.credential.as_stored())
    }

    /// Parse one line of the account file
    ///
    /// Accepts `id:hash`, `id:` and a bare `id`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (id, stored) = line.split_once(':').unwrap_or((line, ""));
        let id = UserId::new(id.trim()).ok()?;
        Some(Self {
            id,
            credential: Credential::from_stored(stored.trim()),
        })
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_without_password() {
        let account = Account::new(UserId::new("alice").unwrap());
        assert_eq!(account.to_line(), "alice:");

        let parsed = Account::parse_line("alice:").unwrap();
        assert_eq!(parsed.credential, Credential::Unset);
    }

    #[test]
    fn test_line_with_password() {
        let parsed = Account::parse_line("Bob:$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA").unwrap();
        assert_eq!(parsed.id.as_str(), "Bob");
        assert!(parsed.credential.is_set());
        assert_eq!(
            parsed.to_line(),
            "Bob:$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
        );
    }

    #[test]
    fn test_bare_identifier() {
        let parsed = Account::parse_line("carol").unwrap();
        assert_eq!(parsed.credential, Credential::Unset);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(Account::parse_line("").is_none());
        assert!(Account::parse_line(":hash").is_none());
        assert!(Account::parse_line("bad user:").is_none());
    }
}
