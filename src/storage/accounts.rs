//! Account store
//!
//! Keeps the account table in memory and rewrites `accounts.txt` on shutdown
//! when anything changed. One line per account: `identifier:hash`, or
//! `identifier:` while the account has no password yet.

#[cfg(test)]
use std::cell::Cell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::crypto::CredentialHasher;
use crate::error::{AbaError, AbaResult};
use crate::models::{Account, Credential, UserId};

use super::file_io::{read_text, write_atomic};

/// Maps user identifiers to credential state
pub struct AccountStore {
    path: PathBuf,
    hasher: CredentialHasher,
    accounts: BTreeMap<UserId, Account>,
    dirty: bool,
    /// Checked in place of a real hash so unknown accounts cost the same
    decoy: String,
    #[cfg(test)]
    verifications: Cell<usize>,
}

impl AccountStore {
    /// Load the account table, adding the administrator if it is missing
    pub fn open(path: PathBuf, hasher: CredentialHasher) -> AbaResult<Self> {
        let contents = read_text(&path)?;
        let mut accounts = BTreeMap::new();

        for (line_num, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Account::parse_line(line) {
                Some(account) => {
                    accounts.insert(account.id.clone(), account);
                }
                None => warn!(line = line_num + 1, "Skipping malformed account entry"),
            }
        }

        let admin = UserId::admin();
        if !accounts.contains_key(&admin) {
            info!("No administrator account found, bootstrapping one without a password");
            accounts.insert(admin.clone(), Account::new(admin));
        }

        debug!(count = accounts.len(), path = %path.display(), "Loaded accounts");

        let decoy = hasher.hash("decoy")?;

        Ok(Self {
            path,
            hasher,
            accounts,
            dirty: false,
            decoy,
            #[cfg(test)]
            verifications: Cell::new(0),
        })
    }

    /// Check if an account exists
    pub fn exists(&self, id: &str) -> AbaResult<bool> {
        let id = UserId::new(id)?;
        Ok(self.accounts.contains_key(&id))
    }

    /// Check if an account has a password
    ///
    /// False for unknown accounts and accounts that never logged in.
    pub fn has_credential(&self, id: &str) -> AbaResult<bool> {
        let id = UserId::new(id)?;
        Ok(self
            .accounts
            .get(&id)
            .is_some_and(|a| a.credential.is_set()))
    }

    /// Get an account
    pub fn get(&self, id: &str) -> AbaResult<Option<&Account>> {
        let id = UserId::new(id)?;
        Ok(self.accounts.get(&id))
    }

    /// Set or clear an account's password
    ///
    /// An empty secret means "no password yet". Anything else is hashed
    /// before it is stored. Creates the account if it does not exist.
    pub fn set_credential(&mut self, id: &str, secret: &str) -> AbaResult<()> {
        let id = UserId::new(id)?;

        let credential = if secret.is_empty() {
            Credential::Unset
        } else {
            Credential::Hashed(self.hasher.hash(secret)?)
        };

        self.accounts
            .entry(id.clone())
            .or_insert_with(|| Account::new(id))
            .credential = credential;
        self.dirty = true;
        Ok(())
    }

    /// Check a secret against an account's stored password
    ///
    /// False for unknown accounts and accounts without a password. Those
    /// still run a full verification against a decoy hash, so timing does
    /// not reveal which accounts exist.
    pub fn verify(&self, id: &str, secret: &str) -> AbaResult<bool> {
        let id = UserId::new(id)?;
        let stored = match self.accounts.get(&id).map(|a| &a.credential) {
            Some(Credential::Hashed(stored)) => Some(stored.as_str()),
            _ => None,
        };

        #[cfg(test)]
        self.verifications.set(self.verifications.get() + 1);

        let matched = self.hasher.verify(secret, stored.unwrap_or(&self.decoy));
        Ok(matched && stored.is_some())
    }

    /// Number of hash verifications performed so far
    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.get()
    }

    /// Create an account with no password
    pub fn add(&mut self, id: &str) -> AbaResult<UserId> {
        let id = UserId::new(id)?;

        if self.accounts.contains_key(&id) {
            return Err(AbaError::Duplicate {
                entity_type: "Account",
                identifier: id.to_string(),
            });
        }

        self.accounts.insert(id.clone(), Account::new(id.clone()));
        self.dirty = true;
        Ok(id)
    }

    /// Remove an account
    ///
    /// The caller must also delete the account's records.
    pub fn remove(&mut self, id: &str) -> AbaResult<UserId> {
        let id = UserId::new(id)?;

        if id.is_admin() {
            return Err(AbaError::Validation(
                "The admin account cannot be deleted".into(),
            ));
        }

        let removed = self
            .accounts
            .remove(&id)
            .ok_or_else(|| AbaError::account_not_found(id.as_str()))?;
        self.dirty = true;
        Ok(removed.id)
    }

    /// All account identifiers, sorted case-insensitively
    pub fn list(&self) -> Vec<UserId> {
        self.accounts.keys().cloned().collect()
    }

    /// Whether anything changed since load
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rewrite the account file if anything changed since load
    ///
    /// Returns whether the file was written.
    pub fn persist(&mut self) -> AbaResult<bool> {
        if !self.dirty {
            debug!("Accounts unchanged, not rewriting account file");
            return Ok(false);
        }

        write_atomic(&self.path, |writer| {
            for account in self.accounts.values() {
                writeln!(writer, "{}", account.to_line())?;
            }
            Ok(())
        })?;

        self.dirty = false;
        info!(count = self.accounts.len(), "Account file written");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::HashCost;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, AccountStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = open_in(&temp_dir);
        (temp_dir, store)
    }

    fn open_in(temp_dir: &TempDir) -> AccountStore {
        let hasher = CredentialHasher::with_cost(HashCost::FAST).unwrap();
        AccountStore::open(temp_dir.path().join("accounts.txt"), hasher).unwrap()
    }

    #[test]
    fn test_admin_bootstrapped() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.exists("admin").unwrap());
        assert!(!store.has_credential("admin").unwrap());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_add_and_exists() {
        let (_temp_dir, mut store) = create_test_store();

        store.add("alice").unwrap();
        assert!(store.exists("alice").unwrap());
        assert!(store.exists("ALICE").unwrap());
        assert!(!store.has_credential("alice").unwrap());
        assert!(store.is_dirty());
    }

    #[test]
    fn test_add_duplicate() {
        let (_temp_dir, mut store) = create_test_store();
        store.add("alice").unwrap();

        let err = store.add("Alice").unwrap_err();
        assert!(matches!(err, AbaError::Duplicate { .. }));
        assert!(matches!(store.add("admin"), Err(AbaError::Duplicate { .. })));
    }

    #[test]
    fn test_invalid_identifier() {
        let (_temp_dir, mut store) = create_test_store();
        assert!(store.add("not valid").unwrap_err().is_validation());
        assert!(store.exists("").unwrap_err().is_validation());
        assert!(store.remove("x".repeat(17).as_str()).unwrap_err().is_validation());
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, mut store) = create_test_store();
        store.add("alice").unwrap();

        store.remove("alice").unwrap();
        assert!(!store.exists("alice").unwrap());
        assert!(store.remove("alice").unwrap_err().is_not_found());
    }

    #[test]
    fn test_admin_cannot_be_removed() {
        let (_temp_dir, mut store) = create_test_store();
        assert!(store.remove("admin").unwrap_err().is_validation());
        assert!(store.exists("admin").unwrap());
    }

    #[test]
    fn test_set_and_verify_credential() {
        let (_temp_dir, mut store) = create_test_store();
        store.add("alice").unwrap();

        store.set_credential("alice", "TestPass123").unwrap();
        assert!(store.has_credential("alice").unwrap());
        assert!(store.verify("alice", "TestPass123").unwrap());
        assert!(!store.verify("alice", "WrongPass1").unwrap());
        assert!(!store.verify("nobody", "TestPass123").unwrap());

        store.set_credential("alice", "").unwrap();
        assert!(!store.has_credential("alice").unwrap());
        assert!(!store.verify("alice", "TestPass123").unwrap());
    }

    #[test]
    fn test_unknown_account_still_hashes() {
        let (_temp_dir, store) = create_test_store();

        assert!(!store.verify("nobody", "decoy").unwrap());
        assert!(!store.verify("admin", "decoy").unwrap());
        assert_eq!(store.verifications(), 2);
    }

    #[test]
    fn test_persist_only_when_dirty() {
        let (temp_dir, mut store) = create_test_store();
        let path = temp_dir.path().join("accounts.txt");

        assert!(!store.persist().unwrap());
        assert!(!path.exists());

        store.add("alice").unwrap();
        assert!(store.persist().unwrap());
        assert!(path.exists());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_persist_and_reload() {
        let (temp_dir, mut store) = create_test_store();
        store.add("Alice").unwrap();
        store.add("bob").unwrap();
        store.set_credential("bob", "TestPass123").unwrap();
        store.persist().unwrap();

        let contents = std::fs::read_to_string(temp_dir.path().join("accounts.txt")).unwrap();
        assert!(contents.lines().any(|l| l == "Alice:"));
        assert!(contents.lines().any(|l| l == "admin:"));
        assert!(contents.lines().any(|l| l.starts_with("bob:$argon2id$")));

        let reloaded = open_in(&temp_dir);
        assert_eq!(reloaded.list().len(), 3);
        assert_eq!(reloaded.get("alice").unwrap().unwrap().id.as_str(), "Alice");
        assert!(reloaded.verify("bob", "TestPass123").unwrap());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("accounts.txt"),
            "alice:\n\nnot valid:\nbob:garbage\n",
        )
        .unwrap();

        let store = open_in(&temp_dir);
        assert!(store.exists("alice").unwrap());
        assert!(store.exists("bob").unwrap());
        assert_eq!(store.list().len(), 3);
        // A garbage hash is a failed login, not a crash
        assert!(!store.verify("bob", "garbage").unwrap());
    }

    #[test]
    fn test_list_sorted() {
        let (_temp_dir, mut store) = create_test_store();
        store.add("zed").unwrap();
        store.add("Bob").unwrap();

        let names: Vec<String> = store.list().into_iter().map(String::from).collect();
        assert_eq!(names, vec!["admin", "Bob", "zed"]);
    }
}
