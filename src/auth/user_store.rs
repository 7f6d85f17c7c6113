//! Staff Credential Storage
//! Mission: Hold staff accounts in SQLite and answer username lookups

use crate::auth::models::Credential;
use crate::auth::password::hash_password;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

/// Lookup-by-username, the only credential operation login needs
pub trait CredentialStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>>;
}

/// Accounts created by `seed_default_users`
const DEFAULT_USERS: &[(&str, &str, &str)] = &[
    ("admin", "@Doktari123", "admin"),
    ("receptionist", "@#PaSSwords123", "receptionist"),
];

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
    hash_cost: u32,
}

impl UserStore {
    /// Open the store and make sure the schema exists
    pub fn new(db_path: &str, hash_cost: u32) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
            hash_cost,
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create users table")?;

        Ok(())
    }

    /// Insert the default staff accounts that are not present yet.
    ///
    /// Returns how many accounts were created.
    pub fn seed_default_users(&self) -> Result<usize> {
        let mut created = 0;

        for (username, password, role) in DEFAULT_USERS {
            if self.find_by_username(username)?.is_some() {
                info!("User {} already exists, skipping seed", username);
                continue;
            }

            self.create_user(username, password, role)?;
            created += 1;
        }

        if created > 0 {
            warn!("Seeded {} default account(s); change their passwords", created);
        }

        Ok(created)
    }

    /// Create a new user with a freshly hashed password
    pub fn create_user(&self, username: &str, password: &str, role: &str) -> Result<Credential> {
        let password_hash = hash_password(password, self.hash_cost)?;
        let now = Utc::now().to_rfc3339();

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (username, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![username, password_hash, role, now],
        )
        .with_context(|| format!("Failed to insert user {}", username))?;

        let credential = Credential {
            user_id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash,
            role: role.to_string(),
        };

        info!("Created user: {} ({})", credential.username, credential.role);

        Ok(credential)
    }
}

impl CredentialStore for UserStore {
    fn find_by_username(&self, username: &str) -> Result<Option<Credential>> {
        let conn = Connection::open(&self.db_path)?;

        conn.query_row(
            "SELECT id, username, password_hash, role FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(Credential {
                    user_id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    role: row.get(3)?,
                })
            },
        )
        .optional()
        .context("Failed to look up user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path, 4).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_create_and_find_user() {
        let (store, _temp) = create_test_store();

        let created = store.create_user("doc", "stethoscope", "doctor").unwrap();
        assert!(created.user_id > 0);

        let found = store.find_by_username("doc").unwrap().unwrap();
        assert_eq!(found.user_id, created.user_id);
        assert_eq!(found.role, "doctor");
        assert!(verify_password("stethoscope", &found.password_hash));
    }

    #[test]
    fn test_unknown_user_is_none() {
        let (store, _temp) = create_test_store();
        assert!(store.find_by_username("ghost").unwrap().is_none());
    }

    #[test]
    fn test_usernames_are_unique() {
        let (store, _temp) = create_test_store();
        store.create_user("dup", "pw", "doctor").unwrap();
        assert!(store.create_user("dup", "pw2", "admin").is_err());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (store, _temp) = create_test_store();

        assert_eq!(store.seed_default_users().unwrap(), 2);
        assert_eq!(store.seed_default_users().unwrap(), 0);

        let admin = store.find_by_username("admin").unwrap().unwrap();
        assert_eq!(admin.role, "admin");
        assert!(verify_password("@Doktari123", &admin.password_hash));

        let receptionist = store.find_by_username("receptionist").unwrap().unwrap();
        assert_eq!(receptionist.role, "receptionist");
    }

    #[test]
    fn test_schema_survives_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();

        UserStore::new(db_path, 4)
            .unwrap()
            .create_user("nurse", "pw", "doctor")
            .unwrap();

        let reopened = UserStore::new(db_path, 4).unwrap();
        assert!(reopened.find_by_username("nurse").unwrap().is_some());
    }
}
