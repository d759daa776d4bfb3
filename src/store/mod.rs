// Storage module - JSON collection files under one data directory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::error::StoreError;
use crate::models::{Quiz, QuizResult, Role, User};
use crate::names;

// Internal modules
mod quizzes;
mod results;
mod users;

type Result<T> = std::result::Result<T, StoreError>;

/// In-memory snapshot of every collection. Guarded by one lock so each
/// operation is a read-modify-write against a single consistent state.
#[derive(Default)]
struct Collections {
    users: Vec<User>,
    quizzes: Vec<Quiz>,
    results: Vec<QuizResult>,
    session: Option<User>,
}

// Main storage handle
#[derive(Clone)]
pub struct Store {
    state: Arc<RwLock<Collections>>,
    dir: PathBuf,
}

impl Store {
    /// Open the data directory and load every collection. Missing files are
    /// first-run empties; files that fail to parse are fatal here. Seeds the
    /// default administrator when no admin-role user exists yet.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io {
                path: dir.clone(),
                source: Arc::new(source),
            })?;

        let mut users: Vec<User> = load_collection(&dir, names::USERS_FILE)
            .await?
            .unwrap_or_default();
        let quizzes: Vec<Quiz> = load_collection(&dir, names::QUIZZES_FILE)
            .await?
            .unwrap_or_default();
        let results: Vec<QuizResult> = load_collection(&dir, names::RESULTS_FILE)
            .await?
            .unwrap_or_default();
        let session: Option<User> = load_collection(&dir, names::SESSION_FILE).await?;

        if !users.iter().any(|u| u.role == Role::Admin) {
            let admin = User {
                id: Ulid::new().to_string(),
                name: names::ADMIN_NAME.to_string(),
                email: names::ADMIN_EMAIL.to_string(),
                password: names::ADMIN_PASSWORD.to_string(),
                role: Role::Admin,
            };
            tracing::info!("seeded default administrator: {}", admin.email);
            users.push(admin);
            persist_collection(&dir, names::USERS_FILE, &users).await?;
        }

        tracing::info!(
            "record store opened at {}: {} users, {} quizzes, {} results",
            dir.display(),
            users.len(),
            quizzes.len(),
            results.len()
        );

        let state = Collections {
            users,
            quizzes,
            results,
            session,
        };

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            dir,
        })
    }
}

/// Read one collection file. `None` means the file does not exist yet.
async fn load_collection<T: DeserializeOwned>(
    dir: &Path,
    collection: &'static str,
) -> Result<Option<T>> {
    let path = dir.join(collection);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StoreError::Io {
            path,
            source: Arc::new(source),
        }),
    };

    let records = serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        collection,
        path,
        source: Arc::new(source),
    })?;

    Ok(Some(records))
}

/// Rewrite one collection file. Writes to a temp file first and renames it
/// into place, so the stored JSON is never a torn write.
async fn persist_collection<T: Serialize>(
    dir: &Path,
    collection: &'static str,
    records: &T,
) -> Result<()> {
    let path = dir.join(collection);
    let tmp = dir.join(format!("{collection}.tmp"));

    let bytes = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Encode {
        collection,
        source: Arc::new(source),
    })?;

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source: Arc::new(source),
        })?;
    tokio::fs::rename(&tmp, &path)
        .await
        .map_err(|source| StoreError::Io {
            path,
            source: Arc::new(source),
        })?;

    Ok(())
}

async fn remove_collection(dir: &Path, collection: &'static str) -> Result<()> {
    let path = dir.join(collection);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io {
            path,
            source: Arc::new(source),
        }),
    }
}
