use ulid::Ulid;

use crate::error::{Error, Result, StoreError};
use crate::models::{Role, User};
use crate::store::Store;

// ---------------------------------------------------------------------------
// AuthRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn email_exists(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    fn insert_user(
        &self,
        user: User,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, StoreError>> + Send;

    fn set_session(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    fn clear_session(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    fn session(&self)
        -> impl std::future::Future<Output = Result<Option<User>, StoreError>> + Send;
}

impl AuthRepository for Store {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Store::email_exists(self, email).await
    }

    async fn insert_user(&self, user: User) -> Result<(), StoreError> {
        Store::insert_user(self, user).await
    }

    async fn find_user(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        Store::find_user(self, email, password).await
    }

    async fn set_session(&self, user: &User) -> Result<(), StoreError> {
        Store::set_session(self, user).await
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        Store::clear_session(self).await
    }

    async fn session(&self) -> Result<Option<User>, StoreError> {
        Store::session(self).await
    }
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: AuthRepository = Store> {
    repo: R,
}

impl<R: AuthRepository + Clone> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a regular-role user. Does not log the new user in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(Error::Validation(
                "name, email and password are required".to_string(),
            ));
        }

        if self.repo.email_exists(email).await? {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: Ulid::new().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Regular,
        };
        self.repo.insert_user(user.clone()).await?;

        Ok(user)
    }

    /// Exact (email, password) match against the stored records. On success
    /// the full record becomes the durable session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .repo
            .find_user(email, password)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        self.repo.set_session(&user).await?;
        tracing::info!("user logged in: id={}, email={}", user.id, user.email);

        Ok(user)
    }

    pub async fn logout(&self) -> Result<()> {
        self.repo.clear_session().await?;
        Ok(())
    }

    /// Whoever logged in last, restored across restarts.
    pub async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.repo.session().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
