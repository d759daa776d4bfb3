use super::{persist_collection, remove_collection, Result, Store};
use crate::models::User;
use crate::names;

impl Store {
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.users.iter().any(|u| u.email == email))
    }

    pub async fn insert_user(&self, user: User) -> Result<()> {
        let mut state = self.state.write().await;
        tracing::info!("new user created: id={}, email={}", user.id, user.email);
        state.users.push(user);
        persist_collection(&self.dir, names::USERS_FILE, &state.users).await
    }

    /// Exact match on both email and password. Case-sensitive on purpose:
    /// that is the comparison the stored records were written for.
    pub async fn find_user(&self, email: &str, password: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .cloned())
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        let state = self.state.read().await;
        Ok(state.users.clone())
    }

    /// Store the logged-in user's full record durably, so the session
    /// survives a restart without any token machinery.
    pub async fn set_session(&self, user: &User) -> Result<()> {
        let mut state = self.state.write().await;
        state.session = Some(user.clone());
        persist_collection(&self.dir, names::SESSION_FILE, user).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.session = None;
        remove_collection(&self.dir, names::SESSION_FILE).await
    }

    pub async fn session(&self) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.session.clone())
    }
}
