use super::{persist_collection, Result, Store};
use crate::models::Quiz;
use crate::names;

impl Store {
    pub async fn insert_quiz(&self, quiz: Quiz) -> Result<()> {
        let mut state = self.state.write().await;
        tracing::info!(
            "new quiz created: id={}, creator={}, approved={}",
            quiz.id,
            quiz.creator_id,
            quiz.approved
        );
        state.quizzes.push(quiz);
        persist_collection(&self.dir, names::QUIZZES_FILE, &state.quizzes).await
    }

    pub async fn quiz(&self, quiz_id: &str) -> Result<Option<Quiz>> {
        let state = self.state.read().await;
        Ok(state.quizzes.iter().find(|q| q.id == quiz_id).cloned())
    }

    /// Flip a quiz to approved. Returns `None` when the id is unknown and
    /// `Some(changed)` otherwise; approving twice is a no-op.
    pub async fn approve_quiz(&self, quiz_id: &str) -> Result<Option<bool>> {
        let mut state = self.state.write().await;
        let Some(quiz) = state.quizzes.iter_mut().find(|q| q.id == quiz_id) else {
            return Ok(None);
        };

        if quiz.approved {
            return Ok(Some(false));
        }
        quiz.approved = true;
        tracing::info!("quiz approved: id={quiz_id}");

        persist_collection(&self.dir, names::QUIZZES_FILE, &state.quizzes).await?;
        Ok(Some(true))
    }

    pub async fn quizzes(&self) -> Result<Vec<Quiz>> {
        let state = self.state.read().await;
        Ok(state.quizzes.clone())
    }

    pub async fn approved_quizzes(&self) -> Result<Vec<Quiz>> {
        let state = self.state.read().await;
        Ok(state
            .quizzes
            .iter()
            .filter(|q| q.approved)
            .cloned()
            .collect())
    }

    pub async fn pending_quizzes(&self) -> Result<Vec<Quiz>> {
        let state = self.state.read().await;
        Ok(state
            .quizzes
            .iter()
            .filter(|q| !q.approved)
            .cloned()
            .collect())
    }

    pub async fn quizzes_by_creator(&self, user_id: &str) -> Result<Vec<Quiz>> {
        let state = self.state.read().await;
        Ok(state
            .quizzes
            .iter()
            .filter(|q| q.creator_id == user_id)
            .cloned()
            .collect())
    }
}
