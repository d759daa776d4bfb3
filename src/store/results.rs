use super::{persist_collection, Result, Store};
use crate::models::{Quiz, QuizResult};
use crate::names;

impl Store {
    /// Append a finished attempt and refresh the quiz's aggregates in one
    /// step. Returns the updated quiz, or `None` (with nothing applied) when
    /// the referenced quiz does not exist.
    pub async fn record_attempt(&self, result: QuizResult) -> Result<Option<Quiz>> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if !state.quizzes.iter().any(|q| q.id == result.quiz_id) {
            return Ok(None);
        }

        let quiz_id = result.quiz_id.clone();
        tracing::info!(
            "attempt recorded: quiz={quiz_id}, user={}, score={}/{}",
            result.user_id,
            result.score,
            result.total_questions
        );
        state.results.push(result);

        // Always recomputed over the full history, so the stored value can
        // never drift from what a from-scratch pass would produce.
        let mean = mean_accuracy(&state.results, &quiz_id);
        let updated = state
            .quizzes
            .iter_mut()
            .find(|q| q.id == quiz_id)
            .map(|quiz| {
                quiz.play_count += 1;
                quiz.mean_accuracy = mean;
                quiz.clone()
            });

        persist_collection(&self.dir, names::RESULTS_FILE, &state.results).await?;
        persist_collection(&self.dir, names::QUIZZES_FILE, &state.quizzes).await?;

        Ok(updated)
    }

    pub async fn results(&self) -> Result<Vec<QuizResult>> {
        let state = self.state.read().await;
        Ok(state.results.clone())
    }

    pub async fn results_for_quiz(&self, quiz_id: &str) -> Result<Vec<QuizResult>> {
        let state = self.state.read().await;
        Ok(state
            .results
            .iter()
            .filter(|r| r.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    pub async fn results_for_user(&self, user_id: &str) -> Result<Vec<QuizResult>> {
        let state = self.state.read().await;
        Ok(state
            .results
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    pub async fn results_count(&self) -> Result<usize> {
        let state = self.state.read().await;
        Ok(state.results.len())
    }
}

/// Mean of per-result accuracy for one quiz, as a percentage.
fn mean_accuracy(results: &[QuizResult], quiz_id: &str) -> f64 {
    let accuracies: Vec<f64> = results
        .iter()
        .filter(|r| r.quiz_id == quiz_id)
        .map(|r| r.score as f64 / r.total_questions as f64)
        .collect();

    if accuracies.is_empty() {
        return 0.0;
    }
    accuracies.iter().sum::<f64>() / accuracies.len() as f64 * 100.0
}
