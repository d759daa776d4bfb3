use chrono::Utc;
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::models::{Question, Quiz, QuizDraft, QuizResult, User};
use crate::names;
use crate::store::Store;

/// Quiz repository: authoring, the approval gate, browsing and attempt
/// bookkeeping.
#[derive(Clone)]
pub struct QuizService {
    store: Store,
}

impl QuizService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Validate and persist a new quiz. Quizzes authored by an administrator
    /// go live immediately; everyone else's wait in the pending queue.
    pub async fn create(&self, draft: QuizDraft, creator: &User) -> Result<Quiz> {
        validate_draft(&draft)?;

        let quiz = Quiz {
            id: Ulid::new().to_string(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            questions: draft
                .questions
                .into_iter()
                .map(|q| Question {
                    id: Ulid::new().to_string(),
                    text: q.text,
                    options: q.options,
                    correct_option: q.correct_option,
                })
                .collect(),
            creator_id: creator.id.clone(),
            approved: creator.is_admin(),
            created_at: Utc::now(),
            play_count: 0,
            mean_accuracy: 0.0,
        };

        self.store.insert_quiz(quiz.clone()).await?;
        Ok(quiz)
    }

    pub async fn get(&self, quiz_id: &str) -> Result<Quiz> {
        self.store
            .quiz(quiz_id)
            .await?
            .ok_or_else(|| Error::QuizNotFound(quiz_id.to_string()))
    }

    /// One-way flip to approved. Idempotent: approving an already-approved
    /// quiz changes nothing and succeeds.
    pub async fn approve(&self, quiz_id: &str) -> Result<()> {
        match self.store.approve_quiz(quiz_id).await? {
            Some(_) => Ok(()),
            None => Err(Error::QuizNotFound(quiz_id.to_string())),
        }
    }

    pub async fn list_approved(&self) -> Result<Vec<Quiz>> {
        Ok(self.store.approved_quizzes().await?)
    }

    pub async fn list_pending(&self) -> Result<Vec<Quiz>> {
        Ok(self.store.pending_quizzes().await?)
    }

    pub async fn list_by_creator(&self, user_id: &str) -> Result<Vec<Quiz>> {
        Ok(self.store.quizzes_by_creator(user_id).await?)
    }

    /// Append a finished attempt. Bumps the quiz's play count and recomputes
    /// its mean accuracy from the full result history.
    pub async fn record_attempt(&self, result: QuizResult) -> Result<Quiz> {
        if result.total_questions == 0 || result.score > result.total_questions {
            return Err(Error::Validation(format!(
                "score {}/{} is not a possible outcome",
                result.score, result.total_questions
            )));
        }

        let quiz_id = result.quiz_id.clone();
        self.store
            .record_attempt(result)
            .await?
            .ok_or(Error::QuizNotFound(quiz_id))
    }

    /// Case-insensitive search over approved quizzes by title or
    /// description, optionally narrowed to one category.
    pub async fn search(&self, term: &str, category: Option<&str>) -> Result<Vec<Quiz>> {
        let term = term.trim().to_lowercase();
        let quizzes = self.store.approved_quizzes().await?;

        Ok(quizzes
            .into_iter()
            .filter(|quiz| {
                let matches_term = term.is_empty()
                    || quiz.title.to_lowercase().contains(&term)
                    || quiz.description.to_lowercase().contains(&term);
                let matches_category = category.is_none_or(|c| quiz.category == c);
                matches_term && matches_category
            })
            .collect())
    }

    /// Distinct categories across approved quizzes, sorted.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = self
            .store
            .approved_quizzes()
            .await?
            .into_iter()
            .map(|quiz| quiz.category)
            .collect();

        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

fn validate_draft(draft: &QuizDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(Error::Validation("quiz title must not be empty".to_string()));
    }
    if draft.description.trim().is_empty() {
        return Err(Error::Validation(
            "quiz description must not be empty".to_string(),
        ));
    }
    if draft.category.trim().is_empty() {
        return Err(Error::Validation(
            "quiz category must not be empty".to_string(),
        ));
    }
    if draft.questions.is_empty() {
        return Err(Error::Validation(
            "a quiz needs at least one question".to_string(),
        ));
    }

    for (idx, question) in draft.questions.iter().enumerate() {
        let number = idx + 1;
        if question.text.trim().is_empty() {
            return Err(Error::Validation(format!("question {number} has no text")));
        }
        if question.options.len() != names::OPTIONS_PER_QUESTION {
            return Err(Error::Validation(format!(
                "question {number} must have exactly {} answer options",
                names::OPTIONS_PER_QUESTION
            )));
        }
        if question.options.iter().any(|o| o.trim().is_empty()) {
            return Err(Error::Validation(format!(
                "question {number} has an empty answer option"
            )));
        }
        if question.correct_option >= question.options.len() {
            return Err(Error::Validation(format!(
                "question {number} marks answer option {} which does not exist",
                question.correct_option
            )));
        }
    }

    Ok(())
}
