pub mod attempt;
pub mod config;
pub mod error;
pub mod models;
pub mod names;
pub mod services;
pub mod store;

use attempt::AttemptRunner;
use config::Config;
use error::{Error, Result};
use models::User;
use services::{AuthService, QuizService, RankingService};
use store::Store;

/// The record store and the services wired over it. The embedding
/// application decides how to present these; there is no built-in UI.
#[derive(Clone)]
pub struct Platform {
    pub auth: AuthService,
    pub quizzes: QuizService,
    pub ranking: RankingService,
    config: Config,
}

impl Platform {
    pub async fn open(config: Config) -> Result<Self> {
        let store = Store::open(config.data_dir.clone()).await?;

        let auth = AuthService::new(store.clone());
        let quizzes = QuizService::new(store.clone());
        let ranking = RankingService::new(store, config.leaderboard_size);

        Ok(Self {
            auth,
            quizzes,
            ranking,
            config,
        })
    }

    /// Begin taking an approved quiz: loads it and starts the countdown.
    pub async fn start_attempt(&self, quiz_id: &str, user: &User) -> Result<AttemptRunner> {
        let quiz = self.quizzes.get(quiz_id).await?;
        if !quiz.approved {
            return Err(Error::Validation(format!(
                "quiz {quiz_id} is still awaiting approval"
            )));
        }

        AttemptRunner::start(
            quiz,
            &user.id,
            self.quizzes.clone(),
            self.config.question_seconds,
        )
    }
}
