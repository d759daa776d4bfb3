use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant};
use ulid::Ulid;

use super::{Attempt, Progress};
use crate::error::{Error, Result};
use crate::models::{Quiz, QuizResult};
use crate::services::QuizService;

/// Point-in-time snapshot of a running attempt, for rendering.
#[derive(Debug, Clone)]
pub struct AttemptView {
    pub quiz_id: String,
    pub current_index: usize,
    pub total_questions: usize,
    pub remaining_seconds: u64,
    pub selected: Option<usize>,
    pub finished: bool,
}

struct AttemptContext {
    attempt: Mutex<Attempt>,
    service: QuizService,
    user_id: String,
    quiz_id: String,
    total_questions: u32,
    started: Instant,
    outcome: watch::Sender<Option<Result<QuizResult>>>,
}

/// Drives one attempt in real time: a background task feeds the machine its
/// one-second ticks, and whichever path observes the finish (user advance or
/// timer expiry) records the result exactly once. Dropping the runner stops
/// the ticker, so an abandoned attempt can never write anything later.
pub struct AttemptRunner {
    ctx: Arc<AttemptContext>,
    ticker: JoinHandle<()>,
    outcome: watch::Receiver<Option<Result<QuizResult>>>,
}

impl AttemptRunner {
    /// Start the attempt and its countdown.
    pub fn start(
        quiz: Quiz,
        user_id: &str,
        service: QuizService,
        question_seconds: u64,
    ) -> Result<Self> {
        let quiz_id = quiz.id.clone();
        let total_questions = quiz.questions.len() as u32;
        let attempt = Attempt::new(quiz, question_seconds)?;

        let (outcome_tx, outcome_rx) = watch::channel(None);
        let ctx = Arc::new(AttemptContext {
            attempt: Mutex::new(attempt),
            service,
            user_id: user_id.to_string(),
            quiz_id,
            total_questions,
            started: Instant::now(),
            outcome: outcome_tx,
        });

        let ticker = tokio::spawn(run_ticker(Arc::clone(&ctx)));

        Ok(Self {
            ctx,
            ticker,
            outcome: outcome_rx,
        })
    }

    pub async fn select_answer(&self, option: usize) -> Result<()> {
        self.ctx.attempt.lock().await.select_answer(option)
    }

    /// Move to the next question. Finishing the last question stops the
    /// ticker and records the result before returning.
    pub async fn advance(&self) -> Result<Progress> {
        let progress = self.ctx.attempt.lock().await.advance()?;

        if let Progress::Finished(score) = progress {
            self.ticker.abort();
            finalize(&self.ctx, score).await?;
        }

        Ok(progress)
    }

    pub async fn view(&self) -> AttemptView {
        let attempt = self.ctx.attempt.lock().await;
        AttemptView {
            quiz_id: self.ctx.quiz_id.clone(),
            current_index: attempt.current_index(),
            total_questions: attempt.total_questions(),
            remaining_seconds: attempt.remaining_seconds(),
            selected: attempt.answer(attempt.current_index()),
            finished: attempt.is_finished(),
        }
    }

    /// Wait for the attempt to finish, by user action or by the timer, and
    /// return the recorded result. A storage failure while recording
    /// surfaces here as the error.
    pub async fn outcome(&self) -> Result<QuizResult> {
        let mut rx = self.outcome.clone();
        loop {
            {
                let current = rx.borrow();
                if let Some(finish) = current.as_ref() {
                    return finish.clone();
                }
            }
            rx.changed().await.map_err(|_| {
                Error::Validation("the attempt ended without a result".to_string())
            })?;
        }
    }

    /// Walk away mid-attempt: the countdown stops and nothing is recorded.
    pub fn abandon(self) {
        tracing::info!("attempt abandoned: quiz={}", self.ctx.quiz_id);
    }
}

impl Drop for AttemptRunner {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

async fn run_ticker(ctx: Arc<AttemptContext>) {
    let mut seconds = interval(Duration::from_secs(1));
    seconds.tick().await; // the first tick completes immediately

    loop {
        seconds.tick().await;
        let progress = ctx.attempt.lock().await.tick();
        match progress {
            Some(Progress::Finished(score)) => {
                if let Err(e) = finalize(&ctx, score).await {
                    tracing::error!("could not record attempt for quiz {}: {e}", ctx.quiz_id);
                }
                break;
            }
            Some(Progress::Next(_)) | None => {}
        }
    }
}

/// Build the immutable result, record it, and publish the recording outcome
/// to every waiter.
async fn finalize(ctx: &AttemptContext, score: u32) -> Result<()> {
    let result = QuizResult {
        id: Ulid::new().to_string(),
        user_id: ctx.user_id.clone(),
        quiz_id: ctx.quiz_id.clone(),
        score,
        total_questions: ctx.total_questions,
        elapsed_seconds: ctx.started.elapsed().as_secs(),
        submitted_at: Utc::now(),
    };

    let recorded = ctx
        .service
        .record_attempt(result.clone())
        .await
        .map(|_| result);
    let _ = ctx.outcome.send(Some(recorded.clone()));
    recorded.map(|_| ())
}
