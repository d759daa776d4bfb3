// Quiz-taking engine: a pure state machine driven by seconds and user input,
// plus the async runner that supplies the seconds.

use crate::error::{Error, Result};
use crate::models::Quiz;

pub mod runner;
pub use runner::{AttemptRunner, AttemptView};

/// What an applied transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved on to the question at this index, countdown reset.
    Next(usize),
    /// The attempt is over with this final score.
    Finished(u32),
}

enum Phase {
    InProgress,
    Finished(u32),
}

/// One run through a quiz. Navigation is strictly forward; every question
/// holds at most one recorded answer, and an unanswered question simply
/// counts as incorrect. The machine knows nothing about clocks or storage:
/// feed it `tick` once per second and it does the rest.
pub struct Attempt {
    quiz: Quiz,
    answers: Vec<Option<usize>>,
    current: usize,
    remaining: u64,
    question_seconds: u64,
    phase: Phase,
}

impl Attempt {
    pub fn new(quiz: Quiz, question_seconds: u64) -> Result<Self> {
        if quiz.questions.is_empty() {
            return Err(Error::Validation(format!(
                "quiz {} has no questions to take",
                quiz.id
            )));
        }

        let answers = vec![None; quiz.questions.len()];
        Ok(Self {
            quiz,
            answers,
            current: 0,
            remaining: question_seconds,
            question_seconds,
            phase: Phase::InProgress,
        })
    }

    /// Record (or overwrite) the answer for the current question. Rejects
    /// options that do not exist rather than storing them.
    pub fn select_answer(&mut self, option: usize) -> Result<()> {
        self.ensure_in_progress()?;

        let option_count = self.quiz.questions[self.current].options.len();
        if option >= option_count {
            return Err(Error::Validation(format!(
                "answer option {option} is out of range for question {}",
                self.current + 1
            )));
        }

        self.answers[self.current] = Some(option);
        Ok(())
    }

    /// Move to the next question, or finish after the last one. There is no
    /// way back to an earlier question.
    pub fn advance(&mut self) -> Result<Progress> {
        self.ensure_in_progress()?;

        if self.current + 1 >= self.quiz.questions.len() {
            let score = self.final_score();
            self.phase = Phase::Finished(score);
            Ok(Progress::Finished(score))
        } else {
            self.current += 1;
            self.remaining = self.question_seconds;
            Ok(Progress::Next(self.current))
        }
    }

    /// One second of countdown. When the timer runs out the current question
    /// stays unanswered and the attempt advances on its own. Ticks after the
    /// finish are inert.
    pub fn tick(&mut self) -> Option<Progress> {
        if self.is_finished() {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return self.advance().ok();
        }
        None
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn answer(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// The final score, once the attempt has finished.
    pub fn score(&self) -> Option<u32> {
        match self.phase {
            Phase::InProgress => None,
            Phase::Finished(score) => Some(score),
        }
    }

    fn final_score(&self) -> u32 {
        self.quiz
            .questions
            .iter()
            .zip(self.answers.iter())
            .filter(|(question, answer)| **answer == Some(question.correct_option))
            .count() as u32
    }

    fn ensure_in_progress(&self) -> Result<()> {
        match self.phase {
            Phase::InProgress => Ok(()),
            Phase::Finished(_) => Err(Error::Validation(
                "the attempt is already finished".to_string(),
            )),
        }
    }
}
