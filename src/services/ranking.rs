use crate::error::Result;
use crate::models::{Quiz, QuizResult, Role};
use crate::store::Store;

/// One leaderboard row. Accuracy is rounded to a whole percent for display;
/// the underlying results stay exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub name: String,
    pub total_score: u64,
    pub quizzes_taken: usize,
    pub mean_accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStats {
    pub regular_users: usize,
    pub quizzes: usize,
    pub pending_quizzes: usize,
    pub attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorStats {
    pub created: usize,
    pub approved: usize,
    pub total_plays: u64,
}

/// Derived views over the full history. Nothing here is cached; every call
/// recomputes from the store.
#[derive(Clone)]
pub struct RankingService {
    store: Store,
    leaderboard_size: usize,
}

impl RankingService {
    pub fn new(store: Store, leaderboard_size: usize) -> Self {
        Self {
            store,
            leaderboard_size,
        }
    }

    /// Every regular user ranked by total score. The sort is stable, so
    /// users with equal scores keep their registration order.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let users = self.store.users().await?;
        let results = self.store.results().await?;

        let mut entries: Vec<LeaderboardEntry> = users
            .into_iter()
            .filter(|user| user.role == Role::Regular)
            .map(|user| {
                let mine: Vec<&QuizResult> =
                    results.iter().filter(|r| r.user_id == user.id).collect();
                let total_score = mine.iter().map(|r| u64::from(r.score)).sum();
                let mean_accuracy = if mine.is_empty() {
                    0
                } else {
                    let mean = mine
                        .iter()
                        .map(|r| f64::from(r.score) / f64::from(r.total_questions))
                        .sum::<f64>()
                        / mine.len() as f64;
                    (mean * 100.0).round() as u32
                };

                LeaderboardEntry {
                    user_id: user.id,
                    name: user.name,
                    total_score,
                    quizzes_taken: mine.len(),
                    mean_accuracy,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        Ok(entries)
    }

    /// Approved quizzes by play count, most played first, capped at the
    /// configured list size.
    pub async fn popular_quizzes(&self) -> Result<Vec<Quiz>> {
        let mut quizzes = self.store.approved_quizzes().await?;
        quizzes.sort_by(|a, b| b.play_count.cmp(&a.play_count));
        quizzes.truncate(self.leaderboard_size);
        Ok(quizzes)
    }

    /// The admin dashboard counters.
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let users = self.store.users().await?;
        let quizzes = self.store.quizzes().await?;
        let attempts = self.store.results_count().await?;

        Ok(PlatformStats {
            regular_users: users.iter().filter(|u| u.role == Role::Regular).count(),
            quizzes: quizzes.len(),
            pending_quizzes: quizzes.iter().filter(|q| !q.approved).count(),
            attempts,
        })
    }

    /// What one author sees about their own quizzes.
    pub async fn creator_stats(&self, user_id: &str) -> Result<CreatorStats> {
        let quizzes = self.store.quizzes_by_creator(user_id).await?;

        Ok(CreatorStats {
            created: quizzes.len(),
            approved: quizzes.iter().filter(|q| q.approved).count(),
            total_plays: quizzes.iter().map(|q| u64::from(q.play_count)).sum(),
        })
    }
}
