pub mod auth;
pub mod quiz;
pub mod ranking;

pub use auth::AuthService;
pub use quiz::QuizService;
pub use ranking::RankingService;
