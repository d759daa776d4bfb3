// Collection files under the data directory
pub const USERS_FILE: &str = "users.json";
pub const QUIZZES_FILE: &str = "quizzes.json";
pub const RESULTS_FILE: &str = "results.json";
pub const SESSION_FILE: &str = "session.json";

// Seeded administrator account. A demo convenience, not a security posture:
// the account exists so a fresh store always has someone who can approve.
pub const ADMIN_NAME: &str = "Administrator";
pub const ADMIN_EMAIL: &str = "admin@quiz.com";
pub const ADMIN_PASSWORD: &str = "admin123";

// Authoring rules
pub const OPTIONS_PER_QUESTION: usize = 4;

// Defaults
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_QUESTION_SECONDS: u64 = 60;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
