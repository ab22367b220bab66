/// Application name
pub const APP_NAME: &str = "Kiss or Slap";

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Points charged for every KISS or SLAP submission.
pub const DEFAULT_ACTION_FEE: i64 = 10;

/// Balance granted to a user on first authentication.
pub const DEFAULT_STARTING_POINTS: i64 = 100;

/// Payout to each side of a MUTUAL_KISS.
pub const MUTUAL_KISS_PAYOUT: i64 = 10;

/// Payout to each side of a MUTUAL_SLAP.
pub const MUTUAL_SLAP_PAYOUT: i64 = 5;

/// Payout to the slapper when the other side kissed.
pub const RUG_PAYOUT: i64 = 15;

/// Initial hot / karma scores for new users
pub const DEFAULT_HOT_SCORE: i64 = 50;
pub const DEFAULT_KARMA_SCORE: i64 = 50;

/// Username length bounds (inclusive)
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 10;

/// Maximum bio length in characters
pub const MAX_BIO_LEN: usize = 500;

/// Minimum age to complete onboarding
pub const MIN_AGE_YEARS: i32 = 18;

/// Maximum chat message length in characters
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Default number of candidates returned per stack request
pub const DEFAULT_CANDIDATE_LIMIT: u32 = 50;

/// Default leaderboard page size
pub const DEFAULT_LEADERBOARD_PAGE_SIZE: u32 = 10;
