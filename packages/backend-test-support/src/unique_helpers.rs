//! Unique values for tests that share a database or a process.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("game");
/// assert_ne!(a, unique_str("game"));
/// assert!(a.starts_with("game-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A unique, lowercase email under `example.test`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("player");
/// assert!(email.starts_with("player-"));
/// assert!(email.ends_with("@example.test"));
/// assert_eq!(email, email.to_lowercase());
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

/// A unique game name within the 3..=60 character bound.
pub fn unique_game_name(prefix: &str) -> String {
    // a ULID is 26 characters; keep the prefix short enough to fit
    let prefix: String = prefix.chars().take(30).collect();
    unique_str(&prefix)
}
