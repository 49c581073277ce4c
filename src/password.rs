//! One-time mailbox passwords

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of passwords issued to new mailboxes.
pub const PASSWORD_LENGTH: usize = 32;

/// Generate a random password of `length` characters drawn uniformly
/// from `A-Z`, `a-z` and `0-9`.
#[must_use]
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
