//! Retry policies for credential prompts.

/// Consecutive failed logins allowed before the session terminates.
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 5;

/// How many consecutive failures a credential check tolerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Give up once `max_attempts` consecutive attempts have failed.
    Bounded { max_attempts: u32 },
    /// Never give up; only the operator can cancel.
    Unbounded,
}

impl RetryPolicy {
    /// Whether another attempt is permitted after `failures` consecutive
    /// failures.
    pub fn allows(&self, failures: u32) -> bool {
        match self {
            Self::Bounded { max_attempts } => failures < *max_attempts,
            Self::Unbounded => true,
        }
    }

    /// Attempts left after `failures` failures, `None` when unbounded.
    pub fn remaining(&self, failures: u32) -> Option<u32> {
        match self {
            Self::Bounded { max_attempts } => Some(max_attempts.saturating_sub(failures)),
            Self::Unbounded => None,
        }
    }
}

/// Retry policies used by a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Applied to `login`.
    pub login: RetryPolicy,
    /// Applied to `unlock`.
    pub unlock: RetryPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login: RetryPolicy::Bounded {
                max_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            },
            unlock: RetryPolicy::Unbounded,
        }
    }
}

impl SessionConfig {
    /// Override the login attempt limit.
    pub fn with_max_login_attempts(mut self, max_attempts: u32) -> Self {
        self.login = RetryPolicy::Bounded { max_attempts };
        self
    }
}
