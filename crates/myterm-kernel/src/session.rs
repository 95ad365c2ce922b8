//! Session state machine.
//!
//! ```text
//! Unauthenticated ──register/login──▶ Authenticated(Unlocked) ◀──unlock──┐
//!        │                                   │        └──lock──▶ Authenticated(Locked)
//!        └──login attempts exhausted──┐      │
//!                                     ▼      ▼
//!                                   Terminated
//! ```
//!
//! The session owns the credential store handle and, once authenticated, the
//! account's workspace and a snapshot of its preferences. Every operation
//! that needs the workspace refuses to run while the session is locked.

use std::fmt;

use tracing::{info, warn};

use myterm_store::{Preferences, Workspace};
use myterm_vault::{AccountRef, AccountStore, VaultError, crypto};

use crate::error::{KernelError, Result};
use crate::paths::AppPaths;
use crate::policy::SessionConfig;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Lock state of an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(LockState),
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticated(LockState::Unlocked) => write!(f, "unlocked"),
            Self::Authenticated(LockState::Locked) => write!(f, "locked"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// Everything the session knows about the logged-in account.
#[derive(Debug)]
struct ActiveAccount {
    account: AccountRef,
    workspace: Workspace,
    preferences: Preferences,
    has_pin: bool,
    lock: LockState,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One operator session.
#[derive(Debug)]
pub struct Session {
    paths: AppPaths,
    accounts: AccountStore,
    config: SessionConfig,
    active: Option<ActiveAccount>,
    terminated: bool,
    failed_logins: u32,
    failed_unlocks: u32,
}

impl Session {
    /// Open a session over the credential store in `paths`.
    pub fn open(paths: AppPaths, config: SessionConfig) -> Result<Self> {
        let accounts = AccountStore::open(paths.users_file())?;
        Ok(Self {
            paths,
            accounts,
            config,
            active: None,
            terminated: false,
            failed_logins: 0,
            failed_unlocks: 0,
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.terminated {
            return SessionState::Terminated;
        }
        match &self.active {
            None => SessionState::Unauthenticated,
            Some(active) => SessionState::Authenticated(active.lock),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state() == SessionState::Authenticated(LockState::Locked)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// `true` when no account exists yet (first run).
    pub fn needs_registration(&self) -> Result<bool> {
        Ok(self.accounts.is_empty()?)
    }

    /// Username of the logged-in account.
    pub fn username(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.account.username())
    }

    /// Preference snapshot of the logged-in account, readable even while
    /// locked so the front-end can keep rendering.
    pub fn preferences(&self) -> Option<&Preferences> {
        self.active.as_ref().map(|a| &a.preferences)
    }

    /// Whether the logged-in account has a PIN.
    pub fn has_pin(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.has_pin)
    }

    /// Consecutive failed logins so far.
    pub fn failed_logins(&self) -> u32 {
        self.failed_logins
    }

    /// Login attempts left, `None` when the policy is unbounded.
    pub fn remaining_login_attempts(&self) -> Option<u32> {
        self.config.login.remaining(self.failed_logins)
    }

    // -- Authentication -----------------------------------------------------

    /// Create an account, optionally with a PIN, and log it in.
    ///
    /// The PIN format is checked before anything is written.
    pub fn register(&mut self, username: &str, password: &str, pin: Option<&str>) -> Result<()> {
        self.expect_state(SessionState::Unauthenticated, "register")?;
        if let Some(pin) = pin
            && !crypto::is_valid_pin(pin)
        {
            return Err(VaultError::InvalidPin.into());
        }

        let account = self.accounts.register(username, password)?;
        if pin.is_some() {
            self.accounts.set_pin(&account, None, pin)?;
        }
        info!(username = %account, with_pin = pin.is_some(), "account registered");
        self.activate(account)
    }

    /// Log in with a password.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidCredentials`] on a bad username or password.
    /// Once the login policy is exhausted the session becomes
    /// [`SessionState::Terminated`] and [`KernelError::LoginAttemptsExhausted`]
    /// is returned.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.expect_state(SessionState::Unauthenticated, "log in")?;
        match self.accounts.authenticate(username, password) {
            Ok(account) => {
                self.failed_logins = 0;
                info!(username = %account, "login successful");
                self.activate(account)
            }
            Err(VaultError::InvalidCredentials) => {
                self.failed_logins += 1;
                warn!(failures = self.failed_logins, "login failed");
                if !self.config.login.allows(self.failed_logins) {
                    self.terminate();
                    return Err(KernelError::LoginAttemptsExhausted);
                }
                Err(VaultError::InvalidCredentials.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn activate(&mut self, account: AccountRef) -> Result<()> {
        let workspace = Workspace::new(self.paths.user_root(account.username()), account.username());
        workspace.init()?;
        let preferences = workspace.get_preferences();
        let has_pin = self.accounts.has_pin(&account)?;
        self.active = Some(ActiveAccount {
            account,
            workspace,
            preferences,
            has_pin,
            lock: LockState::Unlocked,
        });
        Ok(())
    }

    // -- Lock ---------------------------------------------------------------

    /// Lock the session. Requires a PIN.
    pub fn lock(&mut self) -> Result<()> {
        let active = self.unlocked_mut("lock")?;
        if !active.has_pin {
            return Err(KernelError::NoPinSet);
        }
        active.lock = LockState::Locked;
        info!(username = %active.account, "session locked");
        self.failed_unlocks = 0;
        Ok(())
    }

    /// Unlock a locked session with the account PIN.
    ///
    /// A wrong PIN leaves the session locked and returns
    /// [`VaultError::IncorrectPin`].
    pub fn unlock(&mut self, pin: &str) -> Result<()> {
        let state = self.state();
        let Some(active) = self.active.as_mut().filter(|a| a.lock == LockState::Locked) else {
            return Err(KernelError::InvalidTransition {
                action: "unlock",
                state: state.to_string(),
            });
        };

        if self.accounts.verify_pin(&active.account, pin)? {
            active.lock = LockState::Unlocked;
            info!(username = %active.account, "session unlocked");
            self.failed_unlocks = 0;
            return Ok(());
        }

        self.failed_unlocks += 1;
        warn!(failures = self.failed_unlocks, "unlock failed");
        if !self.config.unlock.allows(self.failed_unlocks) {
            self.terminate();
            return Err(KernelError::UnlockAttemptsExhausted);
        }
        Err(VaultError::IncorrectPin.into())
    }

    // -- PIN management -----------------------------------------------------

    /// Check `pin` against the account PIN without changing anything.
    pub fn verify_pin(&self, pin: &str) -> Result<bool> {
        let active = self.unlocked("verify PIN")?;
        Ok(self.accounts.verify_pin(&active.account, pin)?)
    }

    /// Set or change the PIN. `old` is required when a PIN exists.
    pub fn set_pin(&mut self, old: Option<&str>, new: &str) -> Result<()> {
        let active = self.unlocked("set PIN")?;
        self.accounts.set_pin(&active.account, old, Some(new))?;
        self.refresh_pin()
    }

    /// Remove the PIN after checking `current`.
    pub fn clear_pin(&mut self, current: &str) -> Result<()> {
        let active = self.unlocked("clear PIN")?;
        if !active.has_pin {
            return Err(KernelError::NoPinSet);
        }
        self.accounts.set_pin(&active.account, Some(current), None)?;
        self.refresh_pin()
    }

    fn refresh_pin(&mut self) -> Result<()> {
        let has_pin = {
            let active = self.unlocked("refresh PIN")?;
            self.accounts.has_pin(&active.account)?
        };
        self.unlocked_mut("refresh PIN")?.has_pin = has_pin;
        Ok(())
    }

    // -- Workspace & preferences -------------------------------------------

    /// The logged-in account's workspace.
    pub fn workspace(&self) -> Result<&Workspace> {
        Ok(&self.unlocked("access workspace")?.workspace)
    }

    /// Apply `update` to the preference snapshot and persist it.
    ///
    /// The snapshot only changes once the write succeeded.
    pub fn update_preferences(&mut self, update: impl FnOnce(&mut Preferences)) -> Result<()> {
        let active = self.unlocked_mut("update preferences")?;
        let mut next = active.preferences.clone();
        update(&mut next);
        active.workspace.save_preferences(&next)?;
        active.preferences = next;
        Ok(())
    }

    // -- Lifecycle ----------------------------------------------------------

    /// End the session. Idempotent.
    pub fn terminate(&mut self) {
        if !self.terminated {
            info!(username = self.username().unwrap_or("-"), "session terminated");
        }
        self.terminated = true;
    }

    // -- Internal helpers ---------------------------------------------------

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<()> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(KernelError::InvalidTransition {
                action,
                state: state.to_string(),
            })
        }
    }

    fn unlocked(&self, action: &'static str) -> Result<&ActiveAccount> {
        match self.state() {
            SessionState::Authenticated(LockState::Unlocked) => {
                self.active.as_ref().ok_or(KernelError::NotAuthenticated)
            }
            SessionState::Authenticated(LockState::Locked) => Err(KernelError::SessionLocked),
            SessionState::Unauthenticated => Err(KernelError::NotAuthenticated),
            SessionState::Terminated => Err(KernelError::InvalidTransition {
                action,
                state: SessionState::Terminated.to_string(),
            }),
        }
    }

    fn unlocked_mut(&mut self, action: &'static str) -> Result<&mut ActiveAccount> {
        self.unlocked(action)?;
        self.active.as_mut().ok_or(KernelError::NotAuthenticated)
    }
}
