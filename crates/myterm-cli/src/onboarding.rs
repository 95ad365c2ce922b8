//! Login and registration before the shell starts.
//!
//! A fresh install goes straight to registration. Otherwise the operator
//! picks login or register. Every step reads from a `BufRead` and writes to
//! a `Write`, so the whole flow runs against scripted input in tests.

use std::io::{BufRead, Write};

use tracing::info;

use myterm_kernel::{KernelError, Session};
use myterm_vault::{VaultError, crypto, validate_username};

use crate::console::read_answer;
use crate::theme::{CYAN, GREEN, RED, paint};

/// How the pre-shell flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// An account is logged in; start the shell.
    Authenticated,
    /// Too many failed logins; exit with a failure status.
    Exhausted,
    /// Input ended before anyone logged in.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Log in or register, depending on what the operator chooses.
pub fn authenticate(
    session: &mut Session,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
) -> anyhow::Result<AuthOutcome> {
    writeln!(out, "{}", paint(CYAN, "Welcome to your Personal Terminal."))?;

    if session.needs_registration()? {
        writeln!(out, "{}", paint(GREEN, "No users found. Let's create your account."))?;
        return step_register(session, stdin, out);
    }

    loop {
        let Some(choice) = ask(stdin, out, "Do you want to (l)ogin or (r)egister? [l/r]: ")? else {
            return Ok(AuthOutcome::Cancelled);
        };
        match choice.to_lowercase().as_str() {
            "l" => return step_login(session, stdin, out),
            "r" => return step_register(session, stdin, out),
            _ => continue,
        }
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn step_register(
    session: &mut Session,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
) -> anyhow::Result<AuthOutcome> {
    let existing = session.accounts().list_accounts()?;
    let username = loop {
        let Some(name) = ask(stdin, out, "Choose a username: ")? else {
            return Ok(AuthOutcome::Cancelled);
        };
        if name.is_empty() {
            writeln!(out, "Username cannot be empty.")?;
        } else if let Err(VaultError::InvalidInput { reason }) = validate_username(&name) {
            writeln!(out, "Invalid username: {reason}.")?;
        } else if existing.contains(&name) {
            writeln!(out, "User already exists. Pick another name.")?;
        } else {
            break name;
        }
    };

    let password = loop {
        let Some(password) = ask(stdin, out, "Choose a password: ")? else {
            return Ok(AuthOutcome::Cancelled);
        };
        if password.is_empty() {
            writeln!(out, "Password cannot be empty.")?;
            continue;
        }
        let Some(confirm) = ask(stdin, out, "Confirm password: ")? else {
            return Ok(AuthOutcome::Cancelled);
        };
        if confirm == password {
            break password;
        }
        writeln!(out, "Passwords do not match.")?;
    };

    let Some(wants_pin) = ask(stdin, out, "Set a 4-8 digit PIN? (optional) [y/N]: ")? else {
        return Ok(AuthOutcome::Cancelled);
    };
    let pin = if wants_pin.eq_ignore_ascii_case("y") {
        loop {
            let Some(pin) = ask(stdin, out, "Enter PIN (4-8 digits): ")? else {
                return Ok(AuthOutcome::Cancelled);
            };
            if crypto::is_valid_pin(&pin) {
                break Some(pin);
            }
            writeln!(out, "Invalid PIN. Use 4-8 digits.")?;
        }
    } else {
        None
    };

    session.register(&username, &password, pin.as_deref())?;
    writeln!(
        out,
        "{}",
        paint(GREEN, &format!("User '{username}' registered and logged in."))
    )?;
    Ok(AuthOutcome::Authenticated)
}

fn step_login(
    session: &mut Session,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
) -> anyhow::Result<AuthOutcome> {
    loop {
        let Some(username) = ask(stdin, out, "Username: ")? else {
            return Ok(AuthOutcome::Cancelled);
        };
        let Some(password) = ask(stdin, out, "Password: ")? else {
            return Ok(AuthOutcome::Cancelled);
        };

        match session.login(&username, &password) {
            Ok(()) => {
                writeln!(out, "{}", paint(GREEN, "Login successful."))?;
                return Ok(AuthOutcome::Authenticated);
            }
            Err(KernelError::Vault(VaultError::InvalidCredentials)) => {
                writeln!(out, "{}", paint(RED, "Invalid credentials."))?;
            }
            Err(KernelError::LoginAttemptsExhausted) => {
                writeln!(out, "{}", paint(RED, "Invalid credentials."))?;
                writeln!(out, "Too many failed attempts. Exiting.")?;
                info!("login attempts exhausted");
                return Ok(AuthOutcome::Exhausted);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn ask(stdin: &mut dyn BufRead, out: &mut dyn Write, label: &str) -> anyhow::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let answer = read_answer(stdin)?;
    if answer.is_none() {
        writeln!(out)?;
    }
    Ok(answer)
}
