//! Credentials management infrastructure
//!
//! Two ways to supply what the static config does not hold:
//! - `InteractiveCredentials` prompts on the terminal, hiding the password
//! - `SuppliedCredentials` uses values given up front, for headless runs

use std::fmt;
use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Write};

use console::Term;

use crate::domain::errors::{MfaError, MfaResult};
use crate::domain::ports::CredentialProvider;

/// Prompt for a missing user name.
pub const USERNAME_PROMPT: &str = "Username:";
/// Prompt for the one-time code; an empty answer skips it.
pub const MFA_PROMPT: &str = "MFA Temporary Password (Press enter to skip):";

/// Prompts for credentials at run time
///
/// When stdin is a terminal, input is read through `console` so the
/// password is not echoed, whatever stdout is redirected to. Otherwise
/// lines are read from `input` as-is, which is what piped and test runs use.
pub struct InteractiveCredentials<R, W> {
    input: R,
    output: W,
    terminal: Option<Term>,
}

/// Stream whose terminal `console` drives for hidden input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptTerminal {
    Stdout,
    Stderr,
}

/// Pick the terminal to read through. Needs stdin on a terminal and at
/// least one output stream still attached to it.
const fn prompt_terminal(
    stdin_is_tty: bool,
    stdout_is_tty: bool,
    stderr_is_tty: bool,
) -> Option<PromptTerminal> {
    match (stdin_is_tty, stdout_is_tty, stderr_is_tty) {
        (false, _, _) | (true, false, false) => None,
        (true, true, _) => Some(PromptTerminal::Stdout),
        (true, false, true) => Some(PromptTerminal::Stderr),
    }
}

/// Prompts belong on stdout unless stdout is redirected or carries JSON.
const fn prompts_on_stderr(json_mode: bool, stdout_is_tty: bool) -> bool {
    json_mode || !stdout_is_tty
}

impl InteractiveCredentials<BufReader<Stdin>, Box<dyn Write>> {
    /// Prompt on the process streams.
    ///
    /// `json_mode` keeps prompts off stdout so it only carries the summary.
    pub fn new(json_mode: bool) -> Self {
        let (stdout, stderr) = (Term::stdout(), Term::stderr());
        let stdout_is_tty = stdout.is_term();
        let terminal = match prompt_terminal(
            io::stdin().is_terminal(),
            stdout_is_tty,
            stderr.is_term(),
        ) {
            Some(PromptTerminal::Stdout) => Some(stdout),
            Some(PromptTerminal::Stderr) => Some(stderr),
            None => None,
        };
        let output: Box<dyn Write> = if prompts_on_stderr(json_mode, stdout_is_tty) {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        Self {
            input: BufReader::new(io::stdin()),
            output,
            terminal,
        }
    }
}

impl<R: BufRead, W: Write> InteractiveCredentials<R, W> {
    /// Prompt on `output` and read plain lines from `input`.
    pub const fn from_streams(input: R, output: W) -> Self {
        Self {
            input,
            output,
            terminal: None,
        }
    }

    /// Consume the prompter, returning what was written to `output`.
    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, prompt: &str, secret: bool) -> MfaResult<String> {
        self.output
            .write_all(prompt.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(MfaError::Prompt)?;

        let line = match &self.terminal {
            Some(term) if secret => term.read_secure_line(),
            Some(term) => term.read_line(),
            None => read_input_line(&mut self.input),
        };
        line.map_err(MfaError::Prompt)
    }
}

impl<R: BufRead, W: Write> CredentialProvider for InteractiveCredentials<R, W> {
    fn username(&mut self) -> MfaResult<String> {
        Ok(self.prompt(USERNAME_PROMPT, false)?.trim().to_string())
    }

    fn password(&mut self, username: &str) -> MfaResult<String> {
        self.prompt(&format!("Password for {username}:"), true)
    }

    fn mfa_code(&mut self) -> MfaResult<String> {
        Ok(self.prompt(MFA_PROMPT, false)?.trim().to_string())
    }
}

fn read_input_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
}

/// Credentials supplied without prompting
///
/// A missing username or password is an error; a missing MFA code means
/// no code.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SuppliedCredentials {
    /// From `--username`
    pub username: Option<String>,
    /// From `--password`
    pub password: Option<String>,
    /// From `--mfa-code`
    pub mfa_code: Option<String>,
}

impl SuppliedCredentials {
    /// Credentials from already-known values.
    pub const fn new(
        username: Option<String>,
        password: Option<String>,
        mfa_code: Option<String>,
    ) -> Self {
        Self {
            username,
            password,
            mfa_code,
        }
    }
}

impl fmt::Debug for SuppliedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuppliedCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("mfa_code", &self.mfa_code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CredentialProvider for SuppliedCredentials {
    fn username(&mut self) -> MfaResult<String> {
        self.username
            .clone()
            .ok_or(MfaError::MissingCredential("username"))
    }

    fn password(&mut self, _username: &str) -> MfaResult<String> {
        self.password
            .clone()
            .ok_or(MfaError::MissingCredential("password"))
    }

    fn mfa_code(&mut self) -> MfaResult<String> {
        Ok(self.mfa_code.clone().unwrap_or_default())
    }
}
