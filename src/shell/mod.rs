//! Shell command capture
//!
//! CMT is driven through the shell so that queries can run in another
//! directory with `(cd <dir>; cmt ...)`. Both output streams and the exit
//! status are handed back to the caller; a failing command is not an error
//! here, only a shell that cannot be started at all is.

use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Shell errors
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Failed to start shell `{shell}`: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a command printed, plus how it exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can run a shell command line and capture its output
pub trait ShellRunner {
    fn capture(&self, command: &str) -> Result<CapturedOutput, ShellError>;
}

impl<T: ShellRunner + ?Sized> ShellRunner for &T {
    fn capture(&self, command: &str) -> Result<CapturedOutput, ShellError> {
        (**self).capture(command)
    }
}

/// Runs commands with `<shell> -c`
#[derive(Debug, Clone)]
pub struct SystemShell {
    shell: String,
}

impl SystemShell {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner for SystemShell {
    fn capture(&self, command: &str) -> Result<CapturedOutput, ShellError> {
        debug!("Running: {} -c {:?}", self.shell, command);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .output()
            .map_err(|source| ShellError::Spawn {
                shell: self.shell.clone(),
                source,
            })?;

        Ok(CapturedOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status.code(),
        })
    }
}

/// Quote a word for the shell, leaving it untouched when nothing in it needs quoting
pub fn quote_arg(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./~+,:@%=".contains(c));

    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
