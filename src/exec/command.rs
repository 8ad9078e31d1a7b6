// src/exec/command.rs

//! Argument-vector assembly.
//!
//! Callers pass a list of [`Token`]s, any of which may be absent. Absent
//! tokens are skipped during assembly, which lets a script include optional
//! arguments inline:
//!
//! ```
//! use gir::argv;
//! use gir::exec::ProcessCommand;
//!
//! let branch: Option<&str> = None;
//! let command = ProcessCommand::from_tokens(argv!["git", "push", branch, "origin"]);
//! assert_eq!(command.argv(), ["git", "push", "origin"]);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{GirError, Result};

/// One possibly-absent command-line argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token(Option<String>);

impl Token {
    pub fn absent() -> Self {
        Token(None)
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token(Some(value.to_string()))
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token(Some(value))
    }
}

impl From<&String> for Token {
    fn from(value: &String) -> Self {
        Token(Some(value.clone()))
    }
}

impl From<Option<&str>> for Token {
    fn from(value: Option<&str>) -> Self {
        Token(value.map(str::to_string))
    }
}

impl From<Option<String>> for Token {
    fn from(value: Option<String>) -> Self {
        Token(value)
    }
}

impl From<Option<&String>> for Token {
    fn from(value: Option<&String>) -> Self {
        Token(value.cloned())
    }
}

/// Non UTF-8 paths are converted lossily.
impl From<&Path> for Token {
    fn from(value: &Path) -> Self {
        Token(Some(value.to_string_lossy().into_owned()))
    }
}

impl From<PathBuf> for Token {
    fn from(value: PathBuf) -> Self {
        Token::from(value.as_path())
    }
}

impl From<&PathBuf> for Token {
    fn from(value: &PathBuf) -> Self {
        Token::from(value.as_path())
    }
}

/// Build a `Vec<Token>` from expressions of mixed types.
///
/// Each expression may be anything with a `From` conversion into
/// [`Token`]: string slices, owned strings, paths or `Option`s of those.
#[macro_export]
macro_rules! argv {
    ($($token:expr),* $(,)?) => {
        ::std::vec![$($crate::exec::Token::from($token)),*]
    };
}

/// An ordered argument vector plus the directory to run it in.
///
/// The first element of [`argv`](ProcessCommand::argv) is the program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessCommand {
    argv: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        let mut command = Self::new();
        command.args(tokens);
        command
    }

    /// Append every present token, in order. Absent tokens are skipped.
    pub fn args<I, T>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        self.argv
            .extend(tokens.into_iter().filter_map(|token| Into::<Token>::into(token).into_inner()));
        self
    }

    pub fn arg(&mut self, token: impl Into<Token>) -> &mut Self {
        self.args(std::iter::once(token))
    }

    pub fn current_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Translate into a `std::process::Command`.
    pub fn to_command(&self) -> Result<std::process::Command> {
        let (program, args) = self.argv.split_first().ok_or(GirError::EmptyCommand)?;

        let mut command = std::process::Command::new(program);
        command.args(args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        Ok(command)
    }

    /// Translate into a `tokio::process::Command`.
    pub fn to_async_command(&self) -> Result<tokio::process::Command> {
        let mut command = tokio::process::Command::from(self.to_command()?);
        command.kill_on_drop(true);
        Ok(command)
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_tokens_in_order() {
        let command = ProcessCommand::from_tokens(["echo", "hi"]);
        assert_eq!(command.argv(), ["echo", "hi"]);
    }

    #[test]
    fn skips_absent_tokens() {
        let remote: Option<&str> = None;
        let command = ProcessCommand::from_tokens(crate::argv!["git", "push", remote, "origin"]);
        assert_eq!(command.argv(), ["git", "push", "origin"]);
    }

    #[test]
    fn appends_to_an_existing_template() {
        let mut command = ProcessCommand::from_tokens(["git"]);
        let branch = Some("main".to_string());
        command.args(crate::argv!["checkout", branch]).arg(Token::absent());
        assert_eq!(command.argv(), ["git", "checkout", "main"]);
        assert_eq!(command.program(), Some("git"));
    }

    #[test]
    fn paths_become_tokens() {
        let command = ProcessCommand::from_tokens(crate::argv!["ls", Path::new("/tmp")]);
        assert_eq!(command.argv(), ["ls", "/tmp"]);
    }

    #[test]
    fn empty_command_cannot_be_built() {
        let absent: Option<String> = None;
        let command = ProcessCommand::from_tokens([absent]);
        assert!(matches!(command.to_command(), Err(GirError::EmptyCommand)));
    }

    #[test]
    fn display_joins_with_spaces() {
        let command = ProcessCommand::from_tokens(["git", "status"]);
        assert_eq!(command.to_string(), "git status");
    }
}
