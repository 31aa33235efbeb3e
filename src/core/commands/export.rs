use super::{Command, CommandError};
use crate::core::state::ShellState;
use std::env;

#[derive(Clone)]
pub struct ExportCommand;

impl Default for ExportCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportCommand {
    pub fn new() -> Self {
        Self
    }

    fn parse_export(arg: &str) -> Option<(&str, &str)> {
        let (name, value) = arg.split_once('=')?;
        if name.is_empty() || value.is_empty() {
            return None;
        }
        Some((name, value))
    }
}

impl Command for ExportCommand {
    /// Sets an environment variable for the interpreter process, visible
    /// to subsequently spawned children. Malformed input (no argument,
    /// no `=`, empty name or value) is silently ignored.
    fn execute(&self, args: &[String], _state: &mut ShellState) -> Result<(), CommandError> {
        if let Some((name, value)) = args.first().and_then(|arg| Self::parse_export(arg)) {
            env::set_var(name, value);
        }
        Ok(())
    }
}
