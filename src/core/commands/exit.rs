use super::{Command, CommandError};
use crate::core::state::ShellState;

#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    /// Terminates the interpreter with status 0. Arguments are ignored;
    /// running children are left to the operating system.
    fn execute(&self, _args: &[String], _state: &mut ShellState) -> Result<(), CommandError> {
        std::process::exit(0);
    }
}
