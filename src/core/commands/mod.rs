use std::collections::BTreeMap;

mod cd;
mod exit;
mod export;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use export::ExportCommand;

use crate::core::state::ShellState;

#[derive(Debug)]
pub enum CommandError {
    ExecutionError(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// An operation performed by the interpreter itself rather than by
/// launching a separate program. `args` excludes the command name.
pub trait Command {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<(), CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Exit(ExitCommand),
    Export(ExportCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<(), CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, state),
            CommandType::Exit(cmd) => cmd.execute(args, state),
            CommandType::Export(cmd) => cmd.execute(args, state),
        }
    }
}

/// Fixed name-to-builtin mapping. On the direct dispatch path builtins
/// run in the interpreter's own process; on the launcher path they run
/// inside a forked child, so their state mutations stay in that child.
#[derive(Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandType>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd".to_string(), CommandType::Cd(CdCommand::new()));
        commands.insert("exit".to_string(), CommandType::Exit(ExitCommand::new()));
        commands.insert(
            "export".to_string(),
            CommandType::Export(ExportCommand::new()),
        );
        Self { commands }
    }

    pub fn is_builtin(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    /// Runs a builtin by argv. `argv[0]` must name a registered builtin.
    pub fn execute(&self, argv: &[String], state: &mut ShellState) -> Result<(), CommandError> {
        let name = argv
            .first()
            .ok_or_else(|| CommandError::ExecutionError("empty command".to_string()))?;
        let cmd = self.commands.get(name).ok_or_else(|| {
            CommandError::ExecutionError(format!("not a builtin: {}", name))
        })?;
        cmd.execute(&argv[1..], state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_detection() {
        let registry = CommandRegistry::new();
        assert!(registry.is_builtin("cd"));
        assert!(registry.is_builtin("exit"));
        assert!(registry.is_builtin("export"));
        assert!(!registry.is_builtin("ls"));
        assert!(!registry.is_builtin(""));
    }

    #[test]
    fn test_execute_non_builtin_is_error() {
        let registry = CommandRegistry::new();
        let mut state = ShellState::new();
        let result = registry.execute(&["ls".to_string()], &mut state);
        assert!(matches!(result, Err(CommandError::ExecutionError(_))));
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::ExecutionError("failed".to_string()),
            CommandError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
