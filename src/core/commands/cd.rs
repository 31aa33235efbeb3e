use super::{Command, CommandError};
use crate::core::state::ShellState;
use crate::path::PathExpander;
use std::env;

#[derive(Clone)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self {
            path_expander: PathExpander::new(),
        }
    }

    fn change_to(&self, path: &str) -> Result<(), CommandError> {
        let expanded = self
            .path_expander
            .expand(path)
            .map_err(|e| CommandError::ExecutionError(e.to_string()))?;
        env::set_current_dir(&expanded).map_err(|e| {
            CommandError::ExecutionError(format!("cd: {}: {}", expanded.display(), e))
        })
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<(), CommandError> {
        // Captured before the change so `cd -` can return here later. The
        // slot is updated whether or not the change below succeeds.
        let captured = env::current_dir().ok();

        let result = match args.first().map(|s| s.as_str()) {
            None | Some("~") => self.change_to("~"),
            Some("-") => match state.prev_dir().cloned() {
                Some(prev) => {
                    println!("{}", prev.display());
                    env::set_current_dir(&prev).map_err(|e| {
                        CommandError::ExecutionError(format!("cd: {}: {}", prev.display(), e))
                    })
                }
                None => {
                    eprintln!("cd: OLDPWD not set");
                    Ok(())
                }
            },
            Some(path) => self.change_to(path),
        };

        if let Some(dir) = captured {
            state.set_prev_dir(dir);
        }

        result
    }
}
