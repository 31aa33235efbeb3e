use crate::core::commands::CommandRegistry;
use crate::error::ShellError;
use crate::parse::{self, CommandRequest};

pub(crate) trait CommandHandler {
    fn execute_command(&mut self, line: &str) -> Result<(), ShellError>;
}

impl CommandHandler for super::Shell {
    fn execute_command(&mut self, line: &str) -> Result<(), ShellError> {
        let request = parse::tokenize(line);
        if request.is_empty() {
            return Ok(());
        }

        let result = self.dispatch(&request);

        // Refresh so the next prompt shows the directory cd changed to.
        if result.is_ok() {
            self.current_dir = std::env::current_dir()?.to_string_lossy().to_string();
        }

        result
    }
}

impl super::Shell {
    fn dispatch(&mut self, request: &CommandRequest) -> Result<(), ShellError> {
        if runs_in_process(request, &self.registry) {
            self.registry.execute(&request.args, &mut self.state)?;
        } else {
            self.launcher
                .launch(request, &self.registry, &mut self.state)?;
        }
        Ok(())
    }
}

/// The only zero-fork path: a builtin with no redirection, no pipe, and
/// no background flag runs in the interpreter's own process. Everything
/// else goes through the launcher, builtin or not.
pub(crate) fn runs_in_process(request: &CommandRequest, registry: &CommandRegistry) -> bool {
    !request.needs_process()
        && request
            .command_name()
            .is_some_and(|name| registry.is_builtin(name))
}
