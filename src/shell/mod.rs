use rustyline::{config::Configurer, history::FileHistory, Editor};
use std::env;

mod executor;

use crate::{
    core::{commands::CommandRegistry, state::ShellState},
    error::ShellError,
    flags::Flags,
    process::{reaper, ProcessLauncher},
};

use executor::CommandHandler;

pub struct Shell {
    pub(crate) editor: Editor<(), FileHistory>,
    pub(crate) current_dir: String,
    pub(crate) registry: CommandRegistry,
    pub(crate) state: ShellState,
    pub(crate) launcher: ProcessLauncher,
    pub(crate) flags: Flags,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let mut editor = Editor::<(), FileHistory>::new()?;
        editor.set_auto_add_history(true);

        let current_dir = env::current_dir()?.to_string_lossy().to_string();

        // Collects terminated background children for the life of the
        // interpreter.
        reaper::install()?;

        ctrlc::set_handler(move || {
            println!("\nUse 'exit' to exit the shell");
        })?;

        Ok(Shell {
            editor,
            current_dir,
            registry: CommandRegistry::new(),
            state: ShellState::new(),
            launcher: ProcessLauncher::new(),
            flags,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            let prompt = format!("{}$ ", self.current_dir);
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if let Err(e) = self.execute_command(&line) {
                        if !self.flags.is_set("quiet") {
                            eprintln!("{}", e);
                        }
                    }
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    continue;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    break;
                }
                Err(e) => {
                    if !self.flags.is_set("quiet") {
                        eprintln!("Error: {}", e);
                    }
                    continue;
                }
            }
        }
        Ok(())
    }
}
