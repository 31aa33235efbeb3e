use std::fmt;

pub mod launcher;
pub mod reaper;

pub use launcher::ProcessLauncher;

#[derive(Debug)]
pub enum ProcessError {
    SpawnFailed(String),
    SignalError(String),
    Other(String),
}

impl From<std::io::Error> for ProcessError {
    fn from(e: std::io::Error) -> Self {
        ProcessError::Other(e.to_string())
    }
}

impl From<nix::Error> for ProcessError {
    fn from(e: nix::Error) -> Self {
        ProcessError::SpawnFailed(e.to_string())
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::SpawnFailed(msg) => write!(f, "Spawn failed: {}", msg),
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
            ProcessError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}
