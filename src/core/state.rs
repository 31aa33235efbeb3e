use std::path::PathBuf;

/// Process-wide interpreter state, threaded into the builtins rather than
/// kept in globals. The mutable environment itself lives in the process
/// environment (`std::env`); only the previous working directory needs an
/// explicit slot.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    prev_dir: Option<PathBuf>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous working directory, unset until the first `cd`.
    pub fn prev_dir(&self) -> Option<&PathBuf> {
        self.prev_dir.as_ref()
    }

    pub fn set_prev_dir(&mut self, dir: PathBuf) {
        self.prev_dir = Some(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_dir_starts_unset() {
        let state = ShellState::new();
        assert!(state.prev_dir().is_none());
    }

    #[test]
    fn test_prev_dir_roundtrip() {
        let mut state = ShellState::new();
        state.set_prev_dir(PathBuf::from("/tmp"));
        assert_eq!(state.prev_dir(), Some(&PathBuf::from("/tmp")));
    }
}
