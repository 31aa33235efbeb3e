//! Spawns the one or two children a command request calls for and wires
//! their descriptors.
//!
//! Each spawn follows the same plan: create the pipe first if one is
//! needed, fork, let the child rewire stdin/stdout and then exec (or run
//! a builtin and exit), and let the parent wait or detach. For a
//! foreground pipeline the first stage is waited on before the second
//! stage is spawned, so this is not concurrent piping: a first stage
//! that outgrows the kernel pipe buffer will block until stage two
//! exists to drain it.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::process;

use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::unistd::{dup2, execvp, fork, pipe, ForkResult, Pid};

use super::ProcessError;
use crate::core::commands::CommandRegistry;
use crate::core::state::ShellState;
use crate::parse::CommandRequest;

pub struct ProcessLauncher;

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Runs a request that needs at least one child process. The request
    /// has already been classified by the dispatcher; a builtin arriving
    /// here still forks, and its state mutations die with the child.
    /// Both dispatch paths consult the same registry, which the caller
    /// owns.
    pub fn launch(
        &self,
        request: &CommandRequest,
        registry: &CommandRegistry,
        state: &mut ShellState,
    ) -> Result<(), ProcessError> {
        let pipe_fds = match request.second_stage() {
            Some(_) => Some(pipe()?),
            None => None,
        };

        match unsafe { fork() }? {
            ForkResult::Child => self.run_first_stage(request, registry, pipe_fds, state),
            ForkResult::Parent { child } => {
                if !request.background {
                    wait_foreground(child);
                }
                if let (Some((read_end, write_end)), Some(argv)) =
                    (pipe_fds, request.second_stage())
                {
                    drop(write_end);
                    self.spawn_second_stage(argv, read_end, request.background)?;
                }
                Ok(())
            }
        }
    }

    /// First-stage child body: apply the descriptor plan, then run the
    /// builtin or exec. Never returns into the interpreter.
    fn run_first_stage(
        &self,
        request: &CommandRequest,
        registry: &CommandRegistry,
        pipe_fds: Option<(OwnedFd, OwnedFd)>,
        state: &mut ShellState,
    ) -> ! {
        if let Some(path) = &request.infile {
            let file = open_or_die(File::open(path), path);
            dup_onto(file.as_raw_fd(), libc::STDIN_FILENO);
        }
        if let Some(path) = &request.outfile {
            let file = open_or_die(
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(0o644)
                    .open(path),
                path,
            );
            dup_onto(file.as_raw_fd(), libc::STDOUT_FILENO);
        }
        if let Some((read_end, write_end)) = pipe_fds {
            // The pipe supersedes any `>` redirection for this stage.
            dup_onto(write_end.as_raw_fd(), libc::STDOUT_FILENO);
            drop(read_end);
            drop(write_end);
        }

        let argv = request.first_stage();
        let name = argv.first().map(|s| s.as_str()).unwrap_or("");
        if registry.is_builtin(name) {
            if let Err(e) = registry.execute(argv, state) {
                eprintln!("{}", e);
            }
            process::exit(0);
        }
        exec_or_die(argv)
    }

    /// Second stage of a pipeline: always an external program, reading
    /// from the pipe. The parent's copy of the read end is closed on
    /// every path out of here.
    fn spawn_second_stage(
        &self,
        argv: &[String],
        read_end: OwnedFd,
        background: bool,
    ) -> Result<(), ProcessError> {
        match unsafe { fork() }? {
            ForkResult::Child => {
                dup_onto(read_end.as_raw_fd(), libc::STDIN_FILENO);
                drop(read_end);
                exec_or_die(argv)
            }
            ForkResult::Parent { child } => {
                drop(read_end);
                if !background {
                    wait_foreground(child);
                }
                Ok(())
            }
        }
    }
}

/// Blocks until the given child terminates. The exit status is only used
/// to unblock. ECHILD means the SIGCHLD reaper collected the child
/// first, which counts as completion.
fn wait_foreground(child: Pid) {
    loop {
        match waitpid(child, None) {
            Ok(_) => break,
            Err(Errno::EINTR) => continue,
            Err(_) => break,
        }
    }
}

fn open_or_die(result: std::io::Result<File>, path: &str) -> File {
    match result {
        Ok(file) => file,
        Err(e) => {
            eprintln!("minish: {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn dup_onto(fd: RawFd, target: RawFd) {
    if let Err(e) = dup2(fd, target) {
        eprintln!("minish: dup2: {}", e);
        process::exit(1);
    }
}

/// Replaces the child's process image. On failure the child reports and
/// exits non-zero; the interpreter is unaffected.
fn exec_or_die(argv: &[String]) -> ! {
    let name = argv.first().map(|s| s.as_str()).unwrap_or("");
    match argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(cargs) if !cargs.is_empty() => {
            if let Err(e) = execvp(&cargs[0], &cargs) {
                eprintln!("minish: {}: {}", name, e);
            }
        }
        _ => eprintln!("minish: {}: invalid argument", name),
    }
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::{Command, ExportCommand};
    use crate::parse::tokenize;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant};

    fn temp_file(tag: &str) -> PathBuf {
        env::temp_dir().join(format!("minish_launcher_{}_{}", tag, process::id()))
    }

    fn launch_line(line: &str) -> Result<(), ProcessError> {
        let launcher = ProcessLauncher::new();
        let registry = CommandRegistry::new();
        let mut state = ShellState::new();
        launcher.launch(&tokenize(line), &registry, &mut state)
    }

    fn open_fd_count() -> usize {
        fs::read_dir("/proc/self/fd").map(|dir| dir.count()).unwrap_or(0)
    }

    #[test]
    fn test_foreground_output_redirection() -> Result<(), ProcessError> {
        let out = temp_file("out");
        launch_line(&format!("echo hello > {}", out.display()))?;

        assert_eq!(fs::read_to_string(&out)?.trim(), "hello");
        fs::remove_file(&out)?;
        Ok(())
    }

    #[test]
    fn test_both_redirections() -> Result<(), ProcessError> {
        let input = temp_file("in");
        let out = temp_file("both");
        fs::write(&input, "12345")?;

        launch_line(&format!("wc -c < {} > {}", input.display(), out.display()))?;

        assert_eq!(fs::read_to_string(&out)?.trim(), "5");
        fs::remove_file(&input)?;
        fs::remove_file(&out)?;
        Ok(())
    }

    #[test]
    fn test_pipeline_counts_lines() -> Result<(), ProcessError> {
        // The grammar cannot quote the sh -c script, so the request is
        // built directly: seq 1 3 | sh -c 'wc -l > out'.
        let out = temp_file("pipe");
        let request = CommandRequest {
            args: vec![
                "seq".to_string(),
                "1".to_string(),
                "3".to_string(),
                "sh".to_string(),
                "-c".to_string(),
                format!("wc -l > {}", out.display()),
            ],
            pipe_split: Some(3),
            ..CommandRequest::default()
        };

        let launcher = ProcessLauncher::new();
        let registry = CommandRegistry::new();
        let mut state = ShellState::new();
        launcher.launch(&request, &registry, &mut state)?;

        assert_eq!(fs::read_to_string(&out)?.trim(), "3");
        fs::remove_file(&out)?;
        Ok(())
    }

    #[test]
    fn test_background_returns_immediately() -> Result<(), ProcessError> {
        let started = Instant::now();
        launch_line("sleep 1 &")?;
        assert!(started.elapsed() < Duration::from_millis(500));
        Ok(())
    }

    #[test]
    fn test_failed_exec_does_not_kill_parent() -> Result<(), ProcessError> {
        launch_line("minish-no-such-program-exists > /dev/null")?;
        Ok(())
    }

    #[test]
    fn test_builtin_in_child_leaves_parent_untouched() -> Result<(), ProcessError> {
        let launcher = ProcessLauncher::new();
        let registry = CommandRegistry::new();
        let mut state = ShellState::new();
        let request = tokenize("export MINISH_CHILD_ONLY=1 > /dev/null");

        launcher.launch(&request, &registry, &mut state)?;

        assert!(env::var("MINISH_CHILD_ONLY").is_err());
        assert!(state.prev_dir().is_none());
        Ok(())
    }

    #[test]
    fn test_exported_variable_visible_in_spawned_child() -> Result<(), ProcessError> {
        let out = temp_file("export_spawn");
        let cmd = ExportCommand::new();
        let mut state = ShellState::new();
        cmd.execute(&["MINISH_EXPORT_SPAWN=inherited".to_string()], &mut state)
            .map_err(|e| ProcessError::Other(e.to_string()))?;

        launch_line(&format!("printenv MINISH_EXPORT_SPAWN > {}", out.display()))?;

        assert_eq!(fs::read_to_string(&out)?.trim(), "inherited");
        fs::remove_file(&out)?;
        Ok(())
    }

    #[test]
    fn test_repeated_redirection_does_not_leak_descriptors() -> Result<(), ProcessError> {
        let out = temp_file("leak");
        let baseline = open_fd_count();

        for _ in 0..10 {
            launch_line(&format!("echo x > {}", out.display()))?;
            launch_line(&format!("wc -c < {} > /dev/null", out.display()))?;
        }

        // Concurrent tests may hold descriptors of their own for a
        // moment; poll until the count settles back to the baseline.
        let mut count = open_fd_count();
        for _ in 0..50 {
            if count <= baseline {
                break;
            }
            thread::sleep(Duration::from_millis(20));
            count = open_fd_count();
        }
        assert!(
            count <= baseline,
            "descriptor count grew from {} to {}",
            baseline,
            count
        );
        fs::remove_file(&out)?;
        Ok(())
    }
}
