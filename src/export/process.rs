//! Running an external program with a bounded wait.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::ExportError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe
            && let Err(e) = pipe.read_to_string(&mut buf)
        {
            warn!(error = %e, "failed to read child output");
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Wait for a drained pipe until `deadline`.
///
/// A pipe stays open while any process holding it lives, so a background
/// grandchild can keep it open after the child itself has exited.
fn collect(output: &Receiver<String>, deadline: Instant, timeout: Duration) -> Result<String, ExportError> {
    match output.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Ok(buf),
        Err(RecvTimeoutError::Timeout) => {
            warn!("child output still open at the deadline");
            Err(ExportError::Timeout {
                secs: timeout.as_secs(),
            })
        }
        Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!(error = %e, "failed to kill child process");
    }
    let _ = child.wait();
}

/// Run `command`, capturing stdout and stderr, and kill it once `timeout` passes.
///
/// Both pipes are drained on helper threads so a chatty child cannot block on
/// a full pipe while this thread polls for exit. Collecting the output is
/// bounded by the same deadline.
pub fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<ProcessOutput, ExportError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExportError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                kill(&mut child);
                return Err(ExportError::Timeout {
                    secs: timeout.as_secs(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                kill(&mut child);
                return Err(ExportError::Spawn { program, source });
            }
        }
    };
    debug!(program = %program, %status, "child exited");

    Ok(ProcessOutput {
        status,
        stdout: collect(&stdout, deadline, timeout)?,
        stderr: collect(&stderr, deadline, timeout)?,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }

    #[test]
    fn test_captures_both_streams() {
        let output = run_with_timeout(sh("echo out; echo err >&2"), Duration::from_secs(5)).unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error_here() {
        let output = run_with_timeout(sh("exit 3"), Duration::from_secs(5)).unwrap();
        assert_eq!(output.status.code(), Some(3));
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = run_with_timeout(sh("exec sleep 10"), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ExportError::Timeout { secs: 1 }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_background_grandchild_holding_pipes_times_out() {
        let started = Instant::now();
        let err = run_with_timeout(sh("sleep 8 & echo started"), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ExportError::Timeout { secs: 1 }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_program() {
        let err = run_with_timeout(Command::new("blogdb-no-such-program"), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, ExportError::Spawn { .. }));
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let output = run_with_timeout(
            sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done"),
            Duration::from_secs(20),
        )
        .unwrap();
        assert_eq!(output.stdout.lines().count(), 20000);
    }
}
