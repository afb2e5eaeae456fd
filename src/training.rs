use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use log::{info, warn};

/// Errors raised while running an external trainer.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("failed to start trainer `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("trainer `{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("trainer produced no model file at {0}")]
    MissingModel(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Runs an external trainer and blocks until it exits.
///
/// The child's stdout and stderr are drained on helper threads into the
/// log, so the child cannot stall on a full pipe while this thread waits on
/// its exit status. The drain threads end when the child closes its
/// streams. There is no timeout and no cancellation: once the trainer is
/// started the call blocks until it exits, and any process management
/// beyond that belongs to the caller.
pub fn run_trainer(program: &str, args: &[String]) -> Result<(), TrainError> {
    info!("running trainer: {} {}", program, args.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| TrainError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout = child.stdout.take().map(|stream| {
        thread::spawn(move || drain(stream, false))
    });
    let stderr = child.stderr.take().map(|stream| {
        thread::spawn(move || drain(stream, true))
    });

    let status = child.wait()?;
    if let Some(handle) = stdout {
        let _ = handle.join();
    }
    if let Some(handle) = stderr {
        let _ = handle.join();
    }

    if !status.success() {
        return Err(TrainError::Failed {
            program: program.to_string(),
            status,
        });
    }
    info!("trainer finished: {}", program);
    Ok(())
}

fn drain<R: Read>(stream: R, is_stderr: bool) {
    for line in BufReader::new(stream).lines() {
        match line {
            Ok(line) if is_stderr => warn!("trainer: {}", line),
            Ok(line) => info!("trainer: {}", line),
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_run() {
        run_trainer("sh", &["-c".into(), "echo done".into()]).unwrap();
    }

    #[test]
    fn test_nonzero_exit_is_reported() {
        let err = run_trainer("sh", &["-c".into(), "exit 3".into()]).unwrap_err();
        match err {
            TrainError::Failed { program, status } => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let err = run_trainer("featkit-no-such-trainer", &[]).unwrap_err();
        assert!(matches!(err, TrainError::Spawn { .. }));
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        // Enough output to overflow an undrained pipe buffer.
        run_trainer(
            "sh",
            &["-c".into(), "seq 1 100000; seq 1 100000 1>&2".into()],
        )
        .unwrap();
    }
}
