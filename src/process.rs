//! Running the curl program.

use std::future::Future;
use std::io::{self, Read};

use async_process::{Command, Stdio};
use futures_lite::future;

use crate::cancel::CancelToken;
use crate::{Error, Result};

/// Runs a program and hands back everything it wrote to stdout and stderr.
///
/// Implementations must stop the program and fail with [`Error::Cancelled`]
/// once `cancel` fires.
pub trait ProcessRunner {
    /// Run `program` with `args` and collect its combined output.
    fn run(
        &self,
        cancel: &CancelToken,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Spawns the program on the local machine.
///
/// stdout and stderr share one pipe so the output keeps the order the
/// program wrote it in. The child is killed if the run is cancelled or its
/// future is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(&self, cancel: &CancelToken, program: &str, args: &[String]) -> Result<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let spawn_err = |source| Error::Spawn {
            program: program.to_owned(),
            source,
        };
        let (mut reader, writer) = io::pipe().map_err(spawn_err)?;
        let stderr = writer.try_clone().map_err(spawn_err)?;

        // The command holds our copies of the write end; it must be gone
        // before reading, or the reader never sees EOF.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;
        log::trace!("spawned {} (pid {})", program, child.id());

        let run = async {
            let output = blocking::unblock(move || {
                let mut output = Vec::new();
                reader.read_to_end(&mut output).map(|_| output)
            })
            .await
            .map_err(|e| Error::io("unable to read the command output", e))?;
            let status = child.status().await.map_err(spawn_err)?;
            Ok::<_, Error>((status, output))
        };
        let cancelled = async {
            cancel.cancelled().await;
            Err(Error::Cancelled)
        };

        let (status, output) = match future::or(run, cancelled).await {
            Err(Error::Cancelled) => {
                log::debug!("cancelled, killing {}", program);
                return Err(Error::Cancelled);
            }
            res => res?,
        };
        if status.success() {
            Ok(output)
        } else {
            log::debug!("{} exited with {}", program, status);
            Err(Error::Exit {
                status: status.code(),
                output,
            })
        }
    }
}

/// Run a prepared argument list, program name first.
pub async fn execute(command: &[String]) -> Result<Vec<u8>> {
    execute_with_cancel(&CancelToken::never(), command).await
}

/// Run a prepared argument list, stopping when `cancel` fires.
pub async fn execute_with_cancel(cancel: &CancelToken, command: &[String]) -> Result<Vec<u8>> {
    run_command(&SystemRunner, cancel, command).await
}

pub(crate) async fn run_command<R: ProcessRunner>(
    runner: &R,
    cancel: &CancelToken,
    command: &[String],
) -> Result<Vec<u8>> {
    if command.len() < 3 {
        return Err(Error::State(format!(
            "unable to run this command, command: {:?}",
            command
        )));
    }
    runner.run(cancel, &command[0], &command[1..]).await
}
