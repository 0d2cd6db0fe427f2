// Command execution capability. The collector only ever talks to a CommandRunner;
// production binds SystemRunner, tests bind fixtures.

use crate::error::CommandError;
use futures_util::future::BoxFuture;
use std::process::Stdio;

/// Runs an external program and returns its stdout.
///
/// Implementations must be safe to call concurrently. Dropping the returned
/// future abandons the command; this is how the scrape deadline cancels
/// outstanding work.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [&'a str],
    ) -> BoxFuture<'a, Result<Vec<u8>, CommandError>>;
}

/// Spawns the binary directly (no shell): every argument is a separate argv
/// entry. The child is killed if the future is dropped before it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [&'a str],
    ) -> BoxFuture<'a, Result<Vec<u8>, CommandError>> {
        Box::pin(async move {
            let output = tokio::process::Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| CommandError::Spawn {
                    program: program.to_string(),
                    source,
                })?;

            if !output.status.success() {
                return Err(CommandError::Exit {
                    program: program.to_string(),
                    code: output.status.code(),
                    stdout: output.stdout,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            Ok(output.stdout)
        })
    }
}
