//! Tokio-based command execution for blobctl.
//!
//! `TokioCommandExecute` implements [`blobctl_core::CommandExecute`] on top of
//! `tokio::process`, which is what the Azure CLI credential provider uses to
//! run `az account get-access-token`.
//!
//! ```no_run
//! use blobctl_command_execute_tokio::TokioCommandExecute;
//! use blobctl_core::Context;
//!
//! # async fn example() -> blobctl_core::Result<()> {
//! let ctx = Context::new().with_command_execute(TokioCommandExecute);
//! let output = ctx.command_execute("az", &["--version"]).await?;
//! println!("az exited with {}", output.status);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use blobctl_core::{CommandExecute, CommandOutput, Error, Result};
use log::debug;
use std::process::Stdio;
use tokio::process::Command;

/// Tokio-based implementation of the `CommandExecute` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandExecute;

#[async_trait]
impl CommandExecute for TokioCommandExecute {
    async fn command_execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("executing command: {program} {}", args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::unexpected(format!("failed to execute command '{program}'")).with_source(e)
            })?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
