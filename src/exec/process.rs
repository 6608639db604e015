// src/exec/process.rs

//! Launching the built binary in its own process group.
//!
//! `command-group` puts the child in a new process group on Unix and a job
//! object on Windows, so `kill` reaches every descendant instead of leaving
//! orphans behind.

use std::path::{Path, PathBuf};

use command_group::{AsyncCommandGroup, AsyncGroupChild};
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::platform::LaunchStrategy;
use crate::errors::{HotrunError, Result};
use crate::exec::backend::{BoxFuture, ProcessHandle, ProcessLauncher};
use crate::exec::command::{shell_command, split_args};

#[derive(Debug, Clone)]
pub struct GroupLauncher {
    strategy: LaunchStrategy,
    work_dir: PathBuf,
}

impl GroupLauncher {
    pub fn new(strategy: LaunchStrategy, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            strategy,
            work_dir: work_dir.into(),
        }
    }

    fn command(&self, program: &Path, args: &str) -> Result<Command> {
        let mut cmd = match self.strategy {
            LaunchStrategy::Shell => {
                let line = if args.trim().is_empty() {
                    program.display().to_string()
                } else {
                    format!("{} {}", program.display(), args.trim())
                };
                shell_command(&line)
            }
            LaunchStrategy::Direct => {
                let mut c = Command::new(program);
                c.args(split_args(args)?);
                c
            }
        };
        cmd.current_dir(&self.work_dir);
        Ok(cmd)
    }
}

impl ProcessLauncher for GroupLauncher {
    fn start<'a>(
        &'a self,
        program: &'a Path,
        args: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn ProcessHandle>>> {
        Box::pin(async move {
            info!("{} {}", program.display(), args);

            let mut cmd = self.command(program, args)?;
            let child = cmd
                .group()
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| HotrunError::LaunchError(format!("{}: {e}", program.display())))?;

            let pid = child.id().ok_or_else(|| {
                HotrunError::LaunchError(format!("{} exited immediately", program.display()))
            })?;

            Ok(Box::new(GroupProcess { pid, child }) as Box<dyn ProcessHandle>)
        })
    }
}

pub struct GroupProcess {
    pid: u32,
    child: AsyncGroupChild,
}

impl std::fmt::Debug for GroupProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupProcess")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl ProcessHandle for GroupProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn kill(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            // Already gone is as good as killed.
            if let Ok(Some(status)) = self.child.try_wait() {
                info!(pid = self.pid, ?status, "process had already exited");
                return Ok(());
            }
            let pid = self.pid;
            self.child
                .kill()
                .map_err(|e| HotrunError::TerminationError(format!("pid {pid}: {e}")))?;
            // Reap the group before returning so the next launch never overlaps it.
            let status = self
                .child
                .wait()
                .await
                .map_err(|e| HotrunError::TerminationError(format!("pid {pid}: {e}")))?;
            debug!(pid, ?status, "process group reaped");
            Ok(())
        })
    }
}
