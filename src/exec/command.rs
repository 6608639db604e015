// src/exec/command.rs

//! Production compiler and packer built on `tokio::process::Command`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{HotrunError, Result};
use crate::exec::backend::{BoxFuture, Compiler, Packer};

/// Split an opaque option string the way a POSIX shell would.
pub fn split_args(s: &str) -> Result<Vec<String>> {
    shlex::split(s)
        .ok_or_else(|| HotrunError::ConfigError(format!("unbalanced quotes in {s:?}")))
}

/// Build a shell command appropriate for the platform.
pub fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}

fn combined_output(output: &std::process::Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Runs `<compiler> -o <output> <options> <source>`, e.g. `go build`.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    program: String,
    leading_args: Vec<String>,
    work_dir: PathBuf,
}

impl CommandCompiler {
    /// `compiler` is the program plus any leading arguments, e.g. `"go build"`.
    pub fn new(compiler: &str, work_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut parts = split_args(compiler)?.into_iter();
        let program = parts
            .next()
            .ok_or_else(|| HotrunError::ConfigError("empty compiler command".to_string()))?;
        Ok(Self {
            program,
            leading_args: parts.collect(),
            work_dir: work_dir.into(),
        })
    }

    fn command_line(&self, output: &Path, options: &str, source: &Path) -> String {
        let mut line = self.program.clone();
        for part in &self.leading_args {
            line.push(' ');
            line.push_str(part);
        }
        line.push_str(&format!(" -o {}", output.display()));
        if !options.trim().is_empty() {
            line.push(' ');
            line.push_str(options.trim());
        }
        line.push_str(&format!(" {}", source.display()));
        line
    }
}

impl Compiler for CommandCompiler {
    fn compile<'a>(
        &'a self,
        output: &'a Path,
        options: &'a str,
        source: &'a Path,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            info!("{}", self.command_line(output, options, source));

            let mut cmd = Command::new(&self.program);
            cmd.args(&self.leading_args)
                .arg("-o")
                .arg(output)
                .args(split_args(options)?)
                .arg(source)
                .current_dir(&self.work_dir)
                .stdin(Stdio::null())
                .kill_on_drop(true);

            let out = cmd
                .output()
                .await
                .with_context(|| format!("running compiler '{}'", self.program))
                .map_err(|e| HotrunError::BuildError {
                    output: format!("{e:#}"),
                })?;

            let text = combined_output(&out);
            if out.status.success() {
                debug!(bytes = text.len(), "compiler finished");
                Ok(text)
            } else {
                let code = out.status.code().unwrap_or(-1);
                Err(HotrunError::BuildError {
                    output: format!("{text}exit status {code}"),
                })
            }
        })
    }
}

/// Swagger generation followed by resource packing, both as shell commands.
///
/// The pack command only runs when the swagger directory exists after the
/// generation step.
#[derive(Debug, Clone)]
pub struct ShellPacker {
    swagger_command: String,
    swagger_dir: PathBuf,
    pack_command: String,
    work_dir: PathBuf,
}

impl ShellPacker {
    pub fn new(
        swagger_command: impl Into<String>,
        swagger_dir: impl Into<PathBuf>,
        pack_command: impl Into<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            swagger_command: swagger_command.into(),
            swagger_dir: swagger_dir.into(),
            pack_command: pack_command.into(),
            work_dir: work_dir.into(),
        }
    }

    async fn run(&self, line: &str) -> Result<()> {
        let out = shell_command(line)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| HotrunError::PackError(format!("running '{line}': {e}")))?;

        if out.status.success() {
            Ok(())
        } else {
            Err(HotrunError::PackError(format!(
                "'{line}' exited with {}:\n{}",
                out.status.code().unwrap_or(-1),
                combined_output(&out)
            )))
        }
    }
}

impl Packer for ShellPacker {
    fn pack(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            info!("{}", self.swagger_command);
            self.run(&self.swagger_command).await?;

            if self.work_dir.join(&self.swagger_dir).exists() {
                info!("{}", self.pack_command);
                self.run(&self.pack_command).await?;
            } else {
                debug!(dir = ?self.swagger_dir, "no swagger output; skipping pack");
            }
            Ok(())
        })
    }
}
