// src/engine/supervisor.rs

//! Build-and-restart cycle for the single supervised process.
//!
//! One cycle is: (optional) pack → compile → kill the previous process →
//! start the new binary. Build and pack failures leave the running process
//! alone so the last good version keeps serving. Cycles are serialised by an
//! internal mutex; the debouncer additionally guarantees they are never even
//! requested concurrently.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::engine::Rebuilder;
use crate::engine::platform::PlatformProfile;
use crate::exec::backend::{BoxFuture, Compiler, Packer, ProcessHandle, ProcessLauncher};
use crate::fs::FileSystem;
use crate::types::BuildTarget;

/// Where the supervisor is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Building,
    Launching,
    Running,
}

/// Result of one `rebuild()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    PackFailed,
    BuildFailed,
    LaunchFailed,
    Launched { pid: u32 },
}

/// The live child process.
pub struct SupervisedProcess {
    pub pid: u32,
    pub started_at: SystemTime,
    handle: Box<dyn ProcessHandle>,
}

impl fmt::Debug for SupervisedProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisedProcess")
            .field("pid", &self.pid)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Inner {
    state: SupervisorState,
    live: Option<SupervisedProcess>,
}

impl Inner {
    fn settle(&mut self) {
        self.state = if self.live.is_some() {
            SupervisorState::Running
        } else {
            SupervisorState::Idle
        };
    }
}

pub struct BuildSupervisor {
    target: BuildTarget,
    output_path: PathBuf,
    platform: PlatformProfile,
    fs: Arc<dyn FileSystem>,
    compiler: Box<dyn Compiler>,
    launcher: Box<dyn ProcessLauncher>,
    packer: Option<Box<dyn Packer>>,
    inner: Mutex<Inner>,
    // Mirrors `inner.state` for lock-free observation while a cycle runs.
    observed: std::sync::Mutex<(SupervisorState, Option<u32>)>,
}

impl fmt::Debug for BuildSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildSupervisor")
            .field("target", &self.target)
            .field("output_path", &self.output_path)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

/// Compute `<output_dir>/<entry stem><exe suffix>`.
pub fn output_path_for(target: &BuildTarget, output_dir: &Path, platform: &PlatformProfile) -> PathBuf {
    output_dir.join(format!("{}{}", target.binary_name(), platform.exe_suffix))
}

/// Path the previous binary is moved to on platforms that lock it.
pub fn renamed_aside_path(output: &Path) -> PathBuf {
    let mut s = output.as_os_str().to_os_string();
    s.push("~");
    PathBuf::from(s)
}

impl BuildSupervisor {
    pub fn new(
        target: BuildTarget,
        output_dir: impl AsRef<Path>,
        platform: PlatformProfile,
        fs: Arc<dyn FileSystem>,
        compiler: Box<dyn Compiler>,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        let output_path = output_path_for(&target, output_dir.as_ref(), &platform);
        Self {
            target,
            output_path,
            platform,
            fs,
            compiler,
            launcher,
            packer: None,
            inner: Mutex::new(Inner {
                state: SupervisorState::Idle,
                live: None,
            }),
            observed: std::sync::Mutex::new((SupervisorState::Idle, None)),
        }
    }

    /// Install the packing pipeline. Only consulted when the target has
    /// `swagger` enabled.
    pub fn with_packer(mut self, packer: Box<dyn Packer>) -> Self {
        self.packer = Some(packer);
        self
    }

    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn state(&self) -> SupervisorState {
        self.observed.lock().map(|g| g.0).unwrap_or(SupervisorState::Idle)
    }

    pub fn live_pid(&self) -> Option<u32> {
        self.observed.lock().ok().and_then(|g| g.1)
    }

    fn publish(&self, inner: &Inner) {
        if let Ok(mut g) = self.observed.lock() {
            *g = (inner.state, inner.live.as_ref().map(|p| p.pid));
        }
    }

    fn enter(&self, inner: &mut Inner, state: SupervisorState) {
        debug!(from = ?inner.state, to = ?state, "supervisor state change");
        inner.state = state;
        self.publish(inner);
    }

    fn finish(&self, inner: &mut Inner, outcome: RebuildOutcome) -> RebuildOutcome {
        inner.settle();
        self.publish(inner);
        outcome
    }

    /// Run one full build-and-restart cycle.
    pub async fn rebuild(&self) -> RebuildOutcome {
        let mut inner = self.inner.lock().await;
        self.enter(&mut inner, SupervisorState::Building);

        info!("build: {}", self.target.source_file.display());
        self.move_locked_binary_aside();

        if self.target.swagger {
            if let Some(packer) = &self.packer {
                if let Err(err) = packer.pack().await {
                    error!("pack error: {err}");
                    return self.finish(&mut inner, RebuildOutcome::PackFailed);
                }
            } else {
                warn!("swagger enabled but no packer configured; skipping pack step");
            }
        }

        if let Some(dir) = self.output_path.parent() {
            if !dir.as_os_str().is_empty() && !self.fs.exists(dir) {
                if let Err(err) = self.fs.create_dir_all(dir) {
                    warn!(?dir, "could not create output directory: {err:#}");
                }
            }
        }

        match self
            .compiler
            .compile(
                &self.output_path,
                &self.target.build_options,
                &self.target.source_file,
            )
            .await
        {
            Ok(output) => {
                if !output.trim().is_empty() {
                    debug!("compiler output:\n{output}");
                }
            }
            Err(err) => {
                error!("build error: \n{err}");
                return self.finish(&mut inner, RebuildOutcome::BuildFailed);
            }
        }

        self.enter(&mut inner, SupervisorState::Launching);

        if let Some(mut old) = inner.live.take() {
            let uptime = old.started_at.elapsed().unwrap_or_default();
            info!(pid = old.pid, ?uptime, "stopping previous process");
            if let Err(err) = old.handle.kill().await {
                warn!(pid = old.pid, "kill process error: {err}");
            }
        }
        self.publish(&inner);

        let outcome = match self
            .launcher
            .start(&self.output_path, &self.target.run_args)
            .await
        {
            Ok(handle) => {
                let pid = handle.pid();
                info!("build running pid: {pid}");
                inner.live = Some(SupervisedProcess {
                    pid,
                    started_at: SystemTime::now(),
                    handle,
                });
                RebuildOutcome::Launched { pid }
            }
            Err(err) => {
                error!("build running error: {err}");
                RebuildOutcome::LaunchFailed
            }
        };

        self.finish(&mut inner, outcome)
    }

    /// Stop the live process, if any. Used on Ctrl-C.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(mut live) = inner.live.take() {
            info!(pid = live.pid, "stopping supervised process");
            if let Err(err) = live.handle.kill().await {
                warn!(pid = live.pid, "kill process error: {err}");
            }
        }
        inner.settle();
        self.publish(&inner);
    }

    fn move_locked_binary_aside(&self) {
        if !self.platform.locks_running_binary || !self.fs.exists(&self.output_path) {
            return;
        }
        let aside = renamed_aside_path(&self.output_path);
        if self.fs.exists(&aside) {
            if let Err(err) = self.fs.remove_file(&aside) {
                debug!(path = ?aside, "could not remove stale binary: {err:#}");
            }
        }
        if let Err(err) = self.fs.rename(&self.output_path, &aside) {
            warn!("{err:#}");
        }
    }
}

impl Rebuilder for BuildSupervisor {
    fn trigger_rebuild(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let outcome = self.rebuild().await;
            debug!(?outcome, "rebuild cycle finished");
        })
    }
}
