use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hotrun::engine::Rebuilder;
use hotrun::errors::{HotrunError, Result};
use hotrun::exec::backend::{BoxFuture, Compiler, Packer, ProcessHandle, ProcessLauncher};

/// One collaborator call, in the order the supervisor made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Pack,
    Compile {
        output: PathBuf,
        options: String,
        source: PathBuf,
    },
    Start {
        program: PathBuf,
        args: String,
        pid: u32,
    },
    Kill {
        pid: u32,
    },
}

/// Shared, ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Compact view for order assertions: `"compile"`, `"start:1234"`, ...
    pub fn summary(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| match c {
                Call::Pack => "pack".to_string(),
                Call::Compile { .. } => "compile".to_string(),
                Call::Start { pid, .. } => format!("start:{pid}"),
                Call::Kill { pid } => format!("kill:{pid}"),
            })
            .collect()
    }
}

/// A compiler that succeeds unless told otherwise.
///
/// Results are consumed from a script; once it runs out every build
/// succeeds.
pub struct FakeCompiler {
    journal: Journal,
    script: Mutex<VecDeque<bool>>,
    delay: Duration,
}

impl FakeCompiler {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            script: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
        }
    }

    /// Queue results for upcoming builds (`true` = success).
    pub fn with_results(self, results: &[bool]) -> Self {
        self.script.lock().unwrap().extend(results.iter().copied());
        self
    }

    /// Make each build take `delay` (tokio time).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Compiler for FakeCompiler {
    fn compile<'a>(
        &'a self,
        output: &'a Path,
        options: &'a str,
        source: &'a Path,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            self.journal.push(Call::Compile {
                output: output.to_path_buf(),
                options: options.to_string(),
                source: source.to_path_buf(),
            });
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let ok = self.script.lock().unwrap().pop_front().unwrap_or(true);
            if ok {
                Ok(String::new())
            } else {
                Err(HotrunError::BuildError {
                    output: "./main.go:3:2: undefined: foo\n".to_string(),
                })
            }
        })
    }
}

/// Hands out sequential pids starting from a chosen value.
pub struct FakeLauncher {
    journal: Journal,
    next_pid: AtomicU32,
    fail_starts: AtomicBool,
    fail_kills: Arc<AtomicBool>,
}

impl FakeLauncher {
    pub fn new(journal: Journal, first_pid: u32) -> Self {
        Self {
            journal,
            next_pid: AtomicU32::new(first_pid),
            fail_starts: AtomicBool::new(false),
            fail_kills: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn failing_starts(self) -> Self {
        self.fail_starts.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_kills(self) -> Self {
        self.fail_kills.store(true, Ordering::SeqCst);
        self
    }
}

impl ProcessLauncher for FakeLauncher {
    fn start<'a>(
        &'a self,
        program: &'a Path,
        args: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn ProcessHandle>>> {
        Box::pin(async move {
            if self.fail_starts.load(Ordering::SeqCst) {
                return Err(HotrunError::LaunchError(format!(
                    "{}: permission denied",
                    program.display()
                )));
            }
            let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
            self.journal.push(Call::Start {
                program: program.to_path_buf(),
                args: args.to_string(),
                pid,
            });
            Ok(Box::new(FakeProcess {
                pid,
                journal: self.journal.clone(),
                fail_kill: Arc::clone(&self.fail_kills),
            }) as Box<dyn ProcessHandle>)
        })
    }
}

pub struct FakeProcess {
    pid: u32,
    journal: Journal,
    fail_kill: Arc<AtomicBool>,
}

impl ProcessHandle for FakeProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn kill(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.journal.push(Call::Kill { pid: self.pid });
            if self.fail_kill.load(Ordering::SeqCst) {
                Err(HotrunError::TerminationError(format!(
                    "pid {}: operation not permitted",
                    self.pid
                )))
            } else {
                Ok(())
            }
        })
    }
}

pub struct FakePacker {
    journal: Journal,
    succeed: bool,
}

impl FakePacker {
    pub fn new(journal: Journal, succeed: bool) -> Self {
        Self { journal, succeed }
    }
}

impl Packer for FakePacker {
    fn pack(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.journal.push(Call::Pack);
            if self.succeed {
                Ok(())
            } else {
                Err(HotrunError::PackError("swagger: no such command".to_string()))
            }
        })
    }
}

/// Rebuilder that only counts, optionally taking `delay` per cycle, and
/// tracks the highest number of overlapping cycles seen.
#[derive(Default)]
pub struct CountingRebuilder {
    started: AtomicUsize,
    finished: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    delay: Duration,
}

impl CountingRebuilder {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl Rebuilder for CountingRebuilder {
    fn trigger_rebuild(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.started.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
        })
    }
}
