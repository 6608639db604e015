// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, resolve_config};
use crate::engine::{BuildSupervisor, Debouncer, PlatformProfile};
use crate::exec::{CommandCompiler, GroupLauncher, ShellPacker};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::BuildTarget;
use crate::watch::{EventFilter, IgnoreRules, WatchPlan, compute_watch_dirs, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - watch directory selection
/// - build supervisor + debouncer
/// - file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let root = resolve_root(fs.as_ref(), args.root.as_deref())?;
    let cfg = resolve_config(fs.as_ref(), args.config.as_deref(), &root)?;

    let mut target = args.build_target();
    target.source_file = absolutize(&target.source_file)?;

    let rules = IgnoreRules::new(cfg.reload_ignore());
    let plan = compute_watch_dirs(fs.as_ref(), &root, &rules)?;

    if args.dry_run {
        print_dry_run(&root, &cfg, &target, &rules, &plan);
        return Ok(());
    }

    let supervisor = Arc::new(build_supervisor(&cfg, target, &root, Arc::clone(&fs))?);
    let debouncer = Arc::new(Debouncer::new(cfg.debounce(), supervisor.clone()));
    debug!(delay = ?debouncer.delay(), output = ?supervisor.output_path(), "supervisor ready");

    let filter = EventFilter::new(
        root.clone(),
        cfg.source_extension(),
        cfg.generated_file(),
        rules,
    );
    let _watcher = spawn_watcher(&plan, filter, Arc::clone(&debouncer))?;

    // Initial build, through the same gate as file changes.
    debouncer.trigger_now();

    tokio::signal::ctrl_c()
        .await
        .context("listening for Ctrl+C")?;
    info!("shutdown requested");
    supervisor.shutdown().await;

    Ok(())
}

/// Assemble the production supervisor from config.
pub fn build_supervisor(
    cfg: &ConfigFile,
    target: BuildTarget,
    root: &Path,
    fs: Arc<dyn FileSystem>,
) -> Result<BuildSupervisor> {
    let platform = PlatformProfile::current();
    debug!(?platform, "selected platform profile");

    let compiler = CommandCompiler::new(cfg.compiler(), root)?;
    let launcher = GroupLauncher::new(platform.launch, root);
    let pack = cfg.pack_section();
    let packer = ShellPacker::new(
        pack.swagger_command.clone(),
        pack.swagger_dir.clone(),
        pack.pack_command.clone(),
        root,
    );

    Ok(BuildSupervisor::new(
        target,
        root.join(cfg.output_dir()),
        platform,
        fs,
        Box::new(compiler),
        Box::new(launcher),
    )
    .with_packer(Box::new(packer)))
}

/// Use `--root` if given, otherwise the current directory, canonicalized.
fn resolve_root(fs: &dyn FileSystem, root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    fs.canonicalize(&root)
        .with_context(|| format!("resolving watch root {:?}", root))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("reading current directory")?;
    Ok(cwd.join(path))
}

/// Simple dry-run output: print the resolved target and watch plan.
fn print_dry_run(
    root: &Path,
    cfg: &ConfigFile,
    target: &BuildTarget,
    rules: &IgnoreRules,
    plan: &WatchPlan,
) {
    println!("hotrun dry-run");
    println!("  root: {}", root.display());
    println!("  file: {}", target.source_file.display());
    if !target.build_options.is_empty() {
        println!("  build options: {}", target.build_options);
    }
    if !target.run_args.is_empty() {
        println!("  args: {}", target.run_args);
    }
    println!("  swagger: {}", target.swagger);
    println!("  compiler: {}", cfg.compiler());
    println!("  debounce: {:?}", cfg.debounce());
    println!("  source extension: .{}", cfg.source_extension());
    println!();

    if !rules.is_empty() {
        println!("reload_ignore ({}):", rules.len());
        for rule in rules.iter() {
            let mut flags = Vec::new();
            if rule.is_anchored() {
                flags.push("anchored");
            }
            if rule.is_negated() {
                flags.push("negated, never matches");
            }
            if flags.is_empty() {
                println!("  - {}", rule.as_str());
            } else {
                println!("  - {} ({})", rule.as_str(), flags.join(", "));
            }
        }
    }

    println!(
        "watch ({} dirs, {}):",
        plan.dirs.len(),
        if plan.recursive { "recursive" } else { "non-recursive" }
    );
    for dir in &plan.dirs {
        println!("  {}", dir.display());
    }

    debug!("dry-run complete (no execution)");
}
