// tests/supervisor.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use hotrun::engine::supervisor::{output_path_for, renamed_aside_path};
use hotrun::engine::{BuildSupervisor, PlatformProfile, RebuildOutcome, Rebuilder, SupervisorState};
use hotrun::fs::FileSystem;
use hotrun::fs::mock::MockFileSystem;
use hotrun::types::BuildTarget;
use hotrun_test_utils::builders::BuildTargetBuilder;
use hotrun_test_utils::fakes::{Call, FakeCompiler, FakeLauncher, FakePacker, Journal};
use hotrun_test_utils::init_tracing;

const OUT_DIR: &str = "/proj/bin";

fn target() -> BuildTarget {
    BuildTargetBuilder::new("/proj/main.go")
        .build_options("-mod=vendor")
        .run_args("server -p 8080")
        .build()
}

fn project_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/main.go", "package main");
    fs
}

fn supervisor_with(
    target: BuildTarget,
    platform: PlatformProfile,
    fs: &MockFileSystem,
    compiler: FakeCompiler,
    launcher: FakeLauncher,
) -> BuildSupervisor {
    BuildSupervisor::new(
        target,
        OUT_DIR,
        platform,
        Arc::new(fs.clone()),
        Box::new(compiler),
        Box::new(launcher),
    )
}

fn unix_supervisor(journal: &Journal) -> BuildSupervisor {
    supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    )
}

#[tokio::test]
async fn successful_cycles_kill_before_start() {
    init_tracing();
    let journal = Journal::new();
    let sup = unix_supervisor(&journal);

    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1234 });
    assert_eq!(sup.live_pid(), Some(1234));
    assert_eq!(sup.state(), SupervisorState::Running);

    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1235 });
    assert_eq!(sup.live_pid(), Some(1235));

    assert_eq!(
        journal.summary(),
        ["compile", "start:1234", "compile", "kill:1234", "start:1235"]
    );
}

#[tokio::test]
async fn compiler_and_launcher_receive_target_settings() {
    let journal = Journal::new();
    let sup = unix_supervisor(&journal);
    sup.rebuild().await;

    let calls = journal.calls();
    assert_eq!(
        calls[0],
        Call::Compile {
            output: PathBuf::from("/proj/bin/main"),
            options: "-mod=vendor".to_string(),
            source: PathBuf::from("/proj/main.go"),
        }
    );
    assert_eq!(
        calls[1],
        Call::Start {
            program: PathBuf::from("/proj/bin/main"),
            args: "server -p 8080".to_string(),
            pid: 1234,
        }
    );
}

#[tokio::test]
async fn build_failure_keeps_previous_process() {
    let journal = Journal::new();
    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()).with_results(&[true, false]),
        FakeLauncher::new(journal.clone(), 1234),
    );

    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1234 });
    assert_eq!(sup.rebuild().await, RebuildOutcome::BuildFailed);

    assert_eq!(sup.live_pid(), Some(1234));
    assert_eq!(sup.state(), SupervisorState::Running);
    assert_eq!(journal.summary(), ["compile", "start:1234", "compile"]);

    // The next good build replaces the survivor.
    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1235 });
    assert_eq!(
        journal.summary()[3..],
        ["compile", "kill:1234", "start:1235"]
    );
}

#[tokio::test]
async fn first_build_failure_leaves_supervisor_idle() {
    let journal = Journal::new();
    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()).with_results(&[false]),
        FakeLauncher::new(journal.clone(), 1234),
    );

    assert_eq!(sup.rebuild().await, RebuildOutcome::BuildFailed);
    assert_eq!(sup.state(), SupervisorState::Idle);
    assert_eq!(sup.live_pid(), None);
}

#[tokio::test]
async fn pack_runs_before_compile_when_enabled() {
    let journal = Journal::new();
    let sup = supervisor_with(
        BuildTargetBuilder::new("/proj/main.go").swagger(true).build(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    )
    .with_packer(Box::new(FakePacker::new(journal.clone(), true)));

    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1234 });
    assert_eq!(journal.summary(), ["pack", "compile", "start:1234"]);
}

#[tokio::test]
async fn pack_failure_skips_build_and_keeps_process() {
    let journal = Journal::new();
    let sup = supervisor_with(
        BuildTargetBuilder::new("/proj/main.go").swagger(true).build(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    )
    .with_packer(Box::new(FakePacker::new(journal.clone(), false)));

    assert_eq!(sup.rebuild().await, RebuildOutcome::PackFailed);
    assert_eq!(journal.summary(), ["pack"]);
    assert_eq!(sup.state(), SupervisorState::Idle);
}

#[tokio::test]
async fn packer_ignored_without_swagger() {
    let journal = Journal::new();
    let sup = unix_supervisor(&journal)
        .with_packer(Box::new(FakePacker::new(journal.clone(), false)));

    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1234 });
    assert!(!journal.calls().contains(&Call::Pack));
}

#[tokio::test]
async fn swagger_without_packer_still_builds() {
    let journal = Journal::new();
    let sup = supervisor_with(
        BuildTargetBuilder::new("/proj/main.go").swagger(true).build(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    );

    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1234 });
}

#[tokio::test]
async fn launch_failure_leaves_nothing_running() {
    let journal = Journal::new();
    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234).failing_starts(),
    );

    assert_eq!(sup.rebuild().await, RebuildOutcome::LaunchFailed);
    assert_eq!(sup.live_pid(), None);
    assert_eq!(sup.state(), SupervisorState::Idle);
    assert_eq!(journal.summary(), ["compile"]);
}

#[tokio::test]
async fn kill_failure_is_logged_and_launch_proceeds() {
    let journal = Journal::new();
    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234).failing_kills(),
    );

    sup.rebuild().await;
    assert_eq!(sup.rebuild().await, RebuildOutcome::Launched { pid: 1235 });
    assert_eq!(
        journal.summary(),
        ["compile", "start:1234", "compile", "kill:1234", "start:1235"]
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_rebuilds_are_serialised() {
    let journal = Journal::new();
    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()).with_delay(Duration::from_secs(1)),
        FakeLauncher::new(journal.clone(), 1234),
    );

    let (a, b) = tokio::join!(sup.rebuild(), sup.rebuild());
    assert_eq!(a, RebuildOutcome::Launched { pid: 1234 });
    assert_eq!(b, RebuildOutcome::Launched { pid: 1235 });
    assert_eq!(
        journal.summary(),
        ["compile", "start:1234", "compile", "kill:1234", "start:1235"]
    );
}

#[tokio::test(start_paused = true)]
async fn state_is_observable_mid_cycle() {
    let journal = Journal::new();
    let sup = Arc::new(supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &project_fs(),
        FakeCompiler::new(journal.clone()).with_delay(Duration::from_secs(2)),
        FakeLauncher::new(journal.clone(), 1234),
    ));

    let task = tokio::spawn({
        let sup = Arc::clone(&sup);
        async move { sup.rebuild().await }
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(sup.state(), SupervisorState::Building);

    assert_eq!(task.await.unwrap(), RebuildOutcome::Launched { pid: 1234 });
    assert_eq!(sup.state(), SupervisorState::Running);
}

#[tokio::test]
async fn output_dir_is_created() {
    let journal = Journal::new();
    let fs = project_fs();
    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &fs,
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    );
    assert!(!fs.is_dir(Path::new(OUT_DIR)));

    sup.rebuild().await;
    assert!(fs.is_dir(Path::new(OUT_DIR)));
}

#[tokio::test]
async fn locked_binary_is_renamed_aside() {
    let journal = Journal::new();
    let fs = project_fs();
    fs.add_file("/proj/bin/main.exe", "old build");
    fs.add_file("/proj/bin/main.exe~", "older build");

    let sup = supervisor_with(
        target(),
        PlatformProfile::WINDOWS,
        &fs,
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    );
    assert_eq!(sup.output_path(), Path::new("/proj/bin/main.exe"));

    sup.rebuild().await;

    assert_eq!(
        fs.file_paths(),
        [PathBuf::from("/proj/bin/main.exe~"), PathBuf::from("/proj/main.go")]
    );
    assert_eq!(
        fs.read_to_string(Path::new("/proj/bin/main.exe~")).unwrap(),
        "old build"
    );
}

#[tokio::test]
async fn unlocked_binary_is_left_in_place() {
    let journal = Journal::new();
    let fs = project_fs();
    fs.add_file("/proj/bin/main", "old build");

    let sup = supervisor_with(
        target(),
        PlatformProfile::UNIX,
        &fs,
        FakeCompiler::new(journal.clone()),
        FakeLauncher::new(journal.clone(), 1234),
    );
    sup.rebuild().await;

    assert!(fs.exists(Path::new("/proj/bin/main")));
    assert!(!fs.exists(Path::new("/proj/bin/main~")));
}

#[tokio::test]
async fn shutdown_kills_live_process() {
    let journal = Journal::new();
    let sup = unix_supervisor(&journal);

    sup.shutdown().await;
    assert!(journal.calls().is_empty());

    sup.rebuild().await;
    sup.shutdown().await;

    assert_eq!(journal.summary(), ["compile", "start:1234", "kill:1234"]);
    assert_eq!(sup.live_pid(), None);
    assert_eq!(sup.state(), SupervisorState::Idle);
}

#[tokio::test]
async fn rebuilder_trait_runs_a_cycle() {
    let journal = Journal::new();
    let sup = unix_supervisor(&journal);

    sup.trigger_rebuild().await;
    assert_eq!(sup.live_pid(), Some(1234));
}

#[test]
fn output_paths() {
    let t = BuildTarget::new("cmd/api/server.go");
    assert_eq!(
        output_path_for(&t, Path::new("bin"), &PlatformProfile::UNIX),
        PathBuf::from("bin/server")
    );
    assert_eq!(
        output_path_for(&t, Path::new("bin"), &PlatformProfile::WINDOWS),
        PathBuf::from("bin/server.exe")
    );
    assert_eq!(
        renamed_aside_path(Path::new("bin/server.exe")),
        PathBuf::from("bin/server.exe~")
    );
}
