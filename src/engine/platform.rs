// src/engine/platform.rs

//! Platform capabilities, selected once at startup.

/// How the built binary is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// `sh -c "<binary> <args>"` in a fresh process group; killing the
    /// group takes the shell and the program down together.
    Shell,
    /// Exec the binary directly with split arguments. Used where a shell
    /// wrapper would survive as an orphan-producing parent (`cmd /c`).
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub exe_suffix: &'static str,
    /// Running executables cannot be overwritten, so the old binary is
    /// renamed aside before each build.
    pub locks_running_binary: bool,
    pub launch: LaunchStrategy,
}

impl PlatformProfile {
    pub const UNIX: PlatformProfile = PlatformProfile {
        exe_suffix: "",
        locks_running_binary: false,
        launch: LaunchStrategy::Shell,
    };

    pub const WINDOWS: PlatformProfile = PlatformProfile {
        exe_suffix: ".exe",
        locks_running_binary: true,
        launch: LaunchStrategy::Direct,
    };

    pub fn current() -> Self {
        if cfg!(windows) {
            Self::WINDOWS
        } else {
            Self::UNIX
        }
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::current()
    }
}
