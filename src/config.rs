//! Configuration for the Wine dynamic loader subsystem.
//!
//! Owned by the host debugger session and injected into the resolver and
//! materializer at call time. There is no process-wide settings singleton;
//! hosts that want live-updatable settings rebuild the struct per attach.

use std::path::PathBuf;

/// Settings consumed by module discovery.
#[derive(Debug, Clone)]
pub struct DyldConfig {
    /// Path of the objdump-compatible tool on the target.
    ///
    /// The default relies on the target's `PATH` lookup.
    pub objdump_path: String,

    /// Master switch for Wine-aware module discovery. When false, the
    /// strategy selector falls back to the native loader mechanism.
    pub enabled: bool,

    /// Directories searched for local copies of target binaries, in order,
    /// before the module cache is consulted.
    pub executable_search_paths: Vec<PathBuf>,

    /// Root of the per-platform module cache
    /// (`<root>/<platform>/.checksumcache/<hash>/<basename>`).
    pub module_cache_dir: PathBuf,
}

impl Default for DyldConfig {
    fn default() -> Self {
        Self {
            objdump_path: "objdump".to_string(),
            enabled: true,
            executable_search_paths: Vec::new(),
            module_cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".cache")
        .join("winedyld")
}
