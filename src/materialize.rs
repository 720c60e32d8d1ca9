//! PE module materialization - making remote images locally readable.
//!
//! Standard debugger downloads cannot fetch the compatibility runtime's PE
//! images: remote stubs do not understand build ids in PEs, and most Wine PEs
//! carry none. So the materializer checksums the remote file, looks for a
//! matching local copy in the configured search paths and the module cache,
//! and only transfers the file when nothing local matches.

use std::fs::{DirBuilder, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha1::{Digest, Sha1};

use crate::config::DyldConfig;
use crate::platform::Platform;

pub const CHECKSUM_TIMEOUT: Duration = Duration::from_secs(15);

const CACHE_DIR_NAME: &str = ".checksumcache";
const HASH_CHUNK: usize = 0x1000;

/// Ensure the image at `platform_path` is readable locally.
///
/// Returns the local path to use for the module: a matching file from the
/// search paths or cache, a freshly downloaded cache copy, or the input path
/// unchanged when every step fails (module creation will then be skipped
/// upstream). Host targets return immediately.
pub fn ensure_local_copy(
    platform: &dyn Platform,
    config: &DyldConfig,
    platform_path: &str,
) -> PathBuf {
    let original = PathBuf::from(platform_path);
    if platform.is_host() {
        return original;
    }

    let Some(remote_sum) = remote_checksum(platform, platform_path) else {
        return original;
    };
    let Some(basename) = original.file_name() else {
        return original;
    };

    let cache_dir = config
        .module_cache_dir
        .join(platform.name())
        .join(CACHE_DIR_NAME)
        .join(&remote_sum);

    // Search paths first, cache last; the first checksum match wins.
    let mut directories = config.executable_search_paths.clone();
    directories.push(cache_dir.clone());

    for dir in &directories {
        if !dir.is_dir() {
            continue;
        }
        let candidate = dir.join(basename);
        if !candidate.is_file() {
            continue;
        }
        match file_sha1(&candidate) {
            Ok(local_sum) if local_sum == remote_sum => {
                log::debug!(
                    "Found local copy of {platform_path} at {}",
                    candidate.display()
                );
                return candidate;
            }
            Ok(_) => {}
            Err(err) => {
                log::debug!("Checksum of {} failed: {err}", candidate.display());
            }
        }
    }

    // Nothing local matched; pull the file into the cache.
    // TODO take a file lock on the cache directory so two concurrent debug
    // sessions do not copy the same image over each other.
    if let Err(err) = create_cache_dir(&cache_dir) {
        log::warn!(
            "Could not create cache directory {}: {err}",
            cache_dir.display()
        );
        return original;
    }
    let local = cache_dir.join(basename);
    match platform.get_file(&original, &local) {
        Ok(()) => local,
        Err(err) => {
            log::warn!("Download of {platform_path} failed: {err}");
            original
        }
    }
}

/// Content checksum of the remote file, as printed by `sha1sum`.
fn remote_checksum(platform: &dyn Platform, path: &str) -> Option<String> {
    let command = format!("sha1sum '{path}'");
    let output = match platform.run_shell_command(&command, None, CHECKSUM_TIMEOUT) {
        Ok(output) => output,
        Err(err) => {
            log::debug!("`{command}` failed: {err}");
            return None;
        }
    };
    if !output.success() {
        log::debug!("`{command}` failed with status {}", output.status);
        return None;
    }

    let sum: String = output
        .stdout
        .chars()
        .take_while(char::is_ascii_hexdigit)
        .collect();
    (!sum.is_empty()).then_some(sum)
}

/// Stream a local file through SHA-1 in fixed-size chunks.
fn file_sha1(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; HASH_CHUNK];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(unix)]
fn create_cache_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_cache_dir(dir: &Path) -> std::io::Result<()> {
    DirBuilder::new().recursive(true).create(dir)
}
