//! Module registry - the target's shared list of discovered images.
//!
//! Other debugger subsystems read and write this list concurrently with
//! discovery, so every access takes the registry lock; scans hold it only for
//! the duration of the linear pass, never across breakpoint placement or
//! remote commands.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use thiserror::Error;

/// Registry operation errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("module spec has an empty platform path")]
    EmptyPath,
}

/// Architecture/platform classification of a discovered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triple {
    /// PE/COFF image run by the compatibility runtime.
    Windows,
    /// Native ELF image.
    Linux,
}

impl Triple {
    pub fn as_str(&self) -> &'static str {
        match self {
            Triple::Windows => "x86_64-pc-windows-msvc",
            Triple::Linux => "x86_64-unknown-linux",
        }
    }
}

/// Everything needed to create a module record.
#[derive(Debug, Clone)]
pub struct ModuleSpec {
    /// Path of the image as the target sees it.
    pub platform_path: String,
    /// Path of the local file backing the module (may equal the platform
    /// path on host targets, or point into the cache after materialization).
    pub local_path: PathBuf,
    /// Lower-case hex of the build-id note; empty when the image has none.
    pub build_id: String,
    pub triple: Triple,
}

/// A discovered executable image mapped into the target.
///
/// Identified by platform path + build id + triple. The load address is
/// attached once, right after creation, and never moves; modules are never
/// removed by discovery (unload tracking is not implemented).
#[derive(Debug)]
pub struct Module {
    platform_path: String,
    local_path: PathBuf,
    build_id: String,
    triple: Triple,
    load_address: OnceLock<u64>,
}

impl Module {
    fn new(spec: ModuleSpec) -> Self {
        Self {
            platform_path: spec.platform_path,
            local_path: spec.local_path,
            build_id: spec.build_id,
            triple: spec.triple,
            load_address: OnceLock::new(),
        }
    }

    pub fn platform_path(&self) -> &str {
        &self.platform_path
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn triple(&self) -> Triple {
        self.triple
    }

    /// Final component of the platform path.
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.platform_path).file_name()?.to_str()
    }

    /// Attach the base address the image is mapped at. First write wins.
    pub fn set_load_address(&self, address: u64) {
        let _ = self.load_address.set(address);
    }

    pub fn load_address(&self) -> Option<u64> {
        self.load_address.get().copied()
    }
}

/// Callback invoked with each batch of newly announced modules.
pub type LoadObserver = Box<dyn Fn(&[Arc<Module>]) + Send + Sync>;

/// The target's module list.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Mutex<Vec<Arc<Module>>>,
    observers: Mutex<Vec<LoadObserver>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match by platform path.
    pub fn find_by_platform_path(&self, path: &str) -> Option<Arc<Module>> {
        lock(&self.modules)
            .iter()
            .find(|module| module.platform_path() == path)
            .cloned()
    }

    /// Return the module matching the spec's platform path, creating and
    /// registering it if absent. With `notify`, a newly created module is
    /// announced to observers immediately.
    pub fn get_or_create(
        &self,
        spec: ModuleSpec,
        notify: bool,
    ) -> Result<Arc<Module>, RegistryError> {
        if spec.platform_path.is_empty() {
            return Err(RegistryError::EmptyPath);
        }

        let module = {
            let mut modules = lock(&self.modules);
            if let Some(existing) = modules
                .iter()
                .find(|module| module.platform_path() == spec.platform_path)
            {
                return Ok(existing.clone());
            }
            let module = Arc::new(Module::new(spec));
            modules.push(module.clone());
            module
        };

        if notify {
            self.notify(std::slice::from_ref(&module));
        }
        Ok(module)
    }

    /// Announce a scan's worth of modules as one batch event.
    pub fn modules_did_load(&self, batch: &[Arc<Module>]) {
        if batch.is_empty() {
            return;
        }
        self.notify(batch);
    }

    pub fn add_observer(&self, observer: impl Fn(&[Arc<Module>]) + Send + Sync + 'static) {
        lock(&self.observers).push(Box::new(observer));
    }

    fn notify(&self, batch: &[Arc<Module>]) {
        for observer in lock(&self.observers).iter() {
            observer(batch);
        }
    }

    /// Clone of the current module list; callers iterate without the lock.
    pub fn snapshot(&self) -> Vec<Arc<Module>> {
        lock(&self.modules).clone()
    }

    /// Earliest-registered module, used as the preloader breakpoint fallback.
    pub fn first(&self) -> Option<Arc<Module>> {
        lock(&self.modules).first().cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.modules).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.modules).is_empty()
    }
}
