//! Breakpoint staging - when to re-run module discovery.
//!
//! The mapping table only shows what is mapped *now*; to stay current the
//! engine parks breakpoints at the loader entry points of both module-loading
//! subsystems and rescans on every hit. Early in startup neither loader is
//! mapped yet, so a one-shot breakpoint in the preloader bridges the gap.
//!
//! Transition logic is pure data-in/data-out (`plan`, `rearm`); the engine
//! applies the resulting plans against the live target. That keeps the state
//! machine testable without a debugger attached.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::registry::Module;
use crate::target::BreakpointId;

/// Filename of the bootstrap executable that starts the compatibility
/// runtime before its own loader is mapped.
pub const WINE_PRELOADER_FILENAME: &str = "wine64-preloader";
/// Entry symbol of the preloader's startup routine.
pub const WINE_PRELOADER_ENTRY_SYMBOL: &str = "wld_start";

/// Module implementing the compatibility runtime's PE loader.
pub const COMPAT_LOADER_FILENAME: &str = "ntdll.so";
/// Symbol that maps a PE image into the address space.
pub const COMPAT_LOADER_MAP_SYMBOL: &str = "map_image_into_view";

/// Filename prefix of the native dynamic linker.
pub const NATIVE_LOADER_PREFIX: &str = "ld-";
/// The linker's internal debug-state notification symbol.
pub const NATIVE_LOADER_DEBUG_SYMBOL: &str = "_dl_debug_state";

/// The five breakpoints the staging machine may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakpointRole {
    /// One-shot at the preloader entry; fallback before any loader is mapped.
    PreloaderEntry,
    /// One-shot at the preloader entry call's return address.
    PreloaderReturn,
    /// Persistent at the compatibility loader's image-map symbol.
    CompatImageMap,
    /// One-shot at the image-map call's return address. At most one of these
    /// is ever live; a new image-map hit replaces a stale one.
    CompatImageMapReturn,
    /// Persistent at the native linker's debug-state symbol; the steady-state
    /// rescan trigger.
    NativeDebugState,
}

/// Live breakpoints, keyed by role.
#[derive(Debug, Default)]
pub struct BreakpointSlots {
    slots: HashMap<BreakpointRole, BreakpointId>,
}

impl BreakpointSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: BreakpointRole) -> Option<BreakpointId> {
        self.slots.get(&role).copied()
    }

    pub fn is_armed(&self, role: BreakpointRole) -> bool {
        self.slots.contains_key(&role)
    }

    pub fn set(&mut self, role: BreakpointRole, id: BreakpointId) {
        self.slots.insert(role, id);
    }

    pub fn clear(&mut self, role: BreakpointRole) -> Option<BreakpointId> {
        self.slots.remove(&role)
    }

    /// Reverse lookup: which role does a hit breakpoint play?
    pub fn role_of(&self, id: BreakpointId) -> Option<BreakpointRole> {
        self.slots
            .iter()
            .find(|(_, slot)| **slot == id)
            .map(|(role, _)| *role)
    }
}

/// What a breakpoint hit asks the engine to do.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Breakpoints to remove from the target, before anything else.
    pub remove: Vec<BreakpointId>,
    /// Roles whose slots become empty (spent one-shots, replaced returns).
    pub clear: Vec<BreakpointRole>,
    /// Arm a one-shot at the stop's return address, filed under this role.
    pub arm_return: Option<BreakpointRole>,
    /// Re-run the mapping-table scan.
    pub rescan: bool,
}

/// Transition function of the staging machine.
pub fn plan(slots: &BreakpointSlots, hit: BreakpointRole) -> TransitionPlan {
    use BreakpointRole::*;

    match hit {
        PreloaderEntry => TransitionPlan {
            clear: vec![PreloaderEntry],
            arm_return: Some(PreloaderReturn),
            ..TransitionPlan::default()
        },
        PreloaderReturn => TransitionPlan {
            clear: vec![PreloaderReturn],
            rescan: true,
            ..TransitionPlan::default()
        },
        CompatImageMap => {
            // A new load event supersedes an un-hit return breakpoint.
            let mut plan = TransitionPlan {
                arm_return: Some(CompatImageMapReturn),
                ..TransitionPlan::default()
            };
            if let Some(stale) = slots.get(CompatImageMapReturn) {
                plan.remove.push(stale);
                plan.clear.push(CompatImageMapReturn);
            }
            plan
        }
        CompatImageMapReturn => TransitionPlan {
            remove: slots.get(CompatImageMapReturn).into_iter().collect(),
            clear: vec![CompatImageMapReturn],
            rescan: true,
            ..TransitionPlan::default()
        },
        NativeDebugState => TransitionPlan {
            rescan: true,
            ..TransitionPlan::default()
        },
    }
}

/// Breakpoints to arm after a rescan, derived from the module list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RearmPlan {
    /// Arm the persistent debug-state breakpoint in this native linker file.
    pub arm_native: Option<PathBuf>,
    /// Arm the persistent image-map breakpoint in this loader file.
    pub arm_compat: Option<PathBuf>,
    /// Neither linker is mapped yet: arm the one-shot preloader entry
    /// breakpoint in this (first loaded) module.
    pub arm_preloader: Option<PathBuf>,
}

impl RearmPlan {
    pub fn is_empty(&self) -> bool {
        *self == RearmPlan::default()
    }
}

/// Re-arm policy, run after every rescan.
///
/// Once both long-lived linker breakpoints exist there is nothing to do.
/// Otherwise look for the linker modules by naming convention and arm
/// whichever is newly visible; while the native linker is still absent, fall
/// back to the preloader entry so startup is not missed. The caller must
/// pass a snapshot taken under the registry lock.
pub fn rearm(slots: &BreakpointSlots, modules: &[Arc<Module>]) -> RearmPlan {
    use BreakpointRole::*;

    let mut plan = RearmPlan::default();
    if slots.is_armed(CompatImageMap) && slots.is_armed(NativeDebugState) {
        return plan;
    }

    let mut native_module = None;
    let mut compat_module = None;
    for module in modules {
        let Some(filename) = module.file_name() else {
            continue;
        };
        // TODO validate the linker match by looking up the debug-state
        // symbol in the module instead of trusting the filename prefix.
        if filename.starts_with(NATIVE_LOADER_PREFIX) {
            native_module = Some(module.local_path().to_path_buf());
        }
        if filename == COMPAT_LOADER_FILENAME {
            compat_module = Some(module.local_path().to_path_buf());
        }
    }

    if !slots.is_armed(NativeDebugState) {
        if native_module.is_some() {
            plan.arm_native = native_module;
        } else if !slots.is_armed(PreloaderEntry) {
            // The linker is not mapped yet; get through the preloader
            // startup code that loads it.
            plan.arm_preloader = modules.first().map(|m| m.local_path().to_path_buf());
        }
    }

    if !slots.is_armed(CompatImageMap) {
        plan.arm_compat = compat_module;
    }

    plan
}
