//! Module discovery - keeps the debugger's module list in sync with the
//! target's mapping table.
//!
//! The compatibility runtime maps a PE's header separately from its patched
//! executable body, and the body often carries no filename at all. So instead
//! of trusting the native loader's bookkeeping, discovery walks the ordered
//! mapping table and pairs the most recent named zero-offset region (the
//! presumed file header) with the first executable region that follows it.
//! That is the cheapest hypothesis that holds up without parsing binary
//! headers during the scan.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DyldConfig;
use crate::identity;
use crate::maps;
use crate::materialize;
use crate::platform::Platform;
use crate::registry::{Module, ModuleRegistry, ModuleSpec, Triple};
use crate::staging::{
    self, BreakpointRole, BreakpointSlots, COMPAT_LOADER_MAP_SYMBOL, NATIVE_LOADER_DEBUG_SYMBOL,
    WINE_PRELOADER_ENTRY_SYMBOL, WINE_PRELOADER_FILENAME,
};
use crate::target::{BreakpointId, DebugTarget, StopContext};

pub const MAPS_TIMEOUT: Duration = Duration::from_secs(15);

/// A (path, load address) pair the region walker believes is a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCandidate {
    pub path: String,
    pub address: u64,
}

/// How a target's modules get discovered.
///
/// The host debugger selects one strategy per target at attach time; the
/// native strategy covers plain POSIX processes, the Wine strategy adds
/// mapping-table discovery on top.
pub trait ModuleDiscovery {
    fn name(&self) -> &'static str;

    /// Called once when attach completes.
    fn on_attach(&mut self, target: &mut dyn DebugTarget);

    /// Dispatch a breakpoint stop. Returns false when the breakpoint does
    /// not belong to this strategy.
    fn on_breakpoint_hit(
        &mut self,
        target: &mut dyn DebugTarget,
        id: BreakpointId,
        ctx: &StopContext,
    ) -> bool;
}

/// Pass-through strategy for plain POSIX targets: the host's standard
/// load-list mechanism already tracks native shared objects.
pub struct NativeDiscovery;

impl ModuleDiscovery for NativeDiscovery {
    fn name(&self) -> &'static str {
        "posix-dyld"
    }

    fn on_attach(&mut self, _target: &mut dyn DebugTarget) {}

    fn on_breakpoint_hit(
        &mut self,
        _target: &mut dyn DebugTarget,
        _id: BreakpointId,
        _ctx: &StopContext,
    ) -> bool {
        false
    }
}

/// Pick the discovery strategy for a target.
pub fn select_strategy(
    config: &DyldConfig,
    target_is_linux: bool,
    platform: Arc<dyn Platform>,
    registry: Arc<ModuleRegistry>,
) -> Box<dyn ModuleDiscovery> {
    if config.enabled && target_is_linux {
        Box::new(WineDiscovery::new(config.clone(), platform, registry))
    } else {
        Box::new(NativeDiscovery)
    }
}

/// Mapping-table discovery for targets running the compatibility runtime.
pub struct WineDiscovery {
    config: DyldConfig,
    platform: Arc<dyn Platform>,
    registry: Arc<ModuleRegistry>,
    slots: BreakpointSlots,
}

impl WineDiscovery {
    pub fn new(
        config: DyldConfig,
        platform: Arc<dyn Platform>,
        registry: Arc<ModuleRegistry>,
    ) -> Self {
        Self {
            config,
            platform,
            registry,
            slots: BreakpointSlots::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Current breakpoint slot table (read-only; the engine owns mutation).
    pub fn slots(&self) -> &BreakpointSlots {
        &self.slots
    }

    /// One full pass: read the mapping table, walk it for candidates, load
    /// them, announce the batch, then re-arm the staging breakpoints.
    pub fn load_modules_from_maps(&mut self, target: &mut dyn DebugTarget) {
        let command = format!("cat /proc/{}/maps", target.pid());
        let output =
            match self
                .platform
                .run_shell_command(&command, Some(Path::new("/")), MAPS_TIMEOUT)
            {
                Ok(output) => output,
                Err(err) => {
                    log::warn!("Failed to invoke `{command}`: {err}");
                    return;
                }
            };
        if !output.success() {
            log::warn!("Failed to invoke `{command}` (status {})", output.status);
            return;
        }

        let regions = maps::parse_maps(&output.stdout, |err| {
            log::warn!("Reading memory region from maps failed: {err}");
        });

        let mut loaded = Vec::new();
        for candidate in walk_regions(&regions) {
            if let Some(module) = self.try_load_module(&candidate) {
                loaded.push(module);
            }
        }

        log::debug!("Mapping-table scan found {} module(s)", loaded.len());
        self.registry.modules_did_load(&loaded);

        // TODO detect modules that disappeared from the table and announce
        // their unload.

        self.update_breakpoints(target);
    }

    /// Turn a candidate into a registered module, reusing an existing match.
    fn try_load_module(&self, candidate: &ModuleCandidate) -> Option<Arc<Module>> {
        if let Some(existing) = self.registry.find_by_platform_path(&candidate.path) {
            return Some(existing);
        }

        let identity = identity::resolve(self.platform.as_ref(), &self.config, &candidate.path)?;
        // Unclassifiable files are expected among the mappings; skip quietly.
        let triple = identity.triple?;

        let local_path = if triple == Triple::Windows {
            materialize::ensure_local_copy(self.platform.as_ref(), &self.config, &candidate.path)
        } else {
            PathBuf::from(&candidate.path)
        };

        let spec = ModuleSpec {
            platform_path: candidate.path.clone(),
            local_path,
            build_id: identity.build_id,
            triple,
        };
        let module = match self.registry.get_or_create(spec, true) {
            Ok(module) => module,
            Err(err) => {
                log::warn!("Could not create module {}: {err}", candidate.path);
                return None;
            }
        };
        module.set_load_address(candidate.address);
        Some(module)
    }

    fn update_breakpoints(&mut self, target: &mut dyn DebugTarget) {
        let snapshot = self.registry.snapshot();
        let plan = staging::rearm(&self.slots, &snapshot);

        if let Some(file) = plan.arm_native {
            self.arm_symbol(
                target,
                BreakpointRole::NativeDebugState,
                &file,
                NATIVE_LOADER_DEBUG_SYMBOL,
                false,
            );
        }
        if let Some(file) = plan.arm_compat {
            self.arm_symbol(
                target,
                BreakpointRole::CompatImageMap,
                &file,
                COMPAT_LOADER_MAP_SYMBOL,
                false,
            );
        }
        if let Some(file) = plan.arm_preloader {
            self.arm_symbol(
                target,
                BreakpointRole::PreloaderEntry,
                &file,
                WINE_PRELOADER_ENTRY_SYMBOL,
                true,
            );
        }
    }

    fn arm_symbol(
        &mut self,
        target: &mut dyn DebugTarget,
        role: BreakpointRole,
        file: &Path,
        symbol: &str,
        one_shot: bool,
    ) {
        match target.create_symbol_breakpoint(file, symbol, one_shot) {
            Ok((id, locations)) => {
                if locations == 0 {
                    log::warn!(
                        "Breakpoint on `{symbol}` in {} resolved no locations",
                        file.display()
                    );
                }
                self.slots.set(role, id);
            }
            Err(err) => {
                log::warn!("Could not set breakpoint on `{symbol}`: {err}");
            }
        }
    }

    fn arm_return(&mut self, target: &mut dyn DebugTarget, role: BreakpointRole, ctx: &StopContext) {
        let Some(address) = ctx.return_address() else {
            log::warn!("No caller frame to place a return breakpoint in");
            return;
        };
        match target.create_address_breakpoint(address, true) {
            Ok(id) => self.slots.set(role, id),
            Err(err) => {
                log::warn!("Could not place return breakpoint at {address:#x}: {err}");
            }
        }
    }
}

impl ModuleDiscovery for WineDiscovery {
    fn name(&self) -> &'static str {
        "wine-dyld"
    }

    fn on_attach(&mut self, target: &mut dyn DebugTarget) {
        let Some(executable) = target.startup_executable() else {
            return;
        };
        let matches_preloader = executable
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == WINE_PRELOADER_FILENAME);
        if matches_preloader {
            // Loader breakpoints cannot exist yet; scan unconditionally.
            log::info!("Wine preloader detected");
            self.load_modules_from_maps(target);
        }
    }

    fn on_breakpoint_hit(
        &mut self,
        target: &mut dyn DebugTarget,
        id: BreakpointId,
        ctx: &StopContext,
    ) -> bool {
        let Some(role) = self.slots.role_of(id) else {
            return false;
        };

        let plan = staging::plan(&self.slots, role);
        for stale in &plan.remove {
            if let Err(err) = target.remove_breakpoint(*stale) {
                log::debug!("Removing {stale} failed: {err}");
            }
        }
        for role in &plan.clear {
            self.slots.clear(*role);
        }
        if let Some(return_role) = plan.arm_return {
            self.arm_return(target, return_role, ctx);
        }
        if plan.rescan {
            self.load_modules_from_maps(target);
        }
        true
    }
}

/// Walk ordered regions and emit module candidates.
///
/// Single pass, O(1) state: remember the most recent named zero-offset
/// region as the candidate header; a differently-named file at non-zero
/// offset breaks the pairing; the first executable region while a rooted
/// candidate is held emits it. Emitting consumes the candidate so one header
/// never pairs twice.
pub fn walk_regions(regions: &[maps::MemoryRegion]) -> Vec<ModuleCandidate> {
    let mut candidates = Vec::new();
    let mut candidate: Option<(String, u64)> = None;

    for region in regions {
        if let Some(path) = &region.path {
            if region.file_offset == 0 {
                candidate = Some((path.clone(), region.base));
            } else if candidate.as_ref().is_some_and(|(name, _)| name != path) {
                candidate = None;
            }
        }

        if !region.is_executable() {
            continue;
        }

        // Only rooted paths name real files; pseudo-regions like [stack]
        // and anonymous mappings never form a module.
        if !candidate
            .as_ref()
            .is_some_and(|(name, _)| name.starts_with('/'))
        {
            continue;
        }
        if let Some((path, address)) = candidate.take() {
            candidates.push(ModuleCandidate { path, address });
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::parse_maps;
    use crate::platform::{CommandOutput, PlatformError};
    use crate::target::{BreakpointId, StackFrame, TargetError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ============================================
    // Test doubles
    // ============================================

    struct FakePlatform {
        responses: Mutex<HashMap<String, CommandOutput>>,
    }

    impl FakePlatform {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
            }
        }

        fn respond(&self, command: &str, status: i32, stdout: &str) {
            self.responses.lock().unwrap().insert(
                command.to_string(),
                CommandOutput {
                    status,
                    signal: None,
                    stdout: stdout.to_string(),
                },
            );
        }

        fn respond_objdump(&self, path: &str, format: &str) {
            self.respond(
                &format!("\"objdump\" -s -j .note.gnu.build-id '{path}'"),
                0,
                &format!("{path}:     file format {format}\n"),
            );
        }
    }

    impl Platform for FakePlatform {
        fn name(&self) -> &str {
            "remote-linux"
        }

        fn is_host(&self) -> bool {
            false
        }

        fn run_shell_command(
            &self,
            command: &str,
            _cwd: Option<&Path>,
            _timeout: Duration,
        ) -> Result<CommandOutput, PlatformError> {
            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(command)
                .cloned()
                .unwrap_or(CommandOutput {
                    status: 127,
                    signal: None,
                    stdout: String::new(),
                }))
        }

        fn get_file(&self, remote: &Path, local: &Path) -> Result<(), PlatformError> {
            Err(PlatformError::Transfer {
                remote: remote.display().to_string(),
                local: local.display().to_string(),
                reason: "not routable in tests".to_string(),
            })
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum BpEvent {
        Symbol(String, String, bool),
        Address(u64, bool),
        Removed(BreakpointId),
    }

    struct FakeTarget {
        pid: u32,
        executable: Option<PathBuf>,
        next_id: u64,
        events: Vec<BpEvent>,
    }

    impl FakeTarget {
        fn new(pid: u32, executable: &str) -> Self {
            Self {
                pid,
                executable: Some(PathBuf::from(executable)),
                next_id: 1,
                events: Vec::new(),
            }
        }
    }

    impl DebugTarget for FakeTarget {
        fn pid(&self) -> u32 {
            self.pid
        }

        fn startup_executable(&self) -> Option<PathBuf> {
            self.executable.clone()
        }

        fn create_symbol_breakpoint(
            &mut self,
            module: &Path,
            symbol: &str,
            one_shot: bool,
        ) -> Result<(BreakpointId, usize), TargetError> {
            self.events.push(BpEvent::Symbol(
                module.display().to_string(),
                symbol.to_string(),
                one_shot,
            ));
            let id = BreakpointId(self.next_id);
            self.next_id += 1;
            Ok((id, 1))
        }

        fn create_address_breakpoint(
            &mut self,
            address: u64,
            one_shot: bool,
        ) -> Result<BreakpointId, TargetError> {
            self.events.push(BpEvent::Address(address, one_shot));
            let id = BreakpointId(self.next_id);
            self.next_id += 1;
            Ok(id)
        }

        fn remove_breakpoint(&mut self, id: BreakpointId) -> Result<(), TargetError> {
            self.events.push(BpEvent::Removed(id));
            Ok(())
        }
    }

    fn regions_from(text: &str) -> Vec<maps::MemoryRegion> {
        parse_maps(text, |err| panic!("unexpected parse error: {err}"))
    }

    // ============================================
    // Region walker
    // ============================================

    #[test]
    fn header_then_executable_region_pairs_once() {
        let regions = regions_from(
            "\
1000-2000 r--p 00000000 08:01 10 /wine/ntdll.so
2000-3000 r-xp 00001000 08:01 10 /wine/ntdll.so
3000-4000 r-xp 00002000 08:01 10 /wine/ntdll.so
",
        );
        let candidates = walk_regions(&regions);
        assert_eq!(
            candidates,
            vec![ModuleCandidate {
                path: "/wine/ntdll.so".to_string(),
                address: 0x1000
            }]
        );
    }

    #[test]
    fn anonymous_executable_body_pairs_with_preceding_header() {
        // PE bodies are often patched and carry no filename.
        let regions = regions_from(
            "\
1000-2000 r--p 00000000 08:01 10 /wine/app.exe
2000-3000 rw-p 00000000 00:00 0
3000-4000 r-xp 00000000 00:00 0
",
        );
        let candidates = walk_regions(&regions);
        assert_eq!(
            candidates,
            vec![ModuleCandidate {
                path: "/wine/app.exe".to_string(),
                address: 0x1000
            }]
        );
    }

    #[test]
    fn intruding_file_at_nonzero_offset_invalidates_candidate() {
        let regions = regions_from(
            "\
1000-2000 r--p 00000000 08:01 10 /wine/app.exe
2000-3000 r--p 00004000 08:01 11 /other/lib.so
3000-4000 r-xp 00000000 00:00 0
",
        );
        assert!(walk_regions(&regions).is_empty());
    }

    #[test]
    fn continuation_of_the_same_file_keeps_candidate() {
        let regions = regions_from(
            "\
1000-2000 r--p 00000000 08:01 10 /wine/app.exe
2000-3000 r--p 00001000 08:01 10 /wine/app.exe
3000-4000 r-xp 00002000 08:01 10 /wine/app.exe
",
        );
        let candidates = walk_regions(&regions);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].address, 0x1000);
    }

    #[test]
    fn most_recent_zero_offset_mapping_wins() {
        let regions = regions_from(
            "\
1000-2000 r--p 00000000 08:01 10 /wine/first.so
2000-3000 r--p 00000000 08:01 11 /wine/second.so
3000-4000 r-xp 00000000 00:00 0
",
        );
        let candidates = walk_regions(&regions);
        assert_eq!(
            candidates,
            vec![ModuleCandidate {
                path: "/wine/second.so".to_string(),
                address: 0x2000
            }]
        );
    }

    #[test]
    fn pseudo_regions_never_form_candidates() {
        let regions = regions_from(
            "\
1000-2000 r--p 00000000 00:00 0 [vvar]
2000-3000 r-xp 00000000 00:00 0 [vdso]
",
        );
        assert!(walk_regions(&regions).is_empty());
    }

    #[test]
    fn executable_region_without_any_header_is_ignored() {
        let regions = regions_from("1000-2000 r-xp 00000000 00:00 0\n");
        assert!(walk_regions(&regions).is_empty());
    }

    // ============================================
    // Engine
    // ============================================

    fn engine_with(platform: Arc<FakePlatform>) -> WineDiscovery {
        WineDiscovery::new(
            DyldConfig::default(),
            platform,
            Arc::new(ModuleRegistry::new()),
        )
    }

    const BOOT_MAPS: &str = "\
1000-2000 r--p 00000000 08:01 10 /usr/bin/wine64-preloader
2000-3000 r-xp 00001000 08:01 10 /usr/bin/wine64-preloader
";

    #[test]
    fn attach_to_preloader_scans_unconditionally() {
        let platform = Arc::new(FakePlatform::new());
        platform.respond("cat /proc/7/maps", 0, BOOT_MAPS);
        platform.respond_objdump("/usr/bin/wine64-preloader", "elf64-x86-64");

        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        engine.on_attach(&mut target);

        assert_eq!(engine.registry().len(), 1);
        // The native linker is absent, so the preloader fallback is armed.
        assert_eq!(
            target.events,
            vec![BpEvent::Symbol(
                "/usr/bin/wine64-preloader".to_string(),
                WINE_PRELOADER_ENTRY_SYMBOL.to_string(),
                true
            )]
        );
        assert!(engine.slots().is_armed(BreakpointRole::PreloaderEntry));
    }

    #[test]
    fn attach_to_other_executables_does_nothing() {
        let platform = Arc::new(FakePlatform::new());
        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/ls");
        engine.on_attach(&mut target);
        assert!(engine.registry().is_empty());
        assert!(target.events.is_empty());
    }

    #[test]
    fn rescan_of_unchanged_table_creates_no_duplicates() {
        let platform = Arc::new(FakePlatform::new());
        platform.respond("cat /proc/7/maps", 0, BOOT_MAPS);
        platform.respond_objdump("/usr/bin/wine64-preloader", "elf64-x86-64");

        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        engine.load_modules_from_maps(&mut target);
        engine.load_modules_from_maps(&mut target);

        assert_eq!(engine.registry().len(), 1);
    }

    #[test]
    fn unclassifiable_candidates_are_skipped() {
        let platform = Arc::new(FakePlatform::new());
        platform.respond(
            "cat /proc/7/maps",
            0,
            "\
1000-2000 r--p 00000000 08:01 10 /dev/shm/blob
2000-3000 r-xp 00000000 00:00 0
",
        );
        platform.respond_objdump("/dev/shm/blob", "unknown-blob");

        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        engine.load_modules_from_maps(&mut target);

        assert!(engine.registry().is_empty());
    }

    #[test]
    fn failed_maps_read_is_soft() {
        let platform = Arc::new(FakePlatform::new());
        // No response registered: the cat command fails with 127.
        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        engine.load_modules_from_maps(&mut target);
        assert!(engine.registry().is_empty());
        assert!(target.events.is_empty());
    }

    #[test]
    fn linker_modules_arm_persistent_breakpoints() {
        let platform = Arc::new(FakePlatform::new());
        platform.respond(
            "cat /proc/7/maps",
            0,
            "\
1000-2000 r--p 00000000 08:01 10 /usr/lib/ld-linux-x86-64.so.2
2000-3000 r-xp 00001000 08:01 10 /usr/lib/ld-linux-x86-64.so.2
4000-5000 r--p 00000000 08:01 11 /wine/ntdll.so
5000-6000 r-xp 00001000 08:01 11 /wine/ntdll.so
",
        );
        platform.respond_objdump("/usr/lib/ld-linux-x86-64.so.2", "elf64-x86-64");
        platform.respond_objdump("/wine/ntdll.so", "elf64-x86-64");

        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        engine.load_modules_from_maps(&mut target);

        assert!(engine.slots().is_armed(BreakpointRole::NativeDebugState));
        assert!(engine.slots().is_armed(BreakpointRole::CompatImageMap));
        assert_eq!(
            target.events,
            vec![
                BpEvent::Symbol(
                    "/usr/lib/ld-linux-x86-64.so.2".to_string(),
                    NATIVE_LOADER_DEBUG_SYMBOL.to_string(),
                    false
                ),
                BpEvent::Symbol(
                    "/wine/ntdll.so".to_string(),
                    COMPAT_LOADER_MAP_SYMBOL.to_string(),
                    false
                ),
            ]
        );

        // A second scan must not arm anything twice.
        let before = target.events.len();
        engine.load_modules_from_maps(&mut target);
        assert_eq!(target.events.len(), before);
    }

    #[test]
    fn image_map_hits_never_leave_two_return_breakpoints() {
        let platform = Arc::new(FakePlatform::new());
        platform.respond(
            "cat /proc/7/maps",
            0,
            "\
4000-5000 r--p 00000000 08:01 11 /wine/ntdll.so
5000-6000 r-xp 00001000 08:01 11 /wine/ntdll.so
",
        );
        platform.respond_objdump("/wine/ntdll.so", "elf64-x86-64");

        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        engine.load_modules_from_maps(&mut target);
        let map_bp = engine
            .slots()
            .get(BreakpointRole::CompatImageMap)
            .expect("image-map breakpoint armed");

        let ctx = StopContext {
            frames: vec![
                StackFrame {
                    address: 0x5000,
                    inlined: false,
                },
                StackFrame {
                    address: 0xcafe,
                    inlined: false,
                },
            ],
        };

        assert!(engine.on_breakpoint_hit(&mut target, map_bp, &ctx));
        let first_return = engine
            .slots()
            .get(BreakpointRole::CompatImageMapReturn)
            .expect("return breakpoint armed");

        // Second load event before the first return fired: the stale return
        // breakpoint must be removed before the fresh one is armed.
        assert!(engine.on_breakpoint_hit(&mut target, map_bp, &ctx));
        let second_return = engine
            .slots()
            .get(BreakpointRole::CompatImageMapReturn)
            .expect("fresh return breakpoint armed");

        assert_ne!(first_return, second_return);
        assert!(target.events.contains(&BpEvent::Removed(first_return)));
    }

    #[test]
    fn unknown_breakpoints_are_not_ours() {
        let platform = Arc::new(FakePlatform::new());
        let mut engine = engine_with(platform);
        let mut target = FakeTarget::new(7, "/usr/bin/wine64-preloader");
        let handled = engine.on_breakpoint_hit(
            &mut target,
            BreakpointId(999),
            &StopContext::default(),
        );
        assert!(!handled);
    }

    #[test]
    fn strategy_selection_honors_config_and_os() {
        let platform: Arc<dyn Platform> = Arc::new(FakePlatform::new());
        let registry = Arc::new(ModuleRegistry::new());

        let config = DyldConfig::default();
        let wine = select_strategy(&config, true, platform.clone(), registry.clone());
        assert_eq!(wine.name(), "wine-dyld");

        let disabled = DyldConfig {
            enabled: false,
            ..DyldConfig::default()
        };
        let native = select_strategy(&disabled, true, platform.clone(), registry.clone());
        assert_eq!(native.name(), "posix-dyld");

        let other_os = select_strategy(&config, false, platform, registry);
        assert_eq!(other_os.name(), "posix-dyld");
    }
}
