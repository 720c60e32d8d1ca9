//! Debug target interface consumed by module discovery.
//!
//! The host debugger owns breakpoint insertion, hit detection and stack
//! unwinding; discovery only asks for the handful of operations it needs:
//! placing symbol/address breakpoints, removing them, and reading the frame
//! list of the thread that just stopped.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Handle of a breakpoint owned by the target's breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BreakpointId(pub u64);

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bp#{}", self.0)
    }
}

/// Target operation errors
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("breakpoint on `{symbol}` failed: {reason}")]
    SymbolBreakpoint { symbol: String, reason: String },

    #[error("breakpoint at {address:#x} failed: {reason}")]
    AddressBreakpoint { address: u64, reason: String },

    #[error("no breakpoint {id}")]
    UnknownBreakpoint { id: BreakpointId },

    #[error("target does not support breakpoints")]
    BreakpointsUnsupported,
}

/// One frame of the stopped thread's call stack, innermost first.
#[derive(Debug, Clone)]
pub struct StackFrame {
    /// Code address of the frame (the return address, for caller frames).
    pub address: u64,
    /// True for frames synthesized from inlining records.
    pub inlined: bool,
}

/// Snapshot of the stopped thread at a breakpoint hit.
#[derive(Debug, Clone, Default)]
pub struct StopContext {
    pub frames: Vec<StackFrame>,
}

impl StopContext {
    /// Address the current call will return to.
    ///
    /// Walks past inlined frames to the first concrete frame, then takes the
    /// code address of the frame above it. Stopping past the inlined
    /// callsites is much simpler than stopping inside them, at the cost of
    /// skipping any work the inline parents would do.
    pub fn return_address(&self) -> Option<u64> {
        let mut index = 0;
        while self.frames.get(index)?.inlined {
            index += 1;
        }
        self.frames.get(index + 1).map(|frame| frame.address)
    }
}

/// The debugged process, as seen by module discovery.
pub trait DebugTarget {
    /// Process id on the target platform.
    fn pid(&self) -> u32;

    /// Path of the executable the target was launched with.
    fn startup_executable(&self) -> Option<PathBuf>;

    /// Place a breakpoint on `symbol`, constrained to the given module file.
    /// Returns the handle and the number of locations it resolved to; zero
    /// locations means the symbol is not (yet) visible.
    fn create_symbol_breakpoint(
        &mut self,
        module: &Path,
        symbol: &str,
        one_shot: bool,
    ) -> Result<(BreakpointId, usize), TargetError>;

    /// Place a breakpoint at a raw load address.
    fn create_address_breakpoint(
        &mut self,
        address: u64,
        one_shot: bool,
    ) -> Result<BreakpointId, TargetError>;

    /// Remove a breakpoint by handle.
    fn remove_breakpoint(&mut self, id: BreakpointId) -> Result<(), TargetError>;
}

/// A breakpoint-less view of a process, for snapshot inspection.
///
/// Used by the CLI when it only observes a live process: mapping-table scans
/// work, while breakpoint placement reports `BreakpointsUnsupported` and the
/// engine degrades to manual rescans.
pub struct ScanTarget {
    pid: u32,
    executable: Option<PathBuf>,
}

impl ScanTarget {
    pub fn new(pid: u32, executable: Option<PathBuf>) -> Self {
        Self { pid, executable }
    }

    /// Build from a live local pid, reading the executable link from procfs.
    pub fn from_local_pid(pid: u32) -> Self {
        let executable = std::fs::read_link(format!("/proc/{pid}/exe")).ok();
        Self { pid, executable }
    }
}

impl DebugTarget for ScanTarget {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn startup_executable(&self) -> Option<PathBuf> {
        self.executable.clone()
    }

    fn create_symbol_breakpoint(
        &mut self,
        _module: &Path,
        _symbol: &str,
        _one_shot: bool,
    ) -> Result<(BreakpointId, usize), TargetError> {
        Err(TargetError::BreakpointsUnsupported)
    }

    fn create_address_breakpoint(
        &mut self,
        _address: u64,
        _one_shot: bool,
    ) -> Result<BreakpointId, TargetError> {
        Err(TargetError::BreakpointsUnsupported)
    }

    fn remove_breakpoint(&mut self, id: BreakpointId) -> Result<(), TargetError> {
        Err(TargetError::UnknownBreakpoint { id })
    }
}
