//! CLI - reedline-based REPL around a live discovery session.
//!
//! Attaches in observe mode (no breakpoints) and lets the user drive rescans
//! by hand while watching the module list grow.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use reedline::{
    Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
};
use std::borrow::Cow;

use crate::discovery::{ModuleDiscovery, WineDiscovery};
use crate::maps;
use crate::platform::Platform;
use crate::registry::ModuleRegistry;
use crate::target::{DebugTarget, ScanTarget};

/// Everything the REPL needs to drive one attached process.
pub struct Session {
    pub engine: WineDiscovery,
    pub target: ScanTarget,
    pub platform: Arc<dyn Platform>,
    pub registry: Arc<ModuleRegistry>,
}

/// Prompt showing the attached pid and the current module count.
pub struct DyldPrompt {
    pid: u32,
    module_count: usize,
}

impl DyldPrompt {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            module_count: 0,
        }
    }

    pub fn set_module_count(&mut self, count: usize) {
        self.module_count = count;
    }
}

impl Prompt for DyldPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!("[pid:{} mods:{}]", self.pid, self.module_count))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// Command parsing result
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Re-run the mapping-table scan: scan
    Scan,
    /// List discovered modules: modules (or mods)
    Modules,
    /// Show the raw region table: regions
    Regions,
    /// Help: ? or help
    Help,
    /// Quit: q or exit
    Quit,
    /// Empty input
    Empty,
    /// Unknown command
    Unknown(String),
}

/// Parse a command string into a structured command
fn parse_command(input: &str) -> ParsedCommand {
    match input.trim() {
        "" => ParsedCommand::Empty,
        "scan" | "s" => ParsedCommand::Scan,
        "modules" | "mods" | "m" => ParsedCommand::Modules,
        "regions" | "r" => ParsedCommand::Regions,
        "help" | "?" => ParsedCommand::Help,
        "quit" | "q" | "exit" => ParsedCommand::Quit,
        other => ParsedCommand::Unknown(other.to_string()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  scan      re-scan the target's mapping table for modules");
    println!("  modules   list discovered modules");
    println!("  regions   dump the target's memory regions");
    println!("  help      show this help");
    println!("  quit      detach and exit");
}

fn print_modules(registry: &ModuleRegistry) {
    let modules = registry.snapshot();
    if modules.is_empty() {
        println!("{}", "no modules discovered yet".dimmed());
        return;
    }
    for module in modules {
        let address = module
            .load_address()
            .map(|addr| format!("{addr:#014x}"))
            .unwrap_or_else(|| "?".to_string());
        let build_id = if module.build_id().is_empty() {
            "-".dimmed().to_string()
        } else {
            module.build_id().yellow().to_string()
        };
        println!(
            "{}  {}  {}  {}",
            address.as_str().cyan(),
            module.triple().as_str().green(),
            module.platform_path(),
            build_id,
        );
    }
}

fn print_regions(session: &Session) {
    let command = format!("cat /proc/{}/maps", session.target.pid());
    let output = match session.platform.run_shell_command(
        &command,
        None,
        crate::discovery::MAPS_TIMEOUT,
    ) {
        Ok(output) if output.success() => output,
        Ok(output) => {
            println!("{} status {}", "maps read failed:".red(), output.status);
            return;
        }
        Err(err) => {
            println!("{} {err}", "maps read failed:".red());
            return;
        }
    };

    let regions = maps::parse_maps(&output.stdout, |err| {
        println!("{} {err}", "skipped:".dimmed());
    });
    for region in &regions {
        let exec = if region.is_executable() { "x" } else { "-" };
        println!(
            "{:#014x}-{:#014x} {} {:>8x} {}",
            region.base,
            region.end(),
            exec,
            region.file_offset,
            region.path.as_deref().unwrap_or(""),
        );
    }
    println!("{} region(s)", regions.len());
}

/// Run the interactive loop until the user quits.
pub fn run_cli(mut session: Session) -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut prompt = DyldPrompt::new(session.target.pid());

    println!(
        "Attached to pid {} (strategy: {})",
        session.target.pid(),
        session.engine.name()
    );
    println!("Type `help` for commands.");

    loop {
        prompt.set_module_count(session.registry.len());
        let sig = line_editor.read_line(&prompt)?;
        let line = match sig {
            Signal::Success(line) => line,
            Signal::CtrlC | Signal::CtrlD => break,
        };

        match parse_command(&line) {
            ParsedCommand::Scan => {
                session.engine.load_modules_from_maps(&mut session.target);
                println!("{} module(s) known", session.registry.len());
            }
            ParsedCommand::Modules => print_modules(&session.registry),
            ParsedCommand::Regions => print_regions(&session),
            ParsedCommand::Help => print_help(),
            ParsedCommand::Quit => break,
            ParsedCommand::Empty => {}
            ParsedCommand::Unknown(cmd) => {
                println!("{} `{cmd}` (try `help`)", "unknown command".red());
            }
        }
    }

    Ok(())
}
