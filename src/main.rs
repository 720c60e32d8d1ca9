//! winedyld - module discovery for Wine processes under a debugger.
//!
//! Entry point that handles CLI argument parsing and hands a live session
//! to the REPL (or runs a single scan in batch mode).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;

use winedyld::cli::{run_cli, Session};
use winedyld::discovery::{ModuleDiscovery, WineDiscovery};
use winedyld::platform::{pid_alive, HostPlatform};
use winedyld::registry::ModuleRegistry;
use winedyld::target::ScanTarget;
use winedyld::DyldConfig;

/// winedyld: Wine-aware module discovery for debuggers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pid of the target process
    pid: u32,

    /// objdump-compatible tool used to classify images
    #[arg(long, default_value = "objdump")]
    objdump: String,

    /// Extra directory to search for local binary copies (repeatable)
    #[arg(long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Override the module cache root
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Scan once, print the module list, and exit
    #[arg(long, default_value_t = false)]
    scan_only: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    if !pid_alive(args.pid) {
        bail!("no such process: {}", args.pid);
    }

    let mut config = DyldConfig::default();
    config.objdump_path = args.objdump;
    config.executable_search_paths = args.search_paths;
    if let Some(cache_dir) = args.cache_dir {
        config.module_cache_dir = cache_dir;
    }

    let platform = Arc::new(HostPlatform::new());
    let registry = Arc::new(ModuleRegistry::new());
    registry.add_observer(|batch| {
        for module in batch {
            log::info!("Module loaded: {}", module.platform_path());
        }
    });

    let mut engine = WineDiscovery::new(config, platform.clone(), registry.clone());
    let mut target = ScanTarget::from_local_pid(args.pid);

    engine.on_attach(&mut target);

    if args.scan_only {
        engine.load_modules_from_maps(&mut target);
        for module in registry.snapshot() {
            let address = module
                .load_address()
                .map(|addr| format!("{addr:#014x}"))
                .unwrap_or_else(|| "?".to_string());
            println!(
                "{address}  {}  {}",
                module.triple().as_str(),
                module.platform_path()
            );
        }
        return Ok(());
    }

    run_cli(Session {
        engine,
        target,
        platform,
        registry,
    })
}
