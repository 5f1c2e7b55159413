//! wineshortcut - create desktop launchers for Windows executables.
//!
//! Wraps `wineshortcut-core`: parses flags, layers them over
//! `wineshortcut.json`, and runs the shortcut pipeline. Warnings go to
//! stderr, the dry-run output goes to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wineshortcut_core::{merge, platform, IconPolicy, Options, ShortcutBuilder, ShortcutRequest};

#[derive(Parser, Debug)]
#[command(name = "wineshortcut", version)]
#[command(about = "Create desktop launchers for Windows executables run through Wine")]
struct Args {
    /// Windows executable to create a launcher for
    input: PathBuf,

    /// Folder to write the launcher to
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Name shown in menus (defaults to the executable name)
    #[arg(short, long)]
    name: Option<String>,

    /// Icon file, or an icon name from the desktop theme
    #[arg(short, long, value_name = "PATH")]
    icon: Option<String>,

    /// Do not extract or embed any icon
    #[arg(long, conflicts_with = "icon")]
    no_icon: bool,

    /// Leave the icon out when the --icon file does not exist
    #[arg(long)]
    strict_icon: bool,

    /// Extra categories, e.g. "Game;Utility"
    #[arg(short, long)]
    categories: Option<String>,

    /// Wine prefix to run the executable in
    #[arg(short, long, value_name = "DIR")]
    prefix: Option<PathBuf>,

    /// Install the launcher on the desktop
    #[arg(short, long)]
    desktop: bool,

    /// Install the launcher in the application menu
    #[arg(short, long)]
    menu: bool,

    /// Print the launcher instead of writing any file
    #[arg(short = 'P', long)]
    print: bool,

    /// Wine command used to start the executable
    #[arg(long, value_name = "CMD")]
    wine: Option<String>,

    /// Icon extraction tool
    #[arg(long, value_name = "CMD")]
    tool: Option<String>,

    /// Timeout in seconds for each run of the extraction tool
    #[arg(long, value_name = "SECS")]
    tool_timeout: Option<u64>,

    /// Configuration file (defaults to ./wineshortcut.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// The command-line layer of the options. Absent flags stay `None` so
    /// the configuration file can fill them.
    fn options(&self) -> Options {
        Options {
            output: self.output.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            no_icon: self.no_icon.then_some(true),
            strict_icon: self.strict_icon.then_some(true),
            categories: self.categories.clone(),
            prefix: self.prefix.clone(),
            desktop: self.desktop.then_some(true),
            menu: self.menu.then_some(true),
            print: self.print.then_some(true),
            wine: self.wine.clone(),
            tool: self.tool.clone(),
            tool_timeout: self.tool_timeout,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cwd = std::env::current_dir().context("Could not determine working directory")?;

    let file_options = match args.config {
        Some(ref path) => Some(Options::load_required(path)?),
        None => Options::discover(&cwd)?,
    };
    let options = merge(args.options(), file_options);
    debug!("Resolved options: {:?}", options);

    let request = ShortcutRequest::resolve(&args.input, options, &cwd)?;
    if request.icon == IconPolicy::Auto
        && !request.dry_run
        && !platform::command_exists(&request.tool)
    {
        info!("{} not found, install icoutils to extract icons", request.tool);
    }

    ShortcutBuilder::new(request).run(&mut std::io::stdout().lock())?;

    Ok(())
}
