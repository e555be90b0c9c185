use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use thumbnail_maker::config;
use thumbnail_maker::imaging::RustBackend;
use thumbnail_maker::output;
use thumbnail_maker::runner::BatchRunner;
use tracing::Level;

#[derive(Parser)]
#[command(name = "thumbnail-maker")]
#[command(version)]
#[command(about = "Composite a base image with every overlay to make numbered thumbnails")]
#[command(long_about = "\
Composite a base image with every overlay to make numbered thumbnails

Layout (relative to the root, by default the folder holding this program):

  <root>/
  ├── ff1pr0.png        # Base image: first image here in natural order
  ├── Overlays/         # One output per image in here, natural order
  │   ├── 1.png
  │   └── 2.png
  └── Finished/         # Created if missing: ff1pr1.png, ff1pr2.png

The base's trailing number is where output numbering starts; a base without
one counts from 0. Output is always PNG at the base's size.

Folder names and accepted input extensions can be overridden in an optional
<root>/thumbnail-maker.toml.")]
struct Cli {
    /// Root folder (defaults to the folder containing the executable)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Diagnostic logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::format_error(&*e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let root = match cli.root {
        Some(root) => root,
        None => install_dir()?,
    };
    let config = config::load_config(&root)?;
    tracing::debug!(?config, "configuration loaded");

    let backend = RustBackend::new();
    BatchRunner::new(&config, &backend).run(output::print_event)?;

    Ok(())
}

/// Diagnostics go to stderr so stdout stays the plain progress report.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Folder containing the running executable.
fn install_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(|p| p.to_path_buf()).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("cannot determine folder of {}", exe.display()),
        )
    })
}
