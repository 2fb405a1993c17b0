//! docsift - document layout extraction pipeline
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

use docsift::{
    exit_codes, Cli, Commands, Config, DocumentPipeline, ParseArgs, PipelineError,
    ProgressCallback,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse(args) => {
            init_logging(args.verbose);
            run_parse(&args)
        }
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    });
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Logs go to stderr; stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<PipelineError>() {
        Some(e) if e.is_environment() => exit_codes::ENVIRONMENT_ERROR,
        _ => exit_codes::GENERAL_ERROR,
    }
}

// ============ Progress Callback Implementation ============

/// Page-level progress bar for interactive runs.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} pages {msg}")
                    .expect("static progress template"),
            );
            bar
        };
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for BarProgress {
    fn on_page_start(&self, page: usize, total: usize) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position((page - 1) as u64);
    }

    fn on_page_complete(&self, page: usize, _total: usize) {
        self.bar.set_position(page as u64);
    }
}

// ============ Parse Command ============

fn run_parse(args: &ParseArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: input does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    // Load config file if specified, otherwise search standard locations.
    let file_config = match &args.config {
        Some(config_path) => match Config::load_from_path(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: failed to load config file: {e}");
                Config::default()
            }
        },
        None => Config::load().unwrap_or_default(),
    };

    // Merge config file with CLI arguments (CLI takes precedence).
    let pipeline_config = file_config.merge_with_cli(&args.to_overrides());
    let mut pipeline = DocumentPipeline::new(pipeline_config)?;

    let progress = BarProgress::new(args.quiet);
    let pages = pipeline.process_with_progress(&args.input, &args.display_name(), &progress)?;
    progress.finish();

    let json = serde_json::to_string_pretty(&pages).context("serializing result")?;
    match &args.json {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
            if !args.quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => println!("{json}"),
    }

    if !args.quiet {
        let items: usize = pages.iter().map(|p| p.content.len()).sum();
        eprintln!(
            "Processed {} pages ({} items) in {:.2}s",
            pages.len(),
            items,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    println!("docsift v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Conversion Tools:");
    check_tool_with_version("libreoffice", "LibreOffice", &["--version"]);
    check_tool("soffice", "LibreOffice (soffice)");

    println!();
    println!("OCR:");
    check_tool_with_version("tesseract", "Tesseract", &["--version"]);
    match std::env::var("TESSDATA_PREFIX") {
        Ok(prefix) => println!("  TESSDATA_PREFIX: {prefix}"),
        Err(_) => println!("  TESSDATA_PREFIX: not set (Tesseract defaults apply)"),
    }

    println!();
    println!("Layout Model:");
    let config = Config::load().unwrap_or_default();
    if config.model_path.exists() {
        println!("  Model: {} (found)", config.model_path.display());
    } else {
        println!("  Model: {} (missing)", config.model_path.display());
    }
    match &config.labels_path {
        Some(path) => println!("  Labels: {}", path.display()),
        None => println!("  Labels: built-in DocLayNet vocabulary"),
    }

    println!();
    println!("Config File Locations:");
    println!("  Local: ./docsift.toml");
    if let Some(user) = Config::user_config_path() {
        println!("  User:  {}", user.display());
    }

    Ok(())
}

fn check_tool(cmd: &str, name: &str) {
    match which::which(cmd) {
        Ok(path) => println!("  {}: {} (found)", name, path.display()),
        Err(_) => println!("  {}: Not found", name),
    }
}

fn check_tool_with_version(cmd: &str, name: &str, version_args: &[&str]) {
    match which::which(cmd) {
        Ok(path) => {
            if let Ok(output) = std::process::Command::new(&path).args(version_args).output() {
                let version_str = String::from_utf8_lossy(&output.stdout);
                let first_line = version_str.lines().next().unwrap_or("");
                if !first_line.is_empty() && first_line.len() < 80 {
                    println!("  {}: {} ({})", name, first_line.trim(), path.display());
                } else {
                    println!("  {}: {} (found)", name, path.display());
                }
            } else {
                println!("  {}: {} (found)", name, path.display());
            }
        }
        Err(_) => println!("  {}: Not found", name),
    }
}
