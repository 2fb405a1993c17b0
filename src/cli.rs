//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CliOverrides;

#[derive(Debug, Parser)]
#[command(
    name = "docsift",
    version,
    about = "Extract structured, reading-ordered content from office documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a document into per-page structured content (JSON)
    Parse(ParseArgs),
    /// Show environment, external tool, and model information
    Info,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Input document (PDF, or an office format convertible to PDF)
    pub input: PathBuf,

    /// Display name used to derive artifact names (defaults to the input
    /// file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Write the JSON result to this file instead of stdout
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Configuration file (default: ./docsift.toml, then user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base directory for generated artifacts (page images and parsed pages)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rendering resolution in DPI
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Layout detection model (ONNX)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// JSON label map for the model's class vocabulary
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// OCR language (Tesseract traineddata name)
    #[arg(long)]
    pub lang: Option<String>,

    /// Tesseract trained-data directory
    #[arg(long)]
    pub tessdata: Option<PathBuf>,

    /// Minimum detection confidence for a region to be kept
    #[arg(long)]
    pub confidence: Option<f32>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the progress bar and summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl ParseArgs {
    /// Collect the explicitly-set options into config overrides.
    pub fn to_overrides(&self) -> CliOverrides {
        CliOverrides {
            dpi: self.dpi,
            jpeg_quality: None,
            model_path: self.model.clone(),
            labels_path: self.labels.clone(),
            output_dir: self.output.clone(),
            ocr_language: self.lang.clone(),
            tessdata_dir: self.tessdata.clone(),
            confidence_threshold: self.confidence,
        }
    }

    /// The document's display name for artifact naming.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("document")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_minimal() {
        let cli = Cli::parse_from(["docsift", "parse", "lease.pdf"]);
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.input, PathBuf::from("lease.pdf"));
                assert_eq!(args.display_name(), "lease.pdf");
                assert!(args.to_overrides().dpi.is_none());
            }
            Commands::Info => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_parse_args_overrides() {
        let cli = Cli::parse_from([
            "docsift", "parse", "lease.pdf", "--dpi", "150", "--lang", "deu", "--name",
            "Lease Agreement.pdf",
        ]);
        match cli.command {
            Commands::Parse(args) => {
                let overrides = args.to_overrides();
                assert_eq!(overrides.dpi, Some(150));
                assert_eq!(overrides.ocr_language.as_deref(), Some("deu"));
                assert_eq!(args.display_name(), "Lease Agreement.pdf");
            }
            Commands::Info => panic!("expected parse command"),
        }
    }
}
