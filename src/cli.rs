use crate::config::{
    TrimConfig, DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_SUFFIX, DEFAULT_PROCESSED_SUFFIX,
};
use crate::page_spec::PageSpec;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdftrim")]
#[command(
    about = "Trim PDFs at a search match, by page ranges or page bounds, and strip blank pages"
)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(
        long,
        global = true,
        env = "PDF_TRIMMER_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove pages from the first page containing TEXT to the end
    Search {
        /// Text to search for (case-sensitive)
        #[arg(value_parser = non_empty)]
        text: String,

        /// Keep the match page and everything after it instead
        #[arg(short, long)]
        keep: bool,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Delete page ranges
    Delete {
        /// Pages to delete (e.g., "1-4,7")
        #[arg(value_parser = PageSpec::parse)]
        pages: PageSpec,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Keep only the given page ranges
    Keep {
        /// Pages to keep (e.g., "1-4,7")
        #[arg(value_parser = PageSpec::parse)]
        pages: PageSpec,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Delete pages before and/or after a page number
    Bounds {
        /// Delete every page before this one
        #[arg(long, required_unless_present = "after", value_parser = clap::value_parser!(u32).range(1..))]
        before: Option<u32>,

        /// Delete every page after this one
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        after: Option<u32>,

        /// Keep the named pages and delete the rest instead
        #[arg(short, long)]
        keep: bool,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show which pages the blank-page heuristic would remove
    Blanks {
        /// PDF file to inspect
        path: PathBuf,

        /// Print verdicts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run as MCP server
    Mcp,
}

/// Where inputs come from and where outputs go
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Single PDF to process (default: every PDF in --dir)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Directory to process in batch mode
    #[arg(short, long, default_value = ".", conflicts_with = "file")]
    pub dir: PathBuf,

    /// Output directory
    #[arg(short, long, env = "PDF_TRIMMER_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Suffix added to output file names
    #[arg(long, env = "PDF_TRIMMER_OUTPUT_SUFFIX", default_value = DEFAULT_OUTPUT_SUFFIX, allow_hyphen_values = true)]
    pub suffix: String,

    /// Files ending with this are skipped in batch mode
    #[arg(long, env = "PDF_TRIMMER_PROCESSED_SUFFIX", default_value = DEFAULT_PROCESSED_SUFFIX)]
    pub processed_suffix: String,

    /// Don't remove blank pages
    #[arg(long)]
    pub keep_blanks: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl TargetArgs {
    pub fn config(&self) -> TrimConfig {
        TrimConfig {
            output_dir: self.output_dir.clone(),
            output_suffix: self.suffix.clone(),
            processed_suffix: self.processed_suffix.clone(),
            strip_blanks: !self.keep_blanks,
        }
    }
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("search text cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
