use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::commands::blanks::inspect;
use crate::config::TrimConfig;
use crate::page_spec::PageSpec;
use crate::selection::{Bounds, SelectionMode};
use crate::trim::{process_file, Target, TrimRequest};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSearchRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Text to search for (case-sensitive)")]
    pub text: String,
    #[schemars(
        description = "Keep the matching page and everything after it instead of removing it (default: false)"
    )]
    #[serde(default)]
    pub keep: bool,
    #[schemars(description = "Output directory (default: 'output')")]
    pub output_dir: Option<String>,
    #[schemars(description = "Leave blank pages in place (default: false)")]
    #[serde(default)]
    pub keep_blanks: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-4,7')")]
    pub pages: String,
    #[schemars(description = "Output directory (default: 'output')")]
    pub output_dir: Option<String>,
    #[schemars(description = "Leave blank pages in place (default: false)")]
    #[serde(default)]
    pub keep_blanks: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfBoundsRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Delete every page before this 1-based page number")]
    pub before: Option<u32>,
    #[schemars(description = "Delete every page after this 1-based page number")]
    pub after: Option<u32>,
    #[schemars(description = "Keep the named pages and delete the rest instead (default: false)")]
    #[serde(default)]
    pub keep: bool,
    #[schemars(description = "Output directory (default: 'output')")]
    pub output_dir: Option<String>,
    #[schemars(description = "Leave blank pages in place (default: false)")]
    #[serde(default)]
    pub keep_blanks: bool,
}

fn mode(keep: bool) -> SelectionMode {
    if keep {
        SelectionMode::Keep
    } else {
        SelectionMode::Delete
    }
}

fn config(output_dir: Option<String>, keep_blanks: bool) -> TrimConfig {
    let mut config = TrimConfig {
        strip_blanks: !keep_blanks,
        ..Default::default()
    };
    if let Some(dir) = output_dir {
        config.output_dir = PathBuf::from(dir);
    }
    config
}

fn run_trim(path: &str, request: TrimRequest, config: &TrimConfig) -> String {
    let result = process_file(Path::new(path), &request, config);
    serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
}

fn run_pages(req: PdfPagesRequest, mode: SelectionMode) -> String {
    let spec = match PageSpec::parse(&req.pages) {
        Ok(s) => s,
        Err(e) => return format!("Error: {}", e),
    };
    let config = config(req.output_dir, req.keep_blanks);
    run_trim(&req.path, TrimRequest::new(Target::Pages(spec), mode), &config)
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Remove pages from the first page containing the search text to the end of the PDF, or with keep=true remove everything before that page. Blank pages are stripped afterwards.")]
    fn pdf_trim_search(&self, Parameters(req): Parameters<PdfSearchRequest>) -> String {
        if req.text.trim().is_empty() {
            return "Error: search text cannot be empty".to_string();
        }
        let config = config(req.output_dir, req.keep_blanks);
        let request = TrimRequest::new(Target::Search(req.text), mode(req.keep));
        run_trim(&req.path, request, &config)
    }

    #[tool(description = "Delete page ranges from a PDF using syntax like '1-4,7'. Blank pages are stripped afterwards.")]
    fn pdf_delete_pages(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        run_pages(req, SelectionMode::Delete)
    }

    #[tool(description = "Keep only the given page ranges of a PDF using syntax like '1-4,7'. Blank pages are stripped afterwards.")]
    fn pdf_keep_pages(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        run_pages(req, SelectionMode::Keep)
    }

    #[tool(description = "Delete pages before and/or after 1-based page numbers, or with keep=true keep those pages and delete the rest. Blank pages are stripped afterwards.")]
    fn pdf_trim_bounds(&self, Parameters(req): Parameters<PdfBoundsRequest>) -> String {
        if req.before.is_none() && req.after.is_none() {
            return "Error: at least one of before/after is required".to_string();
        }
        let config = config(req.output_dir, req.keep_blanks);
        let bounds = Bounds {
            before: req.before,
            after: req.after,
        };
        let request = TrimRequest::new(Target::Bounds(bounds), mode(req.keep));
        run_trim(&req.path, request, &config)
    }

    #[tool(description = "Report, for every page of a PDF, whether the blank-page heuristic considers it blank and why")]
    fn pdf_blank_pages(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match inspect(&path) {
            Ok(verdicts) => {
                serde_json::to_string_pretty(&verdicts).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF trimming tools. Use pdf_trim_search to cut a PDF at the first page containing \
                 some text, pdf_delete_pages or pdf_keep_pages for explicit page ranges, \
                 pdf_trim_bounds to cut before/after a page, and pdf_blank_pages to see which pages \
                 would be dropped as blank. Trimmed files are written as <name>_edit.pdf in the \
                 output directory."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
