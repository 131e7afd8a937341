use crate::cli::TargetArgs;
use crate::files::find_pdf_files;
use crate::result::BatchSummary;
use crate::trim::{process_batch, TrimRequest};
use anyhow::Result;

pub fn run(request: TrimRequest, target: &TargetArgs) -> Result<()> {
    let config = target.config();

    let inputs = match &target.file {
        Some(file) => vec![file.clone()],
        None => find_pdf_files(&target.dir, &config.processed_suffix)?,
    };

    if inputs.is_empty() {
        println!("No PDF files found in {}.", target.dir.display());
        return Ok(());
    }

    let results = process_batch(&inputs, &request, &config);
    let summary = BatchSummary::from_results(&results);

    if target.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}", result);
        }
        println!("{}", summary);
    }

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} file(s) failed",
            summary.failed,
            summary.total_files
        );
    }

    Ok(())
}
