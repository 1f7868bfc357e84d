//! Predict command - score a CSV offline

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::bundle::ArtifactBundle;
use crate::dataset::RawTable;
use crate::service::{BatchReport, PredictionService};

pub fn run(input: &Path, artifacts: &Path, output: Option<&Path>) -> Result<()> {
    let bundle = ArtifactBundle::load(artifacts)
        .with_context(|| format!("loading artifacts from {}", artifacts.display()))?;
    let service = PredictionService::from_bundle(bundle);

    let table = RawTable::read_path(input)?;
    let report = service.predict_batch(&table)?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_annotated(&table, &report, file)?;
            println!("Wrote {} annotated rows to {}", report.total, path.display());
        }
        None => write_annotated(&table, &report, std::io::stdout().lock())?,
    }

    println!(
        "{} rows: {} satisfied ({}%), {} dissatisfied ({}%), {} errors",
        report.total,
        report.satisfied,
        report.satisfied_percentage,
        report.dissatisfied,
        report.dissatisfied_percentage,
        report.errors
    );
    Ok(())
}

/// Write the input rows back out with `Prediction` and `Main Reason`
/// columns appended.
fn write_annotated<W: Write>(table: &RawTable, report: &BatchReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    header.push("Prediction");
    header.push("Main Reason");
    writer.write_record(&header)?;

    for (row, outcome) in table.rows.iter().zip(report.outcomes.iter()) {
        let mut record: Vec<String> = row.clone();
        record.push(outcome.result_text());
        record.push(outcome.reason_text().to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
