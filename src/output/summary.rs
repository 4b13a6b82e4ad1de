use crate::error::OutputError;
use crate::parser::Aspect;
use crate::runner::{PaperResult, PaperStatus, RunReport, RunTotals};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;

const OTHER_ASPECT: &str = "other";

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub input: String,
    pub output: String,
    pub duration_sec: f64,
    pub totals: RunTotals,
    pub aspects: Vec<AspectCount>,
    pub papers: Vec<PaperSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AspectCount {
    pub aspect: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PaperSummary {
    pub paper_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub reviews: usize,
    pub contradictions: usize,
    pub duration_sec: f64,
    pub finished_at_sec: f64,
}

pub fn build_summary(report: &RunReport, input: &Path, output: &Path) -> RunSummary {
    let mut by_aspect = [0usize; Aspect::ALL.len()];
    let mut other = 0usize;
    let mut papers = Vec::with_capacity(report.paper_results.len());

    for result in &report.paper_results {
        for record in &result.contradictions {
            match record.aspect() {
                Some(aspect) => {
                    if let Some(idx) = Aspect::ALL.iter().position(|a| *a == aspect) {
                        by_aspect[idx] += 1;
                    }
                }
                None => other += 1,
            }
        }

        papers.push(paper_summary(result));
    }

    let mut aspects: Vec<AspectCount> = Aspect::ALL
        .iter()
        .zip(by_aspect)
        .map(|(aspect, count)| AspectCount {
            aspect: aspect.to_string(),
            count,
        })
        .collect();
    aspects.push(AspectCount {
        aspect: OTHER_ASPECT.to_string(),
        count: other,
    });

    RunSummary {
        timestamp: Utc::now().to_rfc3339(),
        input: input.display().to_string(),
        output: output.display().to_string(),
        duration_sec: report.total_duration.as_secs_f64(),
        totals: report.totals(),
        aspects,
        papers,
    }
}

fn paper_summary(result: &PaperResult) -> PaperSummary {
    let (status, reason) = match &result.status {
        PaperStatus::Completed => ("completed", None),
        PaperStatus::NoReviews => ("no_reviews", None),
        PaperStatus::InvocationFailed => ("invocation_failed", None),
        PaperStatus::Unparseable { error } => ("unparseable", Some(error.clone())),
    };

    PaperSummary {
        paper_id: result.paper_id.clone(),
        status: status.to_string(),
        reason,
        reviews: result.review_count,
        contradictions: result.contradictions.len(),
        duration_sec: result.duration.as_secs_f64(),
        finished_at_sec: result.finished_at.as_secs_f64(),
    }
}

/// Write the summary as pretty JSON, creating the parent directory if needed
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(OutputError::CreateDir)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).map_err(OutputError::WriteSummary)?;
    Ok(())
}

pub fn print_summary(summary: &RunSummary) {
    let totals = &summary.totals;
    println!("\n=== Run Summary ===\n");
    println!("Papers:            {}", totals.papers);
    println!("  completed:         {}", totals.completed);
    println!("  no_reviews:        {}", totals.no_reviews);
    println!("  invocation_failed: {}", totals.invocation_failed);
    println!("  unparseable:       {}", totals.unparseable);
    println!("Contradictions:    {}", totals.contradictions);

    if totals.contradictions > 0 {
        println!("\nBy aspect:");
        for entry in summary.aspects.iter().filter(|a| a.count > 0) {
            println!("  {:<22} {}", entry.aspect, entry.count);
        }
    }

    println!(
        "\nWrote {} in {:.1}s",
        summary.output, summary.duration_sec
    );
}
