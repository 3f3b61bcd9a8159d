//! Output formatting for CLI results

use anyhow::{Context, Result};
use colorful::Colorful;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};

use crate::config::AcceptanceThresholds;
use crate::report::{AnalysisReport, FileReport};

/// Format one file's report for terminal output
pub fn format_report(
    file: &FileReport,
    thresholds: &AcceptanceThresholds,
    verbose: bool,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Analyzing: {}\n",
        file.path.display().to_string().cyan()
    ));

    if verbose {
        output.push_str(&format!("  Codec: {}\n", file.codec_name));
        output.push_str(&format!("  Sample Rate: {} Hz\n", file.sample_rate));
        output.push_str(&format!("  Channels: {} (analyzed as mono)\n", file.channels));
        output.push_str(&format!("  Duration: {:.2}s\n", file.duration_secs));
    }

    for result in file.report.iter() {
        output.push_str(&format!(
            "  {}: {} {}",
            result.name(),
            result.value,
            result.symbol()
        ));
        if verbose {
            output.push_str(&format!("  ({})", thresholds.describe(result.metric)));
        }
        output.push('\n');
    }

    let failing: Vec<_> = file.report.failing().map(|r| r.name()).collect();
    if failing.is_empty() {
        output.push_str(&format!("  Status: {}\n", "✓ ACCEPTABLE".green()));
    } else {
        output.push_str(&format!(
            "  Status: {}\n",
            format!("✗ {} FAILING ({})", failing.len(), failing.join(", ")).red()
        ));
    }

    output
}

/// Flat JSON object for one report
pub fn format_json(report: &AnalysisReport) -> Result<String> {
    report
        .to_json_pretty()
        .context("Failed to serialize report")
}

struct Batch<'a>(&'a [FileReport]);

impl Serialize for Batch<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for file in self.0 {
            map.serialize_entry(&file.path.display().to_string(), &file.report)?;
        }
        map.end()
    }
}

/// JSON object mapping each file path to its report, in input order
pub fn format_json_batch(files: &[FileReport]) -> Result<String> {
    serde_json::to_string_pretty(&Batch(files)).context("Failed to serialize reports")
}

/// Format a summary for multiple files
pub fn format_summary(files: &[FileReport], failed: usize) -> String {
    let acceptable = files.iter().filter(|f| f.report.all_acceptable()).count();
    let flagged = files.len() - acceptable;

    let mut output = String::from("\nSummary:\n");
    output.push_str(&format!("  {} files analyzed\n", files.len() + failed));
    if acceptable > 0 {
        output.push_str(&format!("  {}\n", format!("✓ {} acceptable", acceptable).green()));
    }
    if flagged > 0 {
        output.push_str(&format!(
            "  {}\n",
            format!("✗ {} with failing metrics", flagged).yellow()
        ));
    }
    if failed > 0 {
        output.push_str(&format!("  {}\n", format!("! {} could not be analyzed", failed).red()));
    }
    output
}

/// Path of the exported report for `source` inside `dir`
pub fn export_path(source: &Path, dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    dir.join(format!("{}.quality.json", stem))
}

/// Write the flat JSON report next to the others in `dir`
pub fn export_report(file: &FileReport, dir: &Path) -> Result<PathBuf> {
    let path = export_path(&file.path, dir);
    let json = format_json(&file.report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Metric, MetricResult};

    fn file_report(path: &str, lufs: f64) -> FileReport {
        let t = AcceptanceThresholds::default();
        FileReport {
            path: PathBuf::from(path),
            sample_rate: 44100,
            channels: 2,
            duration_secs: 12.5,
            codec_name: "mp3".to_string(),
            report: AnalysisReport::new(vec![
                MetricResult::evaluate(Metric::Lufs, lufs, &t),
                MetricResult::evaluate(Metric::LufsRange, 2.0, &t),
                MetricResult::evaluate(Metric::Interruptions, 0.3, &t),
                MetricResult::evaluate(Metric::Intelligibility, 4.0, &t),
            ]),
        }
    }

    #[test]
    fn test_format_report() {
        let t = AcceptanceThresholds::default();
        let output = format_report(&file_report("talk.mp3", -30.0), &t, false);
        assert!(output.contains("talk.mp3"));
        assert!(output.contains("LUFS: -30 ❌"));
        assert!(output.contains("LUFS Range: 2 ✅"));
        assert!(output.contains("1 FAILING (LUFS)"));
        assert!(!output.contains("Sample Rate"));

        let output = format_report(&file_report("talk.mp3", -22.0), &t, true);
        assert!(output.contains("Sample Rate: 44100 Hz"));
        assert!(output.contains("(-27 < value < -17)"));
        assert!(output.contains("ACCEPTABLE"));
    }

    #[test]
    fn test_format_json_batch_keeps_order() {
        let files = vec![file_report("z.mp3", -22.0), file_report("a.mp3", -22.0)];
        let json = format_json_batch(&files).unwrap();
        let z = json.find("z.mp3").unwrap();
        let a = json.find("a.mp3").unwrap();
        assert!(z < a);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["a.mp3"]["LUFS"]["value"], -22.0);
        assert_eq!(value["a.mp3"]["LUFS"]["acceptable"], true);
    }

    #[test]
    fn test_format_summary() {
        let files = vec![file_report("a.mp3", -22.0), file_report("b.mp3", -40.0)];
        let summary = format_summary(&files, 1);
        assert!(summary.contains("3 files analyzed"));
        assert!(summary.contains("1 acceptable"));
        assert!(summary.contains("1 with failing metrics"));
        assert!(summary.contains("1 could not be analyzed"));
    }

    #[test]
    fn test_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let file = file_report("/music/episode 1.mp3", -22.0);
        let path = export_report(&file, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("episode 1.quality.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["SRMR (Intelligibility)"]["value"], 4.0);
    }
}
