// src/main.rs
use anyhow::{bail, Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;

use speechcheckr::cli::{
    collect_audio_files, export_report, format_json, format_json_batch, format_report,
    format_summary, Args,
};
use speechcheckr::{AnalysisConfig, AudioAnalyzer, Error, FileReport};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,speechcheckr=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let analyzer = AudioAnalyzer::with_config(config).context("Invalid analysis config")?;

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    }

    let audio_files = collect_audio_files(&args.input);
    if audio_files.is_empty() {
        eprintln!("{}", "No audio files found!".red());
        return Ok(());
    }

    if !args.json {
        println!("Found {} audio file(s)\n", audio_files.len());
    }

    let pb = progress_bar(audio_files.len(), audio_files.len() > 1 && !args.json);
    let results: Vec<(PathBuf, Result<FileReport, Error>)> = audio_files
        .par_iter()
        .progress_with(pb.clone())
        .map(|path| {
            let result = analyzer.analyze_file(path);
            if let Ok(file) = &result {
                log::info!("analyzed {}", file.path.display());
            }
            (path.clone(), result)
        })
        .collect();
    pb.finish_and_clear();

    let thresholds = &analyzer.config().thresholds;
    let mut reports = Vec::new();
    let mut failed = 0;
    let mut export_failed = 0;
    for (path, result) in results {
        match result {
            Ok(file) => {
                if !args.json {
                    println!("{}", format_report(&file, thresholds, args.verbose));
                }
                if let Some(dir) = &args.export_dir {
                    match export_report(&file, dir) {
                        Ok(written) if !args.json => {
                            println!("  Report saved to: {}\n", written.display());
                        }
                        Ok(_) => {}
                        Err(e) => {
                            export_failed += 1;
                            eprintln!("{} {:#}", "Error:".red(), e);
                        }
                    }
                }
                reports.push(file);
            }
            Err(e) => {
                failed += 1;
                eprintln!(
                    "{} {}: {}",
                    "Error:".red(),
                    path.display(),
                    e
                );
            }
        }
    }

    if args.json {
        match reports.as_slice() {
            [single] if failed == 0 => println!("{}", format_json(&single.report)?),
            _ => println!("{}", format_json_batch(&reports)?),
        }
    } else if reports.len() + failed > 1 {
        println!("{}", format_summary(&reports, failed));
    }

    if failed > 0 {
        bail!("{} file(s) could not be analyzed", failed);
    }
    if export_failed > 0 {
        bail!("{} report(s) could not be exported", export_failed);
    }

    Ok(())
}
