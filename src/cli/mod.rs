// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod files;
mod output;

pub use args::Args;
pub use files::collect_audio_files;
pub use output::{
    export_path, export_report, format_json, format_json_batch, format_report, format_summary,
};
