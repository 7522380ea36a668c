//! `geotiff2png` command

use clap::ArgMatches;
use log::{info, warn};
use std::path::PathBuf;

use crate::commands::command_traits::{required_path, sibling_dir, thread_count, Command};
use crate::convert::{default_threads, run_export, ExportOptions, ImageFormat, RunSummary};
use crate::error::ConvertResult;

/// Exports a directory of rasters as images
#[derive(Debug)]
pub struct ExportCommand {
    input_dir: PathBuf,
    options: ExportOptions,
}

impl ExportCommand {
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }
}

impl Command for ExportCommand {
    fn new(args: &ArgMatches) -> ConvertResult<Self> {
        let input_dir = required_path(args, "input")?;
        let format = ImageFormat::from_name(
            args.get_one::<String>("format").map(String::as_str).unwrap_or("png"))?;

        let output_dir = args.get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| sibling_dir(&input_dir, format.extension()));

        let json_dir = if args.get_flag("no-json") {
            if args.get_one::<PathBuf>("json-output").is_some() {
                warn!("--json-output is ignored together with --no-json");
            }
            None
        } else {
            Some(args.get_one::<PathBuf>("json-output")
                .cloned()
                .unwrap_or_else(|| sibling_dir(&input_dir, "json")))
        };

        let bands: Vec<usize> = args.get_many::<usize>("bands")
            .map(|values| values.copied().collect())
            .unwrap_or_else(|| vec![1, 2, 3]);

        let options = ExportOptions {
            bands,
            format,
            compression: args.get_one::<u8>("compression").copied().unwrap_or(3),
            output_dir,
            json_dir,
            threads: thread_count(args, default_threads()),
        };
        options.validate()?;

        Ok(ExportCommand { input_dir, options })
    }

    fn execute(&self) -> ConvertResult<RunSummary> {
        info!("Exporting rasters from {}", self.input_dir.display());
        run_export(&self.input_dir, &self.options)
    }
}
