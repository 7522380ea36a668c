//! `png2geotiff` command

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::{compression_code, required_path, sibling_dir, thread_count, Command};
use crate::convert::{run_import, ImportOptions, RunSummary};
use crate::error::ConvertResult;

/// Converts images and their sidecars back to GeoTIFFs
#[derive(Debug)]
pub struct ImportCommand {
    input: PathBuf,
    options: ImportOptions,
}

impl ImportCommand {
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }
}

impl Command for ImportCommand {
    fn new(args: &ArgMatches) -> ConvertResult<Self> {
        let input = required_path(args, "input")?;
        let meta_dir = required_path(args, "meta")?;
        let output_dir = args.get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| sibling_dir(&input, "geotiff"));

        let options = ImportOptions {
            meta_dir,
            output_dir,
            threads: thread_count(args, 1),
            compression: compression_code(args)?,
        };
        Ok(ImportCommand { input, options })
    }

    fn execute(&self) -> ConvertResult<RunSummary> {
        info!("Importing images from {}", self.input.display());
        run_import(&self.input, &self.options)
    }
}
