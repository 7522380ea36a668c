//! `xml2geotiff` command

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::{compression_code, required_path, Command};
use crate::convert::labeler::default_output_dir;
use crate::convert::{run_rasterize, RasterizeOptions, RunSummary};
use crate::error::ConvertResult;

/// Rasterizes a CVAT export into label GeoTIFFs
#[derive(Debug)]
pub struct RasterizeCommand {
    xml_path: PathBuf,
    options: RasterizeOptions,
}

impl RasterizeCommand {
    pub fn options(&self) -> &RasterizeOptions {
        &self.options
    }
}

impl Command for RasterizeCommand {
    fn new(args: &ArgMatches) -> ConvertResult<Self> {
        let xml_path = required_path(args, "input")?;
        let meta_dir = required_path(args, "meta")?;
        let output_dir = args.get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| default_output_dir(&xml_path));

        let mut options = RasterizeOptions::new(&meta_dir, &output_dir);
        options.compression = compression_code(args)?;
        Ok(RasterizeCommand { xml_path, options })
    }

    fn execute(&self) -> ConvertResult<RunSummary> {
        info!("Rasterizing {} into {}", self.xml_path.display(), self.options.output_dir.display());
        run_rasterize(&self.xml_path, &self.options)
    }
}
