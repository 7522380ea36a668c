//! Argument definitions of the command-line tools
//!
//! Kept apart from the binaries so tests can parse argument vectors.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as ClapCommand};
use log::error;
use std::path::PathBuf;

use crate::commands::Command;
use crate::error::ConvertResult;
use crate::utils::logger::Logger;

/// Compression names accepted for written GeoTIFFs
pub const TIFF_COMPRESSIONS: [&str; 4] = ["none", "deflate", "zstd", "lzw"];

fn with_logging_args(command: ClapCommand) -> ClapCommand {
    command
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log records to this file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .required(false),
        )
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .help("Output directory")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .required(false)
}

fn threads_arg(help: &'static str) -> Arg {
    Arg::new("threads")
        .short('t')
        .long("threads")
        .help(help)
        .value_name("N")
        .value_parser(value_parser!(u64).range(1..))
        .required(false)
}

fn tiff_compression_arg() -> Arg {
    Arg::new("compression")
        .long("compression")
        .help("Compression of the written GeoTIFFs")
        .value_name("NAME")
        .value_parser(TIFF_COMPRESSIONS)
        .default_value("lzw")
}

/// `geotiff2png`
pub fn export_cli() -> ClapCommand {
    let command = ClapCommand::new("geotiff2png")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export GeoTIFF rasters as PNG/JPEG images with JSON georeferencing sidecars")
        .arg(
            Arg::new("input")
                .help("Directory of .tif/.tiff rasters")
                .value_name("INPUT_DIR")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .arg(output_arg().help("Image output directory [default: <INPUT_DIR>_<format>]"))
        .arg(threads_arg("Worker threads [default: available parallelism]"))
        .arg(
            Arg::new("bands")
                .short('b')
                .long("bands")
                .help("1-based band indices: one for gray, three for RGB")
                .value_name("N")
                .num_args(1..)
                .value_parser(value_parser!(usize))
                .default_values(["1", "2", "3"]),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Image format")
                .value_parser(["png", "jpg", "jpeg"])
                .default_value("png"),
        )
        .arg(
            Arg::new("compression")
                .short('c')
                .long("compression")
                .help("0-9: PNG deflate effort, or JPEG quality 100 - 10 * level")
                .value_name("LEVEL")
                .value_parser(value_parser!(u8).range(0..=9))
                .default_value("3"),
        )
        .arg(
            Arg::new("json-output")
                .short('j')
                .long("json-output")
                .help("Sidecar output directory [default: <INPUT_DIR>_json]")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .required(false),
        )
        .arg(
            Arg::new("no-json")
                .short('n')
                .long("no-json")
                .help("Do not write JSON sidecars")
                .action(ArgAction::SetTrue),
        );
    with_logging_args(command)
}

/// `png2geotiff`
pub fn import_cli() -> ClapCommand {
    let command = ClapCommand::new("png2geotiff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn PNG/JPEG images back into GeoTIFFs using their JSON sidecars")
        .arg(
            Arg::new("input")
                .help("Image file or directory of .png/.jpg/.jpeg images")
                .value_name("INPUT")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("meta")
                .help("Directory holding the JSON sidecars")
                .value_name("META_DIR")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(2),
        )
        .arg(output_arg().help("Output directory [default: <INPUT>_geotiff]"))
        .arg(threads_arg("Worker threads [default: 1]"))
        .arg(tiff_compression_arg());
    with_logging_args(command)
}

/// `xml2geotiff`
pub fn rasterize_cli() -> ClapCommand {
    let command = ClapCommand::new("xml2geotiff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rasterize CVAT for images 1.1 annotations into label GeoTIFFs")
        .arg(
            Arg::new("input")
                .help("CVAT XML export")
                .value_name("INPUT_XML")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("meta")
                .help("Directory holding the JSON sidecars")
                .value_name("META_DIR")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .index(2),
        )
        .arg(output_arg().help("Output directory [default: <XML dir>/labels]"))
        .arg(tiff_compression_arg());
    with_logging_args(command)
}

fn run_matches<C: Command>(matches: &ArgMatches) -> ConvertResult<()> {
    let command = C::new(matches)?;
    let summary = command.execute()?;
    // Shown at every verbosity, on stderr next to the log records
    eprintln!("Done: {}", summary);
    Ok(())
}

/// Parses the process arguments, sets up logging and runs the tool
///
/// Returns the process exit code; clap exits by itself on usage errors.
pub fn run<C: Command>(cli: ClapCommand) -> i32 {
    let matches = cli.get_matches();

    let verbosity = matches.get_count("verbose");
    let log_file = matches.get_one::<PathBuf>("log-file");
    if let Err(e) = Logger::init_global_logger(verbosity, log_file.map(PathBuf::as_path)) {
        eprintln!("Error setting up logger: {}", e);
        return 1;
    }

    match run_matches::<C>(&matches) {
        Ok(()) => 0,
        Err(e) => {
            error!("Command execution error: {}", e);
            eprintln!("Error: {}", e);
            1
        }
    }
}
