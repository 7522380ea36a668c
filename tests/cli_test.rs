//! Argument parsing tests for the three tools

extern crate std;

use std::path::PathBuf;

use geocvat::cli::{export_cli, import_cli, rasterize_cli};
use geocvat::commands::{Command, ExportCommand, ImportCommand, RasterizeCommand};
use geocvat::convert::ImageFormat;
use geocvat::tiff::constants::compression;
use geocvat::utils::logger::Logger;

#[test]
fn test_export_defaults() {
    let matches = export_cli().try_get_matches_from(["geotiff2png", "data/tiles"]).unwrap();
    let command = ExportCommand::new(&matches).unwrap();
    let options = command.options();

    std::assert_eq!(options.bands, vec![1, 2, 3]);
    std::assert_eq!(options.format, ImageFormat::Png);
    std::assert_eq!(options.compression, 3);
    std::assert_eq!(options.output_dir, PathBuf::from("data/tiles_png"));
    std::assert_eq!(options.json_dir, Some(PathBuf::from("data/tiles_json")));
    std::assert!(options.threads >= 1);
}

#[test]
fn test_export_explicit_arguments() {
    let matches = export_cli().try_get_matches_from([
        "geotiff2png", "in/", "-o", "out", "-t", "3", "-b", "4", "-f", "jpeg", "-c", "9", "-n", "-j", "meta", "-vv",
    ]).unwrap();
    std::assert_eq!(matches.get_count("verbose"), 2);

    let command = ExportCommand::new(&matches).unwrap();
    let options = command.options();
    std::assert_eq!(options.bands, vec![4]);
    std::assert_eq!(options.format, ImageFormat::Jpeg);
    std::assert_eq!(options.compression, 9);
    std::assert_eq!(options.output_dir, PathBuf::from("out"));
    std::assert_eq!(options.json_dir, None);
    std::assert_eq!(options.threads, 3);
}

#[test]
fn test_export_rejects_bad_values() {
    let matches = export_cli().try_get_matches_from(["geotiff2png", "in", "-b", "1", "2"]).unwrap();
    std::assert!(ExportCommand::new(&matches).is_err());

    std::assert!(export_cli().try_get_matches_from(["geotiff2png", "in", "-c", "10"]).is_err());
    std::assert!(export_cli().try_get_matches_from(["geotiff2png", "in", "-f", "gif"]).is_err());
    std::assert!(export_cli().try_get_matches_from(["geotiff2png", "in", "-t", "0"]).is_err());
    std::assert!(export_cli().try_get_matches_from(["geotiff2png"]).is_err());
}

#[test]
fn test_import_defaults_and_compression() {
    let matches = import_cli().try_get_matches_from(["png2geotiff", "images", "meta"]).unwrap();
    let command = ImportCommand::new(&matches).unwrap();
    std::assert_eq!(command.options().output_dir, PathBuf::from("images_geotiff"));
    std::assert_eq!(command.options().threads, 1);
    std::assert_eq!(command.options().compression, compression::LZW);

    let matches = import_cli()
        .try_get_matches_from(["png2geotiff", "images", "meta", "--compression", "zstd", "-t", "4"])
        .unwrap();
    let command = ImportCommand::new(&matches).unwrap();
    std::assert_eq!(command.options().compression, compression::ZSTD);
    std::assert_eq!(command.options().threads, 4);

    std::assert!(import_cli().try_get_matches_from(["png2geotiff", "images"]).is_err());
    std::assert!(import_cli()
        .try_get_matches_from(["png2geotiff", "images", "meta", "--compression", "jpeg"])
        .is_err());
}

#[test]
fn test_rasterize_defaults() {
    let matches = rasterize_cli()
        .try_get_matches_from(["xml2geotiff", "task/annotations.xml", "meta", "--log-file", "run.log"])
        .unwrap();
    std::assert_eq!(matches.get_one::<PathBuf>("log-file"), Some(&PathBuf::from("run.log")));

    let command = RasterizeCommand::new(&matches).unwrap();
    std::assert_eq!(command.options().output_dir, PathBuf::from("task/labels"));
    std::assert_eq!(command.options().meta_dir, PathBuf::from("meta"));
    std::assert_eq!(command.options().compression, compression::LZW);

    let matches = rasterize_cli()
        .try_get_matches_from(["xml2geotiff", "a.xml", "meta", "-o", "out", "--compression", "none"])
        .unwrap();
    let command = RasterizeCommand::new(&matches).unwrap();
    std::assert_eq!(command.options().output_dir, PathBuf::from("out"));
    std::assert_eq!(command.options().compression, compression::NONE);
}

#[test]
fn test_verbosity_levels() {
    std::assert_eq!(Logger::level_for_verbosity(0), "warn");
    std::assert_eq!(Logger::level_for_verbosity(1), "info");
    std::assert_eq!(Logger::level_for_verbosity(2), "debug");
    std::assert_eq!(Logger::level_for_verbosity(7), "trace");
}
