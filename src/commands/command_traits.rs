//! Command pattern interfaces
//!
//! Each tool turns its parsed arguments into a command object, then runs
//! it. Building the command resolves defaults and checks the arguments;
//! executing it does the work.

use clap::ArgMatches;
use std::path::{Path, PathBuf};

use crate::compression::CompressionFactory;
use crate::convert::RunSummary;
use crate::error::{ConvertError, ConvertResult};

/// Represents an executable command in the application
pub trait Command: Sized {
    /// Builds the command from parsed arguments
    fn new(args: &ArgMatches) -> ConvertResult<Self>;

    /// Execute the command
    fn execute(&self) -> ConvertResult<RunSummary>;
}

pub(crate) fn required_path(args: &ArgMatches, id: &str) -> ConvertResult<PathBuf> {
    args.get_one::<PathBuf>(id)
        .cloned()
        .ok_or_else(|| ConvertError::InvalidArgument(format!("Missing argument {}", id)))
}

/// `<input>_<suffix>` next to the input
pub(crate) fn sibling_dir(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.components().as_path().as_os_str().to_os_string();
    name.push(format!("_{}", suffix));
    PathBuf::from(name)
}

/// Compression tag value for a `--compression` name
pub(crate) fn compression_code(args: &ArgMatches) -> ConvertResult<u16> {
    let name = args.get_one::<String>("compression").map(String::as_str).unwrap_or("lzw");
    Ok(CompressionFactory::get_handler_by_name(name)?.code())
}

pub(crate) fn thread_count(args: &ArgMatches, default: usize) -> usize {
    args.get_one::<u64>("threads").map(|&n| n as usize).unwrap_or(default)
}
