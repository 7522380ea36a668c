//! CLI command implementations
//!
//! One command per tool, built from clap matches with the Command pattern.

pub mod command_traits;
pub mod export_command;
pub mod import_command;
pub mod rasterize_command;

pub use command_traits::Command;
pub use export_command::ExportCommand;
pub use import_command::ImportCommand;
pub use rasterize_command::RasterizeCommand;
