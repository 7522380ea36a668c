use std::process;

use geocvat::cli::{self, export_cli};
use geocvat::commands::ExportCommand;

fn main() {
    process::exit(cli::run::<ExportCommand>(export_cli()));
}
