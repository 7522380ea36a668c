use std::process;

use geocvat::cli::{self, import_cli};
use geocvat::commands::ImportCommand;

fn main() {
    process::exit(cli::run::<ImportCommand>(import_cli()));
}
