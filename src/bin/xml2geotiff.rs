use std::process;

use geocvat::cli::{self, rasterize_cli};
use geocvat::commands::RasterizeCommand;

fn main() {
    process::exit(cli::run::<RasterizeCommand>(rasterize_cli()));
}
