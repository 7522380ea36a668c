//! Logger setup for the command-line tools
//!
//! Records go through the `log` facade to `env_logger`. The `-v` count
//! picks the default level, `RUST_LOG` overrides it, and an optional log
//! file receives a copy of everything written to stderr.

use env_logger::{Builder, Env, Target};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes every record to stderr and to a file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

pub struct Logger;

impl Logger {
    /// Default filter for a `-v` count
    pub fn level_for_verbosity(verbosity: u8) -> &'static str {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Initializes the global logger
    ///
    /// Fails only when the log file cannot be created.
    pub fn init_global_logger(verbosity: u8, log_file: Option<&Path>) -> io::Result<()> {
        let mut builder = Builder::from_env(Env::default().default_filter_or(Self::level_for_verbosity(verbosity)));
        builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));

        if let Some(path) = log_file {
            let file = File::create(path)?;
            builder.target(Target::Pipe(Box::new(TeeWriter { file })));
        }

        if builder.try_init().is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
        Ok(())
    }
}
