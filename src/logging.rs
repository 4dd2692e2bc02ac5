//! Logging setup using the `log` facade and `env_logger` backend.
//!
//! `RUST_LOG` takes precedence when set. Otherwise the level comes from the
//! CLI flags; the default is warn so log lines do not break up the live
//! progress bar.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging once at startup.
///
/// # Arguments
/// * `verbose` - Count of `-v` flags (1=info, 2=debug, 3+=trace)
/// * `quiet` - Only show errors (ignored when `RUST_LOG` is set)
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    // A second init (e.g. from tests) is harmless
    let _ = builder.try_init();
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
