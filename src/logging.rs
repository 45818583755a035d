//! Logger setup for the demo binary and tests.
use env_logger::{Builder, Env};
use log::{debug, LevelFilter};

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks between debug and
/// info. Simulation time is already in every message, so wall-clock
/// timestamps are left out. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None).format_target(verbose);
    if builder.try_init().is_err() {
        debug!("logger already installed");
    }
}
