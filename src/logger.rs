use log::SetLoggerError;
use std::sync::Once;

use crate::progbase;

static INIT: Once = Once::new();

/// Installs the `env_logger` backend once per process.
///
/// Output goes to stderr when `--stdout` is given or `RUST_LOG` is set, so
/// stdout stays reserved for notifications.
pub fn init_logger() -> Result<(), SetLoggerError> {
    let mut result = Ok(());
    INIT.call_once(|| {
        let enabled = progbase::stdout() || std::env::var_os("RUST_LOG").is_some();
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if !enabled {
            builder.filter_level(log::LevelFilter::Off);
        } else if std::env::var_os("RUST_LOG").is_none() {
            builder.filter_level(progbase::log_lvl());
        }
        result = builder.try_init();
    });
    result
}
