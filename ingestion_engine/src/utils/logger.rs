// @file: ingestion_engine/src/utils/logger.rs
// @description: env_logger bootstrap and panic reporting through the log facade.
// @author: LAS.

use log::error;
use std::panic;

//
// PUBLIC INTERFACE
//

/// Initializes env_logger with `default_level` unless RUST_LOG overrides it.
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(default_level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .try_init();
}

/// Routes panics through `log` at error level before the default hook runs,
/// so they reach the same sink as everything else.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let payload: &str = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "non-string panic payload"
        };

        let location: String = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        error!("uncaught-panic error={} location={}", payload, location);
        default_hook(info);
    }));
}
