//! Logger installation.
//!
//! All modules log through the `log` facade. In the browser records go to the
//! devtools console through `console_log`; on the host they go through
//! `env_logger`.

use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    INIT.call_once(|| {
        install(level);
        log::debug!("logging initialized");
    });
}

#[cfg(target_arch = "wasm32")]
fn install(level: LevelFilter) {
    // `Off` installs nothing; an already-set logger is left alone.
    if let Some(level) = level.to_level() {
        let _ = console_log::init_with_level(level);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(level);
        }
    }
    // Tests may install their own logger first.
    let _ = builder.try_init();
}
