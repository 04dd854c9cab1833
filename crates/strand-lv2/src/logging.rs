//! Logger setup for plugin binaries.
//!
//! A plugin is a shared library loaded into someone else's process, so there
//! is no `main` to install a logger from. The backend is installed lazily the
//! first time the host asks for a descriptor. Output goes to stderr and is
//! filtered with `RUST_LOG` (default: `warn`).

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the `env_logger` backend once per process.
///
/// Does nothing if the host process (or another plugin) already installed a
/// global logger.
pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .format_timestamp(None)
            .try_init();
    });
}
