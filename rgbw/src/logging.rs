use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber. Only does anything when `RUST_LOG` is set,
/// e.g. `RUST_LOG=rgbw_script_host=debug,guest=info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}
