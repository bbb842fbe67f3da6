use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("offplan_roi_core=warn,offplan_roi_cli=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
