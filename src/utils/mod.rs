pub mod build_info;

use std::{io, sync::Once};

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber. `RUST_LOG` directives are honoured and
/// `split_ledger=info` is added on top. Output goes to stderr so it never
/// mixes with command output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "split_ledger=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    });
}
