//! Tracing setup for the `cascade` binary.
//!
//! The subscriber is only installed when `CASCADE_LOG` (or `RUST_LOG`) is
//! set. Output goes to stderr so it never mixes with CSS written to stdout.
//!
//! ```bash
//! CASCADE_LOG=debug cascade build style.css
//! CASCADE_LOG=cascade_codegen=trace cascade build style.css -o out.css --source-map
//! ```

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `CASCADE_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("CASCADE_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Initialise the global tracing subscriber, if requested.
pub fn init_tracing() {
    let has_cascade_log = std::env::var("CASCADE_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_cascade_log && !has_rust_log {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
