//! Shared plumbing for the `gnoi-client` and `gnmi-set` drivers.
//!
//! Both binaries connect the same way ([`TargetArgs`]) and print JSON to
//! stdout; diagnostics go to stderr through `tracing`.

pub mod gnoi;
pub mod set;
pub mod target;

pub use gnoi::{call, Module};
pub use set::SetOps;
pub use target::{parse_duration, TargetArgs};

/// Install the stderr log subscriber used by both drivers.
///
/// `RUST_LOG` overrides the default of `warn`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
