// Logging setup for the Lokal Jobs binaries, powered by tracing-subscriber.
//
// The library only emits `tracing` events; a binary installs the subscriber
// once at startup. Output goes to stderr so the RPC binary keeps stdout for
// protocol messages.

use tracing_subscriber::EnvFilter;

/// Third-party targets that are clamped regardless of the base level.
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("reqwest", "warn"),
    ("rustls", "warn"),
];

/// Builds the filter: `RUST_LOG` when set, otherwise `level` plus the noisy-crate clamps.
pub fn build_env_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = vec![level.to_string()];
    directives.extend(
        NOISY_TARGETS
            .iter()
            .map(|(target, lvl)| format!("{}={}", target, lvl)),
    );
    EnvFilter::try_new(directives.join(",")).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
