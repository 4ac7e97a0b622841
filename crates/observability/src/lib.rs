//! Process-wide logging setup.
//!
//! Both entry points are idempotent: only the first successful call installs a
//! subscriber.

pub mod subscriber;

/// JSON logs on stdout, filtered by `RUST_LOG` (default `info`).
pub fn init() {
    subscriber::install(subscriber::Target::Stdout);
}

/// Same format on stderr; stdout is reserved for the tooling protocol.
pub fn init_for_tooling() {
    subscriber::install(subscriber::Target::Stderr);
}
