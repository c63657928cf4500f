//! # Observability & Tracing
//!
//! Structured logging for the actor system. Actors log under an `entity_type` field
//! (`Account`, `Order`, ...) rather than a module path, so the subscriber hides targets.
//!
//! ```bash
//! # Lifecycle and state changes
//! RUST_LOG=info cargo run
//!
//! # Full payloads (create params, actions) as they reach each actor
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a wallet transfer reads:
//!
//! ```text
//! INFO transfer: Action ok entity_type="Account" id=admin_001
//! INFO transfer: Action ok entity_type="Account" id=user_1718000000000
//! INFO transfer: Transfer completed amount=1000
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global compact subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls leave the first subscriber in place, which
/// lets every test call it.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type instead of module paths
        .compact()
        .try_init();
}
