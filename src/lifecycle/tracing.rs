//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter whose
//! level comes from `RUST_LOG`. Module paths are hidden (`with_target(false)`);
//! log lines carry `entity_type` and `partition` fields instead.
//!
//! ## What Gets Traced
//!
//! - **Engine lifecycle**: startup and shutdown of every backing service and catalog
//! - **Fetches**: dispatch (`debug`), load (`info`), stale discards (`debug`), failures (`warn`)
//! - **Mutations**: payloads at `debug`, applied results at `info`, rejections at `warn`
//!
//! ```bash
//! # Mount, mutation and shutdown events only
//! RUST_LOG=info cargo run
//!
//! # Every dispatched QuerySpec and generation number
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug`, a debounced search on the public tab reads:
//!
//! ```text
//! DEBUG Filters changed entity_type="Protocol" partition=public armed=true
//! DEBUG Fetch dispatched entity_type="Protocol" partition=public generation=2 spec=QuerySpec { search: Some("pcr"), .. }
//! INFO Partition loaded entity_type="Protocol" partition=public generation=2 items=1 total=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
