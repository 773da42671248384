//! Structured logging schema and field name constants for kmem.
//!
//! Spans declare the identity fields `subsystem`, `component` and `op` (plus
//! `method` and `path` for HTTP calls) in `#[instrument]`. Fields only known
//! after the response arrives are declared as `tracing::field::Empty` and
//! filled with `Span::record` using the constants below.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded client, requires caller attention |
//! | WARN  | Recoverable issue, unexpected status swallowed |
//! | INFO  | Lifecycle events (client construction) |
//! | DEBUG | Per-call decisions: status, decode path, duration |
//! | TRACE | Per-candidate resolution attempts, raw fallbacks |
//!
//! Libraries never install a subscriber. Tokens are never logged.

// ─── Response fields ───────────────────────────────────────────────────────

/// HTTP status code returned by the service.
pub const STATUS: &str = "status";

/// Decode path selected for the status ("primary", "alternate", ...).
pub const DECODE_PATH: &str = "decode_path";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a response body.
pub const BODY_LEN: &str = "body_len";
