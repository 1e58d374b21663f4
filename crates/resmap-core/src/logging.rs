//! Structured logging field name constants.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed and nothing could fall back |
//! | WARN  | Recoverable issue, stale data kept or fallback applied |
//! | INFO  | Lifecycle events, completed mutations |
//! | DEBUG | Decision points (rejections, orphans, no-op moves) |
//! | TRACE | Per-item iteration, request/response bodies |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one CLI invocation or request chain. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "core", "client", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "tag_store", "graphql", "applier", "tree"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list_tags", "create_tag", "reparent", "commit_move"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Workspace the tag list belongs to.
pub const WORKSPACE_ID: &str = "workspace_id";

/// Tag type (forest) being operated on.
pub const TAG_TYPE: &str = "tag_type";

/// Tag being operated on.
pub const TAG_ID: &str = "tag_id";

/// Proposed parent of a move.
pub const TARGET_ID: &str = "target_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of tags returned by a list.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Reason a move was rejected.
pub const REJECTION: &str = "rejection";

/// Error classification ("VALIDATION_REJECTED", "REMOTE_FAILURE", "ORPHAN_REFERENCE").
pub const ERROR_KIND: &str = "error_kind";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
