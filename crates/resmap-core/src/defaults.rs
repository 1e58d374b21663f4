//! Centralized default constants for the resource map engine.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates and the CLI should reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// HIERARCHY
// =============================================================================

/// Maximum hierarchy depth. A tag may sit at depth `MAX_DEPTH - 1` at most
/// (root = 0).
pub const MAX_DEPTH: usize = 10;

/// Minimum number of points in a persisted polygon geofence.
pub const GEOFENCE_MIN_POLYGON_POINTS: usize = 3;

/// Separator used when rendering a tag's path for display.
pub const PATH_SEPARATOR: &str = " / ";

// =============================================================================
// DRAG AND DROP
// =============================================================================

/// Pointer travel (in pixels) before a press becomes a drag.
pub const DRAG_ACTIVATION_DISTANCE: f64 = 8.0;

// =============================================================================
// REMOTE STORE
// =============================================================================

/// Default GraphQL endpoint.
pub const GRAPHQL_URL: &str = "http://localhost:4000/graphql";

/// Default request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

