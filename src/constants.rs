// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role: how hard the client retries, how much it lists per
//! round-trip, how deep a page tree is walked.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Confluence API surface
// ---------------------------------------------------------------------------

/// Path of the cursor-paginated modern API, relative to the instance URL.
///
/// Cloud instance URLs already carry the `/wiki` context path.
pub const MODERN_API_PATH: &str = "/api/v2";

/// Path of the offset-paginated legacy REST API, relative to the instance URL.
pub const LEGACY_API_PATH: &str = "/rest/api";

/// Page size requested from listing endpoints when the caller sets no limit.
pub const API_PAGE_SIZE: usize = 100;

/// Upper bound on round-trips for a single listing call.
///
/// A workspace with more than 5000 pages in a space is rare; the cap keeps a
/// server that keeps handing out `next` links from looping forever.
pub const MAX_PAGES_PER_LISTING: usize = 50;

/// Whole-request timeout applied by the HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Retries after the first attempt for 429 and 5xx responses (4 attempts total).
pub const MAX_RETRIES: u32 = 3;

/// Backoff before the first retry; doubled per attempt.
pub const BACKOFF_BASE_DELAY: Duration = Duration::from_secs(1);

/// Ceiling on any single backoff pause.
pub const BACKOFF_MAX_DELAY: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Query operations
// ---------------------------------------------------------------------------

/// Depth used by `tree(...)` when no `depth` argument is given.
pub const DEFAULT_TREE_DEPTH: u32 = 3;

/// Hard cap on `tree(...)` recursion, regardless of the requested depth.
pub const MAX_TREE_DEPTH: u32 = 10;

/// Result count requested by `search(...)`.
pub const SEARCH_RESULT_LIMIT: usize = 25;

/// Result count requested by `list(space=..., label=...)`.
pub const LABEL_LISTING_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
