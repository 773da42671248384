//! Centralized default constants for kmem.
//!
//! **This module is the single source of truth** for client defaults and the
//! environment variables that override them.

// =============================================================================
// SERVICE
// =============================================================================

/// Base URL of a locally running memory service.
pub const BASE_URL: &str = "http://localhost:9001";

/// Index used when the caller does not name one.
pub const INDEX: &str = "default";

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "Authorization";

/// Prefix placed before the token in the auth header.
pub const TOKEN_PREFIX: &str = "Bearer";

// =============================================================================
// TRANSPORT
// =============================================================================

/// Request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Verify TLS certificates.
pub const VERIFY_SSL: bool = true;

/// Unknown statuses are returned as `Unrecognized` unless this is set.
pub const RAISE_ON_UNEXPECTED_STATUS: bool = false;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_BASE_URL: &str = "KM_BASE_URL";
pub const ENV_TOKEN: &str = "KM_TOKEN";
pub const ENV_TOKEN_PREFIX: &str = "KM_TOKEN_PREFIX";
pub const ENV_DEFAULT_INDEX: &str = "KM_DEFAULT_INDEX";
pub const ENV_TIMEOUT: &str = "KM_TIMEOUT";
pub const ENV_VERIFY_SSL: &str = "KM_VERIFY_SSL";
pub const ENV_RAISE_ON_UNEXPECTED_STATUS: &str = "KM_RAISE_ON_UNEXPECTED_STATUS";

// =============================================================================
// TAGS
// =============================================================================

/// Separator between tag key and value in `key:value` form.
pub const TAG_SEPARATOR: char = ':';

/// Value given to a tag written as a bare key.
pub const BARE_TAG_VALUE: &str = "true";
