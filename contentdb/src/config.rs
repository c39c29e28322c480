//! Content configuration constants
//!
//! Central location for defaults, limits and allow-lists used by the
//! repository, the filters and the TOC extractor.

// ===== Listing =====

/// Row cap applied by `get_entries` when the caller gives no limit.
pub const DEFAULT_ENTRY_LIMIT: u32 = 7;

/// Columns a listing may be ordered by. Anything else is rejected before
/// it reaches an ORDER BY clause.
pub const SORTABLE_COLUMNS: &[&str] = &["id", "key", "type", "title", "created", "updated", "owner"];

// ===== Table of contents =====

/// Deepest heading level included in a table of contents by default.
pub const DEFAULT_TOC_LEVEL: u8 = 4;

/// Shallowest heading level a table of contents starts from.
/// Level 1 is the page title and is never part of the outline.
pub const MIN_TOC_LEVEL: u8 = 2;

/// Deepest heading level HTML defines.
pub const MAX_TOC_LEVEL: u8 = 6;

// ===== Datafiles =====

/// Directory, relative to the data directory, holding content datafiles.
pub const DATAFILE_SUBDIR: &str = "content/txt";

/// Maximum length of a datafile name after sanitizing.
pub const MAX_DATAFILE_NAME_LENGTH: usize = 255;

// ===== Database =====

/// Connections in the shared pool.
pub const DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Seconds a statement waits on a locked database before failing.
pub const DATABASE_BUSY_TIMEOUT_SECS: u64 = 5;

// ===== Settings =====

/// Name of the settings file inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Name of the SQLite database file inside the data directory.
pub const DATABASE_FILE_NAME: &str = "content.db";
