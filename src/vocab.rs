//! Well-known property and item identifiers.
//!
//! These are the handful of vocabulary IDs the framework itself reaches
//! for: reference provenance, archive de-referencing, and deprecation
//! bookkeeping. Bots bring their own domain vocabulary.

/// Reference URL (the source a claim was taken from).
pub const URL_PROP: &str = "P854";

/// Retrieved-on date for a reference.
pub const RETRIEVED_PROP: &str = "P813";

/// Archive URL qualifier for a de-archived link.
pub const ARCHIVE_URL_PROP: &str = "P1065";

/// Archive date qualifier for a de-archived link.
pub const ARCHIVE_DATE_PROP: &str = "P2960";

/// Reason-for-deprecation qualifier.
pub const DEPRECATED_REASON_PROP: &str = "P2241";

/// The "link rot" item, used as the deprecation reason for dead URLs.
pub const LINK_ROT_ITEM: &str = "Q1193907";

/// Reason-for-preferred-rank qualifier.
pub const PREFERRED_RANK_REASON_PROP: &str = "P7452";
