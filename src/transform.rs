//! Pre-processing transformers for desired statements.
//!
//! Currently one transformer: rewriting web-archive mirror URLs back into
//! their original URL with provenance qualifiers.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::desired::{DesiredQualifier, DesiredStatement};
use crate::statement::{Claim, Rank};
use crate::value::Value;
use crate::vocab;

static ARCHIVE_URL_RE: OnceLock<Regex> = OnceLock::new();

fn archive_url_re() -> &'static Regex {
    ARCHIVE_URL_RE.get_or_init(|| {
        // Mirror path: web.archive.org/web/<14-digit timestamp>/<original URL>
        Regex::new(r"web\.archive\.org/web/(\d{14})/")
            .unwrap_or_else(|e| unreachable!("static regex must compile: {e}"))
    })
}

/// Rewrites an archive-mirror URL statement into the original URL plus
/// provenance qualifiers.
///
/// No-op unless the statement's value is a URL containing a
/// `web.archive.org/web/<timestamp>/` mirror prefix. On a match:
///
/// - the value becomes the original URL (the mirror prefix is stripped),
/// - the rank is set to deprecated when `deprecate` is set,
/// - three qualifiers are appended: the archive URL, the archive date
///   parsed from the 14-digit timestamp, and a fixed link-rot deprecation
///   reason.
///
/// Each appended qualifier carries `skip_if_conflicting_exists`, so
/// running the transform (and the engine) repeatedly is idempotent.
pub fn dearchive_url_statement(desired: &mut DesiredStatement, deprecate: bool) {
    let Some(full_url) = desired.statement.value.as_url().map(str::to_string) else {
        return;
    };
    let Some(captures) = archive_url_re().captures(&full_url) else {
        return;
    };
    let Some(mirror_prefix) = captures.get(0) else {
        return;
    };
    let Some(timestamp) = captures.get(1) else {
        return;
    };
    let Ok(archived_at) = NaiveDateTime::parse_from_str(timestamp.as_str(), "%Y%m%d%H%M%S") else {
        // A 14-digit run that is not a real timestamp: leave the URL alone.
        return;
    };

    let original_url = full_url.replace(mirror_prefix.as_str(), "");
    desired.statement.value = Value::url(original_url);
    if deprecate {
        desired.statement.rank = Rank::Deprecated;
    }

    desired.add_qualifier(
        DesiredQualifier::from_claim(Claim::new(
            vocab::ARCHIVE_URL_PROP,
            Value::url(full_url),
        ))
        .skip_if_conflicting(),
    );
    desired.add_qualifier(
        DesiredQualifier::from_claim(Claim::new(
            vocab::ARCHIVE_DATE_PROP,
            Value::Date(archived_at.date()),
        ))
        .skip_if_conflicting(),
    );
    desired.add_qualifier(
        DesiredQualifier::from_claim(Claim::new(
            vocab::DEPRECATED_REASON_PROP,
            Value::item(vocab::LINK_ROT_ITEM),
        ))
        .skip_if_conflicting(),
    );
}
