use chrono::{DateTime, Utc};
use eyre::{Context, Result};

/// Formats as RFC3339 with nanoseconds
pub fn datetime_to_db_repr(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

/// Parses from RFC3339 with nanoseconds
pub fn datetime_from_db_repr(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .wrap_err("error parsing RFC3339 datetime")?
        .with_timezone(&Utc))
}

/// Lowercased ascii slug of a title: alphanumeric runs joined by single
/// dashes. Never empty so the resulting slug is always routable.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut at_boundary = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            at_boundary = false;
        } else if !at_boundary {
            slug.push('-');
            at_boundary = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("post");
    }
    slug
}
