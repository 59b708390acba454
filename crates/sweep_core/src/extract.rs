use std::fmt::Display;
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{ArticleContext, ArticleId, Record};

/// Domain used for the synthetic contact address derived from the author token.
pub const EMAIL_DOMAIN: &str = "naver.com";

/// Layout shared by article dates and the wall-clock fallback.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static WRITER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""writer":\{"id":"([^"]+)""#).expect("writer pattern is a valid regex")
});

/// Why a payload produced no record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionMismatch {
    /// No writer token: there is no readable article at this id.
    #[error("writer id not found")]
    TokenAbsent,
    /// The writer token was found but the document around it is unusable.
    #[error("writer {author} found but payload is malformed: {reason}")]
    StructureInvalid { author: String, reason: String },
}

/// Locate the writer identity token without parsing the payload.
pub fn find_writer(raw: &str) -> Option<&str> {
    WRITER_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build a [`Record`] from one article payload.
///
/// The writer token is searched for first and the JSON is only decoded when it
/// is present. `now` supplies both the fallback date and the time zone dates
/// are rendered in.
pub fn try_extract<Tz>(
    id: ArticleId,
    raw: &str,
    ctx: &ArticleContext,
    now: DateTime<Tz>,
) -> Result<Record, ExtractionMismatch>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let author = find_writer(raw).ok_or(ExtractionMismatch::TokenAbsent)?;
    let invalid = |reason: String| ExtractionMismatch::StructureInvalid {
        author: author.to_string(),
        reason,
    };

    let document: Value = serde_json::from_str(raw).map_err(|err| invalid(err.to_string()))?;
    let article = document
        .get("result")
        .and_then(|result| result.get("article"))
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("missing result.article object".to_string()))?;

    let write_date_ms = write_date_millis(article).map_err(invalid)?;
    let date = format_write_date(write_date_ms, now)
        .ok_or_else(|| invalid(format!("writeDate {write_date_ms} is out of range")))?;

    Ok(Record {
        title: format!("Cafe article {id} - author: {author}"),
        url: format!(
            "https://cafe.naver.com/ArticleRead.nhn?clubid={}&menuid={}&articleid={id}",
            ctx.cafe_id, ctx.menu_id
        ),
        date,
        author: author.to_string(),
        email: format!("{author}@{EMAIL_DOMAIN}"),
    })
}

/// Render a millisecond epoch in `now`'s time zone, or `now` itself when the
/// epoch is not positive. `None` if the epoch cannot be represented.
pub fn format_write_date<Tz>(write_date_ms: i64, now: DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if write_date_ms <= 0 {
        return Some(now.format(DATE_FORMAT).to_string());
    }
    now.timezone()
        .timestamp_millis_opt(write_date_ms)
        .single()
        .map(|written| written.format(DATE_FORMAT).to_string())
}

fn write_date_millis(article: &Map<String, Value>) -> Result<i64, String> {
    match article.get("writeDate") {
        None => Ok(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms as i64))
            .ok_or_else(|| format!("writeDate {n} is not an integer")),
        Some(other) => Err(format!("writeDate is not a number: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_token_is_first_capture() {
        let raw = r#"{"result":{"article":{"writer":{"id":"abc_12","nick":"x"}}}}"#;
        assert_eq!(find_writer(raw), Some("abc_12"));
    }

    #[test]
    fn writer_token_requires_compact_layout() {
        assert_eq!(find_writer(r#""writer": {"id": "abc"}"#), None);
        assert_eq!(find_writer(r#""writer":{"id":""}"#), None);
    }
}
