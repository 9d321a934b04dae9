//! Post-history filter validation.
//!
//! Raw filters arrive as strings (query parameters) or JSON values. They are
//! turned into a typed [`PostHistoryQuery`] / [`PostLogQuery`] before any
//! storage call: identifiers first, then dates, then the range check.
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{PostHistoryQuery, PostLogQuery};

/// A date bound as a caller may send it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateBound {
    At(DateTime<Utc>),
    /// Epoch milliseconds
    Millis(i64),
    Text(String),
}

impl From<DateTime<Utc>> for DateBound {
    fn from(at: DateTime<Utc>) -> Self {
        DateBound::At(at)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilters {
    pub content_uuid: Option<String>,
    pub media_uuid: Option<String>,
    pub phone_uuid: Option<String>,
    pub app_uuid: Option<String>,
    pub user_id: Option<String>,
    pub request_ip: Option<String>,
    pub from_date: Option<DateBound>,
    pub end_date: Option<DateBound>,
}

impl HistoryFilters {
    pub fn into_query(self) -> Result<PostHistoryQuery> {
        let content_id = parse_uuid("content_uuid", self.content_uuid.as_deref())?;
        let media_id = parse_uuid("media_uuid", self.media_uuid.as_deref())?;
        let phone_id = parse_uuid("phone_uuid", self.phone_uuid.as_deref())?;
        let app_id = parse_uuid("app_uuid", self.app_uuid.as_deref())?;
        let user_id = parse_uuid("user_id", self.user_id.as_deref())?;
        let (from, until) = parse_range(self.from_date.as_ref(), self.end_date.as_ref())?;

        Ok(PostHistoryQuery {
            content_id,
            media_id,
            phone_id,
            app_id,
            user_id,
            request_ip: non_empty(self.request_ip),
            from,
            until,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostLogHistoryFilters {
    pub post_id: Option<String>,
    pub user_id: Option<String>,
    pub request_ip: Option<String>,
    pub from_date: Option<DateBound>,
    pub end_date: Option<DateBound>,
}

impl PostLogHistoryFilters {
    pub fn into_query(self) -> Result<PostLogQuery> {
        let post_id = parse_uuid("post_id", self.post_id.as_deref())?;
        let user_id = parse_uuid("user_id", self.user_id.as_deref())?;
        let (from, until) = parse_range(self.from_date.as_ref(), self.end_date.as_ref())?;

        Ok(PostLogQuery {
            post_id,
            user_id,
            request_ip: non_empty(self.request_ip),
            from,
            until,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_uuid(field: &str, value: Option<&str>) -> Result<Option<Uuid>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| AppError::InvalidFilterFormat(field.to_string())),
    }
}

fn parse_range(
    from: Option<&DateBound>,
    until: Option<&DateBound>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let from = parse_date("from_date", from)?;
    let until = parse_date("end_date", until)?;

    if let (Some(from), Some(until)) = (from, until) {
        if from > until {
            return Err(AppError::InvalidRange);
        }
    }

    Ok((from, until))
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC,
/// `YYYY-MM-DD`, `YYYYMMDD` or `YYYY` (UTC midnight), or epoch milliseconds.
/// Blank means absent.
pub fn parse_date(field: &str, bound: Option<&DateBound>) -> Result<Option<DateTime<Utc>>> {
    let invalid = || AppError::InvalidDate(field.to_string());

    let text = match bound {
        None => return Ok(None),
        Some(DateBound::At(at)) => return Ok(Some(*at)),
        Some(DateBound::Millis(ms)) => {
            return Utc.timestamp_millis_opt(*ms).single().map(Some).ok_or_else(invalid)
        }
        Some(DateBound::Text(text)) => text.trim(),
    };

    if text.is_empty() {
        return Ok(None);
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return parse_digits(text).map(Some).ok_or_else(invalid);
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(at.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(naive.and_utc()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(invalid);
    }

    Err(invalid())
}

/// All-digit dates: `YYYY` and `YYYYMMDD` are ISO-8601 calendar dates at UTC
/// midnight; ten or more digits are epoch milliseconds.
fn parse_digits(text: &str) -> Option<DateTime<Utc>> {
    let date = match text.len() {
        4 => NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1)?,
        8 => NaiveDate::from_ymd_opt(
            text[..4].parse().ok()?,
            text[4..6].parse().ok()?,
            text[6..].parse().ok()?,
        )?,
        len if len >= 10 => return Utc.timestamp_millis_opt(text.parse().ok()?).single(),
        _ => return None,
    };
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> DateBound {
        DateBound::Text(value.to_string())
    }

    #[test]
    fn test_empty_filters_constrain_nothing() {
        let query = HistoryFilters::default().into_query().unwrap();
        assert_eq!(query, PostHistoryQuery::default());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let filters = HistoryFilters {
            content_uuid: Some("".to_string()),
            request_ip: Some("  ".to_string()),
            from_date: Some(text("")),
            ..Default::default()
        };
        assert_eq!(filters.into_query().unwrap(), PostHistoryQuery::default());
    }

    #[test]
    fn test_malformed_uuid_names_field() {
        let filters = HistoryFilters {
            media_uuid: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        match filters.into_query() {
            Err(AppError::InvalidFilterFormat(field)) => assert_eq!(field, "media_uuid"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_identifier_checked_before_dates() {
        let filters = HistoryFilters {
            phone_uuid: Some("bogus".to_string()),
            from_date: Some(text("also bogus")),
            ..Default::default()
        };
        assert!(matches!(
            filters.into_query(),
            Err(AppError::InvalidFilterFormat(_))
        ));
    }

    #[test]
    fn test_unparseable_date_names_field() {
        let filters = HistoryFilters {
            end_date: Some(text("31/12/2024")),
            ..Default::default()
        };
        match filters.into_query() {
            Err(AppError::InvalidDate(field)) => assert_eq!(field, "end_date"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_after_end_is_invalid_range() {
        let filters = HistoryFilters {
            from_date: Some(text("2024-06-02")),
            end_date: Some(text("2024-06-01")),
            ..Default::default()
        };
        assert!(matches!(filters.into_query(), Err(AppError::InvalidRange)));

        let logs = PostLogHistoryFilters {
            from_date: Some(text("2024-06-02T00:00:00Z")),
            end_date: Some(text("2024-06-01T23:59:59Z")),
            ..Default::default()
        };
        assert!(matches!(logs.into_query(), Err(AppError::InvalidRange)));
    }

    #[test]
    fn test_equal_bounds_allowed() {
        let filters = HistoryFilters {
            from_date: Some(text("2024-06-01")),
            end_date: Some(text("2024-06-01T00:00:00Z")),
            ..Default::default()
        };
        let query = filters.into_query().unwrap();
        assert_eq!(query.from, query.until);
    }

    #[test]
    fn test_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();

        for value in [
            "2024-06-01T12:30:00Z",
            "2024-06-01T14:30:00+02:00",
            "2024-06-01T12:30:00",
            "2024-06-01T12:30:00.000",
            "2024-06-01 12:30:00",
        ] {
            let parsed = parse_date("from_date", Some(&text(value))).unwrap();
            assert_eq!(parsed, Some(expected), "{value}");
        }

        let millis = expected.timestamp_millis();
        assert_eq!(
            parse_date("from_date", Some(&DateBound::Millis(millis))).unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_date("from_date", Some(&text(&millis.to_string()))).unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_date("from_date", Some(&DateBound::from(expected))).unwrap(),
            Some(expected)
        );

        let midnight = parse_date("from_date", Some(&text("2024-06-01"))).unwrap();
        assert_eq!(midnight, Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_compact_iso_dates() {
        assert_eq!(
            parse_date("from_date", Some(&text("2024"))).unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("from_date", Some(&text("20240601"))).unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );

        for value in ["20241301", "123", "202406"] {
            assert!(
                matches!(
                    parse_date("end_date", Some(&text(value))),
                    Err(AppError::InvalidDate(_))
                ),
                "{value}"
            );
        }
    }

    #[test]
    fn test_year_range_from_query_string() {
        let uri: axum::http::Uri = "/admin/post_history?from_date=2024&end_date=2025"
            .parse()
            .unwrap();
        let axum::extract::Query(filters) =
            axum::extract::Query::<HistoryFilters>::try_from_uri(&uri).unwrap();

        let query = filters.into_query().unwrap();
        assert_eq!(query.from, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(query.until, Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_json_bounds_deserialize() {
        let filters: PostLogHistoryFilters = serde_json::from_value(serde_json::json!({
            "post_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "from_date": 1717200000000_i64,
            "end_date": "2024-06-02",
        }))
        .unwrap();

        let query = filters.into_query().unwrap();
        assert!(query.post_id.is_some());
        assert_eq!(query.from, Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
    }
}
