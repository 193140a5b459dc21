//! Data models for shareable links
//!
//! Defines the persisted link record and the closed set of item kinds a
//! link can point at. Field names serialize in camelCase so records written
//! by the browser client load unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of item a link grants access to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Document,
    Shopping,
    Todo,
    Note,
}

impl ItemType {
    /// All accepted item types
    pub const ALL: [ItemType; 4] = [
        ItemType::Document,
        ItemType::Shopping,
        ItemType::Todo,
        ItemType::Note,
    ];

    /// The tag used in persisted records
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Document => "document",
            ItemType::Shopping => "shopping",
            ItemType::Todo => "todo",
            ItemType::Note => "note",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known item types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown item type '{0}' (expected one of: document, shopping, todo, note)")]
pub struct ParseItemTypeError(pub String);

impl FromStr for ItemType {
    type Err = ParseItemTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseItemTypeError(s.to_string()))
    }
}

/// A capability to access one item without authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareableLink {
    /// Opaque identifier, embedded in the share URL
    pub id: String,
    /// Identifier of the shared item
    pub item_id: String,
    /// Kind of the shared item
    pub item_type: ItemType,
    /// When the link was created
    pub created: DateTime<Utc>,
    /// The link stops working strictly after this instant
    pub expires: DateTime<Utc>,
    /// Number of successful validations
    pub access_count: u64,
    /// Soft-deleted; never reverts to false
    pub revoked: bool,
}

impl ShareableLink {
    /// Create a fresh, unrevoked link valid for `lifetime` from `created`
    ///
    /// Returns `None` if the expiry would overflow the representable range.
    pub fn new(
        id: impl Into<String>,
        item_id: impl Into<String>,
        item_type: ItemType,
        created: DateTime<Utc>,
        lifetime: Duration,
    ) -> Option<Self> {
        let expires = created.checked_add_signed(lifetime)?;
        Some(Self {
            id: id.into(),
            item_id: item_id.into(),
            item_type,
            created,
            expires,
            access_count: 0,
            revoked: false,
        })
    }

    /// Usable right now: not revoked and not past expiry
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && now <= self.expires
    }

    /// Eligible for hard deletion
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires < now
    }
}

/// Convert a (possibly fractional) number of days into a duration
///
/// Returns `None` for zero, negative, non-finite, or out-of-range values.
pub fn days_to_duration(days: f64) -> Option<Duration> {
    if !days.is_finite() || days <= 0.0 {
        return None;
    }
    let millis = (days * 86_400_000.0).round();
    if millis < 1.0 || millis >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_item_type_parse() {
        assert_eq!("document".parse::<ItemType>().unwrap(), ItemType::Document);
        assert_eq!("shopping".parse::<ItemType>().unwrap(), ItemType::Shopping);
        assert_eq!("todo".parse::<ItemType>().unwrap(), ItemType::Todo);
        assert_eq!("note".parse::<ItemType>().unwrap(), ItemType::Note);

        let err = "calendar".parse::<ItemType>().unwrap_err();
        assert_eq!(err, ParseItemTypeError("calendar".to_string()));
        assert!(err.to_string().contains("calendar"));
    }

    #[test]
    fn test_item_type_display() {
        for t in ItemType::ALL {
            assert_eq!(t.to_string().parse::<ItemType>().unwrap(), t);
        }
    }

    #[test]
    fn test_item_type_rejects_unknown_in_json() {
        let result: Result<ItemType, _> = serde_json::from_str("\"calendar\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_link_new() {
        let link =
            ShareableLink::new("abc", "doc-1", ItemType::Document, at(0), Duration::days(7)).unwrap();
        assert_eq!(link.id, "abc");
        assert_eq!(link.item_id, "doc-1");
        assert_eq!(link.access_count, 0);
        assert!(!link.revoked);
        assert_eq!(link.expires - link.created, Duration::days(7));
    }

    #[test]
    fn test_validity_boundaries() {
        let link =
            ShareableLink::new("abc", "doc-1", ItemType::Note, at(0), Duration::hours(2)).unwrap();

        assert!(link.is_valid(at(1)));
        // Valid up to and including the expiry instant
        assert!(link.is_valid(at(2)));
        assert!(!link.is_expired(at(2)));

        assert!(!link.is_valid(at(3)));
        assert!(link.is_expired(at(3)));
    }

    #[test]
    fn test_revoked_is_never_valid() {
        let mut link =
            ShareableLink::new("abc", "doc-1", ItemType::Todo, at(0), Duration::hours(2)).unwrap();
        link.revoked = true;
        assert!(!link.is_valid(at(1)));
        assert!(!link.is_expired(at(1)));
    }

    #[test]
    fn test_camel_case_fields() {
        let link =
            ShareableLink::new("abc", "list-9", ItemType::Shopping, at(0), Duration::days(1))
                .unwrap();
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["itemId"], "list-9");
        assert_eq!(json["itemType"], "shopping");
        assert_eq!(json["accessCount"], 0);
        assert_eq!(json["revoked"], false);
    }

    #[test]
    fn test_parses_browser_record() {
        let json = r#"{
            "id": "k3j2h1g0f9e8d7c6b5a4z3y2x1",
            "itemId": "doc-1",
            "itemType": "document",
            "created": "2024-03-01T10:00:00.000Z",
            "expires": "2024-03-08T10:00:00.000Z",
            "accessCount": 3,
            "revoked": false
        }"#;
        let link: ShareableLink = serde_json::from_str(json).unwrap();
        assert_eq!(link.item_type, ItemType::Document);
        assert_eq!(link.access_count, 3);
        assert_eq!(link.expires - link.created, Duration::days(7));
    }

    #[test]
    fn test_days_to_duration() {
        assert_eq!(days_to_duration(7.0), Some(Duration::days(7)));
        assert_eq!(days_to_duration(0.5), Some(Duration::hours(12)));
        assert_eq!(days_to_duration(0.0), None);
        assert_eq!(days_to_duration(-1.0), None);
        assert_eq!(days_to_duration(f64::NAN), None);
        assert_eq!(days_to_duration(f64::INFINITY), None);
        assert_eq!(days_to_duration(1e300), None);
    }
}
