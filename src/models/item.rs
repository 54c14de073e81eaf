//! Item report data structures.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Which collection an item report belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Lost,
    Found,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Lost => "lost",
            ItemKind::Found => "found",
        }
    }

    /// Backend path of the full collection.
    pub fn collection_path(&self) -> String {
        format!("posts/{}", self.as_str())
    }

    /// Backend path of the filtered collection.
    pub fn search_path(&self) -> String {
        format!("posts/{}/search", self.as_str())
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    /// An empty value selects the default collection.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "lost" => Ok(ItemKind::Lost),
            "found" => Ok(ItemKind::Found),
            other => Err(format!("unknown item type '{other}' (expected lost or found)")),
        }
    }
}

/// A lost or found item report as served by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Backend identifier; a bare `id` key is picked up by [`Item::tagged`]
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Item category (e.g. "mobile", "wallet")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,

    /// Where the item was lost or found
    #[serde(rename = "possibleLocation", default, deserialize_with = "null_as_empty")]
    pub possible_location: String,

    /// When the item was lost or found, as reported
    #[serde(rename = "possibleDate", default, skip_serializing_if = "Option::is_none")]
    pub possible_date: Option<String>,

    /// Creation time of the report; `None` when absent or unparseable
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// Collection the item was fetched from
    #[serde(skip)]
    pub kind: Option<ItemKind>,

    /// Fields the client does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Tag the item with the collection it came from.
    ///
    /// Records that carry only an `id` key (no `_id`) get it as their id.
    pub fn tagged(mut self, kind: ItemKind) -> Self {
        if self.id.is_none() && self.extra.get("id").is_some_and(Value::is_string) {
            self.id = self
                .extra
                .remove("id")
                .and_then(|v| v.as_str().map(str::to_string));
        }
        self.kind = Some(kind);
        self
    }

    /// Reported date without any time component.
    pub fn display_date(&self) -> &str {
        match &self.possible_date {
            Some(date) => date.split('T').next().unwrap_or(date),
            None => "",
        }
    }

    /// Format item for display using a template.
    ///
    /// Supported placeholders:
    /// - `{kind}`, `{id}`, `{category}`, `{location}`, `{date}`
    /// - `{created}`, `{description}`, `{contact}`
    pub fn format(&self, template: &str) -> String {
        let created = self
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        template
            .replace("{kind}", self.kind.map(|k| k.as_str()).unwrap_or("-"))
            .replace("{id}", self.id.as_deref().unwrap_or(""))
            .replace("{category}", &self.category)
            .replace("{location}", &self.possible_location)
            .replace("{date}", self.display_date())
            .replace("{created}", &created)
            .replace("{description}", self.description.as_deref().unwrap_or(""))
            .replace("{contact}", self.contact.as_deref().unwrap_or(""))
    }
}

/// Read `null` as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept RFC 3339 strings or epoch milliseconds; anything else becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// Filters for a single collection search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub category: String,
    pub possible_location: String,
    pub possible_date: Option<NaiveDate>,
    pub kind: ItemKind,
}

impl SearchQuery {
    /// Query parameters in backend naming; unset filters are sent empty.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        let date = self
            .possible_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        [
            ("category", self.category.trim().to_string()),
            ("possibleLocation", self.possible_location.trim().to_string()),
            ("possibleDate", date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "_id": "6763f1",
            "category": "mobile",
            "possibleLocation": "Jashore",
            "possibleDate": "2024-10-10T00:00:00.000Z",
            "createdAt": "2024-12-19T08:15:30.000Z",
            "description": "black iphone",
            "brand": "apple"
        }"#
    }

    #[test]
    fn test_deserialize_backend_item() {
        let item: Item = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(item.id.as_deref(), Some("6763f1"));
        assert_eq!(item.possible_location, "Jashore");
        assert_eq!(item.display_date(), "2024-10-10");
        assert_eq!(
            item.created_at.unwrap().to_rfc3339(),
            "2024-12-19T08:15:30+00:00"
        );
        assert_eq!(item.extra.get("brand"), Some(&Value::from("apple")));
        assert!(item.kind.is_none());
    }

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[
                {"_id": "1", "category": null, "possibleLocation": null, "possibleDate": null},
                {"_id": "2", "category": "keys", "possibleLocation": "Mirpur"}
            ]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "");
        assert_eq!(items[0].possible_location, "");
        assert_eq!(items[0].display_date(), "");
        assert_eq!(items[1].category, "keys");
    }

    #[test]
    fn test_record_with_both_id_keys() {
        let item: Item =
            serde_json::from_str(r#"{"_id": "1", "id": "1", "category": "x"}"#).unwrap();
        assert_eq!(item.id.as_deref(), Some("1"));
        assert_eq!(item.extra.get("id"), Some(&Value::from("1")));
    }

    #[test]
    fn test_bare_id_adopted_when_tagged() {
        let item: Item = serde_json::from_str(r#"{"id": "abc", "category": "x"}"#).unwrap();
        assert!(item.id.is_none());

        let item = item.tagged(ItemKind::Found);
        assert_eq!(item.id.as_deref(), Some("abc"));
        assert!(!item.extra.contains_key("id"));
    }

    #[test]
    fn test_malformed_timestamp_is_none() {
        let item: Item =
            serde_json::from_str(r#"{"category": "bag", "createdAt": "yesterday"}"#).unwrap();
        assert!(item.created_at.is_none());

        let item: Item =
            serde_json::from_str(r#"{"category": "bag", "createdAt": 1734596130000}"#).unwrap();
        assert!(item.created_at.is_some());
    }

    #[test]
    fn test_format() {
        let item: Item = serde_json::from_str(sample_json()).unwrap();
        let item = item.tagged(ItemKind::Found);
        assert_eq!(
            item.format("[{kind}] {category} @ {location} ({date})"),
            "[found] mobile @ Jashore (2024-10-10)"
        );
    }

    #[test]
    fn test_item_kind_parsing() {
        assert_eq!("".parse::<ItemKind>().unwrap(), ItemKind::Lost);
        assert_eq!("Found".parse::<ItemKind>().unwrap(), ItemKind::Found);
        assert!("stolen".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_query_pairs_send_empty_filters() {
        let query = SearchQuery {
            category: " wallet ".to_string(),
            possible_date: NaiveDate::from_ymd_opt(2024, 10, 10),
            ..SearchQuery::default()
        };
        assert_eq!(
            query.query_pairs(),
            [
                ("category", "wallet".to_string()),
                ("possibleLocation", String::new()),
                ("possibleDate", "2024-10-10".to_string()),
            ]
        );
    }
}
