use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One encyclopedia article as delivered by the dump-extraction stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    pub title: String,
    #[serde(rename = "text")]
    pub wikitext: String,
}

/// Granularity at which a calendar date is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Day,
    Month,
    Year,
    Decade,
    Century,
}

/// Canonical structured date range with per-side precision markers.
///
/// Years are proleptic: "N BC" maps to `1 - N`, so 1 BC is year 0 and the
/// BC/AD axis is a single contiguous integer line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDate {
    pub year1: i32,
    pub month1: Option<u32>,
    pub day1: Option<u32>,
    pub precision1: Precision,

    pub year2: Option<i32>,
    pub month2: Option<u32>,
    pub day2: Option<u32>,
    pub precision2: Option<Precision>,

    pub ongoing: bool,
}

impl Default for NormalizedDate {
    fn default() -> Self {
        NormalizedDate {
            year1: 0,
            month1: None,
            day1: None,
            precision1: Precision::Year,
            year2: None,
            month2: None,
            day2: None,
            precision2: None,
            ongoing: false,
        }
    }
}

/// Ordered key-value mapping with unique keys; a repeated key overwrites the
/// earlier value in place, keeping its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> serde::de::Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of string keys to string values")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<FieldMap, A::Error> {
                let mut fields = FieldMap::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    fields.insert(k, v);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut fields = FieldMap::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// One infobox decomposed into its type string and field mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoboxRecord {
    #[serde(rename = "type")]
    pub infobox_type: Option<String>,
    pub fields: FieldMap,
}

/// One dated event after normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub infobox_type: Option<String>,
    pub fields: FieldMap,
    pub date: Option<NormalizedDate>,
}

/// Page-level output record consumed by the export stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_title: String,
    pub description: String,
    pub events: Vec<EventRecord>,
}

/// Why a date field was routed to the bad-dates side channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadDateKind {
    /// No cascade pattern matched; carries the fully-cleaned string for
    /// diagnosis.
    Unparsed { cleaned: String },
    /// Structurally parsed but calendrically impossible (e.g. February 30).
    InvalidCalendar { date: NormalizedDate },
}

/// Side-channel record for a date that failed normalization or validation.
/// The raw field is preserved unmodified so a human can audit the miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadDate {
    pub page_title: String,
    #[serde(rename = "type")]
    pub infobox_type: Option<String>,
    pub raw_date: String,
    #[serde(flatten)]
    pub kind: BadDateKind,
}
