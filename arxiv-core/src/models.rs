use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseValueError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paper {
    pub entry_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub category: String,
    #[serde(rename = "publishedAt", deserialize_with = "deserialize_published")]
    pub published_at: DateTime<Utc>,
}

impl Paper {
    /// Key the backend expects in `/papers/{id}/translate`: the last path
    /// segment of the entry id.
    pub fn lookup_key(&self) -> &str {
        lookup_key(&self.entry_id)
    }
}

pub fn lookup_key(entry_id: &str) -> &str {
    entry_id.rsplit('/').next().unwrap_or(entry_id)
}

/// Accepts RFC 3339 timestamps as well as the naive ISO form the backend
/// emits for timezone-less datetimes, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_published<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid publishedAt timestamp {raw:?}")))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicCode {
    #[default]
    #[serde(rename = "cs.AI")]
    ArtificialIntelligence,
    #[serde(rename = "cs.LG")]
    MachineLearning,
    #[serde(rename = "cs.CV")]
    ComputerVision,
    #[serde(rename = "cs.CL")]
    ComputationalLinguistics,
    #[serde(rename = "cs.RO")]
    Robotics,
    #[serde(rename = "stat.ML")]
    StatisticalMachineLearning,
}

impl TopicCode {
    /// Feed tab order.
    pub const ALL: [TopicCode; 6] = [
        TopicCode::ArtificialIntelligence,
        TopicCode::MachineLearning,
        TopicCode::ComputerVision,
        TopicCode::ComputationalLinguistics,
        TopicCode::Robotics,
        TopicCode::StatisticalMachineLearning,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TopicCode::ArtificialIntelligence => "cs.AI",
            TopicCode::MachineLearning => "cs.LG",
            TopicCode::ComputerVision => "cs.CV",
            TopicCode::ComputationalLinguistics => "cs.CL",
            TopicCode::Robotics => "cs.RO",
            TopicCode::StatisticalMachineLearning => "stat.ML",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TopicCode::ArtificialIntelligence => "Artificial Intelligence",
            TopicCode::MachineLearning => "Machine Learning",
            TopicCode::ComputerVision => "Computer Vision",
            TopicCode::ComputationalLinguistics => "Computational Linguistics",
            TopicCode::Robotics => "Robotics",
            TopicCode::StatisticalMachineLearning => "Statistical Machine Learning",
        }
    }
}

impl fmt::Display for TopicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TopicCode {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicCode::ALL
            .into_iter()
            .find(|topic| topic.code() == s)
            .ok_or_else(|| ParseValueError {
                what: "topic code",
                value: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushTime {
    hour: u8,
    minute: u8,
}

impl PushTime {
    pub const HOURS: std::ops::Range<u8> = 0..24;
    pub const MINUTES: [u8; 4] = [0, 15, 30, 45];

    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Default for PushTime {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

impl fmt::Display for PushTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for PushTime {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseValueError {
            what: "push time",
            value: s.to_owned(),
        };
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse().map_err(|_| invalid())?;
        let minute = minute.parse().map_err(|_| invalid())?;
        PushTime::new(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for PushTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionRequest {
    pub email: String,
    pub topics: Vec<TopicCode>,
    pub query_content: String,
    pub push_time: PushTime,
}

/// Body returned by `/search-request`. Only `status == "success"` counts as
/// accepted; the other fields are informational.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchRequestReply {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub request_id: Option<serde_json::Value>,
    /// A string on rejections, but validation errors carry a list here.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl SearchRequestReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The `detail` field when the server sent it as text.
    pub fn detail_message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .filter(|d| !d.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ConfirmationEmail<'a> {
    pub email: &'a str,
    pub push_time: PushTime,
}
