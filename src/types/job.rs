use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A job posting as delivered by the remote feed.
///
/// Only the fields the application reads are named; everything else the feed
/// sends is kept in `extra` so a bookmarked posting is stored in full. A named
/// field whose value has an unexpected type is read as absent and its raw
/// value stays in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct JobPosting {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_details: Option<PrimaryDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Informational block attached to a posting. Every field may be absent.
///
/// `Job_Type` is also read under the `JobType` spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct PrimaryDetails {
    #[serde(rename = "Place", skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(rename = "Salary", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(rename = "Job_Type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(rename = "Experience", skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Takes `key` out of `map` if it holds a string. A null is dropped; any
/// other value is left in place.
fn take_text(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        Some(Value::Null) => {
            map.remove(key);
            None
        }
        _ => None,
    }
}

impl TryFrom<Map<String, Value>> for JobPosting {
    type Error = String;

    /// Requires an `id` given as a JSON string or number; it is kept as a string.
    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match map.remove("id") {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => return Err(format!("invalid id: {}", other)),
            None => return Err("missing field `id`".to_string()),
        };
        let title = take_text(&mut map, "title").unwrap_or_default();
        let primary_details = match map.get("primary_details") {
            Some(Value::Object(_)) => match map.remove("primary_details") {
                Some(Value::Object(details)) => Some(PrimaryDetails::from(details)),
                _ => None,
            },
            Some(Value::Null) => {
                map.remove("primary_details");
                None
            }
            _ => None,
        };
        let description = take_text(&mut map, "description");
        let company_name = take_text(&mut map, "company_name");
        let created_at = take_text(&mut map, "created_at");

        Ok(Self {
            id,
            title,
            primary_details,
            description,
            company_name,
            created_at,
            extra: map,
        })
    }
}

impl From<Map<String, Value>> for PrimaryDetails {
    fn from(mut map: Map<String, Value>) -> Self {
        let place = take_text(&mut map, "Place");
        let salary = take_text(&mut map, "Salary");
        let job_type = take_text(&mut map, "Job_Type").or_else(|| take_text(&mut map, "JobType"));
        let experience = take_text(&mut map, "Experience");
        Self {
            place,
            salary,
            job_type,
            experience,
            extra: map,
        }
    }
}

/// Length of the description excerpt shown in the bookmarks list.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 80;

impl JobPosting {
    /// Creates a posting with only an id and a title set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            primary_details: None,
            description: None,
            company_name: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    fn detail(&self, pick: impl Fn(&PrimaryDetails) -> Option<&String>) -> Option<&str> {
        self.primary_details
            .as_ref()
            .and_then(pick)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn location(&self) -> &str {
        self.detail(|d| d.place.as_ref()).unwrap_or("Unknown")
    }

    pub fn salary(&self) -> &str {
        self.detail(|d| d.salary.as_ref()).unwrap_or("N/A")
    }

    /// Job type as shown on a list card.
    pub fn job_type(&self) -> &str {
        self.detail(|d| d.job_type.as_ref()).unwrap_or("Not specified")
    }

    /// Job type as shown on the detail view.
    pub fn job_type_detail(&self) -> &str {
        self.detail(|d| d.job_type.as_ref()).unwrap_or("N/A")
    }

    pub fn experience(&self) -> &str {
        self.detail(|d| d.experience.as_ref()).unwrap_or("N/A")
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "No description available.",
        }
    }

    /// First [`DESCRIPTION_EXCERPT_CHARS`] characters of the description, or an empty string.
    pub fn description_excerpt(&self) -> String {
        self.description
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(DESCRIPTION_EXCERPT_CHARS)
            .collect()
    }
}
