use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Marker the tracker stores when no client could be attributed.
pub const NO_CLIENT: &str = "None";

/// One logged interval of activity as the tracking backend reports it.
///
/// Only `duration_minutes`, `productivity_score` and `client_identified`
/// feed the summary; everything else is carried for display.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ActivityRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_minutes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub productivity_score: Option<f64>,
    #[serde(default, deserialize_with = "client_name")]
    pub client_identified: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub window_title: Option<String>,
    #[serde(default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub ai_analysis: Value,
}

impl ActivityRecord {
    /// Minutes this record contributes to totals; missing or nonsensical
    /// values count as zero.
    pub fn minutes(&self) -> f64 {
        self.duration_minutes
            .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
            .unwrap_or(0.0)
    }

    /// The attributed client, if any.
    pub fn client(&self) -> Option<&str> {
        self.client_identified
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != NO_CLIENT)
    }

    pub fn is_automated(&self) -> bool {
        self.entry_type.as_deref() == Some("Automated Entry")
    }

    /// `ai_analysis` as an object. The backend hands it out either as an
    /// object or as a JSON-encoded string.
    pub fn analysis(&self) -> Map<String, Value> {
        match &self.ai_analysis {
            Value::Object(map) => map.clone(),
            Value::String(raw) => match serde_json::from_str(raw) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            _ => Map::new(),
        }
    }

    pub fn description(&self) -> Option<String> {
        self.analysis()
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Display metrics for one user and one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub total_time: f64,
    pub productive_time: f64,
    pub clients_worked_with: usize,
    pub average_productivity: f64,
}

/// What the admin summary endpoint returns for a selected user and day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDaySummary {
    pub user_id: i64,
    pub date: String,
    pub summary: DailySummary,
    pub mean_productivity_score: f64,
    pub activity_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("User #{}", self.id))
    }
}

/// The admin user listing comes back either bare or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserList {
    Bare(Vec<User>),
    Wrapped { users: Vec<User> },
}

impl UserList {
    pub fn into_vec(self) -> Vec<User> {
        match self {
            UserList::Bare(users) | UserList::Wrapped { users } => users,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClientInput {
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl ClientInput {
    /// Trims both fields and drops an empty email.
    pub fn normalized(self) -> Result<Self, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Client name is required".to_string());
        }
        let contact_email = self
            .contact_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        Ok(Self {
            name,
            contact_email,
        })
    }
}

impl From<&Client> for ClientInput {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            contact_email: client.contact_email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screenshot {
    #[serde(default)]
    pub id: Option<i64>,
    pub path: String,
    #[serde(default)]
    pub taken_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct TrackingStatus {
    #[serde(default)]
    pub is_tracking: bool,
}

/// Manual time entry, as both the form and the backend spell it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ManualEntry {
    #[serde(rename = "clientName", default)]
    pub client_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub application: String,
    #[serde(default)]
    pub project_task: String,
    /// Hours, as typed.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "startTime", default)]
    pub start_time: String,
    #[serde(default)]
    pub status: String,
}

impl ManualEntry {
    pub fn for_date(date: &str) -> Self {
        Self {
            date: date.to_string(),
            start_time: "09:00".to_string(),
            status: "In Progress".to_string(),
            ..Self::default()
        }
    }

    /// Checks the fields the backend insists on and returns the duration in
    /// hours.
    pub fn validate(&self) -> Result<f64, String> {
        if [&self.description, &self.application, &self.duration]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err("Please fill in all required fields.".to_string());
        }
        if self.project_task.trim().is_empty() {
            return Err("Project / Task is required".to_string());
        }
        let hours: f64 = self
            .duration
            .trim()
            .parse()
            .map_err(|_| "Invalid duration".to_string())?;
        if !hours.is_finite() || hours <= 0.0 {
            return Err("Invalid duration".to_string());
        }
        chrono::NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid date".to_string())?;
        chrono::NaiveTime::parse_from_str(self.start_time.trim(), "%H:%M")
            .map_err(|_| "Invalid start time".to_string())?;
        Ok(hours)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ManualEntryReceipt {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Server-computed weekly aggregate for one user.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeeklyReport {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub week_start: Option<String>,
    #[serde(default)]
    pub week_end: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: WeeklySummary,
    #[serde(default, deserialize_with = "ordered_minutes")]
    pub category_breakdown: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "ordered_minutes")]
    pub daily_breakdown: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "ordered_minutes")]
    pub client_duration: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshots: Vec<Screenshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeeklySummary {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub productive_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub avg_productivity: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_clients: Vec<(String, u64)>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers arrive as JSON numbers, numeric strings (decimals) or null.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Some(value),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

fn client_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Name(String),
        Tagged {
            #[serde(default)]
            client_name: Option<String>,
        },
        Other(Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Name(name)) => Some(name),
        Some(Raw::Tagged { client_name }) => Some(client_name.unwrap_or_else(|| NO_CLIENT.to_string())),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Reads a `{label: minutes}` object keeping the server's key order.
fn ordered_minutes<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Minutes(#[serde(deserialize_with = "lenient_number")] Option<f64>);

    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of labels to minutes")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, Minutes(minutes))) = map.next_entry::<String, Minutes>()? {
                pairs.push((label, minutes.unwrap_or(0.0)));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_any(PairsVisitor)
}
