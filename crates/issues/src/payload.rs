use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A submitted value as the client sent it. Form bodies only carry strings;
/// JSON bodies may send any value. `null` deserializes to an absent field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue(pub Value);

impl FieldValue {
    /// Whether a client would consider the value "set": `false`, `0`, `""`
    /// and `NaN`-like numbers are not.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(&self.0, Value::String(text) if text.is_empty())
    }

    /// The literal spelling of a scalar (`false` becomes `"false"`).
    /// Arrays and objects have none.
    pub fn into_text(self) -> Option<String> {
        match self.0 {
            Value::String(text) => Some(text),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Number(number) => Some(number.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue(Value::String(value.to_string()))
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue(value)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FieldValue)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateIssueRequest {
    pub issue_title: Option<FieldValue>,
    pub issue_text: Option<FieldValue>,
    pub created_by: Option<FieldValue>,
    pub assigned_to: Option<FieldValue>,
    pub status_text: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<FieldValue>,
    pub issue_title: Option<FieldValue>,
    pub issue_text: Option<FieldValue>,
    pub created_by: Option<FieldValue>,
    pub assigned_to: Option<FieldValue>,
    pub status_text: Option<FieldValue>,
    pub open: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<FieldValue>,
}

/// Query string of the list endpoint. Every parameter is an equality filter;
/// parameters not named here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIssuesQuery {
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<String>,
    pub created_on: Option<String>,
    pub updated_on: Option<String>,
}

impl ListIssuesQuery {
    /// Builds the query from decoded `key=value` pairs. A repeated parameter
    /// keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = ListIssuesQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "_id" => &mut query.id,
                "issue_title" => &mut query.issue_title,
                "issue_text" => &mut query.issue_text,
                "created_by" => &mut query.created_by,
                "assigned_to" => &mut query.assigned_to,
                "status_text" => &mut query.status_text,
                "open" => &mut query.open,
                "created_on" => &mut query.created_on,
                "updated_on" => &mut query.updated_on,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }
}
