use serde::Serialize;
use serde_json::Value;

/// Categories the model is asked to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeCategory {
    Academic,
    Event,
    Deadline,
    Opportunity,
    Other,
}

impl NoticeCategory {
    pub const ALL: [NoticeCategory; 5] = [
        NoticeCategory::Academic,
        NoticeCategory::Event,
        NoticeCategory::Deadline,
        NoticeCategory::Opportunity,
        NoticeCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NoticeCategory::Academic => "Academic",
            NoticeCategory::Event => "Event",
            NoticeCategory::Deadline => "Deadline",
            NoticeCategory::Opportunity => "Opportunity",
            NoticeCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub const ALL: [Importance; 3] = [Importance::Low, Importance::Medium, Importance::High];

    pub fn label(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

/// Department codes offered to the model as example tags.
pub const EXAMPLE_TAGS: [&str; 4] = ["CSE", "ECE", "MECH", "CIVIL"];

/// A notice accepted for classification. Both fields are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeSubmission {
    pub title: String,
    pub content: String,
}

impl NoticeSubmission {
    /// Presence check only: both fields must be non-empty.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Option<Self> {
        let title = title.into();
        let content = content.into();
        if title.is_empty() || content.is_empty() {
            return None;
        }
        Some(Self { title, content })
    }

    /// Each field must be a string. Anything else, including a body that is
    /// not a JSON object, counts as missing.
    pub fn from_json(body: &Value) -> Option<Self> {
        let field = |name: &str| body.get(name).and_then(Value::as_str);
        Self::new(field("title")?, field("content")?)
    }

    /// Parses a raw request body. Malformed JSON is treated like an empty
    /// object.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        Self::from_json(&value)
    }
}

/// Whatever JSON the model produced, relayed without enum validation.
pub type ClassificationResult = Value;

/// Placeholder notice record served by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub importance: &'static str,
}

/// Placeholder search hit echoing the caller's query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: &'static str,
    pub title: &'static str,
    pub matched_query: String,
}
