use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Backend record identifier.
///
/// The backend emits integer ids while markup carries them as attribute
/// strings, so both shapes decode into the same string form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
            RawId::Float(f) => Self(f.to_string()),
        })
    }
}

/// `{success, message}` wrapper returned by every mutating endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    /// Message to show a person: `message`, else `error`.
    pub fn display_message(&self) -> &str {
        if self.message.is_empty() {
            self.error.as_deref().unwrap_or_default()
        } else {
            &self.message
        }
    }
}

// ── Admin records ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub section_name: String,
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionVisibility {
    pub section_name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    pub id: RecordId,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, alias = "thumbnail_url")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Giveaway {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub participants_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    #[serde(default)]
    pub page_views: u64,
    #[serde(default, alias = "orders_count")]
    pub orders: u64,
    #[serde(default, alias = "users_count")]
    pub users: u64,
    #[serde(default, alias = "subscribers_count")]
    pub subscribers: u64,
    #[serde(default, alias = "unread_messages_count")]
    pub unread_messages: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: RecordId,
}

// ── Storefront requests ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiveawayEntryRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartCountResponse {
    #[serde(default)]
    pub count: Option<u64>,
}

// ── Checkout ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    pub order_id: RecordId,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    #[serde(default)]
    pub payment_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaypalCreateResponse {
    #[serde(default, rename = "paymentID")]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaypalExecuteRequest {
    #[serde(rename = "paymentID")]
    pub payment_id: String,
    #[serde(rename = "payerID")]
    pub payer_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaypalExecuteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let from_int: RecordId = serde_json::from_str("42").expect("int id");
        let from_text: RecordId = serde_json::from_str("\"42\"").expect("text id");
        assert_eq!(from_int, from_text);
        assert_eq!(serde_json::to_string(&from_int).expect("encode"), "\"42\"");
    }

    #[test]
    fn stats_accept_backend_count_spellings() {
        let stats: Stats = serde_json::from_value(serde_json::json!({
            "orders_count": 3,
            "users_count": 7,
            "subscribers_count": 11,
            "unread_messages_count": 2,
            "total_revenue": 1250.5,
        }))
        .expect("stats");

        assert_eq!(stats.page_views, 0);
        assert_eq!(stats.orders, 3);
        assert_eq!(stats.users, 7);
        assert_eq!(stats.subscribers, 11);
        assert_eq!(stats.unread_messages, 2);
    }

    #[test]
    fn envelope_falls_back_to_error_text() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"error": "Order ID is required"}"#).expect("envelope");
        assert!(!envelope.success);
        assert_eq!(envelope.display_message(), "Order ID is required");
    }

    #[test]
    fn video_reads_legacy_thumbnail_url() {
        let video: Video = serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Atelier",
            "thumbnail_url": "/uploads/videos/atelier.jpg",
        }))
        .expect("video");
        assert_eq!(video.thumbnail.as_deref(), Some("/uploads/videos/atelier.jpg"));
        assert!(video.description.is_none());
    }
}
