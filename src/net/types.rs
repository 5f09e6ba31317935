//! Wire DTOs for the banking dashboard REST API.
//!
//! DESIGN
//! ======
//! Field names mirror the backend JSON exactly so serde round-trips stay
//! lossless. Identifiers and timestamps stay as strings; the client never
//! interprets them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role. Serialized in the backend's upper-case form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    /// Upper-case wire name (`"CUSTOMER"` / `"ADMIN"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse a role case-insensitively, as typed on the command line.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CUSTOMER" => Some(Self::Customer),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user as returned by `/auth/me` and `/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Optional display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Account role, used by the route guard.
    pub role: Role,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl Identity {
    /// Name to show in greetings: the full name when set, else the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Successful `POST /auth/login` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token.
    pub access_token: String,
    /// Token scheme, always `"bearer"` in practice.
    pub token_type: String,
    /// Identity the token belongs to.
    pub user: Identity,
}

/// `POST /auth/register` JSON body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// `POST /chat/message` JSON body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

/// Assistant reply from `/chat/message` and `/chat/greeting`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Reply text.
    pub response: String,
    /// Reply category chosen by the backend (e.g. `"greeting"`, `"balance"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Structured payload attached to some reply kinds.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Follow-up prompts suggested by the assistant.
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
}

/// A synthesized fraud alert from `/fraud/alerts/sample`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FraudAlert {
    pub id: String,
    pub transaction_id: String,
    pub amount: f64,
    pub description: String,
    pub risk_score: f64,
    pub risk_factors: Vec<String>,
    pub timestamp: String,
    pub status: String,
    pub location: String,
    pub merchant: String,
    pub priority: String,
}

/// Aggregate fraud statistics from `/fraud/insights`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FraudInsights {
    pub total_alerts: u64,
    pub open_alerts: u64,
    pub confirmed_fraud: u64,
    pub dismissed: u64,
    pub accuracy_rate: f64,
    pub false_positive_rate: f64,
    pub risk_distribution: RiskDistribution,
    pub detection_rate: f64,
    #[serde(default)]
    pub trends: Option<FraudTrends>,
    #[serde(default)]
    pub top_risk_factors: Option<Vec<RiskFactorCount>>,
}

/// Alert counts bucketed by risk level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub high_risk: u64,
    pub medium_risk: u64,
    pub low_risk: u64,
}

/// Week-over-week alert trend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FraudTrends {
    pub this_week: u64,
    pub last_week: u64,
    pub change_percent: f64,
}

/// How often a risk factor contributed to alerts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorCount {
    pub factor: String,
    pub count: u64,
}
