use serde::Serialize;

/// Party event for notification delivery and SSE broadcasting
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub party_id: Option<String>,
    /// Player the event is addressed to, when targeted.
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Additional data fields (flattened into root)
    #[serde(flatten)]
    pub data: serde_json::Value,
    pub timestamp: i64,
}

impl PartyEvent {
    pub fn new(event_type: &str, party_id: Option<String>, player_id: Option<String>) -> Self {
        Self {
            event_type: event_type.to_string(),
            party_id,
            player_id,
            action: None,
            data: serde_json::Value::Object(serde_json::Map::new()),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
