use chrono::{DateTime, Utc};

/// A chat message normalized away from the transport it arrived on
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Display form of the sender, e.g. `alice` or `alice#0001`
    pub author: String,
    pub text: String,
    /// Creation instant, when the transport reported a valid one
    pub created_at: Option<DateTime<Utc>>,
    /// Transport's own rendering of the creation time, used if `created_at` is absent
    pub created_at_raw: String,
}

impl InboundMessage {
    /// ISO-8601 creation time, falling back to the raw transport value
    pub fn timestamp(&self) -> String {
        match self.created_at {
            Some(at) => at.to_rfc3339(),
            None => self.created_at_raw.clone(),
        }
    }
}
