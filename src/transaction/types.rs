//! Transaction types for TicketChain
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ticket issuance. `ticket_id` is the business key used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub organizer: String,
    pub event: String,
    pub ticket_id: String,
    pub buyer: String,
}

impl Transaction {
    pub fn new(
        organizer: impl Into<String>,
        event: impl Into<String>,
        ticket_id: impl Into<String>,
        buyer: impl Into<String>,
    ) -> Self {
        Transaction {
            organizer: organizer.into(),
            event: event.into(),
            ticket_id: ticket_id.into(),
            buyer: buyer.into(),
        }
    }

    /// Field map used in the block hash input, keys in lexicographic order.
    /// Inserted pre-sorted so the encoding holds with or without serde_json's
    /// `preserve_order` feature.
    pub fn canonical_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("buyer".to_string(), Value::from(self.buyer.as_str()));
        fields.insert("event".to_string(), Value::from(self.event.as_str()));
        fields.insert("organizer".to_string(), Value::from(self.organizer.as_str()));
        fields.insert("ticket_id".to_string(), Value::from(self.ticket_id.as_str()));
        Value::Object(fields)
    }
}
