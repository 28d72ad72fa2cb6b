//! Field rules applied before a ticket is issued. The ledger itself records
//! whatever it is given; these checks belong to the issuing side.
use crate::error::LedgerError;
use crate::transaction::types::Transaction;

impl Transaction {
    /// Every field must be non-empty. Content and length are not checked.
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (name, value) in self.named_fields() {
            if value.is_empty() {
                return Err(LedgerError::InvalidTransaction(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    fn named_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("organizer", &self.organizer),
            ("event", &self.event),
            ("ticket_id", &self.ticket_id),
            ("buyer", &self.buyer),
        ]
    }
}
