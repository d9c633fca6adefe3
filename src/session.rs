use chrono::Utc;
use uuid::Uuid;

use crate::types::Message;
pub use crate::types::Session;

pub fn system_prompt(year: i32) -> String {
    format!(
        "You are a helpful assistant. \
         Your name is AnalitiChAT. \
         Current year is {year}. \
         Always respond in the same human language that user had used in the last request."
    )
}

impl Session {
    /// Starts a transcript holding only `system`.
    pub fn new(system: Message) -> Session {
        Session {
            id: Uuid::new_v4().to_string(),
            messages: vec![system],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // Append one message
    pub fn append(&mut self, msg: Message) {
        self.messages.push(msg);
        self.updated_at = Utc::now();
    }

    // Drop everything but the system message
    pub fn reset(&mut self) {
        self.messages.truncate(1);
        self.updated_at = Utc::now();
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
