use crate::session::{Session, system_prompt};
use crate::types::{Message, Role};
use chrono::Utc;

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session() -> Session {
        Session::new(Message::system(system_prompt(2024)))
    }

    #[test]
    fn test_session_creation() {
        let session = new_session();

        assert!(!session.id.is_empty());
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages[0].role, Role::System);
        assert!(session.created_at <= Utc::now());
        assert!(session.updated_at <= Utc::now());
    }

    #[test]
    fn test_system_prompt_mentions_year_and_name() {
        let prompt = system_prompt(2031);
        assert!(prompt.contains("Your name is AnalitiChAT."));
        assert!(prompt.contains("Current year is 2031."));
        assert!(prompt.ends_with("user had used in the last request."));
    }

    #[test]
    fn test_append() {
        let mut session = new_session();
        let initial_updated = session.updated_at;

        session.append(Message::user("Hello"));

        assert_eq!(session.len(), 2);
        assert!(session.updated_at >= initial_updated);
        assert_eq!(session.messages[1].role, Role::User);
        assert_eq!(session.messages[1].content, Some("Hello".to_string()));
    }

    #[test]
    fn test_reset_keeps_only_system_message() {
        let mut session = new_session();
        let system = session.messages[0].clone();

        // two exchanges
        for i in 1..=2 {
            session.append(Message::user(format!("Question {}", i)));
            session.append(Message::assistant(format!("Answer {}", i)));
        }
        assert_eq!(session.len(), 5);

        session.reset();

        assert_eq!(session.len(), 1);
        assert_eq!(session.messages[0], system);

        // reset on a fresh session is a no-op
        session.reset();
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut session = new_session();
        for i in 1..=5 {
            session.append(Message::user(format!("Message {}", i)));
        }

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 6);
        for (i, message) in snapshot.iter().skip(1).enumerate() {
            assert_eq!(message.content, Some(format!("Message {}", i + 1)));
        }
    }

    #[test]
    fn test_message_wire_format() {
        let tool = serde_json::to_value(Message::tool_result("call-1", "[]")).unwrap();
        assert_eq!(
            tool,
            serde_json::json!({"role": "tool", "content": "[]", "tool_call_id": "call-1"})
        );

        let assistant: Message = serde_json::from_value(serde_json::json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "GetPlanCSV", "arguments": "{}"}
            }]
        }))
        .unwrap();
        assert_eq!(assistant.content, None);
        assert_eq!(assistant.tool_calls.unwrap()[0].function.name, "GetPlanCSV");
    }

    #[test]
    fn test_session_serialization() {
        let mut session = new_session();
        session.append(Message::user("Test message"));

        let json_str = serde_json::to_string(&session).expect("Failed to serialize session");
        let deserialized: Session = serde_json::from_str(&json_str).expect("Failed to deserialize session");

        assert_eq!(session.id, deserialized.id);
        assert_eq!(session.messages, deserialized.messages);
    }
}
