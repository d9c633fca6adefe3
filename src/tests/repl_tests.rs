use crate::agent::Agent;
use crate::mocks::mock_llm_client::MockLlmClient;
use crate::repl::{self, Command};
use crate::session::{Session, system_prompt};
use crate::tool_registry::ToolRegistry;
use crate::tools::DataResolver;
use crate::types::Message;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    async fn run_script(mock_client: MockLlmClient, dir: &TempDir, script: &str) -> (Session, String) {
        let agent = Agent::new(
            Box::new(mock_client),
            ToolRegistry::new().unwrap(),
            DataResolver::new(dir.path()),
        );
        let mut session = Session::new(Message::system(system_prompt(2024)));
        let mut out = Vec::new();
        repl::run(&agent, &mut session, Cursor::new(script.to_string()), &mut out)
            .await
            .unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse("c\r\n"), Command::Clear);
        assert_eq!(Command::parse("quit\n"), Command::Prompt("quit"));
        assert_eq!(Command::parse(" q\n"), Command::Prompt(" q"));
    }

    #[tokio::test]
    async fn test_quit_prints_message() {
        let dir = TempDir::new().unwrap();
        let (session, out) = run_script(MockLlmClient::new(), &dir, "q\n").await;
        assert_eq!(out, "User: Quit requested\n");
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn test_answer_and_tool_echo() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("overtimes.csv"), "Vārds,Uzvārds,Virsstundu skaits\n").unwrap();

        let mut mock_client = MockLlmClient::new();
        mock_client.add_tool_call_response("GetOvertimesCSV", "{}");
        mock_client.add_text_response("Nobody has overtime.");

        let (_, out) = run_script(mock_client, &dir, "Who has overtime?\nq\n").await;
        assert_eq!(
            out,
            "User: ToolCall: GetOvertimesCSV({})\nAssistant: Nobody has overtime.\nUser: Quit requested\n"
        );
    }

    #[tokio::test]
    async fn test_clear_after_two_exchanges() {
        let dir = TempDir::new().unwrap();
        let mut mock_client = MockLlmClient::new();
        mock_client.add_text_response("One");
        mock_client.add_text_response("Two");

        let (session, out) = run_script(mock_client, &dir, "first\nsecond\nc\n").await;
        assert!(out.contains("Assistant: One\n"));
        assert!(out.contains("Assistant: Two\n"));
        assert!(out.contains("Cleared message history\n"));
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn test_end_of_input_quits() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_script(MockLlmClient::new(), &dir, "").await;
        assert!(out.ends_with("Quit requested\n"));
    }
}
