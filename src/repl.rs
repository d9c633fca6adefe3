use crate::agent::{Agent, AgentEventHandler};
use crate::session::Session;
use std::io::{self, BufRead, Write};
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Clear,
    Prompt(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            "q" => Command::Quit,
            "c" => Command::Clear,
            prompt => Command::Prompt(prompt),
        }
    }
}

/// Prints each tool invocation as `ToolCall: name(args)`.
struct EchoToolCalls<'w, W: Write>(&'w mut W);

impl<W: Write> AgentEventHandler for EchoToolCalls<'_, W> {
    fn on_tool_call(&mut self, name: &str, args: &str) -> io::Result<()> {
        writeln!(self.0, "ToolCall: {}({})", name, args)?;
        self.0.flush()
    }
}

/// Reads requests from `input` until `q` or end of input.
pub async fn run<R, W>(agent: &Agent, session: &mut Session, mut input: R, out: &mut W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "User: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(out, "Quit requested")?;
            break;
        }

        match Command::parse(&line) {
            Command::Quit => {
                writeln!(out, "Quit requested")?;
                break;
            }
            Command::Clear => {
                session.reset();
                info!(session = %session.id, "message history cleared");
                writeln!(out, "Cleared message history")?;
            }
            Command::Prompt(prompt) => {
                let completion = agent
                    .respond(session, prompt, &mut EchoToolCalls(&mut *out))
                    .await?;
                writeln!(out, "{}: {}", completion.message.role, completion.text())?;
            }
        }
    }
    Ok(())
}
