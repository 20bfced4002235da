//! Command-line front end for the site chatbot.
//!
//! Usage:
//!     chatbot classify "리서치 가격이 얼마인가요" --format json
//!     chatbot chat --delay-ms 500
//!     chatbot check

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chatbot_classifier::{Classification, Classifier};
use chatbot_model::{Message, QuickReplyOption, ResponseEntry, Speaker};
use chatbot_responses::{quick_replies, resolve, ResponseTable};
use chatbot_session::{ChatSession, SessionConfig, DEFAULT_REPLY_DELAY_MS};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(about = "Rule-based site chatbot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one message and show the answer
    Classify {
        /// Message text
        text: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Chat interactively on stdin
    Chat {
        /// Thinking delay before each reply, in milliseconds
        #[arg(long, default_value_t = DEFAULT_REPLY_DELAY_MS)]
        delay_ms: u64,

        /// Print the transcript as JSON on exit
        #[arg(long)]
        dump_json: bool,
    },

    /// Verify every classifier intent has an answer
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ClassifyReport<'a> {
    input: &'a str,
    #[serde(flatten)]
    classification: Classification,
    response: &'a ResponseEntry,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the chat
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chatbot=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { text, format } => {
            run_classify(&text, format)?;
        }
        Commands::Chat {
            delay_ms,
            dump_json,
        } => {
            run_chat(delay_ms, dump_json).await?;
        }
        Commands::Check => {
            run_check()?;
        }
    }

    Ok(())
}

fn run_classify(text: &str, format: OutputFormat) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Message is empty");
    }

    let classification = Classifier::builtin().explain(text);
    let response = resolve(classification.intent);

    if format == OutputFormat::Json {
        let report = ClassifyReport {
            input: text,
            classification,
            response,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Intent:  {}", classification.intent);
    println!("Topic:   {}", classification.topic.unwrap_or("-"));
    println!("Keyword: {}", classification.keyword.as_deref().unwrap_or("-"));
    println!("---");
    print_message(&Message::from_response(response));

    Ok(())
}

async fn run_chat(delay_ms: u64, dump_json: bool) -> Result<()> {
    let config = SessionConfig::default().with_reply_delay(Duration::from_millis(delay_ms));
    let mut session = ChatSession::open(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    tracing::debug!(delay_ms, "Chat session opened");

    println!("Type a question, a menu number, or /quit to exit.");

    loop {
        let transcript = session.transcript().await;
        for message in &transcript[shown..] {
            print_message(message);
        }
        shown = transcript.len();

        let menu_visible = session.should_show_quick_replies().await;
        if menu_visible {
            for (i, option) in quick_replies().iter().enumerate() {
                println!("  [{}] {}", i + 1, option.label);
            }
        }

        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == "/quit" {
            break;
        }

        let accepted = match quick_reply_choice(input, menu_visible) {
            Some(option) => session.select_quick_reply(option).await,
            None => session.submit_user_text(input).await,
        };
        if accepted {
            if delay_ms > 0 {
                println!("...");
            }
            session.settle().await;
        }
    }

    if dump_json {
        println!("{}", serde_json::to_string_pretty(&session.transcript().await)?);
    }
    session.close();

    Ok(())
}

/// Map a menu number to its option while the menu is on screen.
fn quick_reply_choice(input: &str, menu_visible: bool) -> Option<&'static QuickReplyOption> {
    if !menu_visible {
        return None;
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| quick_replies().get(i))
}

fn print_message(message: &Message) {
    let who = match message.speaker {
        Speaker::User => "you",
        Speaker::Bot => "bot",
    };
    println!("\n[{}]", who);
    for line in message.text.lines() {
        println!("  {}", line);
    }
    if let Some(cta) = &message.cta {
        println!("  -> {} ({})", cta.label, cta.target);
    }
}

fn run_check() -> Result<()> {
    let classifier = Classifier::new()?;
    let table = ResponseTable::builtin();
    let intents = classifier.intents();

    println!(
        "Rules: {} topics, {} fallbacks, {} reachable intents",
        classifier.topics().len(),
        classifier.fallbacks().len(),
        intents.len()
    );
    println!("Responses: {} entries, {} quick replies", table.len(), quick_replies().len());

    let missing = table.missing(intents);
    let bad_targets: Vec<_> = table
        .iter()
        .chain(quick_replies().iter().map(|o| &o.response))
        .chain(std::iter::once(table.fallback()))
        .filter_map(|r| r.cta.as_ref())
        .filter(|cta| !cta.target.starts_with('/'))
        .collect();

    if missing.is_empty() && bad_targets.is_empty() {
        println!("OK");
        return Ok(());
    }

    for intent in &missing {
        println!("MISSING: no response for {}", intent);
    }
    for cta in &bad_targets {
        println!("INVALID: CTA '{}' targets {}", cta.label, cta.target);
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_reply_choice() {
        assert_eq!(quick_reply_choice("1", true).map(|o| o.id.as_str()), Some("service"));
        assert_eq!(quick_reply_choice("5", true).map(|o| o.id.as_str()), Some("contact"));
        assert!(quick_reply_choice("0", true).is_none());
        assert!(quick_reply_choice("6", true).is_none());
        assert!(quick_reply_choice("1", false).is_none());
        assert!(quick_reply_choice("가격", true).is_none());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["chatbot", "classify", "가격 문의", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Classify { format: OutputFormat::Json, .. }
        ));

        let cli = Cli::try_parse_from(["chatbot", "classify", "가격 문의"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Classify { format: OutputFormat::Text, .. }
        ));

        assert!(Cli::try_parse_from(["chatbot", "classify", "가격 문의", "--format", "yaml"]).is_err());
    }
}
