//! Interactive command - drive a suggestion session from stdin
//!
//! Every line is typed into the session unless it starts with `:`, in which
//! case it is a key or pointer action. A snapshot is printed after each change.

use crate::context::Context;
use crate::remote::JsonFileSource;
use crate::OutputFormat;
use anyhow::Result;
use owo_colors::OwoColorize;
use pawsearch_core::exit_codes;
use pawsearch_core::storage::KeyValueStore;
use pawsearch_typeahead::{Phase, SessionEvents, SessionSnapshot, SessionState, SuggestionSession};
use serde_json::json;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

const EOF_MARGIN: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Type(String),
    Next,
    Previous,
    Enter,
    /// Zero-based position
    Pick(usize),
    Escape,
    Blur,
    Focus,
    Clear,
    Forget(String),
    ClearHistory,
    /// Let the pending resolve land, or sleep for the given milliseconds
    Wait(Option<u64>),
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Input, String> {
    // `::text` types text starting with a colon
    if let Some(text) = line.strip_prefix("::") {
        return Ok(Input::Type(format!(":{text}")));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Type(line.to_string()));
    };

    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command.trim(), ""),
    };

    match name {
        "next" | "n" => Ok(Input::Next),
        "prev" | "p" => Ok(Input::Previous),
        "enter" => Ok(Input::Enter),
        "pick" => arg
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| Input::Pick(n - 1))
            .ok_or_else(|| format!("usage: :pick N (1-based), got '{arg}'")),
        "esc" => Ok(Input::Escape),
        "blur" => Ok(Input::Blur),
        "focus" => Ok(Input::Focus),
        "clear" => Ok(Input::Clear),
        "forget" if !arg.is_empty() => Ok(Input::Forget(arg.to_string())),
        "forget" => Err("usage: :forget TERM".to_string()),
        "clear-history" => Ok(Input::ClearHistory),
        "wait" if arg.is_empty() => Ok(Input::Wait(None)),
        "wait" => arg
            .parse::<u64>()
            .map(|ms| Input::Wait(Some(ms)))
            .map_err(|_| format!("usage: :wait [MS], got '{arg}'")),
        "help" | "?" => Ok(Input::Help),
        "quit" | "q" => Ok(Input::Quit),
        other => Err(format!("unknown command ':{other}' (try :help)")),
    }
}

fn apply(session: &SuggestionSession, input: Input) {
    match input {
        Input::Type(text) => session.set_query(text),
        Input::Next => session.select_next(),
        Input::Previous => session.select_previous(),
        Input::Enter => {
            session.commit_search();
        }
        Input::Pick(index) => {
            if session.accept(index).is_none() {
                eprintln!("{} nothing at position {}", "!".red(), index + 1);
            }
        }
        Input::Escape => session.dismiss(),
        Input::Blur => session.notify_outside_interaction(),
        Input::Focus => session.focus(),
        Input::Clear => session.clear(),
        Input::Forget(term) => session.forget_history_entry(&term),
        Input::ClearHistory => session.clear_history(),
        Input::Wait(_) | Input::Help | Input::Quit => {}
    }
}

/// Prints the searches a session commits.
struct EchoEvents {
    format: OutputFormat,
}

impl EchoEvents {
    fn emit(&self, event: &str, text: &str) {
        match self.format {
            OutputFormat::Json => println!("{}", json!({ "event": event, "text": text })),
            OutputFormat::Text => println!("{} {} {}", "→".green(), event.bold(), text),
        }
    }
}

impl SessionEvents for EchoEvents {
    fn on_search(&self, text: &str) {
        self.emit("search", text);
    }

    fn on_suggestion_select(&self, text: &str) {
        self.emit("select", text);
    }

    fn on_clear(&self) {
        self.emit("clear", "");
    }
}

fn render(snapshot: &SessionSnapshot, format: OutputFormat) {
    if format == OutputFormat::Json {
        if let Ok(line) = serde_json::to_string(snapshot) {
            println!("{}", line);
        }
        return;
    }

    let status = match &snapshot.state {
        SessionState::Closed => "closed".dimmed().to_string(),
        SessionState::Open(Phase::Idle) => "open".green().to_string(),
        SessionState::Open(Phase::Loading) => "loading".yellow().to_string(),
        SessionState::Open(Phase::Error(message)) => message.red().to_string(),
    };
    println!("{} {} [{}]", "›".cyan(), snapshot.query.bold(), status);

    if !snapshot.state.is_open() || snapshot.state.is_loading() {
        return;
    }

    let rows = snapshot.suggestions.iter().chain(&snapshot.history);
    for (i, item) in rows.enumerate() {
        let marker = if snapshot.selected == Some(i) { ">" } else { " " };
        if i < snapshot.suggestions.len() {
            println!("  {} {:>2}. {}", marker.cyan(), i + 1, item);
        } else {
            println!("  {} {:>2}. {} {}", marker.cyan(), i + 1, item.dimmed(), "(recent)".dimmed());
        }
    }

    if !snapshot.did_you_mean.is_empty() {
        println!("  Did you mean: {}", snapshot.did_you_mean.join(", ").cyan());
    }
}

fn print_help() {
    println!("{}", "Type to search. Commands:".bold());
    println!("  :next :prev        move the selection");
    println!("  :enter             search (or accept the selection)");
    println!("  :pick N            accept row N");
    println!("  :esc :blur :focus  close, blur with grace period, refocus");
    println!("  :clear             empty the input");
    println!("  :forget TERM       drop TERM from history");
    println!("  :clear-history     drop all history");
    println!("  :wait [MS]         wait for results, or MS milliseconds");
    println!("  :quit");
}

/// Forward stdin lines to the async loop.
///
/// A plain thread rather than a blocking task: the runtime must not wait for
/// a read that never returns when the session quits.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub async fn run(ctx: &Context, remote: Option<&Path>, remote_delay: u64, verbose: bool) -> Result<i32> {
    let vocabulary = ctx.vocabulary()?;
    if vocabulary.is_empty() && remote.is_none() {
        return Err(pawsearch_core::Error::empty_vocabulary().into());
    }

    let storage: Arc<dyn KeyValueStore> = Arc::new(ctx.store()?);
    let mut builder = SuggestionSession::builder(ctx.config.schema.typeahead.clone())
        .vocabulary(vocabulary)
        .storage(storage)
        .events(Arc::new(EchoEvents { format: ctx.format }));
    if let Some(path) = remote {
        builder = builder.source(JsonFileSource::load(path, Duration::from_millis(remote_delay))?);
    }
    let session = builder.build()?;

    let mut updates = session.subscribe();
    let mut lines = spawn_stdin_reader();
    let mut eof = false;
    let mut settling = false;
    let mut pause: Option<Instant> = None;

    if !ctx.is_json() {
        print_help();
    }

    loop {
        let reading = !eof && !settling && pause.is_none();
        let deadline = pause.unwrap_or_else(Instant::now);

        tokio::select! {
            line = lines.recv(), if reading => match line {
                Some(line) => match parse(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => print_help(),
                    Ok(Input::Wait(None)) => settling = true,
                    Ok(Input::Wait(Some(ms))) => pause = Some(Instant::now() + Duration::from_millis(ms)),
                    Ok(input) => apply(&session, input),
                    Err(message) => eprintln!("{} {}", "!".red(), message),
                },
                None => {
                    eof = true;
                    // A trailing :blur still gets its grace period
                    pause = Some(Instant::now() + session.config().blur_grace() + EOF_MARGIN);
                }
            },
            _ = tokio::time::sleep_until(deadline), if pause.is_some() => pause = None,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                render(&snapshot, ctx.format);
            }
        }

        if settling && !session.state().is_loading() {
            settling = false;
        }

        // Piped input: let pending timers and the last resolve land before exiting
        if eof && pause.is_none() && !session.state().is_loading() {
            if updates.has_changed().unwrap_or(false) {
                render(&updates.borrow_and_update().clone(), ctx.format);
            }
            break;
        }
    }

    if verbose {
        eprintln!("{}", serde_json::to_string_pretty(&pawsearch_telemetry::metrics().export_json())?);
    }

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_typed() {
        assert_eq!(parse("gold"), Ok(Input::Type("gold".into())));
        assert_eq!(parse(""), Ok(Input::Type(String::new())));
        assert_eq!(parse("::)"), Ok(Input::Type(":)".into())));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse(":next"), Ok(Input::Next));
        assert_eq!(parse(":p"), Ok(Input::Previous));
        assert_eq!(parse(":enter"), Ok(Input::Enter));
        assert_eq!(parse(":esc"), Ok(Input::Escape));
        assert_eq!(parse(":quit"), Ok(Input::Quit));
    }

    #[test]
    fn test_pick_is_one_based() {
        assert_eq!(parse(":pick 1"), Ok(Input::Pick(0)));
        assert_eq!(parse(":pick  3 "), Ok(Input::Pick(2)));
        assert!(parse(":pick 0").is_err());
        assert!(parse(":pick x").is_err());
    }

    #[test]
    fn test_forget_takes_rest_of_line() {
        assert_eq!(
            parse(":forget Golden Retriever"),
            Ok(Input::Forget("Golden Retriever".into()))
        );
        assert!(parse(":forget").is_err());
    }

    #[test]
    fn test_wait() {
        assert_eq!(parse(":wait"), Ok(Input::Wait(None)));
        assert_eq!(parse(":wait 250"), Ok(Input::Wait(Some(250))));
        assert!(parse(":wait soon").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse(":frobnicate").is_err());
    }
}
