//! gerrit-trigger-events: evaluate a stream of Gerrit events against a job's
//! trigger configuration.
//!
//! Reads one stream-events JSON object per line from stdin and writes one
//! JSON decision per parsed event to stdout:
//!
//! ```text
//! {"type":"comment-added","change":1234,"patchSet":3,"trigger":true}
//! ```
//!
//! Usage: `gerrit-trigger-events [--config PATH] [--list]`

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use gerrit_trigger_events::config::TriggerConfig;
use gerrit_trigger_events::error::EventError;
use gerrit_trigger_events::event::Event;
use gerrit_trigger_events::{TriggerConfiguration, logging, registry};

const USAGE: &str = "usage: gerrit-trigger-events [--config PATH] [--list]";

struct Args {
    config: Option<PathBuf>,
    list: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        list: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--list" => args.list = true,
            "-h" | "--help" => return Err(USAGE.into()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(args)
}

fn list_criteria() {
    for d in registry::global().descriptors() {
        println!("{}\t{}\t{}", d.tag, d.event_kind, d.display_name);
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    if args.list {
        list_criteria();
        return ExitCode::SUCCESS;
    }

    let config = match TriggerConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("gerrit-trigger-events: {e}");
            return ExitCode::from(2);
        }
    };
    if let Err(e) = logging::init(&config.settings) {
        eprintln!("gerrit-trigger-events: {e}");
    }

    let triggers = match TriggerConfiguration::from_config(&config, registry::global()) {
        Ok(t) => t,
        Err(e) => {
            log::error!("invalid trigger configuration: {e}");
            eprintln!("gerrit-trigger-events: {e}");
            return ExitCode::from(2);
        }
    };
    log::info!("loaded {} trigger criteria", triggers.len());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for (n, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let event = match Event::from_json(&line) {
            Ok(ev) => ev,
            Err(EventError::UnknownType(kind)) => {
                log::debug!("ignoring line {}: unhandled event type {kind}", n + 1);
                continue;
            }
            Err(e) => {
                log::warn!("skipping line {}: {e}", n + 1);
                continue;
            }
        };

        let trigger = triggers.should_trigger(&event);
        logging::log_decision(&event, trigger);

        let output = serde_json::json!({
            "type": event.kind(),
            "change": event.change().map(|c| c.number),
            "patchSet": event.patch_set().map(|p| p.number),
            "trigger": trigger,
        });
        if writeln!(stdout, "{output}").is_err() {
            // Downstream closed the pipe
            return ExitCode::SUCCESS;
        }
    }

    ExitCode::SUCCESS
}
