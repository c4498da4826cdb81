//! wealthlog-runner: headless driver for the recorders.
//!
//! Reads one JSON command per line on stdin and answers with one JSON
//! line per command. Lets the recorders run against a scripted host,
//! outside any game client.
//!
//! Usage:
//!   wealthlog-runner --base-dir ./out < session.jsonl
//!   wealthlog-runner --config recorder.json --manual-clock 0
//!
//! Commands:
//!   {"type":"set_state","state":{"player":"Zezima","phase":"logged_in",...}}
//!   {"type":"event","event":{"kind":"item_container_changed","container_id":95}}
//!   {"type":"advance","ms":11000}
//!   {"type":"read","rsn":"Zezima"}
//!   {"type":"quit"}

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use wealthlog_core::{
    clock::{Clock, ManualClock, SystemClock},
    config::RecorderConfig,
    engine::{Dispatched, RecorderEngine},
    host::HostEvent,
    record::{all_wealth, latest_wealth},
    recorder::Outcome,
    scripted::ScriptedHost,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    SetState {
        state: ScriptedHost,
    },
    Event {
        event: HostEvent,
    },
    Advance {
        ms: i64,
    },
    Read {
        #[serde(default)]
        rsn: Option<String>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct DispatchReport {
    recorder: &'static str,
    written:  bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped:  Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    paths:    Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view:     Option<[String; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error:    Option<String>,
}

impl From<Dispatched> for DispatchReport {
    fn from(d: Dispatched) -> Self {
        let mut report = DispatchReport {
            recorder: d.recorder,
            written:  false,
            skipped:  None,
            paths:    Vec::new(),
            view:     None,
            error:    None,
        };
        match d.result {
            Ok(outcome) => {
                report.view = outcome.view.as_ref().map(|v| v.lines());
                match outcome.outcome {
                    Outcome::Written { paths, .. } => {
                        report.written = true;
                        report.paths = paths;
                    }
                    Outcome::Skipped(reason) => report.skipped = Some(format!("{reason:?}")),
                }
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config") {
        Some(path) => RecorderConfig::load(path)?,
        None => RecorderConfig::default(),
    };
    if let Some(dir) = find_arg(&args, "--base-dir") {
        config.base_dir = PathBuf::from(dir);
    }

    let manual = find_arg(&args, "--manual-clock")
        .and_then(|v| v.parse::<i64>().ok())
        .map(|start| Arc::new(ManualClock::new(start)));
    let clock: Arc<dyn Clock> = match &manual {
        Some(m) => Arc::clone(m) as Arc<dyn Clock>,
        None => Arc::new(SystemClock) as Arc<dyn Clock>,
    };

    log::info!(
        "runner: base_dir={} bank_dir={} membership_dir={}",
        config.base_dir.display(),
        config.bank_dir().display(),
        config.membership_dir().display()
    );

    let mut engine = RecorderEngine::build(&config, clock);
    run_ipc_loop(&mut engine, &config, manual.as_deref())
}

fn run_ipc_loop(
    engine: &mut RecorderEngine,
    config: &RecorderConfig,
    manual: Option<&ManualClock>,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut host = ScriptedHost::default();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::SetState { state } => {
                host = state;
                serde_json::json!({ "ok": true })
            }
            IpcCommand::Event { event } => {
                let reports: Vec<DispatchReport> = engine
                    .dispatch(&host, &event)
                    .into_iter()
                    .map(DispatchReport::from)
                    .collect();
                serde_json::to_value(reports)?
            }
            IpcCommand::Advance { ms } => match manual {
                Some(clock) => serde_json::json!({ "now_ms": clock.advance(ms) }),
                None => serde_json::json!({ "error": "advance needs --manual-clock" }),
            },
            IpcCommand::Read { rsn: Some(rsn) } => {
                match latest_wealth(&config.bank_dir(), &rsn) {
                    Ok(summary) => serde_json::to_value(summary)?,
                    Err(e) => serde_json::json!({ "error": e.to_string() }),
                }
            }
            IpcCommand::Read { rsn: None } => serde_json::to_value(all_wealth(&config.bank_dir()))?,
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
