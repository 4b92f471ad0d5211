//! fOS Accessibility Replay - Main Entry Point
//!
//! Feeds a recorded stream of host messages (one JSON object per line)
//! through the automation client and prints the resulting trees.

use std::fs;

use anyhow::{bail, Context};
use fos_automation::{
    ActionRequest, Automation, AutomationConfig, AutomationHost, HostMessage, NodeId, TreeId,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fos-axreplay <events.jsonl> [--config <file>] [--deny-interact]";

struct Args {
    events: String,
    config: Option<String>,
    deny_interact: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut events = None;
    let mut config = None;
    let mut deny_interact = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context(USAGE)?),
            "--deny-interact" => deny_interact = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            path => events = Some(path.to_string()),
        }
    }

    Ok(Args {
        events: events.context(USAGE)?,
        config,
        deny_interact,
    })
}

/// Host stand-in that logs every outbound request
struct LoggingHost {
    interact: bool,
}

impl AutomationHost for LoggingHost {
    fn is_interact_permitted(&self) -> bool {
        self.interact
    }

    fn perform_action(&mut self, request: &ActionRequest) {
        match serde_json::to_string(request) {
            Ok(json) => tracing::info!("performAction {}", json),
            Err(e) => tracing::warn!("Could not encode action request: {}", e),
        }
    }

    fn enable_child_tree(&mut self, child_tree: TreeId) {
        tracing::info!("enableChildTree {}", child_tree);
    }

    fn query_selector(&mut self, tree_id: TreeId, node_id: NodeId, selector: &str) -> Option<i32> {
        tracing::info!("querySelector {:?} on node {} of tree {}", selector, node_id, tree_id);
        None
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
            AutomationConfig::from_json(&json)?
        }
        None => AutomationConfig::default(),
    };

    let input = fs::read_to_string(&args.events).with_context(|| format!("reading {}", args.events))?;
    let mut automation = Automation::with_config(LoggingHost { interact: !args.deny_interact }, config);

    tracing::info!("Replaying {}", args.events);
    let mut applied = 0usize;
    let mut rejected = 0usize;
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let message: HostMessage = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: not a host message", args.events, line_no + 1))?;

        match automation.handle_message(&message) {
            Ok(failures) => {
                applied += 1;
                for failure in failures {
                    tracing::warn!(
                        "line {}: listener failed on node {}: {:#}",
                        line_no + 1,
                        failure.node.id(),
                        failure.error
                    );
                }
            }
            Err(e) => {
                rejected += 1;
                tracing::warn!("line {}: {:#}", line_no + 1, anyhow::Error::new(e));
            }
        }
    }

    tracing::info!("{} messages applied, {} rejected", applied, rejected);
    for tree_id in automation.tree_ids() {
        if let Some(tree) = automation.tree(tree_id) {
            println!("{}", tree);
        }
    }

    Ok(())
}
