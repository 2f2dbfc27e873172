//! Rendering of command results.
//!
//! Human output goes to stdout with color; `--json` replaces it with one
//! JSON document per command and `--quiet` drops it. Errors always reach
//! stderr. Diagnostics go through `tracing`, not through here.

use std::fmt::Display;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

use crate::domain::Broker;

/// Width the check type columns of `show` are laid out in.
pub const CHECK_COLUMNS_WIDTH: usize = 70;

/// How results are rendered for this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Human,
    Json,
    Quiet,
}

impl OutputMode {
    /// Mode for the `--json` and `--quiet` flags; JSON wins.
    #[must_use]
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        match (json, quiet) {
            (true, _) => OutputMode::Json,
            (false, true) => OutputMode::Quiet,
            (false, false) => OutputMode::Human,
        }
    }
}

static MODE: OnceLock<OutputMode> = OnceLock::new();

/// Set the output mode. Only the first call takes effect.
pub fn configure(mode: OutputMode) {
    let _ = MODE.set(mode);
}

fn mode() -> OutputMode {
    MODE.get().copied().unwrap_or_default()
}

/// Whether commands should emit a JSON document instead of text.
#[must_use]
pub fn is_json() -> bool {
    mode() == OutputMode::Json
}

fn human() -> bool {
    mode() == OutputMode::Human
}

pub fn header() {
    if human() {
        println!(
            "{} {}",
            "cosi-broker".bold(),
            env!("CARGO_PKG_VERSION").dimmed()
        );
    }
}

pub fn section(title: &str) {
    if human() {
        println!();
        println!("{}", title.bold());
    }
}

fn field(label: &str, value: impl Display) {
    println!("  {:<8} {}", label.dimmed(), value);
}

/// Id, name and type of a broker.
pub fn broker(broker: &Broker) {
    if !human() {
        return;
    }
    field("ID", broker.id_str().cyan());
    field("Name", broker.name());
    field("Type", broker.kind());
}

/// Supported check types, counted and laid out in columns.
pub fn check_types(names: &[&str]) {
    if !human() {
        return;
    }
    field("Checks", format!("{} types supported", names.len()));
    for row in check_columns(names, CHECK_COLUMNS_WIDTH) {
        println!("  {row}");
    }
}

/// Lay out names in as many left-aligned columns as fit in `total_width`.
pub fn check_columns(names: &[&str], total_width: usize) -> Vec<String> {
    let Some(longest) = names.iter().map(|n| n.len()).max() else {
        return Vec::new();
    };
    let cell = longest + 2;
    let cols = (total_width / cell).max(1);

    names
        .chunks(cols)
        .map(|row| {
            row.iter()
                .map(|name| format!("{name:<cell$}"))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

#[derive(Tabled)]
struct BrokerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Checks")]
    checks: usize,
}

impl From<&Broker> for BrokerRow {
    fn from(broker: &Broker) -> Self {
        Self {
            id: broker.id_str().to_string(),
            name: broker.name().to_string(),
            kind: broker.kind().to_string(),
            active: format!(
                "{}/{}",
                broker.active_details().count(),
                broker.details().len()
            ),
            checks: broker.supported_check_types().len(),
        }
    }
}

/// Table of brokers, one row each.
pub fn broker_table(brokers: &[Broker]) {
    if !human() {
        return;
    }
    let table = Table::new(brokers.iter().map(BrokerRow::from)).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
}

/// JSON summary of a broker as the commands report it.
#[must_use]
pub fn broker_json(broker: &Broker) -> Value {
    json!({
        "id": broker.id_str(),
        "name": broker.name(),
        "type": broker.kind().to_string(),
    })
}

/// Emit a command's JSON document.
pub fn document(value: Value) {
    println!("{value}");
}

pub fn warning(message: &str) {
    match mode() {
        OutputMode::Json => {
            eprintln!("{}", json!({ "type": "warning", "payload": { "message": message } }));
        }
        OutputMode::Human => println!("  {} {}", "⚠".yellow(), message),
        OutputMode::Quiet => {}
    }
}

/// Report an error on stderr, in every mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn hint(message: &str) {
    if human() {
        println!("  {}: {}", "hint".cyan(), message.dimmed());
    }
}

/// Spinner shown while a fetch is in flight; hidden unless output is human.
pub fn spinner(message: &str) -> ProgressBar {
    if !human() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Stop a spinner, leaving `message` behind with a check mark.
pub fn done(pb: &ProgressBar, message: &str) {
    if human() {
        pb.finish_with_message(format!("{} {}", "✓".green(), message));
    } else {
        pb.finish_and_clear();
    }
}

/// Stop a spinner, leaving `message` behind with a cross.
pub fn failed(pb: &ProgressBar, message: &str) {
    if human() {
        pb.finish_with_message(format!("{} {}", "×".red(), message));
    } else {
        pb.finish_and_clear();
    }
}
