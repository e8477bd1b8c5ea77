//! Developer utility to print a persisted selection history snapshot.

use std::path::PathBuf;

use selection_history::{config, history, logging};

const USAGE: &str =
    "Usage: selection-history-inspect [--session NAME | --snapshot PATH] [--log-file]";

struct Options {
    session: String,
    snapshot: Option<PathBuf>,
    log_file: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if options.log_file {
        match logging::init_session(&options.session) {
            Ok(Some(path)) => println!("Log: {}", path.display()),
            Ok(None) => {}
            Err(err) => eprintln!("Logging disabled: {err}"),
        }
    } else if let Err(err) = logging::init_console() {
        eprintln!("Logging disabled: {err}");
    }

    let path = match options.snapshot {
        Some(path) => path,
        None => config::load_or_default()
            .and_then(|settings| settings.snapshot_path(&options.session))
            .map_err(|err| err.to_string())?,
    };
    println!("Snapshot: {}", path.display());

    let Some(snapshot) = history::load_snapshot(&path).map_err(|err| err.to_string())? else {
        println!("No history recorded yet.");
        return Ok(());
    };
    tracing::info!(
        session = %options.session,
        entries = snapshot.entries.len(),
        cursor = snapshot.cursor_index,
        "Loaded history snapshot"
    );
    println!(
        "Cursor: {}  Locked: {}  Entries: {}",
        snapshot.cursor_index,
        snapshot.locked,
        snapshot.entries.len()
    );
    for (index, entry) in snapshot.entries.iter().enumerate() {
        let marker = if index == snapshot.cursor_index { '>' } else { ' ' };
        let reference = entry
            .reference()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        match (entry.container_id(), entry.path()) {
            (Some(container), Some(path)) => println!(
                "{marker} {index:>4} {reference:<10} {} [{container}] {path}",
                entry.display_name()
            ),
            _ => println!("{marker} {index:>4} {reference:<10} {}", entry.display_name()),
        }
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options {
        session: "default".to_string(),
        snapshot: None,
        log_file: false,
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(None);
            }
            "--session" => {
                options.session = iter
                    .next()
                    .ok_or_else(|| format!("--session needs a value\n{USAGE}"))?;
            }
            "--snapshot" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("--snapshot needs a value\n{USAGE}"))?;
                options.snapshot = Some(PathBuf::from(value));
            }
            "--log-file" => options.log_file = true,
            other => return Err(format!("Unknown argument: {other}\n{USAGE}")),
        }
    }
    Ok(Some(options))
}
