use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stockroom::catalog::Catalog;
use stockroom::persist::Persistor;
use stockroom::protocol::Interpreter;
use stockroom::settings::Settings;

/// Show and edit the records kept in a file.
///
/// Commands are read from stdin, each one terminated by a blank line. The
/// records are written back to the file when input ends.
#[derive(Parser, Debug)]
#[command(name = "stockroom", version)]
struct Cli {
    /// File to read from/write to
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Settings file (defaults to stockroom.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Collects lines up to the next blank line, keeping them as typed so
/// backslash continuations join with their whitespace intact. The flag is
/// false once input is exhausted.
fn read_message(lines: impl Iterator<Item = io::Result<String>>) -> io::Result<(String, bool)> {
    let mut message = String::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            return Ok((message, true));
        }
        message.push_str(&line);
        message.push('\n');
    }
    Ok((message, false))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let Some(path) = cli.file.or_else(|| settings.records_file.clone()) else {
        error!("Need to specify a file.");
        return ExitCode::from(1);
    };
    if !path.exists() {
        error!(path=%path.display(), "File must exist.");
        return ExitCode::from(2);
    }
    let catalog = match Catalog::from_settings(&settings) {
        Ok(c) => c,
        Err(e) => {
            error!(error=%e, "invalid record types");
            return ExitCode::from(1);
        }
    };
    let persistor = Persistor::new(path);
    let mut records = match persistor.restore(&catalog) {
        Ok(r) => r,
        Err(e) => {
            error!(error=%e, "Error reading file.");
            return ExitCode::from(3);
        }
    };
    info!(path=%persistor.path().display(), records=records.len(), types=catalog.len(), "ready");

    let interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let (message, more) = match read_message(lines.by_ref()) {
            Ok(read) => read,
            Err(e) => {
                error!(error=%e, "failed to read input");
                return ExitCode::from(4);
            }
        };
        let message = message.trim();
        if !message.is_empty() {
            let outcome = interpreter.interpret_message(message, &catalog, &mut records);
            if outcome.success {
                println!("{}", outcome.message.as_deref().unwrap_or("OK"));
            } else {
                eprintln!("Operation failed!");
                if let Some(m) = &outcome.message {
                    eprintln!("{m}");
                }
            }
            let _ = io::stdout().flush();
        }
        if !more {
            break;
        }
    }

    if let Err(e) = persistor.commit(&records) {
        error!(error=%e, "failed to commit records");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom::datatype::Value;

    fn lines(text: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
        text.lines().map(|l| Ok(l.to_string()))
    }

    #[test]
    fn blank_lines_end_a_message() {
        let mut input = lines("list\n\nlist\nPart: id=\"P1\"");
        assert_eq!(read_message(input.by_ref()).unwrap(), ("list\n".to_string(), true));
        assert_eq!(read_message(input.by_ref()).unwrap(), ("list\nPart: id=\"P1\"\n".to_string(), false));
        assert_eq!(read_message(input.by_ref()).unwrap(), (String::new(), false));
    }

    #[test]
    fn continued_values_keep_their_whitespace() {
        let input = lines("add\nPart: id=\"P1\" description=\"a \\\n  b\" footprint=\"0603\" quantity=\"1\"\n\n");
        let (message, more) = read_message(input).unwrap();
        assert!(more);
        assert!(message.contains("\"a \\\n  b\""));

        let catalog = Catalog::inventory();
        let mut records = Vec::new();
        let outcome = Interpreter::new().interpret_message(message.trim(), &catalog, &mut records);
        assert!(outcome.success);
        assert_eq!(records[0].record.value("description"), Some(&Value::Text("a   b".into())));
    }
}
