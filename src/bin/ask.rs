//! Terminal front end: one question per line on stdin.
//!
//! ```text
//! ask [TABLE]
//! ```
//!
//! The table defaults to `$ALLOTMENT_TABLE`, then `table_path` from the config.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use allotment_assistant::answer::{ask, EMPTY_QUERY};
use allotment_assistant::config::AppConfig;
use allotment_assistant::data::loader::load_file;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;
    let path = config.table_path(std::env::args_os().nth(1).map(PathBuf::from))?;
    let table = load_file(&path, &config.columns)?;
    let extractor = config.extractor(Some(&table));

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Loaded {} allotments from {}. Ask a question ('quit' to leave).",
        table.len(),
        path.display()
    )?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("reading question")? == 0 {
            break;
        }
        let query = line.trim();
        match query {
            "" => writeln!(out, "{EMPTY_QUERY}")?,
            "quit" | "exit" => break,
            _ => {
                let answer = ask(&table, &extractor, &config.labels, query);
                writeln!(out, "{}", answer.headline())?;
                if !answer.is_empty() {
                    writeln!(out, "{}", answer.to_text_table(&table)?)?;
                }
            }
        }
    }
    Ok(())
}
