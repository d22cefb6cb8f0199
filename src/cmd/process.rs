//! Process command - stream operation batches and print tax results

use crate::core::{calculate_taxes, read_batch, records_to_operations, write_batch};
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ProcessCommand {
    /// File with one JSON array of operations per line (or stdin with "-")
    #[arg(short, long, default_value = "-")]
    input: PathBuf,
}

impl ProcessCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let stdout = io::stdout();
        if self.input.as_os_str() == "-" {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!("Enter one JSON array of operations per line. An empty line finishes.");
                eprintln!(
                    r#"Example: [{{"operation":"buy","unit-cost":10.00,"quantity":100}},{{"operation":"sell","unit-cost":15.00,"quantity":50}}]"#
                );
            }
            run(stdin.lock(), stdout.lock())
        } else {
            let file = File::open(&self.input)
                .with_context(|| format!("failed to open {}", self.input.display()))?;
            run(BufReader::new(file), stdout.lock())
        }
    }
}

/// Process batches line by line until EOF or the first empty line.
///
/// Each line is an isolated portfolio. A failed batch aborts the run with
/// its line number attached; nothing is printed for it.
fn run(input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        let result = process_line(&line).with_context(|| format!("line {}", index + 1))?;
        writeln!(output, "{result}")?;
    }
    Ok(())
}

fn process_line(line: &str) -> anyhow::Result<String> {
    let records = read_batch(line).context("malformed operation batch")?;
    let operations = records_to_operations(&records)?;
    let taxes = calculate_taxes(&operations)?;
    Ok(write_batch(&taxes)?)
}
