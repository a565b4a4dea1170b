//! Command-line interface (CLI) for slr-calc
//!
//! Reads an expression from a file or standard input, tokenizes it with
//! [`slr_calc::CalcLexer`] and runs the SLR(1) driver over it. With
//! `--verbose` the grammar, FIRST/FOLLOW sets, automaton states, ACTION/GOTO
//! tables, tokens and the full parse trace are printed as well.
//!
//! Log output is controlled with `RUST_LOG` (e.g. `RUST_LOG=trace`).

use anyhow::{Context, Result, bail};
use clap::Parser as ClapParser;
use slr::{Driver, Grammar, ParsingTable, report};
use slr_calc::tokenize;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[derive(ClapParser, Debug)]
#[command(version, about = "Parse arithmetic expressions with an SLR(1) automaton", long_about = None)]
struct Args {
    /// Input file with an expression (standard input if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (standard output if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print grammar, tables, tokens and the parse trace
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("can't open {:?}", path))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("can't read standard input")?;
            Ok(text)
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("can't create {:?}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::debug!("{:?}", args);

    let grammar = Grammar::new();
    let table = ParsingTable::build(&grammar)?;

    let source = read_input(args.input.as_deref())?;
    let tokens = tokenize(&source)?;
    let result = Driver::new(&grammar, &table).parse(&tokens);

    let mut out = open_output(args.output.as_deref())?;
    if args.verbose {
        report::write_productions(&mut out, &grammar)?;
        report::write_first_follow(&mut out, &grammar)?;
        report::write_states(&mut out, &grammar, &table)?;
        report::write_table(&mut out, &table)?;
        report::write_tokens(&mut out, &tokens)?;
        report::write_result(&mut out, &result)?;
    } else {
        match &result.error {
            None => writeln!(out, "accepted")?,
            Some(err) => writeln!(out, "rejected: {}", err)?,
        }
    }
    out.flush()?;

    if let Some(err) = result.error {
        bail!("input rejected: {}", err);
    }
    Ok(())
}
