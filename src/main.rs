//! Runs one of the reference grammars over a file or stdin.
//!
//! Usage:
//!   tamis frames input.bin
//!   tamis lines --capacity 4096 --encoding latin1 < input.txt

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tamis::{
    protocol::{Drain, Frame, LengthPrefixed, Line, Lines},
    BufferedSource, Config, Encoding, DEFAULT_BUFFER_CAPACITY,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grammar {
    /// Length prefixed frames, `5:hello`
    Frames,
    /// Newline terminated records, `#` comments skipped
    Lines,
    /// Copy the input unchanged
    Raw,
}

/// Parse a byte stream through a bounded buffer and print one record per line.
#[derive(Parser)]
#[command(name = "tamis")]
struct Cli {
    #[arg(value_enum)]
    grammar: Grammar,

    /// Input file, stdin when omitted
    input: Option<PathBuf>,

    /// Buffer capacity in bytes, the largest record that can be parsed
    #[arg(short, long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
    capacity: usize,

    /// Text encoding of the records
    #[arg(short, long, default_value_t = Encoding::Utf8)]
    encoding: Encoding,
}

fn print_records(records: Vec<String>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for record in records {
        writeln!(stdout, "{record}")?;
    }
    stdout.flush()
}

fn run_grammar<R: Read>(source: R, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default()
        .with_capacity(cli.capacity)
        .with_encoding(cli.encoding);
    let mut source = BufferedSource::with_config(source, &config);
    match cli.grammar {
        Grammar::Frames => {
            let frames: Vec<String> = source.run(&mut LengthPrefixed, Frame::Length, Vec::new())?;
            print_records(frames)?;
        }
        Grammar::Lines => {
            let lines: Vec<String> = source.run(&mut Lines, Line::Start, Vec::new())?;
            print_records(lines)?;
        }
        Grammar::Raw => {
            source.run(&mut Drain, (), io::stdout().lock())?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.input {
        Some(path) => match File::open(path) {
            Ok(file) => run_grammar(file, &cli),
            Err(e) => {
                eprintln!("Error opening input file '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => run_grammar(io::stdin().lock(), &cli),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
