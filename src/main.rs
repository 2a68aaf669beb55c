use clap::error::ErrorKind;
use clap::Parser;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{error, info};

use header_obfuscator::errors::AppError;
use header_obfuscator::logger;
use header_obfuscator::obfuscator::obfuscate_stream;

#[derive(Parser)]
#[command(name = "header-obfuscator", version)]
#[command(about = "Rewrite #define string constants into XOR-masked byte arrays")]
struct Cli {
    /// Header containing plain #define string constants
    input: PathBuf,
    /// Destination for the rewritten header
    output: PathBuf,
}

fn main() {
    logger::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(_) => {
            println!("usage: header-obfuscator /path/to/strings.h /path/to/output.h");
            std::process::exit(1);
        }
    };
    if let Err(err) = run(&cli) {
        error!("{err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let input = File::open(&cli.input)?;
    // Transform into memory first so a mid-stream failure never leaves
    // a partial output file behind.
    let mut buf = Vec::new();
    let count = obfuscate_stream(BufReader::new(input), &mut buf)?;
    fs::write(&cli.output, &buf)?;
    info!("obfuscated {} declarations into {}", count, cli.output.display());
    Ok(())
}
