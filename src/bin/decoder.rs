use clap::Parser;
use std::fs;
use std::path::PathBuf;

use nimiqode::dump::NimiqodeDump;
use nimiqode::io_utils::{extension_error, io_cli_error, nimiqode_cli_error, simple_cli_error};
use nimiqode::Nimiqode;

/// Decode a nimiqode ring dump back into its payload.
#[derive(Parser)]
struct Args {
    /// Input .nmq ring dump
    input: PathBuf,
    /// Output payload file
    output: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args
        .input
        .extension()
        .and_then(|s| s.to_str())
        .map_or(true, |ext| ext.to_ascii_lowercase() != "nmq")
    {
        return Err(extension_error(&args.input).into());
    }
    let json =
        fs::read_to_string(&args.input).map_err(|e| io_cli_error("reading input file", &args.input, e))?;
    let dump: NimiqodeDump = serde_json::from_str(&json)
        .map_err(|e| simple_cli_error(&format!("parsing ring dump failed: {e}")))?;
    let rings = dump
        .into_rings()
        .map_err(|e| nimiqode_cli_error("rebuilding rings failed", e))?;
    let code = Nimiqode::decode(rings).map_err(|e| nimiqode_cli_error("decoding failed", e))?;
    fs::write(&args.output, code.payload())
        .map_err(|e| io_cli_error("writing output file", &args.output, e))?;
    eprintln!("Decoded {} bytes", code.payload().len());
    Ok(())
}
