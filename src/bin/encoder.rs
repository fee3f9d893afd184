use clap::Parser;
use std::fs;
use std::path::PathBuf;

use nimiqode::dump::NimiqodeDump;
use nimiqode::io_utils::{extension_error, io_cli_error, nimiqode_cli_error, simple_cli_error};
use nimiqode::{Nimiqode, VERSION};

/// Encode a payload file into a nimiqode ring dump.
#[derive(Parser)]
struct Args {
    /// Input payload file
    input: PathBuf,
    /// Output .nmq ring dump
    output: PathBuf,
    /// Error correction factor (parity bits relative to payload bits)
    #[arg(long, default_value_t = 0.5)]
    ec_factor: f64,
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
        .output
        .extension()
        .and_then(|s| s.to_str())
        .map_or(true, |ext| ext.to_ascii_lowercase() != "nmq")
    {
        return Err(extension_error(&args.output).into());
    }
    let payload =
        fs::read(&args.input).map_err(|e| io_cli_error("reading input file", &args.input, e))?;
    let code = Nimiqode::encode(&payload, args.ec_factor, VERSION)
        .map_err(|e| nimiqode_cli_error("encoding failed", e))?;
    let dump = NimiqodeDump::from_rings(code.rings())
        .map_err(|e| nimiqode_cli_error("dumping rings failed", e))?;
    let json = serde_json::to_string_pretty(&dump)
        .map_err(|e| simple_cli_error(&format!("serializing ring dump failed: {e}")))?;
    fs::write(&args.output, json)
        .map_err(|e| io_cli_error("writing output file", &args.output, e))?;
    eprintln!(
        "Encoded {} bytes across {} rings",
        payload.len(),
        code.rings().len()
    );
    Ok(())
}
