use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use fingerprint::encode::{decode_hex, to_hex};
use fingerprint::{fingerprint, Encoded, Encoding, EntryPoint, HostValue, Width};

/// Compute non-cryptographic 32/64/128-bit fingerprints
#[derive(Parser)]
#[command(name = "fingerprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text to fingerprint (stdin is read when no input is given)
    #[arg(conflicts_with_all = ["hex", "file"])]
    text: Option<String>,

    /// Fingerprint raw bytes given as a hex string
    #[arg(long, value_name = "HEX", conflicts_with = "file")]
    hex: Option<String>,

    /// Fingerprint file contents
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Digest width in bits
    #[arg(short, long, value_enum, env = "FINGERPRINT_WIDTH", default_value_t = WidthArg::W32)]
    width: WidthArg,

    /// Output representation; `bytes` writes native-order raw bytes
    #[arg(short, long, value_enum, env = "FINGERPRINT_FORMAT", default_value_t = FormatArg::Hex)]
    format: FormatArg,

    /// Fail unless the digest equals this hex value
    #[arg(long, value_name = "HEX")]
    verify: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum WidthArg {
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
    #[value(name = "128")]
    W128,
}

impl From<WidthArg> for Width {
    fn from(arg: WidthArg) -> Self {
        match arg {
            WidthArg::W32 => Width::W32,
            WidthArg::W64 => Width::W64,
            WidthArg::W128 => Width::W128,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Number,
    Hex,
    Bytes,
}

impl From<FormatArg> for Encoding {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Number => Encoding::Number,
            FormatArg::Hex => Encoding::Hex,
            FormatArg::Bytes => Encoding::Bytes,
        }
    }
}

enum Input {
    Text(String),
    Bytes(Vec<u8>),
}

impl Input {
    fn as_host_value(&self) -> HostValue<'_> {
        match self {
            Input::Text(text) => HostValue::Text(text),
            Input::Bytes(bytes) => HostValue::Buffer(bytes),
        }
    }
}

fn read_input(cli: &Cli) -> Result<Input> {
    if let Some(text) = &cli.text {
        return Ok(Input::Text(text.clone()));
    }
    if let Some(encoded) = &cli.hex {
        let bytes = hex::decode(encoded.trim()).context("Invalid hex input")?;
        return Ok(Input::Bytes(bytes));
    }
    if let Some(path) = &cli.file {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(Input::Bytes(bytes));
    }
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read stdin")?;
    Ok(Input::Bytes(bytes))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let input = read_input(&cli)?;
    let entry = EntryPoint::new(cli.width.into(), cli.format.into());
    log::debug!("running {}", entry.name());

    let encoded = fingerprint(entry, input.as_host_value())?;

    if let Some(expected) = &cli.verify {
        let expected = decode_hex(expected.trim(), entry.width())?;
        let actual = encoded.decode()?;
        if actual != expected {
            bail!(
                "fingerprint mismatch: expected {}, got {}",
                to_hex(expected),
                to_hex(actual)
            );
        }
    }

    let mut stdout = io::stdout().lock();
    match encoded {
        Encoded::Number(digest) => writeln!(stdout, "{}", digest.as_u128())?,
        Encoded::Hex(hex) => writeln!(stdout, "{hex}")?,
        Encoded::Bytes(bytes) => stdout.write_all(&bytes)?,
    }
    stdout.flush().context("Failed to write output")?;
    Ok(())
}
