use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use spartn::{Basedate, CipherMode, ErrorPolicy, SpartnReader, Validate};

#[derive(Debug, Parser)]
#[command(version, about = "Print the SPARTN messages found in a file or on stdin")]
struct Cli {
    /// Log file to read, stdin when omitted
    input: Option<PathBuf>,

    /// Decrypt and decode message payloads
    #[arg(short, long)]
    decode: bool,

    /// 128-bit AES key as 32 hex digits, falls back to $MQTTKEY
    #[arg(short, long, value_name = "HEX")]
    key: Option<String>,

    /// Reference date for 16-bit time tags: "now", "stream", an RFC 3339
    /// date or a 32-bit time tag
    #[arg(short, long, default_value = "now", value_parser = parse_basedate)]
    basedate: Basedate,

    #[arg(short, long, value_enum, default_value_t = Policy::Log)]
    error_policy: Policy,

    /// Skip CRC validation
    #[arg(long)]
    no_crc: bool,

    /// Reject unknown message identities
    #[arg(long)]
    msgid: bool,

    /// Decrypt with AES-CBC instead of AES-CTR
    #[arg(long)]
    cbc: bool,

    /// One JSON object per message instead of the text form
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Ignore,
    Log,
    Raise,
}

impl From<Policy> for ErrorPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Ignore => ErrorPolicy::Ignore,
            Policy::Log => ErrorPolicy::Log,
            Policy::Raise => ErrorPolicy::Raise,
        }
    }
}

fn parse_basedate(value: &str) -> Result<Basedate, String> {
    match value {
        "now" => Ok(Basedate::Now),
        "stream" => Ok(Basedate::Stream),
        _ => {
            if let Ok(timetag) = value.parse::<u32>() {
                return Ok(Basedate::Timetag(timetag));
            }
            DateTime::parse_from_rfc3339(value)
                .map(|date| Basedate::Date(date.with_timezone(&Utc)))
                .map_err(|e| format!("{value}: {e}"))
        },
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.json && !cfg!(feature = "json") {
        bail!("--json needs spartn-dump built with the `json` feature");
    }

    let input: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut validate = Validate::empty();
    validate.set(Validate::CRC, !cli.no_crc);
    validate.set(Validate::MSGID, cli.msgid);

    let mut builder = SpartnReader::builder()
        .decode(cli.decode)
        .basedate(cli.basedate)
        .error_policy(cli.error_policy.into())
        .validate(validate)
        .cipher_mode(if cli.cbc { CipherMode::Cbc } else { CipherMode::Ctr });
    if let Some(key) = cli.key {
        builder = builder.key_hex(key);
    }
    let reader = builder.build(input).context("configuring reader")?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for message in reader {
        let message = match message {
            Ok(message) => message,
            Err(e @ spartn::Error::Truncated { .. }) => {
                warn!("{e}");
                break;
            },
            Err(e) if e.is_transport() => return Err(e).context("reading frames"),
            Err(e) => {
                warn!("{e}");
                continue;
            },
        };
        *counts.entry(message.identity().as_str()).or_default() += 1;
        if cli.json {
            print_json(&message)?;
        } else {
            println!("{message}");
        }
    }

    for (identity, count) in counts {
        info!("{identity}: {count}");
    }
    Ok(())
}

#[cfg(feature = "json")]
fn print_json(message: &spartn::SpartnMessage) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(message)?);
    Ok(())
}

#[cfg(not(feature = "json"))]
fn print_json(_message: &spartn::SpartnMessage) -> anyhow::Result<()> {
    Ok(())
}
