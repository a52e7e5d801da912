use clap::{ArgAction, Parser, ValueEnum};
use mailprobe_lib::ProbeOptions;

#[derive(Parser)]
#[command(name = "mailprobe", version)]
#[command(about = "Asks each address's mail exchange whether the mailbox can receive mail")]
pub struct Cli {
    /// addresses to verify
    pub emails: Vec<String>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// write the report to a file instead of stdout (json/ndjson/csv)
    #[arg(long)]
    pub out: Option<String>,

    /// envelope sender used for MAIL FROM
    #[arg(long = "from")]
    pub sender: Option<String>,

    /// name announced with EHLO
    #[arg(long)]
    pub helo: Option<String>,

    /// idle timeout per read/write in milliseconds, 0 disables it
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// SMTP port
    #[arg(long)]
    pub port: Option<u16>,

    /// more logs on stderr (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Ndjson,
    Csv,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn probe_options(&self) -> ProbeOptions {
        let mut options = ProbeOptions::default();
        if let Some(sender) = &self.sender {
            options.sender = sender.clone();
        }
        if let Some(helo) = &self.helo {
            options.client_hostname = helo.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options.timeout_ms = timeout_ms;
        }
        if let Some(port) = self.port {
            options.port = port;
        }
        options
    }

    /// Level used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
