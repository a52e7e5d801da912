use anyhow::{Context, Result};
#[cfg(not(all(feature = "with-serde", feature = "with-csv")))]
use anyhow::bail;
use mailprobe_lib::VerificationResult;
#[cfg(feature = "with-csv")]
use mailprobe_lib::Check;

use crate::args::{Cli, OutputFormat};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct Report {
    pub address: String,
    #[cfg_attr(feature = "with-serde", serde(flatten))]
    pub result: VerificationResult,
}

impl Report {
    pub fn new(address: &str, result: VerificationResult) -> Self {
        Self {
            address: address.trim().to_string(),
            result,
        }
    }
}

pub fn all_deliverable(reports: &[Report]) -> bool {
    reports.iter().all(|report| report.result.is_deliverable())
}

pub fn write_reports(reports: &[Report], cli: &Cli) -> Result<()> {
    let bytes = match cli.format {
        OutputFormat::Human => render_human(reports),
        OutputFormat::Json => render_json(reports)?,
        OutputFormat::Ndjson => render_ndjson(reports)?,
        OutputFormat::Csv => render_csv(reports)?,
    };
    match &cli.out {
        Some(path) => write_all_atomically(path, &bytes),
        None => {
            use std::io::Write;

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn render_human(reports: &[Report]) -> Vec<u8> {
    let mut out = String::new();
    for report in reports {
        out.push_str(&human_line(report));
        out.push('\n');
    }
    out.into_bytes()
}

pub fn human_line(report: &Report) -> String {
    let result = &report.result;
    if result.is_deliverable() {
        return format!("[OK]    {}", report.address);
    }

    let stopped = match result.first_failure() {
        Some(check) => format!("stopped at {check}"),
        None => "not confirmed".to_string(),
    };
    let mut line = format!(
        "[UNDELIVERABLE] {} :: {stopped}; mailbox exists={} could_receive={}",
        report.address,
        tri_state(result.mailbox_exists()),
        tri_state(result.mailbox_could_receive()),
    );
    if let Some(error) = result.error() {
        line.push_str("; ");
        line.push_str(error);
    }
    line
}

fn tri_state(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "unknown",
    }
}

#[cfg(feature = "with-serde")]
fn render_json(reports: &[Report]) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(reports)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(not(feature = "with-serde"))]
fn render_json(_: &[Report]) -> Result<Vec<u8>> {
    bail!("format=json requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn render_ndjson(reports: &[Report]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for report in reports {
        serde_json::to_writer(&mut buf, report)?;
        buf.push(b'\n');
    }
    Ok(buf)
}

#[cfg(not(feature = "with-serde"))]
fn render_ndjson(_: &[Report]) -> Result<Vec<u8>> {
    bail!("format=ndjson requires the 'with-serde' feature")
}

#[cfg(feature = "with-csv")]
fn render_csv(reports: &[Report]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["address"];
    header.extend(Check::ALL.iter().map(|check| check.name()));
    header.push("error");
    wtr.write_record(&header)?;

    for report in reports {
        let mut record = vec![report.address.as_str()];
        record.extend(report.result.checks().map(|(_, value)| bool_opt_str(value)));
        record.push(report.result.error().unwrap_or(""));
        wtr.write_record(&record)?;
    }
    Ok(wtr.into_inner()?)
}

#[cfg(not(feature = "with-csv"))]
fn render_csv(_: &[Report]) -> Result<Vec<u8>> {
    bail!("format=csv requires the 'with-csv' feature")
}

#[cfg(feature = "with-csv")]
fn bool_opt_str(opt: Option<bool>) -> &'static str {
    match opt {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
