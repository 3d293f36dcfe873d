use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
#[cfg(not(feature = "with-csv"))]
use anyhow::bail;

use mailverify_lib::{BatchReport, VerificationResult};

use crate::args::Format;

pub fn write_report(report: &BatchReport, format: Format, out: Option<&Path>) -> Result<()> {
    let bytes = match format {
        Format::Human => render_human(report).into_bytes(),
        Format::Json => {
            let mut s = serde_json::to_string_pretty(report)?;
            s.push('\n');
            s.into_bytes()
        }
        Format::Csv => render_csv(&report.results)?,
    };

    if let Some(path) = out {
        write_all_atomically(path, &bytes)
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
        Ok(())
    }
}

pub fn render_human(report: &BatchReport) -> String {
    let mut s = String::new();
    for result in &report.results {
        let _ = write!(s, "[{:<8}] {:>3}  {}", result.classification, result.score, result.original.trim());
        if result.is_corrected() {
            let _ = write!(s, " -> {}", result.address);
        }
        if !result.reasons.is_empty() {
            let _ = write!(s, " :: {}", result.reasons.join("; "));
        }
        s.push('\n');
    }
    if report.cancelled {
        let _ = writeln!(
            s,
            "-- interrupted: {} of {} addresses verified",
            report.completed(),
            report.total
        );
    }
    s
}

#[cfg(feature = "with-csv")]
pub fn render_csv(results: &[VerificationResult]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["email", "corrected", "status", "score", "reasons"])?;
    for result in results {
        let corrected = if result.is_corrected() {
            result.address.as_str()
        } else {
            ""
        };
        let status = result.classification.to_string();
        let score = result.score.to_string();
        let reasons = result.reasons.join("|");
        wtr.write_record([
            result.original.trim(),
            corrected,
            status.as_str(),
            score.as_str(),
            reasons.as_str(),
        ])?;
    }
    Ok(wtr.into_inner()?)
}

#[cfg(not(feature = "with-csv"))]
pub fn render_csv(_: &[VerificationResult]) -> Result<Vec<u8>> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

fn write_all_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    {
        let mut f = std::fs::File::create(&tmp)
            .with_context(|| format!("create {}", Path::new(&tmp).display()))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| {
        format!("rename {} -> {}", Path::new(&tmp).display(), path.display())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailverify_lib::Classification;

    fn result(original: &str, address: &str, classification: Classification) -> VerificationResult {
        VerificationResult {
            original: original.to_string(),
            address: address.to_string(),
            classification,
            score: 60,
            reasons: vec!["domain corrected from gmial.com to gmail.com".to_string()],
        }
    }

    #[test]
    fn human_lines_show_correction_and_interruption() {
        let report = BatchReport {
            results: vec![result("bob@gmial.com", "bob@gmail.com", Classification::Doubtful)],
            cancelled: true,
            total: 3,
        };
        let text = render_human(&report);
        insta::assert_snapshot!(text.trim_end(), @r"
        [Doubtful]  60  bob@gmial.com -> bob@gmail.com :: domain corrected from gmial.com to gmail.com
        -- interrupted: 1 of 3 addresses verified
        ");
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_has_header_and_columns() {
        let rows = vec![result("bob@gmial.com", "bob@gmail.com", Classification::Doubtful)];
        let bytes = render_csv(&rows).expect("csv");
        let text = String::from_utf8(bytes).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("email,corrected,status,score,reasons"));
        assert_eq!(
            lines.next(),
            Some("bob@gmial.com,bob@gmail.com,Doubtful,60,domain corrected from gmial.com to gmail.com")
        );
    }
}
