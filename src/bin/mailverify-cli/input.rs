use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::args::Cli;

#[cfg_attr(not(feature = "with-csv"), allow(dead_code))]
const EMAIL_COLUMNS: [&str; 4] = ["email", "emails", "mail", "e-mail"];

pub fn read_addresses(cli: &Cli) -> Result<Vec<String>> {
    if cli.stdin {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("read stdin")?;
        return Ok(parse_lines(&raw));
    }
    let Some(path) = cli.input.as_deref() else {
        bail!("no input: pass a file or --stdin");
    };
    if is_csv(path) {
        return read_csv_file(path, cli.column.as_deref());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(parse_lines(&raw))
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// One address per line. Blank lines inside the list are kept (they come
/// back as invalid) so results line up with the input; trailing ones are not.
pub fn parse_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = raw.lines().map(|line| line.trim().to_string()).collect();
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

#[cfg(feature = "with-csv")]
fn read_csv_file(path: &Path, column: Option<&str>) -> Result<Vec<String>> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_csv(file, column).with_context(|| format!("parse {}", path.display()))
}

#[cfg(not(feature = "with-csv"))]
fn read_csv_file(_: &Path, _: Option<&str>) -> Result<Vec<String>> {
    bail!("entrée CSV nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
pub fn read_csv<R: Read>(reader: R, column: Option<&str>) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("read CSV header")?.clone();
    let idx = find_column(&headers, column)?;

    // une ligne = un résultat, même si la cellule est vide ou absente
    let mut addresses = Vec::new();
    for record in rdr.records() {
        let record = record.context("read CSV record")?;
        let cell = record.get(idx).map(str::trim).unwrap_or_default();
        addresses.push(cell.to_string());
    }
    Ok(addresses)
}

#[cfg(feature = "with-csv")]
fn find_column(headers: &csv::StringRecord, wanted: Option<&str>) -> Result<usize> {
    let matches = |header: &str, name: &str| header.trim().eq_ignore_ascii_case(name);
    if let Some(name) = wanted {
        return headers
            .iter()
            .position(|h| matches(h, name))
            .with_context(|| format!("column '{name}' not found in CSV header"));
    }
    for name in EMAIL_COLUMNS {
        if let Some(idx) = headers.iter().position(|h| matches(h, name)) {
            return Ok(idx);
        }
    }
    bail!(
        "no e-mail column found in CSV header (looked for {}); use --column",
        EMAIL_COLUMNS.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_trimmed_and_inner_blanks_kept() {
        let out = parse_lines("  a@example.com \n\n\tb@example.com\r\n   \n");
        assert_eq!(out, vec!["a@example.com", "", "b@example.com"]);
        assert!(parse_lines("\n  \n").is_empty());
    }

    #[test]
    fn csv_extension_is_case_insensitive() {
        assert!(is_csv(Path::new("list.CSV")));
        assert!(!is_csv(Path::new("list.txt")));
        assert!(!is_csv(Path::new("csv")));
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_picks_email_column_case_insensitively() {
        let data = "Name,E-Mail,Company\nAlice, alice@example.com ,ACME\nCarol,carol@example.org,Initech\n";
        let out = read_csv(data.as_bytes(), None).expect("csv");
        assert_eq!(out, vec!["alice@example.com", "carol@example.org"]);
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_blank_and_short_rows_keep_their_place() {
        let data = "name,email\nAlice,alice@example.com\nBob,\nDave\nCarol,carol@example.org\n";
        let out = read_csv(data.as_bytes(), None).expect("csv");
        assert_eq!(out, vec!["alice@example.com", "", "", "carol@example.org"]);
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_explicit_column() {
        let data = "id,contact\n1,x@example.com\n";
        let out = read_csv(data.as_bytes(), Some("Contact")).expect("csv");
        assert_eq!(out, vec!["x@example.com"]);
    }

    #[cfg(feature = "with-csv")]
    #[test]
    fn csv_without_email_column_fails() {
        let data = "id,name\n1,alice\n";
        assert!(read_csv(data.as_bytes(), None).is_err());
    }
}
