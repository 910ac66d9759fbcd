//! Writers for finished lists.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{option_bool, FormatOptions};
use crate::{Error, Result};

/// OutputFormat selects how a deduplicated list is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// `<name>.combined.txt`, `<name>.ipv4.txt`, `<name>.ipv6.txt`
    #[default]
    HostlistPerFamily,
    /// DNS response policy zone: `<name>.rpz`
    Rpz,
    /// Nothing is written
    None,
}

impl OutputFormat {
    /// Parse an output format from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hostlist_per_family" | "per_family" | "family" => Some(OutputFormat::HostlistPerFamily),
            "rpz" => Some(OutputFormat::Rpz),
            "none" => Some(OutputFormat::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::HostlistPerFamily => "hostlist_per_family",
            OutputFormat::Rpz => "rpz",
            OutputFormat::None => "none",
        }
    }

    /// Write `entries` for list `name` into `dir`.
    ///
    /// Returns the paths written, which is empty when there was nothing to write.
    pub fn write(
        &self,
        dir: &Path,
        name: &str,
        entries: &[String],
        options: &FormatOptions,
    ) -> Result<Vec<PathBuf>> {
        let mut sorted = entries.to_vec();
        sorted.sort();

        match self {
            OutputFormat::HostlistPerFamily => write_per_family(dir, name, &sorted),
            OutputFormat::Rpz => write_rpz(dir, name, &sorted, option_bool(options, "block_subdomains")),
            OutputFormat::None => Ok(Vec::new()),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::parse(s).ok_or_else(|| Error::UnknownOutputFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_per_family(dir: &Path, name: &str, entries: &[String]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if entries.is_empty() {
        return Ok(written);
    }

    let combined = dir.join(format!("{}.combined.txt", name));
    write_lines(&combined, entries)?;
    written.push(combined);

    let ipv4: Vec<&String> = entries.iter().filter(|e| e.contains('.')).collect();
    if !ipv4.is_empty() {
        let path = dir.join(format!("{}.ipv4.txt", name));
        write_lines(&path, ipv4)?;
        written.push(path);
    }

    let ipv6: Vec<&String> = entries.iter().filter(|e| e.contains(':')).collect();
    if !ipv6.is_empty() {
        let path = dir.join(format!("{}.ipv6.txt", name));
        write_lines(&path, ipv6)?;
        written.push(path);
    }

    Ok(written)
}

fn write_rpz(dir: &Path, name: &str, entries: &[String], block_subdomains: bool) -> Result<Vec<PathBuf>> {
    let mut lines: Vec<String> = entries.iter().map(|e| format!("{} CNAME .", e)).collect();
    if block_subdomains {
        lines.extend(entries.iter().map(|e| format!("*.{} CNAME .", e)));
    }
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let path = dir.join(format!("{}.rpz", name));
    write_lines(&path, &lines)?;
    Ok(vec![path])
}
