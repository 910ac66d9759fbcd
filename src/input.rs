//! Parsers for downloaded list formats.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::config::{option_str, FormatOptions};
use crate::{Error, Result};

/// InputFormat identifies how a source's text is turned into raw entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFormat {
    /// One entry per line, `#` comments
    #[default]
    Hostlist,
    /// Spamhaus DROP: one JSON object per line with a `cidr` field
    SpamhausJson,
    /// Tab-separated `country<TAB>cidr` rows filtered by country
    InetIpInfoGeo,
}

impl InputFormat {
    /// Parse an input format from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hostlist" => Some(InputFormat::Hostlist),
            "spamhaus-json" => Some(InputFormat::SpamhausJson),
            "inet-ip-info-geo" => Some(InputFormat::InetIpInfoGeo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Hostlist => "hostlist",
            InputFormat::SpamhausJson => "spamhaus-json",
            InputFormat::InetIpInfoGeo => "inet-ip-info-geo",
        }
    }

    /// Extract raw entries from list content.
    pub fn parse_entries(&self, content: &str, options: &FormatOptions) -> Result<Vec<String>> {
        match self {
            InputFormat::Hostlist => Ok(parse_hostlist(content)),
            InputFormat::SpamhausJson => parse_spamhaus_json(content),
            InputFormat::InetIpInfoGeo => {
                let country = option_str(options, "country").ok_or_else(|| {
                    Error::Config("format_options must include 'country' for inet-ip-info-geo".into())
                })?;
                Ok(parse_inet_ip_info_geo(content, country))
            }
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        InputFormat::parse(s).ok_or_else(|| Error::UnknownInputFormat(s.to_string()))
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lines that carry data: non-blank and not `#` comments.
fn data_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn parse_hostlist(content: &str) -> Vec<String> {
    data_lines(content).map(str::to_string).collect()
}

#[derive(Deserialize)]
struct SpamhausRecord {
    #[serde(default)]
    cidr: Option<String>,
}

fn parse_spamhaus_json(content: &str) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for line in data_lines(content) {
        let record: SpamhausRecord = serde_json::from_str(line)?;
        if let Some(cidr) = record.cidr {
            entries.push(cidr);
        }
    }
    Ok(entries)
}

fn parse_inet_ip_info_geo(content: &str, country: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let mut cells = line.split('\t');
            let code = cells.next()?.trim();
            let cidr = cells.next()?.trim();
            if code.is_empty() || cidr.is_empty() || !code.eq_ignore_ascii_case(country) {
                return None;
            }
            Some(cidr.to_string())
        })
        .collect()
}
