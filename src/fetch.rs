//! Source retrieval: HTTP(S) download or local file, with optional gzip.

use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Request timeout for list downloads.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Compression applied to a source's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    /// Parse a compression name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            _ => Err(Error::UnknownCompression(s.to_string())),
        }
    }

    /// Decode raw bytes into text. Invalid UTF-8 is replaced, not rejected.
    pub fn decode(&self, raw: &[u8]) -> Result<String> {
        match self {
            Compression::None => Ok(String::from_utf8_lossy(raw).into_owned()),
            Compression::Gzip => {
                let mut decoder = GzDecoder::new(raw);
                let mut bytes = Vec::new();
                decoder.read_to_end(&mut bytes)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Fetch a source and return its decoded text.
///
/// `http://` and `https://` URLs are downloaded; anything else (optionally
/// prefixed with `file://`) is read from disk.
pub fn fetch(url: &str, compression: Compression) -> Result<String> {
    let raw = if is_remote(url) {
        download(url)?
    } else {
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read(Path::new(path))?
    };
    log::debug!("Fetched {} bytes from {}", raw.len(), url);
    compression.decode(&raw)
}

fn download(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_compression_parse() {
        assert_eq!(Compression::parse("none").unwrap(), Compression::None);
        assert_eq!(Compression::parse("GZIP").unwrap(), Compression::Gzip);
        assert!(matches!(
            Compression::parse("zstd"),
            Err(Error::UnknownCompression(_))
        ));
    }

    #[test]
    fn test_gzip_decode() {
        let packed = gzip(b"example.com\n10.0.0.0/8\n");
        let text = Compression::Gzip.decode(&packed).unwrap();
        assert_eq!(text, "example.com\n10.0.0.0/8\n");
    }

    #[test]
    fn test_invalid_utf8_replaced_for_every_compression() {
        let raw = b"a.com\n\xffb.com\n";
        let plain = Compression::None.decode(raw).unwrap();
        let packed = Compression::Gzip.decode(&gzip(raw)).unwrap();
        assert_eq!(plain, "a.com\n\u{fffd}b.com\n");
        assert_eq!(packed, plain);
    }

    #[test]
    fn test_gzip_decode_invalid() {
        assert!(Compression::Gzip.decode(b"plain text").is_err());
    }

    #[test]
    fn test_fetch_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt.gz");
        fs::write(&path, gzip(b"a.com\n")).unwrap();

        let text = fetch(path.to_str().unwrap(), Compression::Gzip).unwrap();
        assert_eq!(text, "a.com\n");

        let url = format!("file://{}", path.display());
        assert_eq!(fetch(&url, Compression::Gzip).unwrap(), "a.com\n");
    }

    #[test]
    fn test_fetch_missing_file() {
        let result = fetch("/nonexistent/netdedupe/list.txt", Compression::None);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
