//! List building: fetch sources, deduplicate, apply exclusions, write output.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ListConfig, ListsConfig, SourceConfig};
use crate::dedupe::{create, Deduplicator};
use crate::fetch::{fetch, Compression};
use crate::input::InputFormat;
use crate::output::OutputFormat;
use crate::Result;

/// Summary of one built list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListReport {
    pub name: String,
    /// Entries in the final list
    pub entries: usize,
    pub sources_ok: usize,
    pub sources_failed: usize,
    /// Source entries skipped as malformed
    pub invalid: usize,
    pub excluded: usize,
    pub files: Vec<PathBuf>,
}

/// Fetch and parse one source into raw entries.
pub fn load_source(source: &SourceConfig) -> Result<Vec<String>> {
    let compression = Compression::parse(&source.compression)?;
    let format: InputFormat = source.format.parse()?;
    let content = fetch(&source.url, compression)?;
    format.parse_entries(&content, &source.format_options)
}

/// Build a single list into `output_dir`.
///
/// Strategy and output names are resolved before any source is fetched.
/// A failing source is logged and skipped; malformed entries and
/// exclusions are logged and skipped.
pub fn build_list(list: &ListConfig, output_dir: &Path) -> Result<ListReport> {
    let mut dedupe = create(&list.dedupe)?;
    let output: OutputFormat = list.output.kind.parse()?;
    let mut report = ListReport {
        name: list.name.clone(),
        ..Default::default()
    };

    log::info!(
        "Processing list: {} ({} dedupe, {} exclusions)",
        list.name,
        dedupe.strategy(),
        list.exclude.len()
    );

    for source in &list.sources {
        log::info!("Fetching list from {} using format '{}'", source.url, source.format);
        let entries = match load_source(source) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Error fetching or parsing list from {}: {}", source.url, e);
                report.sources_failed += 1;
                continue;
            }
        };

        for entry in &entries {
            if let Err(e) = dedupe.add(entry) {
                log::warn!("Skipping entry from {}: {}", source.url, e);
                report.invalid += 1;
            }
        }
        report.sources_ok += 1;
        log::info!(
            "Added {} entries from {}. Size is now {}.",
            entries.len(),
            source.url,
            dedupe.len()
        );
    }

    for exclusion in &list.exclude {
        match dedupe.remove(exclusion) {
            Ok(true) => {
                log::debug!("Excluded {}", exclusion);
                report.excluded += 1;
            }
            Ok(false) => {}
            Err(e) => log::warn!("Ignoring exclusion for {}: {}", list.name, e),
        }
    }

    let all = dedupe.all();
    report.entries = all.len();
    report.files = output.write(output_dir, &list.name, &all, &list.output.options)?;

    log::info!(
        "List {} built with {} unique entries ({} files)",
        list.name,
        report.entries,
        report.files.len()
    );
    Ok(report)
}

/// Build every configured list into `output_dir`, creating it if needed.
pub fn generate(config: &ListsConfig, output_dir: &Path) -> Result<Vec<ListReport>> {
    config.validate()?;
    fs::create_dir_all(output_dir)?;

    config
        .lists
        .iter()
        .map(|list| build_list(list, output_dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatOptions, OutputConfig};
    use crate::Error;

    fn source(url: &str) -> SourceConfig {
        SourceConfig {
            url: url.to_string(),
            compression: "none".into(),
            format: "hostlist".into(),
            format_options: FormatOptions::new(),
        }
    }

    fn list(name: &str, dedupe: &str, sources: Vec<SourceConfig>) -> ListConfig {
        ListConfig {
            name: name.into(),
            dedupe: dedupe.into(),
            output: OutputConfig::default(),
            exclude: Vec::new(),
            sources,
        }
    }

    #[test]
    fn test_build_radix_list_with_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("cidrs.txt");
        fs::write(&src, "# drop\n10.1.0.0/16\n10.0.0.0/8\n192.168.1.1\nbogus\n172.16.0.0/12\n").unwrap();

        let mut config = list("drop", "radix", vec![source(src.to_str().unwrap())]);
        config.exclude = vec!["172.16.0.0/12".into(), "10.1.0.0/16".into(), "not-a-cidr".into()];

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let report = build_list(&config, &out).unwrap();

        assert_eq!(report.entries, 2);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.sources_ok, 1);
        let combined = fs::read_to_string(out.join("drop.combined.txt")).unwrap();
        assert_eq!(combined, "10.0.0.0/8\n192.168.1.1/32\n");
    }

    #[test]
    fn test_failing_source_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "a.com\n").unwrap();

        let config = list(
            "mixed",
            "domain",
            vec![source("/nonexistent/netdedupe.txt"), source(good.to_str().unwrap())],
        );
        let report = build_list(&config, dir.path()).unwrap();
        assert_eq!(report.sources_failed, 1);
        assert_eq!(report.sources_ok, 1);
        assert_eq!(report.entries, 1);
    }

    #[test]
    fn test_unknown_strategy_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let config = list("bad", "bloom", Vec::new());
        assert!(matches!(build_list(&config, dir.path()), Err(Error::UnknownStrategy(_))));
    }

    #[test]
    fn test_unknown_output_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = list("bad", "set", Vec::new());
        config.output.kind = "xml".into();
        assert!(matches!(build_list(&config, dir.path()), Err(Error::UnknownOutputFormat(_))));
    }
}
