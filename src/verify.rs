//! Size-change verification of generated lists against git `HEAD`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Previous versions of list files.
pub trait Baseline {
    /// Line count of `path` in the baseline, or 0 if it did not exist.
    fn line_count(&self, path: &Path) -> Result<usize>;

    /// `.txt` files tracked under `dir` in the baseline.
    fn tracked_lists(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Baseline read from the `HEAD` commit of the git repository in the
/// current directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHead;

impl Baseline for GitHead {
    fn line_count(&self, path: &Path) -> Result<usize> {
        let output = Command::new("git")
            .arg("show")
            .arg(format!("HEAD:{}", path.display()))
            .stderr(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Ok(0);
        }
        Ok(String::from_utf8_lossy(&output.stdout).lines().count())
    }

    fn tracked_lists(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new("git")
            .args(["ls-tree", "--name-only", "HEAD"])
            .arg(format!("{}/", dir.display()))
            .output()?;
        if !output.status.success() {
            return Err(Error::Git(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| line.ends_with(".txt"))
            .map(normalize_path)
            .collect())
    }
}

/// A list whose size changed by more than the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: PathBuf,
    pub old_lines: usize,
    pub new_lines: usize,
    pub percent: f64,
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyReport {
    pub threshold: f64,
    pub deletions_allowed: bool,
    /// Lists with no baseline version
    pub new_files: Vec<PathBuf>,
    /// Lists tracked in the baseline but missing now
    pub deleted: Vec<PathBuf>,
    pub violations: Vec<Violation>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty() && (self.deletions_allowed || self.deleted.is_empty())
    }
}

/// Relative percentage change from `old` to `new` lines.
pub fn percent_change(old: usize, new: usize) -> f64 {
    if old == 0 {
        return if new > 0 { 100.0 } else { 0.0 };
    }
    (new as f64 - old as f64) / old as f64 * 100.0
}

/// Lexically normalize a path: drop `.` components and resolve `..`.
fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Express `dir` relative to the current directory, as git paths are.
///
/// Absolute paths outside the current directory are kept as given.
fn relative_to_cwd(dir: &Path) -> PathBuf {
    let dir = normalize_path(dir);
    if !dir.is_absolute() {
        return dir;
    }
    let Ok(cwd) = std::env::current_dir() else {
        return dir;
    };

    let relative = match dir.strip_prefix(&cwd) {
        Ok(rel) => Some(rel.to_path_buf()),
        // cwd may be reached through a symlink
        Err(_) => match (fs::canonicalize(&dir), fs::canonicalize(&cwd)) {
            (Ok(dir), Ok(cwd)) => dir.strip_prefix(&cwd).ok().map(Path::to_path_buf),
            _ => None,
        },
    };
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Some(rel) => rel,
        None => dir,
    }
}

fn current_lists(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .map(normalize_path)
        .collect();
    files.sort();
    Ok(files)
}

/// Verify lists in `dir` against git `HEAD`.
///
/// The current directory must be the repository root. An absolute `dir`
/// inside it is compared by its relative path.
pub fn verify(dir: &Path, threshold: f64, allow_deletions: bool) -> Result<VerifyReport> {
    verify_against(&GitHead, dir, threshold, allow_deletions)
}

/// Verify lists in `dir` against any baseline.
pub fn verify_against<B: Baseline>(
    baseline: &B,
    dir: &Path,
    threshold: f64,
    allow_deletions: bool,
) -> Result<VerifyReport> {
    let dir = relative_to_cwd(dir);
    let files = current_lists(&dir)?;
    let mut report = VerifyReport {
        threshold,
        deletions_allowed: allow_deletions,
        ..Default::default()
    };

    let current: BTreeSet<&PathBuf> = files.iter().collect();
    for tracked in baseline.tracked_lists(&dir)? {
        if !current.contains(&tracked) {
            log::warn!("{}: Deleted", tracked.display());
            report.deleted.push(tracked);
        }
    }
    if !report.deleted.is_empty() && !allow_deletions {
        log::error!("File deletions are not allowed.");
    }

    for path in &files {
        let new_lines = fs::read_to_string(path)?.lines().count();
        let old_lines = baseline.line_count(path)?;
        if old_lines == 0 {
            log::info!("{}: {} lines (new file)", path.display(), new_lines);
            report.new_files.push(path.clone());
            continue;
        }

        let percent = percent_change(old_lines, new_lines);
        if percent.abs() > threshold {
            log::error!(
                "{}: {} -> {} lines ({:+.2}% change) exceeds ±{:.1}% threshold",
                path.display(),
                old_lines,
                new_lines,
                percent,
                threshold
            );
            report.violations.push(Violation {
                path: path.clone(),
                old_lines,
                new_lines,
                percent,
            });
        }
    }

    if report.passed() {
        log::info!("All list changes within ±{:.1}%.", threshold);
    }
    Ok(report)
}
