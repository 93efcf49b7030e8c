//! `salient release`: prepare and tag a release.
//!
//! Moves the unreleased changelog entries under a heading for the new tag,
//! stamps `:: unreleased` version markers in the package sources, then
//! commits and creates an annotated tag.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::manifest::SalientManifest;

static RE_CHANGELOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*?## \[Unreleased\]\n)(.+?\n)(\n*## \[.*)$").expect("valid changelog regex")
});

static RE_UNRELEASED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i):: *unreleased").expect("valid version marker regex"));

/// A changelog with its unreleased entries moved under a release heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedChangelog {
    pub text: String,
    /// The moved entries, used as the tag message body.
    pub changes: String,
}

pub fn tag_changelog(text: &str, tag: &str, date: &str) -> Result<TaggedChangelog> {
    let Some(caps) = RE_CHANGELOG.captures(text) else {
        bail!("changelog has no entries under '## [Unreleased]' followed by a released version");
    };
    let changes = caps[2].to_string();
    let text = format!("{}\n## [{tag}] - {date}\n{changes}{}", &caps[1], &caps[3]);
    Ok(TaggedChangelog { text, changes })
}

/// `major.minor` of a release tag.
pub fn short_tag(version: &semver::Version) -> String {
    format!("{}.{}", version.major, version.minor)
}

pub fn replace_unreleased(text: &str, short_tag: &str) -> String {
    RE_UNRELEASED.replace_all(text, format!(":: {short_tag}")).into_owned()
}

pub fn run(project_dir: &Path, manifest: &SalientManifest, tag: &str, edit: bool, dry_run: bool) -> Result<()> {
    let version = semver::Version::parse(tag).with_context(|| format!("'{tag}' is not a semantic version"))?;

    let changelog_path = project_dir.join("CHANGELOG.md");
    let changelog = std::fs::read_to_string(&changelog_path)
        .with_context(|| format!("reading {}", changelog_path.display()))?;
    let tagged = tag_changelog(&changelog, tag, &today())?;
    tracing::debug!(changes = %tagged.changes, "tagged section");

    let package = manifest.build.module_name.split('.').next().unwrap_or_default();
    let short = short_tag(&version);
    for file in py_files(&project_dir.join(package))? {
        let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        let updated = replace_unreleased(&text, &short);
        if updated != text {
            println!("Update tags in {}", file.display());
            if !dry_run {
                std::fs::write(&file, updated).with_context(|| format!("writing {}", file.display()))?;
            }
        }
    }

    if dry_run {
        println!("--- Tagged section:\n{}", tagged.changes);
        return Ok(());
    }

    std::fs::write(&changelog_path, &tagged.text)
        .with_context(|| format!("writing {}", changelog_path.display()))?;

    let edit_flag: &[&str] = if edit { &["-e"] } else { &[] };
    git(project_dir, &["commit", "-avm", &format!("Prepare {tag} release.")], edit_flag)?;
    git(project_dir, &["tag", tag, "-am", &format!("{tag}\n\n{}", tagged.changes)], edit_flag)?;
    Ok(())
}

fn git(project_dir: &Path, args: &[&str], extra: &[&str]) -> Result<()> {
    let status = Command::new("git")
        .args(args)
        .args(extra)
        .current_dir(project_dir)
        .status()
        .context("running git")?;
    if !status.success() {
        bail!("git {} failed with {status}", args[0]);
    }
    Ok(())
}

/// Every `.py` file below `dir`, sorted. A missing directory yields nothing.
fn py_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "package directory not found");
        return Ok(out);
    }
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).with_context(|| format!("reading {}", current.display()))? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "py") {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Today's UTC date as `YYYY-MM-DD`.
fn today() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (y, m, d) = civil_from_days((secs / 86_400) as i64);
    format!("{y:04}-{m:02}-{d:02}")
}

/// Proleptic Gregorian date of a day count since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}
