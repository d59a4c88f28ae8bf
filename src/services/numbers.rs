//! System numbers still to be processed
//!
//! The master list names every letter in the catalogue. Numbers already
//! carried by an XML file (its root `catalogue_id` attribute) are done;
//! the rest, in master order, are what a run fetches.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::{
    config::InputConfig,
    error::AppResult,
    models::{RunMode, SystemNumber},
};

/// Sample size of a test run without a named system number
pub const TEST_SAMPLE_SIZE: usize = 5;

fn comment_re() -> &'static Regex {
    static COMMENT_RE: OnceLock<Regex> = OnceLock::new();
    COMMENT_RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"))
}

fn start_tag_re() -> &'static Regex {
    static START_TAG_RE: OnceLock<Regex> = OnceLock::new();
    START_TAG_RE.get_or_init(|| {
        Regex::new(r"<([A-Za-z_][\w:.\-]*)([^>]*)>").expect("valid start tag regex")
    })
}

fn catalogue_id_re() -> &'static Regex {
    static CATALOGUE_ID_RE: OnceLock<Regex> = OnceLock::new();
    CATALOGUE_ID_RE.get_or_init(|| {
        Regex::new(r#"(?:^|\s)catalogue_id\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid catalogue_id regex")
    })
}

/// `catalogue_id` of the document's root element, if it has one
pub fn catalogue_id(xml: &str) -> Option<String> {
    let xml = comment_re().replace_all(xml, "");
    let root = start_tag_re().captures(&xml)?;
    let attributes = root.get(2)?.as_str();
    let value = catalogue_id_re().captures(attributes)?;
    value
        .get(1)
        .or_else(|| value.get(2))
        .map(|m| m.as_str().trim().to_string())
}

/// Master numbers not yet used, in master order
pub fn unused(all: &[SystemNumber], used: &HashSet<SystemNumber>) -> Vec<SystemNumber> {
    all.iter().filter(|no| !used.contains(*no)).cloned().collect()
}

/// One number per line; blank lines are skipped, invalid ones logged and skipped
pub fn read_number_list(path: &Path) -> AppResult<Vec<SystemNumber>> {
    let text = fs::read_to_string(path)?;
    let numbers = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match SystemNumber::new(line) {
            Ok(no) => Some(no),
            Err(e) => {
                tracing::warn!("Ignoring line in {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    Ok(numbers)
}

pub fn write_number_list(path: &Path, numbers: &[SystemNumber]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut text = String::new();
    for no in numbers {
        text.push_str(no.as_str());
        text.push('\n');
    }
    fs::write(path, text)?;
    Ok(())
}

pub struct NumberSource {
    input: InputConfig,
    mode: RunMode,
}

impl NumberSource {
    pub fn new(input: &InputConfig, mode: &RunMode) -> Self {
        Self {
            input: input.clone(),
            mode: mode.clone(),
        }
    }

    pub fn numbers_to_fetch(&self) -> AppResult<Vec<SystemNumber>> {
        self.numbers_to_fetch_with(&mut rand::thread_rng())
    }

    /// Master list minus used numbers; test runs shrink it to the named
    /// number or a random sample
    pub fn numbers_to_fetch_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> AppResult<Vec<SystemNumber>> {
        tracing::info!(
            "Getting system numbers in use (force: {}, test: {})",
            self.mode.force,
            self.mode.test
        );

        let all = read_number_list(&self.input.numbers_file)?;
        tracing::info!("Found {} numbers in {}", all.len(), self.input.numbers_file.display());

        let used = self.used_numbers()?;
        let open = unused(&all, &used);

        if !self.mode.test {
            tracing::info!("{} numbers left to work with", open.len());
            return Ok(open);
        }

        if let Some(number) = &self.mode.test_identifier {
            return Ok(vec![number.clone()]);
        }

        let sample: Vec<SystemNumber> = open
            .choose_multiple(rng, TEST_SAMPLE_SIZE)
            .cloned()
            .collect();
        tracing::info!(
            "Shortened list from {} to {} for testing",
            open.len(),
            sample.len()
        );
        Ok(sample)
    }

    /// Numbers carried by existing XML files.
    ///
    /// Normal runs reuse the list stored by an earlier run; forced and test
    /// runs always rescan and rewrite it.
    pub fn used_numbers(&self) -> AppResult<HashSet<SystemNumber>> {
        let stored = &self.input.existing_numbers_file;

        let numbers = if !self.mode.bypasses_cache() && stored.is_file() {
            tracing::info!("Loading used numbers from {}", stored.display());
            read_number_list(stored)?
        } else {
            let scanned = self.scan_xml_dir()?;
            write_number_list(stored, &scanned)?;
            scanned
        };

        tracing::info!("{} system numbers already in use", numbers.len());
        Ok(numbers.into_iter().collect())
    }

    fn scan_xml_dir(&self) -> AppResult<Vec<SystemNumber>> {
        let dir = &self.input.xml_dir;
        if !dir.is_dir() {
            tracing::warn!("XML directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        tracing::debug!("Scanning {} files in {}", paths.len(), dir.display());

        let mut numbers = Vec::with_capacity(paths.len());
        for path in paths {
            let xml = match fs::read(&path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!("Could not read {}: {}", path.display(), e);
                    continue;
                }
            };
            match catalogue_id(&xml).map(|id| SystemNumber::new(&id)) {
                Some(Ok(no)) => numbers.push(no),
                Some(Err(e)) => tracing::warn!("{}: {}", path.display(), e),
                None => tracing::debug!("{} has no catalogue_id", path.display()),
            }
        }
        Ok(numbers)
    }
}
