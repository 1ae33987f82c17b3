//! RuleSet management and configuration.

mod config;

pub use config::{RuleSetConfig, ValidationMode};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::address::Address;
use crate::error::{Error, Result};
use crate::rule::{parse_rule, AddressMatcher, Rule};

/// A named rule as supplied by the caller.
///
/// `name` is a label only; it never takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    pub value: String,
}

impl RuleEntry {
    /// Create a new RuleEntry.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Check whether `query` is covered by any of `entries`.
///
/// Entries are parsed in order and the scan stops at the first match.
/// An entry that fails to parse before a match is found aborts the scan
/// with [`Error::InvalidRuleConfiguration`].
///
/// # Examples
/// ```
/// use ipmatch::{contains, RuleEntry};
///
/// let entries = [RuleEntry::new("w", "10.0.0.10 - 10.0.0.15")];
/// assert!(contains(&entries, "10.0.0.15").unwrap());
/// assert!(!contains(&entries, "10.0.0.16").unwrap());
/// ```
pub fn contains(entries: &[RuleEntry], query: &str) -> Result<bool> {
    let addr = Address::parse(query.trim())?;

    for entry in entries {
        let rule = parse_rule(&entry.value).map_err(|source| Error::InvalidRuleConfiguration {
            name: entry.name.clone(),
            source,
        })?;
        if rule.matches(&addr) {
            log::trace!("{} matched rule '{}' ({})", addr, entry.name, rule);
            return Ok(true);
        }
    }

    Ok(false)
}

/// A parsed entry of a [`RuleSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEntry {
    name: String,
    rule: Rule,
}

impl CompiledEntry {
    /// Get the entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parsed rule.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

/// Rule set document as stored in YAML or JSON.
#[derive(Debug, Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mode: Option<ValidationMode>,
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

impl RuleSetDocument {
    fn into_ruleset(self) -> Result<RuleSet> {
        let mut config = RuleSetConfig::default();
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        RuleSet::from_entries(self.rules, config)
    }
}

/// RuleSet holds an ordered list of parsed rules.
///
/// Parsing happens once, when entries are added; queries then only run
/// the matcher. A RuleSet is immutable once built and can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct RuleSet {
    config: RuleSetConfig,
    entries: Vec<CompiledEntry>,
    skipped: usize,
}

impl RuleSet {
    /// Create an empty RuleSet.
    pub fn new(config: RuleSetConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            skipped: 0,
        }
    }

    /// Create a RuleSet from named entries.
    ///
    /// In [`ValidationMode::Strict`] the first invalid entry is returned
    /// as an error; in [`ValidationMode::Permissive`] it is logged and
    /// left out.
    pub fn from_entries<I>(entries: I, config: RuleSetConfig) -> Result<Self>
    where
        I: IntoIterator<Item = RuleEntry>,
    {
        let mut ruleset = Self::new(config);
        for entry in entries {
            ruleset.add_entry(entry)?;
        }

        log::debug!(
            "Compiled rule set {}: {} rules, {} skipped ({})",
            ruleset.config.name,
            ruleset.entries.len(),
            ruleset.skipped,
            ruleset.config.mode.name()
        );

        Ok(ruleset)
    }

    /// Parse a rule set document from YAML.
    ///
    /// ```yaml
    /// name: office
    /// mode: strict
    /// rules:
    ///   - name: Work
    ///     value: 10.0.0.10 - 10.0.0.15
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let doc: RuleSetDocument = serde_yaml::from_str(yaml)?;
        doc.into_ruleset()
    }

    /// Parse a rule set document from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: RuleSetDocument = serde_json::from_str(json)?;
        doc.into_ruleset()
    }

    /// Load a rule set document from a file.
    ///
    /// The format is chosen by extension: `.yaml`/`.yml`, `.json`, or
    /// `.txt`/`.list` for the line format of [`RuleSet::from_text_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&fs::read_to_string(path)?),
            "json" => Self::from_json_str(&fs::read_to_string(path)?),
            "txt" | "list" => {
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("default");
                Self::from_text_reader(fs::File::open(path)?, RuleSetConfig::strict(name))
            }
            _ => Err(Error::Config(format!(
                "unsupported rule file extension: {}",
                path.display()
            ))),
        }
    }

    /// Parse rules in line format from a reader.
    ///
    /// One rule per line, `#` starts a comment. A line may carry a name
    /// as `name = rule`; unnamed rules are labelled `line N`.
    ///
    /// ```text
    /// # office
    /// Work = 10.0.0.10 - 10.0.0.15
    /// 10.0.1.0/24
    /// ```
    pub fn from_text_reader<R: Read>(reader: R, config: RuleSetConfig) -> Result<Self> {
        let buf_reader = BufReader::new(reader);
        let mut entries = Vec::new();

        for (idx, line) in buf_reader.lines().enumerate() {
            let line = line?;

            // Remove comments
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => &line,
            };
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let entry = match line.split_once('=') {
                Some((name, value)) => RuleEntry::new(name.trim(), value.trim()),
                None => RuleEntry::new(format!("line {}", idx + 1), line),
            };
            entries.push(entry);
        }

        Self::from_entries(entries, config)
    }

    /// Parse and append one entry, honouring the validation mode.
    pub fn add_entry(&mut self, entry: RuleEntry) -> Result<()> {
        match parse_rule(&entry.value) {
            Ok(rule) => {
                self.entries.push(CompiledEntry {
                    name: entry.name,
                    rule,
                });
                Ok(())
            }
            Err(source) => match self.config.mode {
                ValidationMode::Strict => Err(Error::InvalidRuleConfiguration {
                    name: entry.name,
                    source,
                }),
                ValidationMode::Permissive => {
                    log::warn!(
                        "Skipping invalid rule '{}' ({:?}) in {}: {}",
                        entry.name,
                        entry.value,
                        self.config.name,
                        source
                    );
                    self.skipped += 1;
                    Ok(())
                }
            },
        }
    }

    /// Get the number of parsed rules in this set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if this rule set has no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of entries left out in permissive mode.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Get the parsed entries in order.
    pub fn entries(&self) -> &[CompiledEntry] {
        &self.entries
    }

    /// Get the configuration for this rule set.
    pub fn config(&self) -> &RuleSetConfig {
        &self.config
    }

    /// Get the first entry covering `addr`.
    pub fn matching_entry(&self, addr: &Address) -> Option<&CompiledEntry> {
        let found = self.entries.iter().find(|entry| entry.rule.matches(addr));
        if let Some(entry) = found {
            log::trace!("{} matched rule '{}' ({})", addr, entry.name, entry.rule);
        }
        found
    }

    /// Check whether `addr` is covered by any rule.
    pub fn contains_addr(&self, addr: &Address) -> bool {
        self.matching_entry(addr).is_some()
    }

    /// Check whether the address written in `query` is covered by any rule.
    pub fn contains(&self, query: &str) -> Result<bool> {
        let addr = Address::parse(query.trim())?;
        Ok(self.contains_addr(&addr))
    }
}
