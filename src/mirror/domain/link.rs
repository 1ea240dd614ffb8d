//! Identity Linker: canonical-key extraction and the per-batch link table.
//!
//! Links are resolved only through extracted keys. Titles never take part
//! in matching, so two records that merely look alike stay unlinked.

use super::{IssueKey, IssueRecord, PullRequestNumber, PullRequestRecord, TaskId, TaskRecord};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

static ISSUE_KEY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[A-Z]+-\d+").ok());

static TASK_BACK_REFERENCE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)Notion task: ([a-f0-9-]+)").ok());

static PULL_REQUEST_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/pull/(\d+)").ok());

/// Prefix of the back-reference line embedded in issue descriptions.
pub const TASK_BACK_REFERENCE_PREFIX: &str = "Synced from Notion task:";

/// Pulls the first `TEAM-123` token out of free text.
///
/// # Examples
///
///     use tasksync::mirror::domain::extract_issue_key;
///
///     let key = extract_issue_key("FOS-12 - https://tracker/issue/FOS-12");
///     assert_eq!(key.map(|k| k.to_string()).as_deref(), Some("FOS-12"));
#[must_use]
pub fn extract_issue_key(text: &str) -> Option<IssueKey> {
    let pattern = ISSUE_KEY_PATTERN.as_ref()?;
    let token = pattern.find(text)?;
    IssueKey::new(token.as_str()).ok()
}

/// Pulls the originating task identifier out of an issue description.
#[must_use]
pub fn extract_task_back_reference(description: &str) -> Option<TaskId> {
    let pattern = TASK_BACK_REFERENCE_PATTERN.as_ref()?;
    let captures = pattern.captures(description)?;
    TaskId::new(captures.get(1)?.as_str()).ok()
}

/// Renders the back-reference line for a task.
#[must_use]
pub fn back_reference_line(task_id: &TaskId) -> String {
    format!("{TASK_BACK_REFERENCE_PREFIX} {task_id}")
}

/// Pulls a pull request number out of a `.../pull/<n>` URL.
#[must_use]
pub fn extract_pull_request_number(url: &str) -> Option<PullRequestNumber> {
    let pattern = PULL_REQUEST_PATTERN.as_ref()?;
    let captures = pattern.captures(url)?;
    let value = captures.get(1)?.as_str().parse::<u64>().ok()?;
    PullRequestNumber::new(value).ok()
}

/// Stable join key shared by both sides of a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkKey {
    /// An issue short code.
    Issue(IssueKey),
    /// A task identifier.
    Task(TaskId),
    /// A pull request number.
    PullRequest(PullRequestNumber),
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue(key) => write!(f, "issue:{key}"),
            Self::Task(id) => write!(f, "task:{id}"),
            Self::PullRequest(number) => write!(f, "pull:{number}"),
        }
    }
}

/// Records that expose canonical join keys.
pub trait Linkable {
    /// Returns the keys under which this record can be found, strongest
    /// first.
    fn link_keys(&self) -> Vec<LinkKey>;
}

impl Linkable for TaskRecord {
    /// A task is known by its embedded issue cross-reference, its own id,
    /// and the number of the pull request it mirrors.
    fn link_keys(&self) -> Vec<LinkKey> {
        let mut keys = Vec::with_capacity(3);
        if let Some(key) = self.issue_key() {
            keys.push(LinkKey::Issue(key.clone()));
        }
        keys.push(LinkKey::Task(self.id().clone()));
        if let Some(number) = self.pull_request_url().and_then(extract_pull_request_number) {
            keys.push(LinkKey::PullRequest(number));
        }
        keys
    }
}

impl Linkable for IssueRecord {
    /// An issue is known by its short code and by any task back-reference
    /// in its description.
    fn link_keys(&self) -> Vec<LinkKey> {
        let mut keys = vec![LinkKey::Issue(self.key().clone())];
        if let Some(task_id) = self.description().and_then(extract_task_back_reference) {
            keys.push(LinkKey::Task(task_id));
        }
        keys
    }
}

impl Linkable for PullRequestRecord {
    fn link_keys(&self) -> Vec<LinkKey> {
        vec![LinkKey::PullRequest(self.number())]
    }
}

/// Link table built once per batch and extended as targets are created.
///
/// When several targets share a key, the first one indexed owns it; later
/// duplicates stay reachable only through their other keys.
#[derive(Debug, Clone)]
pub struct LinkIndex<T> {
    records: Vec<T>,
    by_key: HashMap<LinkKey, usize>,
}

impl<T: Linkable> LinkIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Indexes every target in one pass.
    #[must_use]
    pub fn build(targets: impl IntoIterator<Item = T>) -> Self {
        let mut index = Self::new();
        for target in targets {
            index.insert(target);
        }
        index
    }

    /// Adds a target, keeping existing owners of any shared key.
    pub fn insert(&mut self, target: T) {
        let position = self.records.len();
        for key in target.link_keys() {
            self.by_key.entry(key).or_insert(position);
        }
        self.records.push(target);
    }

    /// Resolves the first of `keys` that names an indexed target.
    #[must_use]
    pub fn resolve(&self, keys: &[LinkKey]) -> Option<&T> {
        keys.iter()
            .find_map(|key| self.by_key.get(key))
            .and_then(|position| self.records.get(*position))
    }

    /// Resolves the counterpart of a linkable source record.
    #[must_use]
    pub fn link<S: Linkable>(&self, source: &S) -> Option<&T> {
        self.resolve(&source.link_keys())
    }

    /// Returns the indexed targets in insertion order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Returns the number of indexed targets.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing is indexed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Linkable> Default for LinkIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
