//! Commit object
//!
//! A commit records a full snapshot of tracked paths (path to blob id), the
//! commit message, a timestamp and up to two parent links. The second parent
//! is only present on merge commits.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! merge-parent <second-parent-sha>
//! date <unix-seconds> <+hhmm>
//! blob <blob-sha> <path>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Tracked paths of a commit, ordered by path
pub type Snapshot = BTreeMap<PathBuf, ObjectId>;

/// Offset of the repository epoch, in seconds west of UTC
const EPOCH_OFFSET_WEST: i32 = 8 * 3600;

/// Timestamp given to the root commit: `Thu Jan 1 00:00:00 1970 -0800`
pub fn repository_epoch() -> anyhow::Result<DateTime<FixedOffset>> {
    FixedOffset::west_opt(EPOCH_OFFSET_WEST)
        .and_then(|offset| offset.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single())
        .context("Unable to build the repository epoch")
}

/// Parent links of a commit, enough for ancestry traversal
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parent: Option<ObjectId>,
    pub merge_parent: Option<ObjectId>,
}

impl SlimCommit {
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.merge_parent.iter())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// First parent (None for the root commit)
    parent: Option<ObjectId>,
    /// Second parent, merge commits only
    merge_parent: Option<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    snapshot: Snapshot,
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        snapshot: Snapshot,
        message: String,
    ) -> Self {
        Commit {
            parent,
            merge_parent,
            timestamp,
            snapshot,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn blob_at(&self, path: &Path) -> Option<&ObjectId> {
        self.snapshot.get(path)
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp as shown by `log`, e.g. "Thu Jan 1 00:00:00 1970 -0800"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn to_slim(&self) -> anyhow::Result<SlimCommit> {
        Ok(SlimCommit {
            oid: self.object_id()?,
            parent: self.parent.clone(),
            merge_parent: self.merge_parent.clone(),
        })
    }

    fn record(&self) -> String {
        let mut lines = vec![];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        if let Some(merge_parent) = &self.merge_parent {
            lines.push(format!("merge-parent {merge_parent}"));
        }
        lines.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.snapshot {
            lines.push(format!("blob {} {}", oid, path.to_string_lossy()));
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, offset) = value
        .split_once(' ')
        .context("Invalid commit object: malformed date line")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: malformed timestamp")?;

    let (sign, digits) = match (offset.strip_prefix('+'), offset.strip_prefix('-')) {
        (Some(digits), _) => (1, digits),
        (_, Some(digits)) => (-1, digits),
        _ => anyhow::bail!("Invalid commit object: malformed timezone {offset}"),
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("Invalid commit object: malformed timezone {offset}");
    }
    let hours = digits[..2].parse::<i32>()?;
    let minutes = digits[2..].parse::<i32>()?;
    let east = sign * (hours * 3600 + minutes * 60);

    FixedOffset::east_opt(east)
        .and_then(|offset| offset.timestamp_opt(seconds, 0).single())
        .context("Invalid commit object: timestamp out of range")
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        with_header(self.object_type(), self.record().as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;
        let mut lines = content.split('\n');

        let mut parent = None;
        let mut merge_parent = None;
        let mut timestamp = None;
        let mut snapshot = Snapshot::new();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            let (field, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object: malformed line '{line}'"))?;
            match field {
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "merge-parent" => merge_parent = Some(ObjectId::try_parse(value.to_string())?),
                "date" => timestamp = Some(parse_date(value)?),
                "blob" => {
                    let (oid, path) = value
                        .split_once(' ')
                        .context("Invalid commit object: malformed blob line")?;
                    snapshot.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
                }
                _ => anyhow::bail!("Invalid commit object: unknown field '{field}'"),
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;
        let message = lines.collect::<Vec<&str>>().join("\n");

        Ok(Self::new(parent, merge_parent, timestamp, snapshot, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
