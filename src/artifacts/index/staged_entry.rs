//! One pending change recorded in the staging index

use crate::artifacts::index::checksum::HashedStream;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Kind byte, oid and path length precede the path itself
const ENTRY_FIXED_SIZE: usize = 1 + 20 + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Addition,
    Removal,
}

impl StageKind {
    fn marker(self) -> u8 {
        match self {
            StageKind::Addition => b'A',
            StageKind::Removal => b'R',
        }
    }

    fn from_marker(marker: u8) -> anyhow::Result<Self> {
        match marker {
            b'A' => Ok(StageKind::Addition),
            b'R' => Ok(StageKind::Removal),
            other => Err(anyhow!("Invalid staged entry kind: {other:#04x}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedEntry {
    pub kind: StageKind,
    pub path: PathBuf,
    pub oid: ObjectId,
}

impl StagedEntry {
    pub(crate) fn serialize(&self) -> anyhow::Result<Bytes> {
        let path = self.path.to_str().context("Staged path is not valid UTF-8")?;
        let path_len = u16::try_from(path.len())
            .map_err(|_| anyhow!("Staged path is too long: {path}"))?;

        let mut bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + path.len());
        bytes.write_u8(self.kind.marker())?;
        self.oid.write_h40_to(&mut bytes)?;
        bytes.write_u16::<byteorder::NetworkEndian>(path_len)?;
        bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(bytes))
    }

    pub(crate) fn read_from(reader: &mut HashedStream<impl Read>) -> anyhow::Result<Self> {
        let fixed = reader.read_bytes(ENTRY_FIXED_SIZE)?;

        let kind = StageKind::from_marker(fixed[0])?;
        let oid = ObjectId::read_h40_from(&mut &fixed[1..21])?;
        let path_len = byteorder::NetworkEndian::read_u16(&fixed[21..23]) as usize;

        let path = reader.read_bytes(path_len)?;
        let path = String::from_utf8(path.to_vec())
            .map_err(|_| anyhow!("Staged path is not valid UTF-8"))?;

        Ok(StagedEntry::new(kind, PathBuf::from(path), oid))
    }
}
