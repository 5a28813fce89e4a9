//! Staging index file format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "STAG" (4 bytes)
//!   - Version: 1 (4 bytes, big endian)
//!   - Entry count (4 bytes, big endian)
//!
//! Entries (variable length):
//!   - Kind: 'A' (addition) or 'R' (removal) (1 byte)
//!   - Object id (20 raw bytes)
//!   - Path length (2 bytes, big endian)
//!   - Path (UTF-8)
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod index_header;
pub mod staged_entry;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// 4 bytes for the signature, 4 for the version, 4 for the entry count
pub const HEADER_SIZE: usize = 12;

pub const SIGNATURE: &str = "STAG";

pub const VERSION: u32 = 1;
