//! Stored object types
//!
//! Two kinds of immutable objects live in the store, each identified by the
//! SHA-1 of its serialized form:
//!
//! - **Blob**: raw file content
//! - **Commit**: message, timestamp, parent links and a path-to-blob snapshot
//!
//! Serialized form: `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
