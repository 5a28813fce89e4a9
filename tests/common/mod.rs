#![allow(dead_code)]

pub mod command;
pub mod file;

/// Text of a file under `dir`
pub fn read_file(dir: &std::path::Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name))
        .unwrap_or_else(|e| panic!("Failed to read file {name:?}: {e}"))
}
