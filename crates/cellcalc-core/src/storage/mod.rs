//! Sheet persistence: the `.grd` text format and JSON snapshots.

mod json;
mod parser;
mod writer;

pub use json::{
    Snapshot, SnapshotCell, SnapshotEntry, parse_json, parse_json_content, write_json,
    write_json_content,
};
pub use parser::{parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};
