//! The LEP file format.
//!
//! An LEP file is line-oriented text. The first line must be the magic
//! token. A HIERARCHY section (ROOT/JOINT/OFFSET/CHANNELS/End/`}` records)
//! describes the joint tree, then a line containing MOTION switches to the
//! motion section: two header lines followed by one row of floats per
//! frame, one column per channel declared in the hierarchy.

pub mod read;
pub mod tokens;
pub mod write;

pub use self::read::{read_file, read_str, ReadOptions, ReadSummary};
pub use self::write::{parse_options, write_scene, Traversal, WriteOptions};

/// Magic token a readable file must start with.
pub const MAGIC: &str = "HIERARCHY";

/// Magic line the writer emits.
pub const WRITE_MAGIC: &str = "<LEP>";

/// Extension reported to the host's save dialogs. No period.
pub const DEFAULT_EXTENSION: &str = "bvh";

/// Content-sniffing gate: does this buffer start with our magic token?
///
/// Used both when the host asks whether a candidate file is ours and as the
/// reader's own first-line check.
pub fn is_lep(buffer: &[u8]) -> bool {
    buffer.len() >= MAGIC.len() && &buffer[..MAGIC.len()] == MAGIC.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::is_lep;

    #[test]
    fn gate() {
        assert!(is_lep(b"HIERARCHY\nROOT Hips\n"));
        assert!(is_lep(b"HIERARCHY"));
        assert!(!is_lep(b"HIERARCH"));
        assert!(!is_lep(b""));
        assert!(!is_lep(b"<LEP>\nsphere -n nurbsSphere1\n"));
    }
}
