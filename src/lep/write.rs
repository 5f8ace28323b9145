//! Writing: recognized primitives only.
//!
//! The writer walks the scene (or just the active selection), matches node
//! names against a fixed set of primitive markers, and emits one creation
//! command per match. Everything else about a node is discarded, except its
//! translation when `showPositions` is on.

use std::fmt::Write;
use std::fs::File;
use std::io::Write as IoWrite;
use std::path::Path;

use crate::errors::{Result, ResultExt};
use crate::lep::WRITE_MAGIC;
use crate::scene::{NodeIdx, Scene};

/// Recognized primitive markers and the commands they map to. Matching is
/// by substring, so eg. a cube whose name contains "nurbsSphere" is written
/// out as a sphere. Markers are not mutually exclusive: every marker that
/// matches a name fires.
const PRIMITIVES: [(&str, &str); 3] = [
    ("nurbsSphere", "sphere"),
    ("nurbsCone", "cone"),
    ("nurbsCylinder", "cylinder"),
];

#[derive(Clone, Copy)]
pub enum Traversal {
    /// Every node in the scene, breadth-first.
    Everything,
    /// Only the active selection, in selection order.
    Selection,
}

#[derive(Default, Clone, Copy)]
pub struct WriteOptions {
    pub show_positions: bool,
}

/// Parse the host's `;`-separated `key=value` options string. Only
/// `showPositions` is recognized, truthy when its value parses as a
/// positive integer.
pub fn parse_options(options: &str) -> WriteOptions {
    let mut opts = WriteOptions::default();
    for pair in options.split(';') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        if key == "showPositions" {
            if let Some(value) = kv.next() {
                opts.show_positions = value.trim().parse::<i64>().map(|n| n > 0).unwrap_or(false);
            }
        }
    }
    opts
}

/// Serialize the recognized parts of `scene` into `out`.
pub fn write_scene(
    scene: &Scene,
    traversal: Traversal,
    opts: &WriteOptions,
    out: &mut String,
) -> Result<()> {
    writeln!(out, "{}", WRITE_MAGIC)?;

    let nodes: Vec<NodeIdx> = match traversal {
        Traversal::Everything => scene.breadth_first(),
        Traversal::Selection => scene.selection().to_vec(),
    };

    for idx in nodes {
        let node = scene.node(idx);
        let name = strip_namespace(&node.name);
        for &(marker, command) in &PRIMITIVES {
            if name.contains(marker) {
                writeln!(out, "{} -n {}", command, name)?;
                if opts.show_positions {
                    let t = node.translation;
                    writeln!(out, "move {} {} {}", t.x, t.y, t.z)?;
                }
            }
        }
        // Nodes matching no marker are skipped without a diagnostic.
    }

    Ok(())
}

/// Serialize straight to a file on disk.
pub fn write_file(
    path: &Path,
    scene: &Scene,
    traversal: Traversal,
    opts: &WriteOptions,
) -> Result<()> {
    let mut s = String::new();
    write_scene(scene, traversal, opts, &mut s)?;
    let mut f = File::create(path)
        .chain_err(|| format!("{}: could not be opened for writing", path.display()))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// `ns:name` -> `name`.
fn strip_namespace(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn written(scene: &Scene, traversal: Traversal, opts: &WriteOptions) -> String {
        let mut s = String::new();
        write_scene(scene, traversal, opts, &mut s).unwrap();
        s
    }

    #[test]
    fn one_sphere_with_positions() {
        let mut scene = Scene::new();
        let sphere = scene.add_node("nurbsSphere1", None);
        scene.node_mut(sphere).translation = Vector3::new(1.0, 2.0, 3.0);

        let opts = parse_options("showPositions=1");
        let out = written(&scene, Traversal::Everything, &opts);
        assert_eq!(out, "<LEP>\nsphere -n nurbsSphere1\nmove 1 2 3\n");
    }

    #[test]
    fn positions_off_by_default() {
        let mut scene = Scene::new();
        scene.add_node("nurbsCone7", None);
        let out = written(&scene, Traversal::Everything, &WriteOptions::default());
        assert_eq!(out, "<LEP>\ncone -n nurbsCone7\n");
    }

    #[test]
    fn unrecognized_nodes_are_skipped() {
        let mut scene = Scene::new();
        scene.add_node("polyCube1", None);
        scene.add_node("Hips", None);
        let out = written(&scene, Traversal::Everything, &WriteOptions::default());
        assert_eq!(out, "<LEP>\n");
    }

    #[test]
    fn every_matching_marker_fires() {
        let mut scene = Scene::new();
        scene.add_node("nurbsSphere_nurbsCylinder", None);
        let out = written(&scene, Traversal::Everything, &WriteOptions::default());
        assert_eq!(out, "\
<LEP>
sphere -n nurbsSphere_nurbsCylinder
cylinder -n nurbsSphere_nurbsCylinder
");
    }

    #[test]
    fn namespaces_are_stripped() {
        let mut scene = Scene::new();
        scene.add_node("rig:nurbsCylinder2", None);
        let out = written(&scene, Traversal::Everything, &WriteOptions::default());
        assert_eq!(out, "<LEP>\ncylinder -n nurbsCylinder2\n");
    }

    #[test]
    fn selection_mode_only_writes_the_selection() {
        let mut scene = Scene::new();
        scene.add_node("nurbsSphere1", None);
        let cone = scene.add_node("nurbsCone1", None);
        scene.select(cone);
        let out = written(&scene, Traversal::Selection, &WriteOptions::default());
        assert_eq!(out, "<LEP>\ncone -n nurbsCone1\n");
    }

    #[test]
    fn options_string_parsing() {
        assert!(parse_options("showPositions=1").show_positions);
        assert!(parse_options("showPositions=2;foo=bar").show_positions);
        assert!(!parse_options("showPositions=0").show_positions);
        assert!(!parse_options("showPositions=-1").show_positions);
        assert!(!parse_options("showPositions=yes").show_positions);
        assert!(!parse_options("showPositions").show_positions);
        assert!(!parse_options("").show_positions);
        assert!(!parse_options("foo=1").show_positions);
    }
}
