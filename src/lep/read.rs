//! Reading: a line-driven state machine over the two file sections.
//!
//! The HIERARCHY section builds the joint tree, keeping a current-parent
//! cursor that descends on JOINT and pops on `}`. Every CHANNELS line
//! appends slots to a channel table shared across the whole skeleton, in
//! declaration order. When MOTION is seen the table is frozen: column `i`
//! of every motion row from then on belongs to table slot `i`.
//!
//! Failures while decoding a row are soft: they are logged and the rest of
//! the file is still processed. Only an unopenable, empty, or non-magic
//! file aborts the read. `ReadOptions::strict` promotes the soft cases to
//! hard errors for validation use.

use cgmath::Vector3;
use std::f64::consts::PI;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::{Result, ResultExt};
use crate::lep::tokens;
use crate::lep::MAGIC;
use crate::scene::{Attr, CurveIdx, NodeIdx, RotationOrder, Scene};

pub struct ReadOptions {
    /// Fail on the first malformed line instead of logging and continuing.
    pub strict: bool,
    /// Upper bound on channels per motion row. Must be nonzero; rows wider
    /// than this are truncated with a warning.
    pub max_channels: usize,
}

impl Default for ReadOptions {
    fn default() -> ReadOptions {
        ReadOptions { strict: false, max_channels: 96 }
    }
}

/// What a read produced. The declared header values are reported but never
/// used for timing; keys are spaced one frame apart regardless.
pub struct ReadSummary {
    pub root: Option<NodeIdx>,
    pub num_joints: usize,
    pub num_channels: usize,
    /// Frames actually decoded from the motion section.
    pub num_frames: u32,
    pub declared_frames: Option<u32>,
    pub frame_time: Option<f64>,
}

/// Read an LEP file from disk into `scene`.
pub fn read_file(path: &Path, scene: &mut Scene, opts: &ReadOptions) -> Result<ReadSummary> {
    let mut f = File::open(path)
        .chain_err(|| format!("{}: could not be opened for reading", path.display()))?;
    let mut text = String::new();
    f.read_to_string(&mut text)
        .chain_err(|| format!("{}: could not be read", path.display()))?;
    read_str(&text, scene, opts)
}

/// Read LEP text into `scene`. The first line must be the magic token or
/// the whole read fails.
pub fn read_str(text: &str, scene: &mut Scene, opts: &ReadOptions) -> Result<ReadSummary> {
    if opts.max_channels == 0 {
        bail!("max_channels must be nonzero");
    }

    let mut lines = text.lines();
    let first = match lines.next() {
        Some(line) => line,
        None => bail!("file contained no lines"),
    };
    if !first.starts_with(MAGIC) {
        bail!("first line of file did not contain {}", MAGIC);
    }

    let mut ctx = ReadContext::new(scene, opts);
    for line in lines {
        ctx.line(line)?;
    }

    Ok(ReadSummary {
        root: ctx.root,
        num_joints: ctx.num_joints,
        num_channels: ctx.channels.len(),
        num_frames: ctx.frame,
        declared_frames: ctx.declared_frames,
        frame_time: ctx.frame_time,
    })
}

enum Mode {
    Hierarchy,
    Motion,
}

/// One channel-table slot: the joint whose CHANNELS line declared it, plus
/// the axis label that was declared. The label is informational only; axis
/// mapping is positional (see `bind_channels`).
struct ChannelSlot {
    joint: NodeIdx,
    label: String,
}

/// A frozen slot, bound to a concrete attribute. The curve is created on
/// frame 0 and stays `None` if that creation never happened.
struct BoundChannel {
    joint: NodeIdx,
    attr: Attr,
    curve: Option<CurveIdx>,
}

/// Everything the state machine remembers between lines.
struct ReadContext<'a> {
    scene: &'a mut Scene,
    opts: &'a ReadOptions,
    mode: Mode,
    cursor: Option<NodeIdx>,
    root: Option<NodeIdx>,
    /// Inside an end-site block; the next `}` closes it rather than popping
    /// the cursor.
    closing: bool,
    channels: Vec<ChannelSlot>,
    bound: Vec<BoundChannel>,
    frame: u32,
    num_joints: usize,
    declared_frames: Option<u32>,
    frame_time: Option<f64>,
}

impl<'a> ReadContext<'a> {
    fn new(scene: &'a mut Scene, opts: &'a ReadOptions) -> ReadContext<'a> {
        ReadContext {
            scene,
            opts,
            mode: Mode::Hierarchy,
            cursor: None,
            root: None,
            closing: false,
            channels: vec![],
            bound: vec![],
            frame: 0,
            num_joints: 0,
            declared_frames: None,
            frame_time: None,
        }
    }

    /// Log a recoverable problem, or fail on it in strict mode.
    fn soft(&self, msg: String) -> Result<()> {
        if self.opts.strict {
            bail!("{}", msg);
        }
        warn!("{}", msg);
        Ok(())
    }

    fn line(&mut self, line: &str) -> Result<()> {
        match self.mode {
            Mode::Hierarchy => self.hierarchy_line(line),
            Mode::Motion => self.motion_line(line),
        }
    }

    fn hierarchy_line(&mut self, line: &str) -> Result<()> {
        let toks = tokens::split_normalized(line);
        if toks.is_empty() {
            return Ok(());
        }
        let has = |s: &str| toks.iter().any(|t| t == s);

        if toks[0] == "ROOT" {
            let name = match toks.get(1) {
                Some(name) => name,
                None => return self.soft("ROOT line is missing a name".to_string()),
            };
            if self.root.is_some() {
                // Only one root is supported; a second ROOT takes over the
                // cursor instead of erroring.
                self.soft(format!("second ROOT {}; only one root is supported", name))?;
            }
            let joint = self.scene.add_node(name, None);
            self.root = Some(joint);
            self.cursor = Some(joint);
            self.num_joints += 1;
        } else if has("MOTION") {
            self.bind_channels()?;
            self.mode = Mode::Motion;
        } else if has("JOINT") {
            let name = toks.last().unwrap();
            let joint = self.scene.add_node(name, self.cursor);
            self.cursor = Some(joint);
            self.num_joints += 1;
        } else if has("End") {
            self.closing = true;
        } else if has("}") {
            if self.closing {
                // The end-site was never pushed as a joint, so its brace
                // must not pop the real cursor.
                self.closing = false;
            } else if let Some(cur) = self.cursor {
                self.cursor = self.scene.parent(cur);
            }
        } else if has("CHANNELS") {
            self.channels_line(&toks)?;
        } else if has("OFFSET") {
            self.offset_line(&toks)?;
        } else if has("{") {
            // Opening braces carry no information; the cursor already moved
            // when ROOT/JOINT was seen.
        } else if self.opts.strict {
            bail!("unrecognized hierarchy line: {:?}", line);
        }
        // Unrecognized lines contribute nothing in permissive mode.

        Ok(())
    }

    fn channels_line(&mut self, toks: &[String]) -> Result<()> {
        let joint = match self.cursor {
            Some(joint) => joint,
            None => return self.soft("CHANNELS before any joint".to_string()),
        };
        let count = match toks.get(1).and_then(|t| t.parse::<usize>().ok()) {
            Some(count) => count,
            None => return self.soft("CHANNELS line has no readable count".to_string()),
        };
        for i in 0..count {
            if self.channels.len() == self.opts.max_channels {
                self.soft(format!(
                    "more than {} channels declared; dropping the rest",
                    self.opts.max_channels,
                ))?;
                break;
            }
            let label = toks.get(i + 2).cloned().unwrap_or_default();
            self.channels.push(ChannelSlot { joint, label });
        }
        Ok(())
    }

    fn offset_line(&mut self, toks: &[String]) -> Result<()> {
        let joint = match self.cursor {
            Some(joint) => joint,
            None => return self.soft("OFFSET before any joint".to_string()),
        };
        let mut xyz = [0.0f64; 3];
        for i in 0..3 {
            xyz[i] = match toks.get(i + 1).and_then(|t| t.parse().ok()) {
                Some(v) => v,
                None => return self.soft("OFFSET line has fewer than 3 readable values".to_string()),
            };
        }
        let offset = Vector3::new(xyz[0], xyz[1], xyz[2]);
        let node = self.scene.node_mut(joint);
        node.rotation_order = RotationOrder::Xyz;
        // An end-site OFFSET lands on the enclosing joint, overwriting its
        // own offset (this is where the _tip naming convention comes from).
        // The tip offset is also kept separately so the skeleton's leaf
        // geometry isn't lost.
        node.translation = offset;
        if self.closing {
            node.tip_offset = Some(offset);
        }
        Ok(())
    }

    /// Freeze the channel table. Axis mapping is positional: the root's
    /// first three slots are translate X/Y/Z, and every following group of
    /// three is rotate Z/Y/X (reversed), in degrees. The declared labels
    /// are checked against that assumption but never drive the mapping.
    fn bind_channels(&mut self) -> Result<()> {
        for i in 0..self.channels.len() {
            let attr = positional_attr(i);
            let joint = self.channels[i].joint;
            if let Some(declared) = attr_for_label(&self.channels[i].label) {
                if declared != attr {
                    self.soft(format!(
                        "channel {} is declared {} but will be decoded as {}",
                        i, self.channels[i].label, attr,
                    ))?;
                }
            }
            self.scene.node_mut(joint).channels.push(attr);
            self.bound.push(BoundChannel { joint, attr, curve: None });
        }
        debug!("froze channel table with {} slots", self.bound.len());
        Ok(())
    }

    fn motion_line(&mut self, line: &str) -> Result<()> {
        let toks = tokens::split_normalized(line);

        // The two header lines are recorded for reporting but don't affect
        // key spacing: one frame is one time unit.
        if toks.iter().any(|t| t == "Frames:") {
            self.declared_frames = toks.get(1).and_then(|t| t.parse().ok());
            return Ok(());
        }
        if toks.iter().any(|t| t == "Frame") {
            self.frame_time = toks.last().and_then(|t| t.parse().ok());
            return Ok(());
        }
        if toks.is_empty() {
            return Ok(());
        }

        let values = tokens::numeric_tokens(line, self.opts.max_channels);
        if values.len() != self.bound.len() {
            self.soft(format!(
                "frame {}: row has {} values for {} channels",
                self.frame, values.len(), self.bound.len(),
            ))?;
        }

        let num_cols = values.len().min(self.bound.len());
        for i in 0..num_cols {
            let value = match values[i].parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    self.soft(format!(
                        "frame {}: column {} is not a number: {:?}",
                        self.frame, i, values[i],
                    ))?;
                    continue;
                }
            };
            let (joint, attr) = (self.bound[i].joint, self.bound[i].attr);
            let value = if attr.is_rotation() { value * PI / 180.0 } else { value };

            if self.frame == 0 && self.bound[i].curve.is_none() {
                let curve = self.scene.create_curve(joint, attr);
                self.bound[i].curve = Some(curve);
            }
            match self.bound[i].curve {
                Some(curve) => {
                    if let Err(e) = self.scene.add_key(curve, self.frame, value) {
                        self.soft(format!(
                            "frame {}: could not key {} on {}: {}",
                            self.frame, attr, self.scene.node(joint).name, e,
                        ))?;
                    }
                }
                None => {
                    self.soft(format!(
                        "frame {}: no curve for {} on {}",
                        self.frame, attr, self.scene.node(joint).name,
                    ))?;
                }
            }
        }

        self.frame += 1;
        Ok(())
    }
}

fn positional_attr(i: usize) -> Attr {
    if i < 3 {
        match i % 3 {
            0 => Attr::TranslateX,
            1 => Attr::TranslateY,
            _ => Attr::TranslateZ,
        }
    } else {
        match i % 3 {
            0 => Attr::RotateZ,
            1 => Attr::RotateY,
            _ => Attr::RotateX,
        }
    }
}

fn attr_for_label(label: &str) -> Option<Attr> {
    match label {
        "Xposition" => Some(Attr::TranslateX),
        "Yposition" => Some(Attr::TranslateY),
        "Zposition" => Some(Attr::TranslateZ),
        "Xrotation" => Some(Attr::RotateX),
        "Yrotation" => Some(Attr::RotateY),
        "Zrotation" => Some(Attr::RotateZ),
        _ => None,
    }
}
