//! Translator between LEP motion-capture text (a BVH-derived format) and an
//! in-memory skeletal-animation scene.
//!
//! Reading builds a joint tree from the HIERARCHY section while recording the
//! order every animation channel was declared in, then decodes the MOTION
//! section into one keyframed curve per channel. Writing walks the scene and
//! serializes the primitives it recognizes by name.

#![recursion_limit = "1024"] // for error_chain

#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;

pub mod errors;
pub mod lep;
pub mod logger;
pub mod scene;
pub mod translator;
pub mod version;
