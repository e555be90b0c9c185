//! # Thumbnail Maker
//!
//! Batch-composites one base image with every image in an overlay folder,
//! producing one numbered PNG per overlay. Drop a base such as `ff1pr0.png`
//! next to the binary, put frames in `Overlays/`, run, and collect
//! `ff1pr1.png`, `ff1pr2.png`, ... from `Finished/`.
//!
//! # Pipeline
//!
//! ```text
//! Init → LocateBase → EnumerateOverlays → CompositeLoop → Done
//! ```
//!
//! Single-threaded and fail-fast: the first missing folder, empty input, or
//! unreadable image aborts the run. Outputs already written are kept.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Natural sort keys, `prefix + number` stem splitting, output names |
//! | [`scan`] | Picks the base image and lists overlays |
//! | [`imaging`] | Decode/encode backend and the alpha compositor |
//! | [`runner`] | The batch state machine and its errors and events |
//! | [`config`] | [`RunConfig`](config::RunConfig) plus optional `thumbnail-maker.toml` |
//! | [`output`] | Plain-text progress and summary lines |
//!
//! # Design Decisions
//!
//! ## Natural Order Everywhere
//!
//! Artwork frames are usually numbered without padding (`2.png`, `10.png`).
//! Both base selection and overlay order use [`naming::natural_key`], so
//! `2` comes before `10` and case does not matter.
//!
//! ## The Base Stem Drives Numbering
//!
//! Output names continue the base's trailing number: base `x5.png` with two
//! overlays yields `x6.png` and `x7.png`. A base without a trailing number
//! counts from zero (`cover.png` → `cover1.png`, ...).
//!
//! ## Canvas Is the Base
//!
//! Output always has the base's dimensions. Overlays of a different size are
//! resized to fit with Lanczos3 (on premultiplied pixels) before blending;
//! the base is never touched.
//!
//! ## PNG Out
//!
//! Inputs may be any format with a compiled-in decoder, but output is always
//! PNG: lossless and alpha-capable.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod runner;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
