//! glyphcam library crate.
//!
//! Converts live video frames into a grid of coloured glyphs whose opacity
//! follows motion. The core ([`glyph`], [`transcoder`]) is pure and
//! single-threaded; [`camera`], [`presenter`] and [`event_loop`] connect it to
//! a webcam and a terminal.

pub mod camera;
pub mod cli;
pub mod config;
pub mod event_loop;
pub mod glyph;
pub mod presenter;
pub mod transcoder;
