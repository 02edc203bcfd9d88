//! Tests for the terminal presenter.
//!
//! Batches are built by hand and rendered into an in-memory writer, so the
//! escape stream can be inspected directly.

use glyphcam::camera::Frame;
use glyphcam::glyph::{Hsl, Region, Rgb};
use glyphcam::presenter::TerminalPresenter;
use glyphcam::transcoder::{DrawBatch, DrawInstruction, Presenter, Transcoder};

fn cell(x: u32, y: u32, glyph: char, lightness: f32, opacity: f32) -> DrawInstruction {
    DrawInstruction {
        x,
        y,
        glyph,
        color: Hsl::new(0.0, 0.0, lightness),
        opacity,
    }
}

fn batch(width: u32, height: u32, instructions: Vec<DrawInstruction>) -> DrawBatch {
    DrawBatch {
        width,
        height,
        cell_size: 4,
        background: Rgb::BLACK,
        instructions,
    }
}

// ==================== Layout ====================

#[test]
fn test_mirrored_row_reverses_column_order() {
    let b = batch(
        12,
        4,
        vec![cell(0, 0, 'a', 100.0, 1.0), cell(8, 0, 'c', 100.0, 1.0)],
    );

    let mut plain = TerminalPresenter::new(Vec::new(), 80, 24, false);
    let out = plain.render(&b).to_string();
    assert!(out.contains("\x1b[1;1H"));
    assert!(out.contains("\x1b[1;3H"));
    assert!(out.find('a').unwrap() < out.find('c').unwrap());

    let mut mirrored = TerminalPresenter::new(Vec::new(), 80, 24, true);
    let out = mirrored.render(&b).to_string();
    // 'a' moves to the last column, 'c' to the first; both stay upright
    assert!(out.contains("\x1b[1;3H\x1b[38;2;255;255;255ma"));
    assert!(out.contains("\x1b[1;1Hc"));
}

#[test]
fn test_viewport_change_rescales_grid() {
    // 16x8 px reads as 4:1 on 2:1 character cells
    let b = batch(16, 8, vec![cell(12, 4, 'x', 100.0, 1.0)]);
    let mut presenter = TerminalPresenter::new(Vec::new(), 2, 2, false);
    let out = presenter.render(&b).to_string();
    assert!(out.contains("\x1b[1;2H"));

    presenter.set_viewport(8, 2);
    assert_eq!(presenter.viewport(), (8, 2));
    let out = presenter.render(&b).to_string();
    assert!(out.contains("\x1b[2;4H"));
    assert!(out.contains('x'));
}

#[test]
fn test_default_capture_fits_standard_terminal() {
    // 320x240 at cell size 4 is an 80x60 grid
    let frame = Frame::solid(320, 240, [200, 200, 200, 255]);
    let batch = Transcoder::default().tick(&frame);
    assert_eq!(batch.len(), 80 * 60);

    let presenter = TerminalPresenter::new(Vec::new(), 80, 24, false);
    let layout = presenter.layout(&batch);
    assert_eq!((layout.cols, layout.rows), (64, 24));

    for instr in &batch.instructions {
        let (col, row) = presenter
            .cell_position(&batch, instr.x, instr.y)
            .unwrap_or_else(|| panic!("cell ({}, {}) not drawn", instr.x, instr.y));
        assert!(col < 64 && row < 24);
    }

    // Bottom band and disc centre both land on screen
    assert_eq!(presenter.cell_position(&batch, 316, 236), Some((63, 23)));
    assert_eq!(presenter.cell_position(&batch, 160, 120), Some((32, 12)));
    assert_eq!(Region::classify(160, 120, 320, 240), Region::Emblem);
    assert_eq!(Region::classify(0, 236, 320, 240), Region::Bottom);
}

#[test]
fn test_default_capture_draws_last_terminal_row() {
    let frame = Frame::solid(320, 240, [200, 200, 200, 255]);
    let batch = Transcoder::default().tick(&frame);
    let mut presenter = TerminalPresenter::new(Vec::new(), 80, 24, true);
    let out = presenter.render(&batch).to_string();
    assert!(out.contains("\x1b[24;1H"));
    assert!(out.contains("\x1b[24;64H"));
    assert!(!out.contains("\x1b[25;"));
    assert!(!out.contains(";65H"));
}

// ==================== Colour ====================

#[test]
fn test_colour_only_emitted_on_change() {
    let b = batch(
        12,
        4,
        vec![
            cell(0, 0, 'a', 100.0, 1.0),
            cell(4, 0, 'b', 100.0, 1.0),
            cell(8, 0, 'c', 100.0, 0.3),
        ],
    );
    let mut presenter = TerminalPresenter::new(Vec::new(), 80, 24, false);
    let out = presenter.render(&b).to_string();
    assert_eq!(out.matches("\x1b[38;2;255;255;255m").count(), 1);
    assert_eq!(out.matches("\x1b[38;2;77;77;77m").count(), 1);
}

#[test]
fn test_opacity_blends_toward_background() {
    let mut b = batch(4, 4, vec![cell(0, 0, '#', 0.0, 0.5)]);
    b.background = Rgb::new(200, 100, 0);
    let mut presenter = TerminalPresenter::new(Vec::new(), 80, 24, false);
    let out = presenter.render(&b).to_string();
    // black glyph at half opacity over (200, 100, 0)
    assert!(out.contains("\x1b[38;2;100;50;0m#"));
}

// ==================== Output ====================

#[test]
fn test_empty_batch_still_clears() {
    let mut presenter = TerminalPresenter::new(Vec::new(), 80, 24, true);
    presenter.present(&batch(0, 0, Vec::new())).unwrap();
    let out = String::from_utf8(presenter.into_inner()).unwrap();
    assert_eq!(out, "\x1b[?25l\x1b[48;2;0;0;0m\x1b[2J\x1b[0m\x1b[?25h");
}

#[test]
fn test_consecutive_batches_each_written_once() {
    let b = batch(4, 4, vec![cell(0, 0, '@', 100.0, 1.0)]);
    let mut presenter = TerminalPresenter::new(Vec::new(), 80, 24, false);
    presenter.present(&b).unwrap();
    presenter.present(&b).unwrap();
    let out = String::from_utf8(presenter.get_ref().clone()).unwrap();
    assert_eq!(out.matches("\x1b[2J").count(), 2);
    assert_eq!(out.matches('@').count(), 2);
}
