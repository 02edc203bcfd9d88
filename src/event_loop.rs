//! Async host loop driving the transcoder.
//!
//! Ticks the [`Transcoder`] at the display rate and reacts to terminal events.
//! Only one tick is ever in flight: a slow tick delays the next one instead of
//! queueing or skipping ticks.

use std::io::Write;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::time::MissedTickBehavior;

use crate::camera::FrameSource;
use crate::presenter::TerminalPresenter;
use crate::transcoder::{TickError, TickOutcome, Transcoder};

/// What a key press asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    None,
}

/// Map a key event to a loop action. `q`, `Esc` and `Ctrl-C` quit.
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

/// Interval between ticks for a display rate.
pub fn tick_period(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / fps.max(1) as u64)
}

/// Run until the user quits or capture fails.
///
/// A capture failure ends the loop and is returned to the caller, which is
/// expected to report it once. It is never retried here.
pub async fn run<W: Write>(
    transcoder: &mut Transcoder,
    source: &mut dyn FrameSource,
    presenter: &mut TerminalPresenter<W>,
    fps: u32,
) -> Result<(), TickError> {
    let mut events = EventStream::new();

    let mut ticker = tokio::time::interval(tick_period(fps));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!("Render loop started at {} fps", fps);

    loop {
        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if handle_key_event(key) == KeyAction::Quit {
                            log::info!("Quit requested");
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(cols, rows))) => {
                        log::info!("Terminal resized to {}x{}", cols, rows);
                        presenter.set_viewport(cols, rows);
                        transcoder.handle_resize();
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("Terminal event error: {}", e);
                    }
                    None => break,
                }
            }

            _ = ticker.tick() => {
                match transcoder.run_tick(source, presenter) {
                    Ok(TickOutcome::NoFrame) => log::trace!("No frame available yet"),
                    Ok(TickOutcome::Presented { .. }) => {}
                    Err(e) => {
                        log::error!("Render loop stopped: {}", e);
                        return Err(e);
                    }
                }
            }
        }
    }

    log::info!("Render loop finished after {} ticks", transcoder.ticks());
    Ok(())
}
