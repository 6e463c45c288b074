//! Event handling for the dashboard.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{DashboardState, Tab};
use crate::error::FetchError;
use crate::fetch::Snapshot;
use crate::scheduler::{RefreshPermit, Trigger};

/// How long the input reader blocks before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(250);

/// Events consumed by the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// A refresh finished. The permit is released once the result is applied.
    Refreshed {
        /// Fetched snapshot or the failure.
        result: Result<Snapshot, FetchError>,
        /// Guard of the finished refresh.
        permit: RefreshPermit,
    },
}

/// Channel that feeds the event loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// A channel without any producer attached.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Forward terminal input into the channel from a blocking thread.
    ///
    /// The thread exits once the receiving side is gone.
    pub fn spawn_input_reader(&self) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            while !tx.is_closed() {
                match event::poll(INPUT_POLL) {
                    Ok(false) => {}
                    Ok(true) => {
                        let forwarded = match event::read() {
                            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                                tx.send(AppEvent::Key(key))
                            }
                            Ok(Event::Resize(w, h)) => tx.send(AppEvent::Resize(w, h)),
                            Ok(_) => Ok(()),
                            Err(err) => {
                                debug!(error = %err, "terminal read failed");
                                return;
                            }
                        };
                        if forwarded.is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "terminal poll failed");
                        return;
                    }
                }
            }
        });
    }

    /// Next event. `None` when every sender is gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Sender for producers such as refresh tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}

/// Handle keyboard input.
///
/// Returns a trigger when the key asks for a refresh.
pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Option<Trigger> {
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => state.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => state.quit(),
        KeyCode::Tab | KeyCode::Right => state.next_tab(),
        KeyCode::BackTab | KeyCode::Left => state.prev_tab(),
        KeyCode::Char('1') => state.select_tab(Tab::Health),
        KeyCode::Char('2') => state.select_tab(Tab::Versions),
        KeyCode::Char('r') => return Some(Trigger::Manual),
        KeyCode::Up | KeyCode::Char('k') if state.selected_tab == Tab::Versions => {
            state.tree.select_prev();
            state.needs_redraw = true;
        }
        KeyCode::Down | KeyCode::Char('j') if state.selected_tab == Tab::Versions => {
            state.tree.select_next();
            state.needs_redraw = true;
        }
        KeyCode::Enter | KeyCode::Char(' ') if state.selected_tab == Tab::Versions => {
            state.tree.toggle_selected();
            state.needs_redraw = true;
        }
        KeyCode::Char('+') if state.selected_tab == Tab::Versions => {
            state.tree.set_all_expanded(true);
            state.needs_redraw = true;
        }
        KeyCode::Char('-') if state.selected_tab == Tab::Versions => {
            state.tree.set_all_expanded(false);
            state.needs_redraw = true;
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::SnapshotFilter;
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test_case(KeyCode::Char('q') ; "q")]
    #[test_case(KeyCode::Char('Q') ; "shift q")]
    #[test_case(KeyCode::Esc ; "escape")]
    fn quit_keys(code: KeyCode) {
        let mut state = DashboardState::new(SnapshotFilter::default());
        handle_key(&mut state, key(code));
        assert!(!state.running);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!state.running);
    }

    #[test]
    fn plain_c_does_not_quit() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        handle_key(&mut state, key(KeyCode::Char('c')));
        assert!(state.running);
    }

    #[test]
    fn r_requests_manual_refresh() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('r'))), Some(Trigger::Manual));
        assert_eq!(handle_key(&mut state, key(KeyCode::Tab)), None);
    }

    #[test]
    fn number_keys_select_tabs() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        handle_key(&mut state, key(KeyCode::Char('2')));
        assert_eq!(state.selected_tab, Tab::Versions);
        handle_key(&mut state, key(KeyCode::Char('1')));
        assert_eq!(state.selected_tab, Tab::Health);
    }

    #[tokio::test]
    async fn sender_feeds_the_loop() {
        let mut events = EventHandler::new();
        events.sender().send(AppEvent::Resize(100, 30)).expect("open");
        assert!(matches!(events.next().await, Some(AppEvent::Resize(100, 30))));
    }
}
