//! Terminal setup and the event loop.
//!
//! The loop owns all dashboard state. Fetches run in spawned tasks and send
//! their result back through the event channel together with the refresh
//! permit, so aggregation and tree reconciliation only ever run on the loop.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::app::DashboardState;
use crate::error::DashboardError;
use crate::events::{AppEvent, EventHandler, handle_key};
use crate::fetch::{SnapshotFilter, SnapshotSource};
use crate::scheduler::{Phase, Scheduler, Trigger};
use crate::theme::{Theme, ThemeName};
use crate::ui;

/// Default time between periodic refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Which clusters to show.
    pub filter: SnapshotFilter,
    /// Time between periodic refreshes.
    pub refresh_interval: Duration,
    /// Color theme.
    pub theme: ThemeName,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            filter: SnapshotFilter::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            theme: ThemeName::default(),
        }
    }
}

impl DashboardOptions {
    /// Check the options before touching the terminal.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.refresh_interval.is_zero() {
            return Err(DashboardError::InvalidInterval);
        }
        Ok(())
    }
}

/// Raw mode and alternate screen, restored on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self, DashboardError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard until the user quits.
pub async fn run<S: SnapshotSource>(
    source: S,
    options: DashboardOptions,
) -> Result<(), DashboardError> {
    options.validate()?;

    let mut session = TerminalSession::enter()?;
    let events = EventHandler::new();
    events.spawn_input_reader();

    let dashboard = Dashboard::new(
        Arc::new(source),
        options.filter,
        Theme::named(options.theme),
        events.sender(),
    );

    info!(interval = ?options.refresh_interval, theme = %options.theme, "dashboard started");
    let result = event_loop(
        &mut session.terminal,
        dashboard,
        events,
        options.refresh_interval,
    )
    .await;
    info!("dashboard stopped");
    result
}

/// Dashboard state plus the machinery that refreshes it.
pub struct Dashboard<S> {
    source: Arc<S>,
    state: DashboardState,
    scheduler: Scheduler,
    theme: Theme,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl<S: SnapshotSource> Dashboard<S> {
    /// Create a dashboard that delivers refresh results to `events`.
    pub fn new(
        source: Arc<S>,
        filter: SnapshotFilter,
        theme: Theme,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            source,
            state: DashboardState::new(filter),
            scheduler: Scheduler::new(),
            theme,
            events,
        }
    }

    /// Current state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Scheduler phase.
    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Triggers dropped because a refresh was in flight.
    pub fn dropped_triggers(&self) -> u64 {
        self.scheduler.dropped_triggers()
    }

    /// Start a refresh unless one is already running.
    ///
    /// Returns whether a refresh was started.
    pub fn start_refresh(&self, trigger: Trigger) -> bool {
        let Some(permit) = self.scheduler.trigger(trigger) else {
            return false;
        };

        debug!(%trigger, "refresh started");
        let source = Arc::clone(&self.source);
        let filter = self.state.filter.clone();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = source.fetch(&filter).await;
            // If the loop is gone the permit is dropped with the event.
            if tx.send(AppEvent::Refreshed { result, permit }).is_err() {
                debug!("event loop closed, refresh result dropped");
            }
        });
        true
    }

    /// Apply one event to the state.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                if let Some(trigger) = handle_key(&mut self.state, key) {
                    self.start_refresh(trigger);
                }
            }
            AppEvent::Resize(width, height) => {
                if self.state.resize(width, height) {
                    self.start_refresh(Trigger::Resize);
                }
            }
            AppEvent::Refreshed { result, permit } => {
                let outcome = self.state.apply(result);
                debug!(?outcome, "refresh applied");
                drop(permit);
            }
        }

        if !self.state.running {
            self.scheduler.close();
        }
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), DashboardError> {
        terminal.draw(|frame| ui::draw(frame, &self.state, &self.theme))?;
        self.state.needs_redraw = false;
        Ok(())
    }
}

/// Drive the dashboard until quit or until the event channel closes.
pub async fn event_loop<B, S>(
    terminal: &mut Terminal<B>,
    mut dashboard: Dashboard<S>,
    mut events: EventHandler,
    refresh_interval: Duration,
) -> Result<(), DashboardError>
where
    B: Backend,
    S: SnapshotSource,
{
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    dashboard.start_refresh(Trigger::Startup);
    // The startup refresh replaces the interval's immediate first tick.
    ticker.reset();

    while dashboard.state.running {
        if dashboard.state.needs_redraw {
            dashboard.draw(terminal)?;
        }

        tokio::select! {
            _ = ticker.tick() => {
                dashboard.start_refresh(Trigger::Tick);
            }
            event = events.next() => match event {
                Some(event) => dashboard.handle_event(event),
                None => break,
            },
        }
    }

    Ok(())
}
