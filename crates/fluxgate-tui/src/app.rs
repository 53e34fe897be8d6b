//! Application state and key handling for the usage dashboard.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use fluxgate_api::UsageScope;
use fluxgate_core::{
    BucketRef, ChartRow, Entity, QueryRange, RangeSelection, Shortcut, navigate,
    resolve_clicked_row,
};

use crate::fetch::FetchOutcome;

/// Shortcut tabs in display order; index 2 ("24h") is the default.
pub const SHORTCUT_TABS: [Shortcut; 8] = [
    Shortcut::OneHour,
    Shortcut::SixHours,
    Shortcut::OneDay,
    Shortcut::ThreeDays,
    Shortcut::OneWeek,
    Shortcut::TwoWeeks,
    Shortcut::OneMonth,
    Shortcut::All,
];

pub const SHORTCUT_LABELS: [&str; 8] = ["1h", "6h", "24h", "3d", "1w", "2w", "1m", "all"];

const DEFAULT_SHORTCUT_INDEX: usize = 2;

pub struct App {
    pub scope: UsageScope,
    pub shortcut_index: usize,
    pub entities: Vec<Entity>,
    pub rows: Vec<ChartRow>,
    pub range: Option<QueryRange>,
    /// Currently highlighted bucket index.
    pub selected: usize,
    pub drill_open: bool,
    pub status: Option<String>,
    pub loading: bool,
    pub should_quit: bool,
    generation: u64,
    fetch_requested: bool,
}

impl App {
    pub fn new(default_shortcut: Option<Shortcut>) -> Self {
        let shortcut_index = default_shortcut
            .and_then(|s| SHORTCUT_TABS.iter().position(|t| *t == s))
            .unwrap_or(DEFAULT_SHORTCUT_INDEX);
        Self {
            scope: UsageScope::Nodes,
            shortcut_index,
            entities: Vec::new(),
            rows: Vec::new(),
            range: None,
            selected: 0,
            drill_open: false,
            status: None,
            loading: false,
            should_quit: false,
            generation: 0,
            fetch_requested: true,
        }
    }

    /// The current range selection.
    pub fn selection(&self) -> RangeSelection {
        RangeSelection::Shortcut(SHORTCUT_TABS[self.shortcut_index.min(SHORTCUT_TABS.len() - 1)])
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.drill_open {
                    self.drill_open = false;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char(c @ '1'..='8') => {
                let index = usize::from(u8::try_from(c).unwrap_or(b'1') - b'1');
                if index != self.shortcut_index {
                    self.shortcut_index = index;
                    self.on_selection_changed();
                }
            }
            KeyCode::Char('e') | KeyCode::Tab => {
                self.scope = match self.scope {
                    UsageScope::Nodes => UsageScope::Admins,
                    UsageScope::Admins => UsageScope::Nodes,
                };
                self.on_selection_changed();
            }
            KeyCode::Char('r') => self.request_fetch(),
            KeyCode::Left => self.step_selection(-1),
            KeyCode::Right => self.step_selection(1),
            KeyCode::Enter => {
                // Buckets with zero usage never open a detail view.
                if resolve_clicked_row(&self.rows, &BucketRef::Index(self.selected)).is_some() {
                    self.drill_open = true;
                }
            }
            _ => {}
        }
    }

    fn step_selection(&mut self, delta: isize) {
        if let Some(bucket) = navigate(&self.rows, self.selected, delta) {
            self.selected = bucket.index;
            // Stepping onto an all-zero bucket closes the detail view.
            if self.drill_open && bucket.row.is_all_zero() {
                self.drill_open = false;
            }
        }
    }

    fn on_selection_changed(&mut self) {
        self.selected = 0;
        self.drill_open = false;
        self.request_fetch();
    }

    fn request_fetch(&mut self) {
        self.fetch_requested = true;
    }

    // ── Fetch plumbing ───────────────────────────────────────────────

    /// Consume a pending fetch request, bumping the generation so any
    /// in-flight result becomes stale.
    pub fn take_fetch_request(&mut self) -> Option<(u64, UsageScope, RangeSelection)> {
        if !self.fetch_requested {
            return None;
        }
        self.fetch_requested = false;
        self.generation += 1;
        self.loading = true;
        Some((self.generation, self.scope, self.selection()))
    }

    /// Apply a fetch outcome, discarding anything stale.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.generation() != self.generation {
            debug!(
                stale = outcome.generation(),
                current = self.generation,
                "discarding stale usage response"
            );
            return;
        }
        self.loading = false;
        match outcome {
            FetchOutcome::Usage {
                range,
                entities,
                rows,
                ..
            } => {
                self.range = Some(range);
                self.entities = entities;
                self.selected = self.selected.min(rows.len().saturating_sub(1));
                self.rows = rows;
                self.status = None;
            }
            FetchOutcome::Failed { message, .. } => {
                self.status = Some(message);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyModifiers;
    use fluxgate_core::Granularity;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn row(h: u32, gb: f64) -> ChartRow {
        let mut usage_gb = IndexMap::new();
        usage_gb.insert("NodeA".to_owned(), gb);
        ChartRow {
            period_start: Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap(),
            time_label: format!("{h:02}:00"),
            usage_gb,
            uplink_bytes: IndexMap::new(),
            downlink_bytes: IndexMap::new(),
        }
    }

    fn outcome(generation: u64, rows: Vec<ChartRow>) -> FetchOutcome {
        FetchOutcome::Usage {
            generation,
            range: QueryRange {
                start: None,
                end: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                granularity: Granularity::Hour,
            },
            entities: Vec::new(),
            rows,
        }
    }

    #[test]
    fn startup_requests_an_initial_fetch() {
        let mut app = App::new(None);
        let (generation, scope, selection) = app.take_fetch_request().unwrap();
        assert_eq!(generation, 1);
        assert_eq!(scope, UsageScope::Nodes);
        assert_eq!(selection, RangeSelection::Shortcut(Shortcut::OneDay));
        assert!(app.take_fetch_request().is_none());
    }

    #[test]
    fn shortcut_key_changes_selection_and_refetches() {
        let mut app = App::new(None);
        app.take_fetch_request().unwrap();

        app.handle_key(key(KeyCode::Char('5')));

        assert_eq!(app.selection(), RangeSelection::Shortcut(Shortcut::OneWeek));
        assert!(app.take_fetch_request().is_some());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut app = App::new(None);
        let (first_generation, ..) = app.take_fetch_request().unwrap();

        // A newer selection supersedes the in-flight fetch.
        app.handle_key(key(KeyCode::Char('4')));
        app.take_fetch_request().unwrap();

        app.apply(outcome(first_generation, vec![row(0, 1.0)]));
        assert!(app.rows.is_empty());
    }

    #[test]
    fn current_generation_response_is_applied() {
        let mut app = App::new(None);
        let (generation, ..) = app.take_fetch_request().unwrap();

        app.apply(outcome(generation, vec![row(0, 1.0), row(1, 2.0)]));

        assert_eq!(app.rows.len(), 2);
        assert!(!app.loading);
    }

    #[test]
    fn bucket_navigation_clamps_at_the_ends() {
        let mut app = App::new(None);
        let (generation, ..) = app.take_fetch_request().unwrap();
        app.apply(outcome(generation, vec![row(0, 1.0), row(1, 2.0)]));

        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.selected, 0);

        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn enter_on_zero_bucket_does_not_open_drilldown() {
        let mut app = App::new(None);
        let (generation, ..) = app.take_fetch_request().unwrap();
        app.apply(outcome(generation, vec![row(0, 0.0)]));

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.drill_open);
    }

    #[test]
    fn enter_opens_and_esc_closes_drilldown() {
        let mut app = App::new(None);
        let (generation, ..) = app.take_fetch_request().unwrap();
        app.apply(outcome(generation, vec![row(0, 1.5)]));

        app.handle_key(key(KeyCode::Enter));
        assert!(app.drill_open);

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.drill_open);
        assert!(!app.should_quit);
    }
}
