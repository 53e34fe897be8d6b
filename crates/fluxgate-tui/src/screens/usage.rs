//! Usage screen -- bucketed traffic chart with drill-down.
//!
//! Layout:
//! ┌─ Usage · Nodes ── [1h  6h  24h ...] ──────────────────────────────┐
//! │  bar chart of per-bucket totals, axis labels thinned by stride    │
//! │  ■ node-a  ■ node-b  ■ node-c                                     │
//! │  total 12.3 GB · 24 buckets                                       │
//! ├─ 1-8 range  e entities  ←/→ bucket  enter details  q quit ────────┤
//! └────────────────────────────────────────────────────────────────────┘
//!
//! Selecting a bucket and pressing enter opens a centered popup with
//! the per-entity breakdown for that bucket.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, BorderType, Borders, Clear, Paragraph,
};

use fluxgate_api::UsageScope;
use fluxgate_core::{BucketRef, ViewportClass, resolve_clicked_row, tick_stride, total_usage_gb};

use crate::app::{App, SHORTCUT_LABELS};
use crate::theme;
use crate::widgets::{bytes_fmt, sub_tabs};

/// Viewport narrower than this is treated as the narrow class.
const NARROW_WIDTH: u16 = 90;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let scope_name = match app.scope {
        UsageScope::Nodes => "Nodes",
        UsageScope::Admins => "Admins",
    };
    let title = format!(" Usage · {scope_name} ");
    let block = Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::vertical([
        Constraint::Length(1), // shortcut selector
        Constraint::Min(8),    // chart
        Constraint::Length(1), // legend
        Constraint::Length(1), // summary / status
        Constraint::Length(1), // hints
    ])
    .split(inner);

    // Shortcut selector
    let tabs = sub_tabs::render_sub_tabs(&SHORTCUT_LABELS, app.shortcut_index);
    frame.render_widget(Paragraph::new(tabs), layout[0]);

    render_chart(frame, layout[1], app);
    render_legend(frame, layout[2], app);
    render_summary(frame, layout[3], app);
    render_hints(frame, layout[4]);

    if app.drill_open {
        render_drilldown(frame, area, app);
    }
}

/// Bar chart of per-bucket totals; labels thinned by the tick stride.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    if app.rows.is_empty() {
        let message = if app.loading {
            "  Loading usage data..."
        } else {
            "  No usage data for this range"
        };
        frame.render_widget(
            Paragraph::new(message).style(theme::key_hint()),
            area,
        );
        return;
    }

    let viewport = if area.width < NARROW_WIDTH {
        ViewportClass::Narrow
    } else {
        ViewportClass::Wide
    };
    let stride = tick_stride(app.rows.len(), viewport, &app.selection());

    let bars: Vec<Bar> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let label = if i % (stride + 1) == 0 {
                row.time_label.clone()
            } else {
                String::new()
            };
            // Scale GB to MB so sub-GB buckets still get visible bars.
            let value = (row.total_gb() * 1024.0).round() as u64;
            let style = if i == app.selected {
                theme::bar_selected()
            } else {
                theme::bar_default()
            };
            Bar::default()
                .value(value)
                .text_value(String::new())
                .label(Line::from(label))
                .style(style)
        })
        .collect();

    let count = u16::try_from(app.rows.len()).unwrap_or(u16::MAX).max(1);
    let bar_width = (area.width / count).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);

    frame.render_widget(chart, area);
}

/// One legend entry per entity, colored by the deterministic palette.
fn render_legend(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::with_capacity(app.entities.len() * 2 + 1);
    spans.push(Span::raw("  "));
    for entity in &app.entities {
        spans.push(Span::styled("■ ", theme::series_style(entity.color_index)));
        spans.push(Span::styled(
            format!("{}  ", entity.name),
            theme::tab_inactive(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(ref status) = app.status {
        frame.render_widget(
            Paragraph::new(format!("  {status}")).style(theme::status_error()),
            area,
        );
        return;
    }

    let mut summary = format!(
        "  total {} · {} buckets",
        bytes_fmt::fmt_gb(total_usage_gb(&app.rows)),
        app.rows.len()
    );
    if let Some(range) = &app.range {
        summary.push_str(&format!(" · {} granularity", range.granularity));
    }
    if app.loading {
        summary.push_str(" · refreshing...");
    }
    frame.render_widget(Paragraph::new(summary).style(theme::key_hint()), area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("  1-8 ", theme::key_hint_key()),
        Span::styled("range  ", theme::key_hint()),
        Span::styled("e ", theme::key_hint_key()),
        Span::styled("entities  ", theme::key_hint()),
        Span::styled("←/→ ", theme::key_hint_key()),
        Span::styled("bucket  ", theme::key_hint()),
        Span::styled("enter ", theme::key_hint_key()),
        Span::styled("details  ", theme::key_hint()),
        Span::styled("r ", theme::key_hint_key()),
        Span::styled("refresh  ", theme::key_hint()),
        Span::styled("q ", theme::key_hint_key()),
        Span::styled("quit", theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}

/// Centered per-entity breakdown popup for the selected bucket.
fn render_drilldown(frame: &mut Frame, area: Rect, app: &App) {
    let Some(bucket) = resolve_clicked_row(&app.rows, &BucketRef::Index(app.selected)) else {
        return;
    };

    let height = u16::try_from(app.entities.len().max(1)).unwrap_or(u16::MAX) + 4;
    let popup = centered_rect(area, 60, height.min(area.height));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", bucket.row.time_label))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = Vec::with_capacity(app.entities.len() + 1);
    for entity in &app.entities {
        let gb = bucket.row.usage_gb.get(&entity.name).copied().unwrap_or(0.0);
        let uplink = bucket
            .row
            .uplink_bytes
            .get(&entity.name)
            .copied()
            .unwrap_or(0);
        let downlink = bucket
            .row
            .downlink_bytes
            .get(&entity.name)
            .copied()
            .unwrap_or(0);
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<18}", entity.name),
                theme::series_style(entity.color_index),
            ),
            Span::styled(format!("{:>10}  ", bytes_fmt::fmt_gb(gb)), theme::tab_inactive()),
            Span::styled(bytes_fmt::fmt_up_down(uplink, downlink), theme::key_hint()),
        ]));
    }
    lines.push(Line::from(Span::styled(
        " ←/→ buckets · esc close",
        theme::key_hint(),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [_, middle, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(area);
    let [_, centered, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(middle);
    centered
}
