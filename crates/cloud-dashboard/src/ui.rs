//! UI rendering for the dashboard.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        BarChart, Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Row, Table, Tabs,
    },
};

use crate::aggregate::ClusterRef;
use crate::app::{DashboardState, Tab};
use crate::theme::Theme;

/// Compact age of a timestamp: `42s`, `5m`, `2h`, `3d`.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..60 => format!("{secs}s"),
        60..3_600 => format!("{}m", secs / 60),
        3_600..86_400 => format!("{}h", secs / 3_600),
        _ => format!("{}d", secs / 86_400),
    }
}

/// Main UI rendering function
pub fn draw(frame: &mut Frame, state: &DashboardState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, state, theme, chunks[0]);
    draw_tabs(frame, state, theme, chunks[1]);
    match state.selected_tab {
        Tab::Health => draw_health(frame, state, theme, chunks[2]),
        Tab::Versions => draw_versions(frame, state, theme, chunks[2]),
    }
    draw_footer(frame, theme, chunks[3]);
}

fn draw_header(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let health = match &state.api_health {
        Some(h) if h.is_healthy() => Span::styled(h.status.clone(), Style::default().fg(theme.ok)),
        Some(h) if h.message.is_empty() => {
            Span::styled(h.status.clone(), Style::default().fg(theme.error))
        }
        Some(h) => Span::styled(
            format!("{} ({})", h.status, h.message),
            Style::default().fg(theme.error),
        ),
        None => Span::styled("unknown", Style::default().fg(theme.muted)),
    };

    let last_update = state
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut lines = vec![Line::from(vec![
        Span::raw("API: "),
        health,
        Span::raw("  │  Version: "),
        Span::styled(
            state.api_version.clone().unwrap_or_else(|| "-".to_string()),
            Style::default().fg(theme.text),
        ),
        Span::raw("  │  Filter: "),
        Span::styled(state.filter.describe(), Style::default().fg(theme.text)),
        Span::raw("  │  Last update: "),
        Span::styled(last_update, Style::default().fg(theme.muted)),
    ])];

    if let Some(err) = &state.last_error {
        lines.push(Line::from(Span::styled(
            format!("Update Error: {err}"),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
    }

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" cloudctl dashboard ")
            .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(header, area);
}

fn draw_tabs(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(state.selected_tab.index())
        .style(Style::default().fg(theme.text))
        .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_health(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);

    draw_gauges(frame, state, theme, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_states(frame, state, theme, middle[0]);
    draw_summary(frame, state, theme, middle[1]);

    let bottom = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    draw_condition_anomalies(frame, state, theme, bottom[0]);
    draw_last_errors(frame, state, theme, bottom[1]);
}

fn draw_gauges(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let Some(gauges) = state.gauges else {
        let empty = Paragraph::new("  No cluster data yet")
            .style(Style::default().fg(theme.muted))
            .block(Block::default().borders(Borders::ALL).title(" Readiness "));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values = [
        ("API Server", gauges.api_server),
        ("Control Plane", gauges.control_plane),
        ("Nodes", gauges.nodes),
        ("System", gauges.system),
    ];
    for ((title, percent), column) in values.into_iter().zip(columns.iter()) {
        let color = if percent == 100 { theme.ok } else { theme.gauge };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
            .gauge_style(Style::default().fg(color))
            .percent(percent);
        frame.render_widget(gauge, *column);
    }
}

fn draw_states(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let c = &state.counters;
    let data = [
        ("Succeeded", c.succeeded as u64),
        ("Processing", c.processing as u64),
        ("Unhealthy", c.unhealthy as u64),
    ];
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Last Operation ")
                .title_style(Style::default().fg(theme.accent)),
        )
        .data(&data)
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.gauge))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD));
    frame.render_widget(chart, area);
}

fn draw_summary(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let c = &state.counters;
    let row = |label: &str, value: usize, color: Color| {
        Line::from(vec![
            Span::raw(format!("  {label:<14}")),
            Span::styled(value.to_string(), Style::default().fg(color)),
        ])
    };
    let lines = vec![
        row("Clusters:", c.processed, theme.text),
        row("Filtered out:", c.filtered_out, theme.muted),
        row("Succeeded:", c.succeeded, theme.ok),
        row("Processing:", c.processing, theme.warn),
        row("Unhealthy:", c.unhealthy, theme.error),
        row("Conditions:", c.condition_anomalies.len(), theme.warn),
        row("Last errors:", c.last_errors.len(), theme.error),
    ];
    let summary = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Summary ")
            .title_style(Style::default().fg(theme.accent)),
    );
    frame.render_widget(summary, area);
}

fn cluster_cells(cluster: &ClusterRef) -> [String; 3] {
    [
        cluster.name.clone(),
        cluster.tenant.clone(),
        cluster.project.clone(),
    ]
}

fn draw_condition_anomalies(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let now = Utc::now();
    let header = Row::new(vec!["Age", "Cluster", "Tenant", "Project", "Condition", "Message"])
        .style(Style::default().fg(theme.warn).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .counters
        .condition_anomalies
        .iter()
        .map(|a| {
            let [name, tenant, project] = cluster_cells(&a.cluster);
            Row::new(vec![
                format_age(a.updated, now),
                name,
                tenant,
                project,
                a.condition.clone(),
                a.message.clone(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(24),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Condition Anomalies ")
            .title_style(Style::default().fg(theme.warn)),
    );
    frame.render_widget(table, area);
}

fn draw_last_errors(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let now = Utc::now();
    let header = Row::new(vec!["Age", "Cluster", "Tenant", "Project", "Error"])
        .style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .counters
        .last_errors
        .iter()
        .map(|e| {
            let [name, tenant, project] = cluster_cells(&e.cluster);
            Row::new(vec![
                format_age(e.updated, now),
                name,
                tenant,
                project,
                e.description.clone(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Last Errors ")
            .title_style(Style::default().fg(theme.error)),
    );
    frame.render_widget(table, area);
}

fn draw_versions(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let rows = state.tree.visible_rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let marker = match (row.has_children, row.expanded) {
                (false, _) => "  ",
                (true, true) => "▾ ",
                (true, false) => "▸ ",
            };
            let indent = "  ".repeat(row.depth);
            let style = if row.depth == 0 {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{indent}{marker}{}", row.label),
                style,
            )))
        })
        .collect();

    let title = if items.is_empty() {
        " Kubernetes Versions (no clusters) "
    } else {
        " Kubernetes Versions "
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(theme.accent)),
        )
        .highlight_style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(state.tree.selected()));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_footer(frame: &mut Frame, theme: &Theme, area: Rect) {
    let help =
        "  [Tab] Switch view  [↑↓] Select  [Enter] Expand  [+/-] All  [r] Refresh  [q] Quit  ";
    let footer = Paragraph::new(Span::styled(help, Style::default().fg(theme.muted)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{ConditionAnomaly, ErrorAnomaly};
    use crate::error::FetchError;
    use crate::fetch::{Snapshot, SnapshotFilter};
    use chrono::Duration;
    use cloud_api::models::{ClusterResponse, ClusterStatus, Health, KubernetesSpec, LastOperation};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use test_case::test_case;

    fn render(state: &DashboardState) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| draw(frame, state, &Theme::default()))
            .expect("draw");
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            clusters: vec![ClusterResponse {
                id: Some("c-1".into()),
                name: Some("cluster-a".into()),
                tenant: Some("tenant-a".into()),
                project_id: Some("project-a".into()),
                kubernetes: Some(KubernetesSpec {
                    version: Some("1.24.3".into()),
                }),
                status: Some(ClusterStatus {
                    last_operation: Some(LastOperation {
                        state: Some("Succeeded".into()),
                        ..LastOperation::default()
                    }),
                    ..ClusterStatus::default()
                }),
                ..ClusterResponse::default()
            }],
            health: Health {
                status: "healthy".into(),
                message: String::new(),
            },
            version: "v1.2.3".into(),
            fetched_at: Utc::now(),
        }
    }

    #[test_case(30, "30s" ; "seconds")]
    #[test_case(5 * 60, "5m" ; "minutes")]
    #[test_case(2 * 3_600 + 59, "2h" ; "hours")]
    #[test_case(3 * 86_400, "3d" ; "days")]
    #[test_case(-10, "0s" ; "future timestamps")]
    fn ages(seconds: i64, expected: &str) {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::seconds(seconds), now), expected);
    }

    #[test]
    fn renders_before_first_refresh() {
        let state = DashboardState::new(SnapshotFilter::default());
        let text = render(&state);
        assert!(text.contains("cloudctl dashboard"));
        assert!(text.contains("No cluster data yet"));
        assert!(text.contains("all clusters"));
    }

    #[test]
    fn renders_header_and_gauges() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.apply(Ok(snapshot()));
        let text = render(&state);
        assert!(text.contains("healthy"));
        assert!(text.contains("v1.2.3"));
        assert!(text.contains("API Server"));
        assert!(text.contains("Last Operation"));
        assert!(!text.contains("Update Error"));
    }

    #[test]
    fn renders_update_error_inline() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.apply(Ok(snapshot()));
        state.apply(Err(FetchError::Source("connection refused".into())));
        let text = render(&state);
        assert!(text.contains("Update Error: connection refused"));
        assert!(text.contains("API Server"));
    }

    #[test]
    fn renders_version_tree() {
        let mut state = DashboardState::new(SnapshotFilter::default());
        state.apply(Ok(snapshot()));
        state.select_tab(Tab::Versions);
        state.tree.set_all_expanded(true);
        let text = render(&state);
        assert!(text.contains("1.24 (1)"));
        assert!(text.contains("1.24.3 (1)"));
        assert!(text.contains("cluster-a (c-1)"));
    }

    fn position(text: &str, needle: &str) -> usize {
        text.find(needle).expect("anomaly should be rendered")
    }

    #[test]
    fn anomalies_render_oldest_first() {
        let now = Utc::now();
        let cluster = ClusterRef {
            id: "c-1".into(),
            name: "cluster-a".into(),
            tenant: "tenant-a".into(),
            project: "project-a".into(),
        };
        let error = |description: &str, hours: i64| ErrorAnomaly {
            cluster: cluster.clone(),
            description: description.into(),
            updated: now - Duration::hours(hours),
        };
        let condition = |message: &str, hours: i64| ConditionAnomaly {
            cluster: cluster.clone(),
            condition: "EveryNodeReady".into(),
            message: message.into(),
            updated: now - Duration::hours(hours),
        };

        let mut state = DashboardState::new(SnapshotFilter::default());
        state.apply(Ok(snapshot()));
        state.counters.last_errors = vec![
            error("oldest-error", 5),
            error("tied-error-one", 3),
            error("tied-error-two", 3),
            error("newest-error", 1),
        ];
        state.counters.condition_anomalies = vec![
            condition("oldest-condition", 5),
            condition("tied-condition-one", 3),
            condition("tied-condition-two", 3),
            condition("newest-condition", 1),
        ];
        let text = render(&state);

        for kind in ["error", "condition"] {
            let oldest = position(&text, &format!("oldest-{kind}"));
            let tied_one = position(&text, &format!("tied-{kind}-one"));
            let tied_two = position(&text, &format!("tied-{kind}-two"));
            let newest = position(&text, &format!("newest-{kind}"));
            assert!(oldest < tied_one, "{kind}: oldest must render above the tie");
            assert!(tied_one < tied_two, "{kind}: ties must keep fetch order");
            assert!(tied_two < newest, "{kind}: newest must render last");
        }
    }
}
