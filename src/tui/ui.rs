use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs,
};

use crate::analytics::timeline::{self, TimelineLayout};
use crate::analytics::tax_credit;
use crate::models::{Project, Stage};
use crate::tui::state::{Mode, TimelineStyle, View, ViewModel};
use crate::tui::theme;

const LABEL_WIDTH: usize = 12;
const DATE_FORMAT: &str = "%b %d, %Y";

pub fn draw(frame: &mut Frame, vm: &ViewModel) {
    // Fill the entire background
    let bg_block = Block::default().style(Style::default().bg(theme::BG));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, vm, chunks[0]);
    match vm.view {
        View::Dashboard => draw_dashboard(frame, vm, chunks[1]),
        View::Projects => draw_projects(frame, vm, chunks[1]),
        View::Timeline => draw_timeline(frame, vm, chunks[1]),
    }
    draw_footer(frame, vm, chunks[2]);

    match vm.mode {
        Mode::Normal => {}
        Mode::Detail => {
            if let Some(project) = vm.selected_project() {
                draw_detail(frame, vm, project);
            }
        }
        Mode::Help => draw_help(frame),
        Mode::ConfirmClear => draw_confirm_clear(frame, vm),
    }
}

fn panel<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let title_fg = if focused { theme::NEON_CYAN } else { theme::BORDER_DIM };
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(Span::styled(
            title,
            Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::BG))
}

fn draw_header(frame: &mut Frame, vm: &ViewModel, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(area);

    let art = Paragraph::new(Line::from(Span::styled(
        format!("  {} ", theme::HEADER_ART),
        Style::default()
            .fg(theme::NEON_CYAN)
            .add_modifier(Modifier::BOLD),
    )))
    .block(panel("", false));
    frame.render_widget(art, chunks[0]);

    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| Line::from(format!("{} {}", i + 1, v.title())))
        .collect();
    let selected = View::ALL.iter().position(|v| *v == vm.view).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(theme::NEON_MAGENTA)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", Style::default().fg(theme::BORDER_DIM)))
        .block(panel("", false));
    frame.render_widget(tabs, chunks[1]);
}

fn draw_footer(frame: &mut Frame, vm: &ViewModel, area: Rect) {
    let hints = match vm.view {
        View::Dashboard => "  Tab: Switch view  s: Seed demo  C: Clear all  ?: Help  q: Quit",
        View::Projects => "  j/k: Select  Enter: Details  x: Delete  s: Seed  C: Clear all  q: Quit",
        View::Timeline => "  h/l: Page  v: Gantt/List  s: Seed demo  C: Clear all  ?: Help  q: Quit",
    };
    let mut spans = vec![Span::styled(hints, Style::default().fg(theme::TEXT_DIM))];
    if let Some(notice) = &vm.notice {
        spans.push(Span::styled("  │ ", Style::default().fg(theme::BORDER_DIM)));
        spans.push(Span::styled(
            notice.as_str(),
            Style::default().fg(theme::NEON_ORANGE),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(panel(" Help ", false));
    frame.render_widget(footer, area);
}

// ── Dashboard ──────────────────────────────────────────────────────

fn draw_dashboard(frame: &mut Frame, vm: &ViewModel, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let stats = &vm.stats;
    let cards = [
        ("Total Projects", stats.total_projects.to_string()),
        ("Active", stats.active_projects.to_string()),
        ("Total Budget", money(stats.total_budget)),
        ("Actual Spend", money(stats.total_actual_spend)),
        ("Avg R&D", format!("{:.1}%", stats.avg_rd_percentage)),
        ("Tax Credit", money(vm.total_credit)),
    ];
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, cards.len() as u32); 6])
        .split(rows[0]);
    for ((title, value), card_area) in cards.iter().zip(card_areas.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.as_str(),
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        )))
        .block(panel(title, false));
        frame.render_widget(card, *card_area);
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let bars: Vec<Bar> = Stage::ALL
        .iter()
        .map(|stage| {
            let count = stats.stage_distribution.get(stage).copied().unwrap_or(0);
            Bar::default()
                .value(count as u64)
                .label(Line::from(stage_short(*stage)))
                .style(Style::default().fg(theme::stage_color(*stage)))
                .value_style(
                    Style::default()
                        .fg(theme::BG)
                        .bg(theme::stage_color(*stage)),
                )
        })
        .collect();
    let chart = BarChart::default()
        .block(panel(" Stage Distribution ", true))
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2);
    frame.render_widget(chart, body[0]);

    let budget_rows: Vec<Row> = vm
        .budget
        .iter()
        .map(|b| {
            Row::new(vec![
                Cell::from(b.stage.as_str()).style(theme::stage_style(b.stage)),
                Cell::from(money(b.total_forecast)),
                Cell::from(money(b.total_actual)),
                Cell::from(b.count.to_string()),
            ])
        })
        .collect();
    let budget = Table::new(
        budget_rows,
        [
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(5),
        ],
    )
    .header(header_row(&["Stage", "Forecast", "Actual", "#"]))
    .block(panel(" Budget by Stage ", false));
    frame.render_widget(budget, body[1]);
}

fn stage_short(stage: Stage) -> &'static str {
    match stage {
        Stage::Design => "Design",
        Stage::InProgress => "Active",
        Stage::Validation => "Valid.",
        Stage::RdPrototype => "R&D",
        Stage::Completed => "Done",
        Stage::OnHold => "Hold",
    }
}

fn header_row<'a>(titles: &[&'a str]) -> Row<'a> {
    Row::new(titles.iter().map(|t| Cell::from(*t)).collect::<Vec<_>>()).style(
        Style::default()
            .fg(theme::NEON_CYAN)
            .add_modifier(Modifier::BOLD),
    )
}

// ── Projects ───────────────────────────────────────────────────────

fn draw_projects(frame: &mut Frame, vm: &ViewModel, area: Rect) {
    let rows: Vec<Row> = vm
        .projects
        .iter()
        .map(|p| {
            let pct = timeline::progress(p.start_date, p.end_date, vm.now);
            let mut name = Span::raw(p.name.as_str());
            if p.is_overdue(vm.now) {
                name = Span::styled(format!("{} {}", theme::OVERDUE_SYMBOL, p.name), theme::overdue_style());
            }
            Row::new(vec![
                Cell::from(p.project_id.as_str()),
                Cell::from(name),
                Cell::from(format!("{} {}", theme::stage_symbol(p.stage), p.stage))
                    .style(theme::stage_style(p.stage)),
                Cell::from(p.start_date.format(DATE_FORMAT).to_string()),
                Cell::from(p.end_date.format(DATE_FORMAT).to_string()),
                Cell::from(format!(
                    "{} {pct:>3}%",
                    theme::progress_bar(usize::from(pct), 100, 10)
                )),
                Cell::from(money(p.actual_spend)),
            ])
        })
        .collect();

    let title = format!(" Projects ({}) ", vm.projects.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(16),
            Constraint::Length(13),
        ],
    )
    .header(header_row(&[
        "ID", "Name", "Stage", "Start", "End", "Progress", "Actual",
    ]))
    .highlight_style(
        Style::default()
            .fg(theme::TEXT_BRIGHT)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    )
    .highlight_symbol("▸ ")
    .block(panel(&title, true));

    let mut state = TableState::default().with_selected(vm.selected_project().map(|_| vm.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_detail(frame: &mut Frame, vm: &ViewModel, project: &Project) {
    let area = centered(frame.area(), 64, 18);
    frame.render_widget(Clear, area);

    let label = |text: &'static str| {
        Span::styled(format!("{text:<18}"), Style::default().fg(theme::TEXT_DIM))
    };
    let value = |text: String| Span::styled(text, Style::default().fg(theme::TEXT_BRIGHT));

    let credit = tax_credit(project.actual_spend, i64::from(project.eligible_rd));
    let mut lines = vec![
        Line::from(vec![label("Project"), value(project.project_id.clone())]),
        Line::from(vec![label("Name"), value(project.name.clone())]),
        Line::from(vec![
            label("Stage"),
            Span::styled(project.stage.as_str(), theme::stage_style(project.stage)),
        ]),
        Line::from(vec![
            label("Schedule"),
            value(format!(
                "{} → {} ({} days)",
                project.start_date.format(DATE_FORMAT),
                project.end_date.format(DATE_FORMAT),
                project.duration_days()
            )),
        ]),
        Line::from(vec![
            label("Completion"),
            value(format!("{:.1}%", project.completion_percentage(vm.now))),
        ]),
        Line::from(vec![
            label("Resources"),
            value(format!("{:.1} FTE", project.resource_allocated)),
        ]),
        Line::from(vec![
            label("PPA target"),
            value(format!(
                "{} / {} / {}",
                project.ppa_target.performance, project.ppa_target.power, project.ppa_target.area
            )),
        ]),
        Line::from(vec![label("Eligible R&D"), value(format!("{}%", project.eligible_rd))]),
        Line::from(vec![label("Forecast spend"), value(money(project.forecast_spend))]),
        Line::from(vec![label("Actual spend"), value(money(project.actual_spend))]),
        Line::from(vec![label("Tax credit (20%)"), value(money(credit))]),
    ];
    if project.is_overdue(vm.now) {
        lines.push(Line::from(Span::styled(
            format!("{} Past end date", theme::OVERDUE_SYMBOL),
            theme::overdue_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(panel(" Project Detail ", true)), area);
}

// ── Timeline ───────────────────────────────────────────────────────

fn draw_timeline(frame: &mut Frame, vm: &ViewModel, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = timeline::summarize(&vm.projects, vm.now);
    let figures = [
        ("Total", summary.total.to_string()),
        ("In Progress", summary.in_progress.to_string()),
        ("Completed", summary.completed.to_string()),
        ("Upcoming", summary.upcoming.to_string()),
        ("On Track", summary.on_track.to_string()),
        ("Overdue", summary.overdue.to_string()),
        ("Avg Progress", format!("{:.0}%", summary.average_progress)),
    ];
    let spans: Vec<Span> = figures
        .iter()
        .flat_map(|(k, v)| {
            [
                Span::styled(format!(" {k}: "), Style::default().fg(theme::TEXT_DIM)),
                Span::styled(
                    v.clone(),
                    Style::default()
                        .fg(theme::TEXT_BRIGHT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(" Schedule ", false)),
        rows[0],
    );

    let page = vm.timeline_page();
    let layout = timeline::layout(page.items, vm.now);
    let track = (rows[1].width as usize).saturating_sub(LABEL_WIDTH + 9).max(10);

    let title = if page.total == 0 {
        " Timeline (no projects) ".to_string()
    } else {
        let first = (page.page - 1) * page.per_page + 1;
        let last = first + page.items.len().saturating_sub(1);
        format!(
            " Timeline {first}-{last} of {} · page {}/{} ",
            page.total, page.page, page.page_count
        )
    };
    match vm.timeline_style {
        TimelineStyle::Gantt => frame.render_widget(
            Paragraph::new(gantt_lines(&layout, track)).block(panel(&title, true)),
            rows[1],
        ),
        TimelineStyle::List => frame.render_widget(
            timeline_table(&layout).block(panel(&title, true)),
            rows[1],
        ),
    }
}

/// The same page as the Gantt chart, one row per bar.
fn timeline_table<'a>(layout: &TimelineLayout) -> Table<'a> {
    let rows: Vec<Row> = layout
        .bars
        .iter()
        .map(|bar| {
            let status = if bar.overdue {
                Span::styled(format!("{} Overdue", theme::OVERDUE_SYMBOL), theme::overdue_style())
            } else {
                Span::styled("On schedule", Style::default().fg(theme::TEXT_DIM))
            };
            Row::new(vec![
                Cell::from(bar.project_id.clone()),
                Cell::from(bar.name.clone()),
                Cell::from(Span::styled(
                    format!("{} {}", theme::stage_symbol(bar.stage), bar.stage.as_str()),
                    theme::stage_style(bar.stage),
                )),
                Cell::from(bar.start_date.format(DATE_FORMAT).to_string()),
                Cell::from(bar.end_date.format(DATE_FORMAT).to_string()),
                Cell::from(format!("{:>4}", bar.span_days)),
                Cell::from(format!(
                    "{} {:>3}%",
                    theme::progress_bar(usize::from(bar.progress), 100, 10),
                    bar.progress
                )),
                Cell::from(status),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(5),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&[
        "ID", "Name", "Stage", "Start", "End", "Days", "Progress", "Status",
    ]))
}

/// Column range `(start, len)` a fractional span occupies on a track of
/// `track` cells. Spans with positive width always get at least one cell.
fn bar_cells(left: f64, width: f64, track: usize) -> (usize, usize) {
    let start = ((left * track as f64).round() as usize).min(track.saturating_sub(1));
    let mut len = (width * track as f64).round() as usize;
    if width > 0.0 {
        len = len.max(1);
    }
    (start, len.min(track - start))
}

fn gantt_lines(layout: &TimelineLayout, track: usize) -> Vec<Line<'static>> {
    let pad = " ".repeat(LABEL_WIDTH);
    let mut lines = Vec::new();

    let window = &layout.window;
    let start_label = window.start.format(DATE_FORMAT).to_string();
    let end_label = window.end.format(DATE_FORMAT).to_string();
    let gap = track.saturating_sub(start_label.len() + end_label.len());
    lines.push(Line::from(Span::styled(
        format!("{pad}{start_label}{}{end_label}", " ".repeat(gap)),
        Style::default().fg(theme::TEXT_DIM),
    )));

    let mut markers = vec![' '; track];
    let mut names = Vec::new();
    for m in &layout.milestones {
        let (col, _) = bar_cells(m.position, 0.0, track);
        markers[col] = '┃';
        names.push(format!("┃ {} {}", m.label, m.date.format("%b %d")));
    }
    lines.push(Line::from(Span::styled(
        format!("{pad}{}", markers.iter().collect::<String>()),
        Style::default().fg(theme::NEON_ORANGE),
    )));

    for bar in &layout.bars {
        let (start, len) = bar_cells(bar.left, bar.width, track);
        let mut cells: Vec<char> = vec!['·'; track];
        for m in &layout.milestones {
            let (col, _) = bar_cells(m.position, 0.0, track);
            cells[col] = '│';
        }
        let before: String = cells[..start].iter().collect();
        let after: String = cells[start + len..].iter().collect();

        let mut label: String = bar.project_id.chars().take(LABEL_WIDTH - 1).collect();
        label = format!("{label:<width$}", width = LABEL_WIDTH);
        let bar_style = if bar.overdue {
            theme::overdue_style()
        } else {
            Style::default().fg(theme::stage_color(bar.stage))
        };

        lines.push(Line::from(vec![
            Span::styled(label, theme::stage_style(bar.stage)),
            Span::styled(before, Style::default().fg(theme::TRACK)),
            Span::styled("█".repeat(len), bar_style),
            Span::styled(after, Style::default().fg(theme::TRACK)),
            Span::styled(
                format!(" {:>3}%", bar.progress),
                Style::default().fg(theme::TEXT_DIM),
            ),
            Span::styled(
                if bar.overdue { format!(" {}", theme::OVERDUE_SYMBOL) } else { String::new() },
                theme::overdue_style(),
            ),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("{pad}{}", names.join("   ")),
        Style::default().fg(theme::NEON_ORANGE),
    )));
    lines
}

// ── Overlays ───────────────────────────────────────────────────────

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

fn draw_help(frame: &mut Frame) {
    let area = centered(frame.area(), 48, 17);
    frame.render_widget(Clear, area);

    let keys = [
        ("1 2 3 / Tab", "Dashboard, Projects, Timeline"),
        ("j / k", "Select project"),
        ("Enter", "Project details"),
        ("h / l", "Previous / next timeline page"),
        ("v", "Timeline as Gantt or list"),
        ("s", "Load demo portfolio"),
        ("x", "Delete selected project"),
        ("C", "Delete all projects"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(k, d)| {
            Line::from(vec![
                Span::styled(format!("  {k:<14}"), Style::default().fg(theme::NEON_CYAN)),
                Span::styled(*d, Style::default().fg(theme::TEXT_BRIGHT)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel(" Keys ", true)), area);
}

fn draw_confirm_clear(frame: &mut Frame, vm: &ViewModel) {
    let area = centered(frame.area(), 44, 5);
    frame.render_widget(Clear, area);
    let text = vec![
        Line::from(Span::styled(
            format!("  Delete all {} projects?", vm.projects.len()),
            Style::default().fg(theme::TEXT_BRIGHT),
        )),
        Line::from(Span::styled(
            "  y: confirm   n: cancel",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(text).block(panel(" Clear All ", true)), area);
}

/// Whole-dollar amount with thousands separators, e.g. `$1,200,000`.
pub fn money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::stats::tests::project;
    use crate::tui::state::{Action, reduce};
    use chrono::{TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(vm: &ViewModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| draw(frame, vm)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample_vm() -> ViewModel {
        let mut late = project("HW-002", Stage::Validation, "2025-01-01", "2025-03-31");
        late.name = "Late Board Bring-up".to_string();
        let projects = vec![
            project("HW-001", Stage::InProgress, "2025-01-01", "2025-12-31"),
            late,
            project("HW-003", Stage::Completed, "2025-02-01", "2025-04-30"),
        ];
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        reduce(ViewModel::new(5, now), Action::Loaded(projects))
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0), "$0");
        assert_eq!(money(999), "$999");
        assert_eq!(money(1_000), "$1,000");
        assert_eq!(money(1_200_000), "$1,200,000");
        assert_eq!(money(-45_000), "-$45,000");
    }

    #[test]
    fn bar_cells_cover_track() {
        assert_eq!(bar_cells(0.0, 1.0, 50), (0, 50));
        assert_eq!(bar_cells(0.5, 0.25, 40), (20, 10));
        assert_eq!(bar_cells(0.99, 0.001, 10), (9, 1));
        assert_eq!(bar_cells(0.2, 0.0, 10), (2, 0));
        assert_eq!(bar_cells(0.9, 0.5, 10), (9, 1));
    }

    #[test]
    fn dashboard_shows_totals() {
        let screen = render(&sample_vm());
        assert!(screen.contains("PORTFOLIO"));
        assert!(screen.contains("Total Projects"));
        assert!(screen.contains("$600"));
        assert!(screen.contains("Budget by Stage"));
        assert!(screen.contains("Validation"));
    }

    #[test]
    fn projects_view_lists_rows_and_flags_overdue() {
        let vm = reduce(sample_vm(), Action::Show(View::Projects));
        let screen = render(&vm);
        assert!(screen.contains("HW-001"));
        assert!(screen.contains("HW-003"));
        assert!(screen.contains(theme::OVERDUE_SYMBOL));
        assert!(screen.contains("Late Board Bring-up"));
    }

    #[test]
    fn detail_overlay_shows_tax_credit() {
        let vm = reduce(sample_vm(), Action::Show(View::Projects));
        let vm = reduce(vm, Action::OpenDetail);
        let screen = render(&vm);
        assert!(screen.contains("Project Detail"));
        assert!(screen.contains("Tax credit (20%)"));
        assert!(screen.contains("364 days"));
    }

    #[test]
    fn timeline_view_draws_window_and_milestones() {
        let vm = reduce(sample_vm(), Action::Show(View::Timeline));
        let screen = render(&vm);
        assert!(screen.contains("Jan 01, 2025"));
        assert!(screen.contains("Dec 31, 2025"));
        assert!(screen.contains("Q1 Review"));
        assert!(screen.contains("Year End"));
        assert!(screen.contains("1-3 of 3"));
        assert!(screen.contains("█"));
    }

    #[test]
    fn timeline_list_style_shows_rows() {
        let vm = reduce(sample_vm(), Action::Show(View::Timeline));
        let vm = reduce(vm, Action::ToggleTimelineStyle);
        let screen = render(&vm);
        assert!(screen.contains("Days"));
        assert!(screen.contains("Late Board Bring-up"));
        assert!(screen.contains(&format!("{} Overdue", theme::OVERDUE_SYMBOL)));
        assert!(screen.contains(" 365"));
        assert!(!screen.contains("Q1 Review"));
    }

    #[test]
    fn empty_store_renders_every_view() {
        for view in View::ALL {
            let vm = reduce(ViewModel::default(), Action::Show(view));
            let screen = render(&vm);
            assert!(screen.contains(view.title()));
        }
        let vm = reduce(ViewModel::default(), Action::Show(View::Timeline));
        assert!(render(&vm).contains("no projects"));
    }

    #[test]
    fn confirm_overlay_names_count() {
        let vm = reduce(sample_vm(), Action::AskClear);
        assert!(render(&vm).contains("Delete all 3 projects?"));
    }
}
