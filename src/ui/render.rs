use pocket_ledger::{
    format_money, line_rgb, BarChartModel, ChartLayout, LineChartModel, TransactionType,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
    },
    Frame,
};

use super::app::{
    chart_extent, AddField, App, FilterField, Level, Mode, BAR_LABEL_WIDTH, BAR_VALUE_WIDTH,
};
use super::input::LineEdit;

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn kind_color(kind: TransactionType) -> Color {
    match kind {
        TransactionType::Income => Color::Green,
        TransactionType::Expense => Color::Red,
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Totals
            Constraint::Min(0),    // Content
            Constraint::Length(4), // Status + key hints
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_listing(f, content[0], app);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pocket_ledger::Category::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(content[1]);

    render_bars(f, charts[0], app);
    render_line_chart(f, charts[1], app);
    render_status_bar(f, chunks[2], app);

    match app.mode {
        Mode::Adding => render_add_form(f, app),
        Mode::Filtering => render_filter_form(f, app),
        Mode::Browse => render_tooltip(f, app),
    }
}

// ============================================================================
// PANELS
// ============================================================================

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let panel = &app.dashboard.totals;

    let mut spans = vec![
        Span::styled("Income ", Style::default().fg(Color::DarkGray)),
        Span::styled(format_money(panel.totals.income), Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::styled("Expense ", Style::default().fg(Color::DarkGray)),
        Span::styled(format_money(panel.totals.expense), Style::default().fg(Color::Red)),
        Span::raw("  |  "),
        Span::styled("Balance ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_money(panel.totals.balance),
            Style::default()
                .fg(rgb(panel.balance_rgb()))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
    ];

    if app.criteria.is_unrestricted() {
        spans.push(Span::styled("All transactions", Style::default().fg(Color::White)));
    } else {
        spans.push(Span::styled(
            format!("Filter: {}", app.criteria),
            Style::default().fg(Color::Yellow),
        ));
    }

    if app.repo.storage_warning().is_some() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled("⚠ session only", Style::default().fg(Color::Red)));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Pocket Ledger "),
    );
    f.render_widget(header, area);
}

fn render_listing(f: &mut Frame, area: Rect, app: &mut App) {
    let listing = &app.dashboard.listing;

    if let Some(empty) = listing.empty {
        let message = Paragraph::new(empty.message())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(bordered(" Transactions "));
        f.render_widget(message, area);
        return;
    }

    let header = Row::new(["Date", "Transaction"].into_iter().map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = listing.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.date.format("%m-%d").to_string()),
            Cell::from(row.label.clone()).style(Style::default().fg(kind_color(row.kind))),
        ])
        .height(1)
    });

    let title = format!(" Transactions ({}) ", listing.rows.len());
    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(10)])
        .header(header)
        .block(bordered(&title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_bars(f: &mut Frame, area: Rect, app: &mut App) {
    let block = bordered(" Expenses by category ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    app.hit_areas.bars = Some(inner);
    app.hit_areas.bar_track =
        f64::from(inner.width.saturating_sub(BAR_LABEL_WIDTH + BAR_VALUE_WIDTH));

    if !app.dashboard.bars.has_expenses {
        let message = Paragraph::new(BarChartModel::EMPTY_MESSAGE)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(message, inner);
        return;
    }

    let frame = app.bar_reveal.current();
    let lines: Vec<Line> = frame
        .iter()
        .zip(&app.dashboard.bars.bars)
        .map(|(drawn, target)| {
            let cells = drawn.length(app.bar_scale, app.hit_areas.bar_track).round() as usize;
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", target.category.as_str(), width = usize::from(BAR_LABEL_WIDTH)),
                    Style::default().fg(Color::White),
                ),
                Span::styled("█".repeat(cells), Style::default().fg(rgb(target.category.rgb()))),
                Span::styled(
                    format!(" {}", format_money(target.total)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_line_chart(f: &mut Frame, area: Rect, app: &mut App) {
    let block = bordered(" Income vs expense ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.dashboard.line.is_empty() || inner.height < 2 {
        app.hit_areas.chart = None;
        let message = Paragraph::new(LineChartModel::EMPTY_MESSAGE)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(message, inner);
        return;
    }

    let plot = Rect { height: inner.height - 1, ..inner };
    let labels_row = Rect { y: inner.y + plot.height, height: 1, ..inner };
    app.hit_areas.chart = Some(plot);

    let layout = app.line_frame((plot.width, plot.height));
    let income = chart_data(&layout, TransactionType::Income);
    let expense = chart_data(&layout, TransactionType::Expense);

    let datasets = vec![
        Dataset::default()
            .name("Income")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(rgb(line_rgb(TransactionType::Income))))
            .data(&income),
        Dataset::default()
            .name("Expense")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(rgb(line_rgb(TransactionType::Expense))))
            .data(&expense),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Green))
            .data(&income),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Red))
            .data(&expense),
    ];

    let chart = Chart::new(datasets)
        .x_axis(Axis::default().bounds([0.0, layout.width]))
        .y_axis(Axis::default().bounds([0.0, layout.height]))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(chart, plot);

    let (width, height) = chart_extent((plot.width, plot.height));
    let settled = app.dashboard.line.layout(width, height);
    let labels = date_label_row(&app.dashboard.line.date_labels(), &settled, plot.width);
    f.render_widget(
        Paragraph::new(labels).style(Style::default().fg(Color::DarkGray)),
        labels_row,
    );
}

/// Layout points in the chart widget's y-up coordinates.
fn chart_data(layout: &ChartLayout, kind: TransactionType) -> Vec<(f64, f64)> {
    layout
        .points(kind)
        .iter()
        .map(|p| (p.x, layout.height - p.y))
        .collect()
}

/// Places each date label under its point, skipping labels that would overlap.
fn date_label_row(labels: &[String], layout: &ChartLayout, width: u16) -> String {
    let width = usize::from(width);
    let mut row = vec![' '; width];
    let mut free_from = 0;

    for (label, point) in labels.iter().zip(&layout.income) {
        let len = label.chars().count();
        if len > width {
            break;
        }
        let start = (point.x.round() as usize).min(width - len);
        if start < free_from {
            continue;
        }
        for (i, ch) in label.chars().enumerate() {
            row[start + i] = ch;
        }
        free_from = start + len + 1;
    }

    row.into_iter().collect()
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let message = match &app.status {
        Some(status) => {
            let color = match status.level {
                Level::Info => Color::Green,
                Level::Warning => Color::Yellow,
                Level::Error => Color::Red,
            };
            Line::from(Span::styled(format!(" {}", status.text), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            format!(" {}", app.repo.store_description()),
            Style::default().fg(Color::DarkGray),
        )),
    };

    let hints: &[(&str, &str)] = match app.mode {
        Mode::Browse => &[
            ("a", "Add"),
            ("d", "Remove"),
            ("f", "Filter"),
            ("c", "Clear filter"),
            ("↑/↓", "Nav"),
            ("q", "Quit"),
        ],
        Mode::Adding | Mode::Filtering => &[
            ("Tab", "Next field"),
            ("←/→", "Change"),
            ("Enter", "Submit"),
            ("Esc", "Cancel"),
        ],
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {action}")));
    }

    let status_bar = Paragraph::new(vec![message, Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

// ============================================================================
// OVERLAYS
// ============================================================================

fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn text_line<'a>(label: &'a str, edit: &'a LineEdit, focused: bool) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<13}"), field_style(focused)),
        Span::raw(edit.value()),
    ])
}

fn choice_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<13}"), field_style(focused)),
        Span::styled(format!("‹ {value} ›"), field_style(focused)),
    ])
}

/// Puts the terminal cursor inside the focused text field of a form.
fn place_cursor(f: &mut Frame, inner: Rect, line: u16, edit: &LineEdit) {
    let x = inner.x + 13 + edit.cursor() as u16;
    if x < inner.x + inner.width {
        f.set_cursor(x, inner.y + line);
    }
}

fn render_add_form(f: &mut Frame, app: &App) {
    let form = &app.add_form;
    let area = center_rect(50, 6, f.size());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Add transaction ");
    let inner = block.inner(area);

    let lines = vec![
        text_line("Description", &form.description, form.field == AddField::Description),
        text_line("Amount", &form.amount, form.field == AddField::Amount),
        choice_line("Category", form.category.to_string(), form.field == AddField::Category),
        choice_line("Type", form.kind.label().to_string(), form.field == AddField::Type),
    ];

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    match form.field {
        AddField::Description => place_cursor(f, inner, 0, &form.description),
        AddField::Amount => place_cursor(f, inner, 1, &form.amount),
        AddField::Category | AddField::Type => {}
    }
}

fn render_filter_form(f: &mut Frame, app: &App) {
    let form = &app.filter_form;
    let area = center_rect(50, 6, f.size());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Filter ");
    let inner = block.inner(area);

    let lines = vec![
        choice_line("Category", form.category.to_string(), form.field == FilterField::Category),
        text_line("From", &form.from, form.field == FilterField::From),
        text_line("To", &form.to, form.field == FilterField::To),
        Line::from(Span::styled(
            "Dates as YYYY-MM-DD, blank for open",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    match form.field {
        FilterField::From => place_cursor(f, inner, 1, &form.from),
        FilterField::To => place_cursor(f, inner, 2, &form.to),
        FilterField::Category => {}
    }
}

fn render_tooltip(f: &mut Frame, app: &App) {
    let Some(tooltip) = &app.tooltip else {
        return;
    };

    let lines: Vec<Line> = tooltip.text.lines().map(Line::from).collect();
    let width = tooltip
        .text
        .lines()
        .map(|l| l.chars().count() as u16)
        .max()
        .unwrap_or(0)
        + 2;
    let height = lines.len() as u16 + 2;

    let screen = f.size();
    let x = (tooltip.column + 2).min(screen.width.saturating_sub(width));
    let y = (tooltip.row + 1).min(screen.height.saturating_sub(height));
    let area = Rect { x, y, width: width.min(screen.width), height: height.min(screen.height) };

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::Tooltip;
    use pocket_ledger::{MemoryStore, NewTransaction, TransactionRepository, DEFAULT_BAR_SCALE};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(records: &[(&str, &str, &str, &str)]) -> App {
        let mut repo = TransactionRepository::open(Box::new(MemoryStore::new())).unwrap();
        for (description, amount, category, kind) in records {
            repo.add(&NewTransaction::new(*description, *amount, *category, *kind))
                .unwrap();
        }
        App::new(repo, DEFAULT_BAR_SCALE)
    }

    #[test]
    fn test_empty_dashboard_messages() {
        let mut app = app_with(&[]);
        let text = screen_text(&mut app);

        assert!(text.contains("No transactions yet"));
        assert!(text.contains(BarChartModel::EMPTY_MESSAGE));
        assert!(text.contains(LineChartModel::EMPTY_MESSAGE));
        assert!(app.hit_areas.chart.is_none());
    }

    #[test]
    fn test_populated_dashboard() {
        let mut app = app_with(&[
            ("Lunch", "20", "Food", "expense"),
            ("Salary", "100", "Allowance", "income"),
        ]);
        let text = screen_text(&mut app);

        assert!(text.contains("Lunch - ₦20 (Food)"));
        assert!(text.contains("₦80"));
        assert!(text.contains("All transactions"));
        assert!(app.hit_areas.bars.is_some());
        assert!(app.hit_areas.chart.is_some());
        // Drawing builds the line reveal for the chart's size
        assert!(app.line_reveal.is_some());
    }

    #[test]
    fn test_tooltip_overlay() {
        let mut app = app_with(&[("Lunch", "20", "Food", "expense")]);
        app.tooltip = Some(Tooltip {
            text: "Food\n₦20".to_string(),
            column: 118,
            row: 39,
        });
        let text = screen_text(&mut app);
        assert!(text.contains("Food"));
    }

    #[test]
    fn test_date_labels_do_not_overlap() {
        let mut app = app_with(&[("Lunch", "20", "Food", "expense")]);
        let layout = app.line_frame((20, 5));
        let row = date_label_row(&["01-05".to_string(), "01-06".to_string()], &layout, 20);

        assert_eq!(row.chars().count(), 20);
        assert!(row.starts_with("01-05"));
    }
}
