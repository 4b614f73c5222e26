use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use pocket_ledger::{
    filter, Bar, Category, ChartLayout, CategoryFilter, Dashboard, FilterCriteria, ListMode,
    NewTransaction, Persistence, Reveal, TransactionRepository, TransactionType, DATE_FORMAT,
};
use ratatui::{layout::Rect, widgets::TableState};
use tracing::debug;

use super::input::LineEdit;

/// Hover radius in terminal cells for line chart points.
pub const TERMINAL_HOVER_RADIUS: f64 = 1.5;

/// Width reserved for the category label in front of each bar.
pub const BAR_LABEL_WIDTH: u16 = 11;

/// Width reserved for the amount printed after each bar.
pub const BAR_VALUE_WIDTH: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Adding,
    Filtering,
}

// ============================================================================
// FORMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Description,
    Amount,
    Category,
    Type,
}

impl AddField {
    const ORDER: [AddField; 4] = [
        AddField::Description,
        AddField::Amount,
        AddField::Category,
        AddField::Type,
    ];

    fn step(self, forward: bool) -> Self {
        cycle(&Self::ORDER, self, forward)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddForm {
    pub description: LineEdit,
    pub amount: LineEdit,
    pub category: Category,
    pub kind: TransactionType,
    pub field: AddField,
}

impl Default for AddForm {
    fn default() -> Self {
        AddForm {
            description: LineEdit::default(),
            amount: LineEdit::default(),
            category: Category::Allowance,
            kind: TransactionType::Income,
            field: AddField::default(),
        }
    }
}

impl AddForm {
    pub fn to_input(&self) -> NewTransaction {
        NewTransaction::new(
            self.description.value(),
            self.amount.value(),
            self.category.as_str(),
            self.kind.as_str(),
        )
    }

    fn focused_edit(&mut self) -> Option<&mut LineEdit> {
        match self.field {
            AddField::Description => Some(&mut self.description),
            AddField::Amount => Some(&mut self.amount),
            AddField::Category | AddField::Type => None,
        }
    }

    fn on_text_field(&self) -> bool {
        matches!(self.field, AddField::Description | AddField::Amount)
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.field {
            AddField::Category => self.category = cycle(&Category::ALL, self.category, forward),
            AddField::Type => self.kind = cycle(&TransactionType::ALL, self.kind, forward),
            AddField::Description | AddField::Amount => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Category,
    From,
    To,
}

impl FilterField {
    const ORDER: [FilterField; 3] = [FilterField::Category, FilterField::From, FilterField::To];

    fn step(self, forward: bool) -> Self {
        cycle(&Self::ORDER, self, forward)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterForm {
    pub category: CategoryFilter,
    pub from: LineEdit,
    pub to: LineEdit,
    pub field: FilterField,
}

impl FilterForm {
    fn on_text_field(&self) -> bool {
        self.field != FilterField::Category
    }

    fn focused_edit(&mut self) -> Option<&mut LineEdit> {
        match self.field {
            FilterField::From => Some(&mut self.from),
            FilterField::To => Some(&mut self.to),
            FilterField::Category => None,
        }
    }
}

fn cycle<T: Copy + PartialEq>(items: &[T], current: T, forward: bool) -> T {
    let len = items.len();
    let i = items.iter().position(|item| *item == current).unwrap_or(0);
    let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
    items[next]
}

// ============================================================================
// STATUS & HOVER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub level: Level,
}

/// Popup text anchored at the pointer cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub column: u16,
    pub row: u16,
}

/// Where the charts were last drawn, for pointer hit-testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub bars: Option<Rect>,
    /// Cells available to the longest bar in the last draw
    pub bar_track: f64,
    pub chart: Option<Rect>,
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub repo: TransactionRepository,
    pub criteria: FilterCriteria,
    pub dashboard: Dashboard,
    pub state: TableState,
    pub mode: Mode,
    pub add_form: AddForm,
    pub filter_form: FilterForm,
    pub status: Option<StatusMessage>,
    pub tooltip: Option<Tooltip>,
    pub bar_scale: f64,
    pub bar_reveal: Reveal<Vec<Bar>>,
    /// Built on first draw, because the layout depends on the chart's size
    pub line_reveal: Option<((u16, u16), Reveal<ChartLayout>)>,
    pub hit_areas: HitAreas,
    pub dirty: bool,
    pub quit: bool,
}

impl App {
    pub fn new(repo: TransactionRepository, bar_scale: f64) -> Self {
        let dashboard = Dashboard::build(repo.all(), ListMode::Full);
        let bar_reveal = dashboard.bars.reveal();
        let status = repo.storage_warning().map(|reason| StatusMessage {
            text: format!("Storage unavailable, changes last for this session only: {reason}"),
            level: Level::Warning,
        });

        let mut app = Self {
            repo,
            criteria: FilterCriteria::default(),
            dashboard,
            state: TableState::default(),
            mode: Mode::Browse,
            add_form: AddForm::default(),
            filter_form: FilterForm::default(),
            status,
            tooltip: None,
            bar_scale,
            bar_reveal,
            line_reveal: None,
            hit_areas: HitAreas::default(),
            dirty: true,
            quit: false,
        };
        app.clamp_selection();
        app
    }

    /// Re-runs the whole pipeline for the active filter and restarts every
    /// animation from zero.
    pub fn refresh(&mut self) {
        let mode = if self.criteria.is_unrestricted() {
            ListMode::Full
        } else {
            ListMode::Filtered
        };
        let visible = filter(self.repo.all(), &self.criteria);

        self.dashboard = Dashboard::build(&visible, mode);
        self.bar_reveal = self.dashboard.bars.reveal();
        self.line_reveal = None;
        self.tooltip = None;
        self.clamp_selection();
        self.dirty = true;

        debug!(visible = visible.len(), total = self.repo.len(), criteria = %self.criteria, "dashboard rebuilt");
    }

    /// Returns the line reveal for a chart of `size` cells, rebuilding it
    /// if the size changed. A resize after the animation finished stays
    /// settled instead of replaying.
    pub fn line_frame(&mut self, size: (u16, u16)) -> ChartLayout {
        let (width, height) = chart_extent(size);
        let stale = match &self.line_reveal {
            Some((built_for, _)) => *built_for != size,
            None => true,
        };

        if stale {
            let was_settled = self
                .line_reveal
                .as_ref()
                .is_some_and(|(_, reveal)| reveal.is_settled());
            let mut reveal = self.dashboard.line.reveal(width, height);
            if was_settled {
                reveal.settle();
            }
            self.line_reveal = Some((size, reveal));
        }

        match &self.line_reveal {
            Some((_, reveal)) => reveal.current(),
            None => self.dashboard.line.layout(width, height),
        }
    }

    /// One animation frame. Marks the app dirty while anything is moving.
    pub fn on_tick(&mut self) {
        if !self.bar_reveal.is_settled() {
            self.bar_reveal.advance();
            self.dirty = true;
        }
        if let Some((_, reveal)) = self.line_reveal.as_mut() {
            if !reveal.is_settled() {
                reveal.advance();
                self.dirty = true;
            }
        }
    }

    // ========================================================================
    // SELECTION (table navigation)
    // ========================================================================

    fn clamp_selection(&mut self) {
        let len = self.dashboard.listing.rows.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.dashboard.listing.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.dashboard.listing.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.dashboard.listing.rows.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + 10).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.dashboard.listing.rows.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(10));
        self.state.select(Some(i));
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn set_status(&mut self, level: Level, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
        });
    }

    fn report_persistence(&mut self, done: String, persistence: Persistence) {
        match persistence {
            Persistence::Durable => self.set_status(Level::Info, done),
            Persistence::SessionOnly(reason) => self.set_status(
                Level::Warning,
                format!("{done} (not saved, session only: {reason})"),
            ),
        }
    }

    pub fn submit_transaction(&mut self) {
        let input = self.add_form.to_input();
        match self.repo.add(&input) {
            Ok((_, persistence)) => {
                let done = format!("Added {}", input.description.trim());
                self.add_form = AddForm::default();
                self.mode = Mode::Browse;
                self.refresh();
                self.report_persistence(done, persistence);
            }
            Err(err) => self.set_status(Level::Error, format!("Invalid input: {err}")),
        }
    }

    /// Removes the highlighted row of whichever list is on screen.
    pub fn remove_selected(&mut self) {
        let Some(id) = self
            .state
            .selected()
            .and_then(|i| self.dashboard.listing.id_at(i))
        else {
            return;
        };

        match self.repo.remove(id) {
            Ok((removed, persistence)) => {
                self.refresh();
                self.report_persistence(format!("Removed {}", removed.description), persistence);
            }
            Err(err) => self.set_status(Level::Error, err.to_string()),
        }
    }

    pub fn open_filter_form(&mut self) {
        let mut form = FilterForm {
            category: self.criteria.category,
            ..FilterForm::default()
        };
        if let Some(from) = self.criteria.from {
            form.from.set(from.format(DATE_FORMAT).to_string());
        }
        if let Some(to) = self.criteria.to {
            form.to.set(to.format(DATE_FORMAT).to_string());
        }
        self.filter_form = form;
        self.mode = Mode::Filtering;
    }

    pub fn apply_filter(&mut self) {
        let form = &self.filter_form;
        match FilterCriteria::parse(
            &form.category.to_string(),
            form.from.value(),
            form.to.value(),
        ) {
            Ok(criteria) => {
                self.criteria = criteria;
                self.mode = Mode::Browse;
                self.refresh();
                self.set_status(Level::Info, format!("Filter: {criteria}"));
            }
            Err(err) => self.set_status(Level::Error, format!("Invalid filter: {err}")),
        }
    }

    pub fn clear_filter(&mut self) {
        self.criteria = FilterCriteria::default();
        self.filter_form = FilterForm::default();
        self.mode = Mode::Browse;
        self.refresh();
        self.set_status(Level::Info, "Filter cleared");
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.dirty = true;
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Adding => self.handle_add_key(key),
            Mode::Filtering => self.handle_filter_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('a') => self.mode = Mode::Adding,
            KeyCode::Char('f') => self.open_filter_form(),
            KeyCode::Char('c') => self.clear_filter(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => {
                if !self.dashboard.listing.rows.is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                let len = self.dashboard.listing.rows.len();
                if len > 0 {
                    self.state.select(Some(len - 1));
                }
            }
            _ => {}
        }
    }

    fn handle_add_key(&mut self, key: KeyEvent) {
        let form = &mut self.add_form;
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => self.submit_transaction(),
            KeyCode::Tab | KeyCode::Down => form.field = form.field.step(true),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.step(false),
            KeyCode::Left => match form.focused_edit() {
                Some(edit) => edit.left(),
                None => form.cycle_choice(false),
            },
            KeyCode::Right => match form.focused_edit() {
                Some(edit) => edit.right(),
                None => form.cycle_choice(true),
            },
            KeyCode::Char(' ') if !form.on_text_field() => form.cycle_choice(true),
            KeyCode::Char(ch) => {
                if let Some(edit) = form.focused_edit() {
                    edit.push(ch);
                }
            }
            KeyCode::Backspace => {
                if let Some(edit) = form.focused_edit() {
                    edit.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(edit) = form.focused_edit() {
                    edit.delete();
                }
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let form = &mut self.filter_form;
        let choices = CategoryFilter::choices();
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => self.apply_filter(),
            KeyCode::Tab | KeyCode::Down => form.field = form.field.step(true),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.step(false),
            KeyCode::Left => match form.focused_edit() {
                Some(edit) => edit.left(),
                None => form.category = cycle(&choices, form.category, false),
            },
            KeyCode::Right => match form.focused_edit() {
                Some(edit) => edit.right(),
                None => form.category = cycle(&choices, form.category, true),
            },
            KeyCode::Char(' ') if !form.on_text_field() => {
                form.category = cycle(&choices, form.category, true)
            }
            KeyCode::Char(ch) => {
                if let Some(edit) = form.focused_edit() {
                    edit.push(ch);
                }
            }
            KeyCode::Backspace => {
                if let Some(edit) = form.focused_edit() {
                    edit.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(edit) = form.focused_edit() {
                    edit.delete();
                }
            }
            _ => {}
        }
    }

    /// Stateless hover: each move shows the nearest match or hides the tooltip.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        let tooltip = self
            .hover_text(mouse.column, mouse.row)
            .map(|text| Tooltip {
                text,
                column: mouse.column,
                row: mouse.row,
            });
        if tooltip != self.tooltip {
            self.tooltip = tooltip;
            self.dirty = true;
        }
    }

    fn hover_text(&self, column: u16, row: u16) -> Option<String> {
        if let Some(area) = self.hit_areas.bars.filter(|a| contains(*a, column, row)) {
            if !self.dashboard.bars.has_expenses {
                return None;
            }
            let bar = self.dashboard.bars.bar_at(usize::from(row - area.y))?;
            let drawn = bar.length(self.bar_scale, self.hit_areas.bar_track).round() as u16;
            let reach = area.x + BAR_LABEL_WIDTH + drawn.max(1);
            return (column < reach).then(|| bar.tooltip());
        }

        if let Some(area) = self.hit_areas.chart.filter(|a| contains(*a, column, row)) {
            let (width, height) = chart_extent((area.width, area.height));
            let layout = self.dashboard.line.layout(width, height);
            let x = f64::from(column - area.x);
            let y = f64::from(row - area.y);
            return layout
                .nearest(x, y, TERMINAL_HOVER_RADIUS)
                .map(|hit| hit.to_string());
        }

        None
    }
}

/// Drawing extent in cell units for a chart of `size` cells; the last
/// column and row are the far edges.
pub fn chart_extent(size: (u16, u16)) -> (f64, f64) {
    (
        f64::from(size.0.saturating_sub(1).max(1)),
        f64::from(size.1.saturating_sub(1).max(1)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use pocket_ledger::{EmptyState, MemoryStore, Totals, DEFAULT_BAR_SCALE};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn empty_app() -> App {
        let repo = TransactionRepository::open(Box::new(MemoryStore::new())).unwrap();
        App::new(repo, DEFAULT_BAR_SCALE)
    }

    /// Adds through the form: description, amount, then category/type by cycling.
    fn add_via_form(app: &mut App, description: &str, amount: &str, category: Category, kind: TransactionType) {
        app.handle_key(key(KeyCode::Char('a')));
        type_text(app, description);
        app.handle_key(key(KeyCode::Tab));
        type_text(app, amount);
        app.handle_key(key(KeyCode::Tab));
        while app.add_form.category != category {
            app.handle_key(key(KeyCode::Right));
        }
        app.handle_key(key(KeyCode::Tab));
        while app.add_form.kind != kind {
            app.handle_key(key(KeyCode::Right));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn test_add_through_form_updates_dashboard() {
        let mut app = empty_app();
        assert_eq!(app.dashboard.listing.empty, Some(EmptyState::NoTransactions));

        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);
        add_via_form(&mut app, "Salary", "100", Category::Allowance, TransactionType::Income);

        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.repo.len(), 2);
        assert_eq!(
            app.dashboard.totals.totals,
            Totals { income: 100.0, expense: 20.0, balance: 80.0 }
        );
        // Form resets after a successful submit
        assert_eq!(app.add_form, AddForm::default());
        assert_eq!(app.status.as_ref().unwrap().level, Level::Info);
    }

    #[test]
    fn test_invalid_form_keeps_state() {
        let mut app = empty_app();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Lunch");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "abc");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Adding);
        assert!(app.repo.is_empty());
        assert_eq!(app.add_form.amount.value(), "abc");
        assert_eq!(app.status.as_ref().unwrap().level, Level::Error);
    }

    #[test]
    fn test_filter_then_remove_from_filtered_view() {
        let mut app = empty_app();
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);
        add_via_form(&mut app, "Salary", "100", Category::Allowance, TransactionType::Income);
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);

        // Filter to Food: category field is first, "All" -> "Allowance" -> "Food"
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.dashboard.mode, ListMode::Filtered);
        assert_eq!(app.dashboard.listing.rows.len(), 2);

        // Remove the second Lunch (row 1 of the filtered view)
        let second_lunch = app.repo.all()[2].id;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));

        assert_eq!(app.repo.len(), 2);
        assert!(app.repo.get(second_lunch).is_none());
        // Filter stays active after the mutation
        assert_eq!(app.dashboard.listing.rows.len(), 1);
        assert_eq!(app.dashboard.totals.totals.balance, -20.0);
    }

    #[test]
    fn test_no_match_and_clear() {
        let mut app = empty_app();
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);

        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "2999-01-01");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.dashboard.listing.empty, Some(EmptyState::NoMatches));
        assert_eq!(app.state.selected(), None);

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.dashboard.mode, ListMode::Full);
        assert_eq!(app.dashboard.listing.rows.len(), 1);
        assert_eq!(app.filter_form, FilterForm::default());
    }

    #[test]
    fn test_bad_filter_date_is_reported() {
        let mut app = empty_app();
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "yesterday");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Filtering);
        assert!(app.criteria.is_unrestricted());
        assert_eq!(app.status.as_ref().unwrap().level, Level::Error);
    }

    #[test]
    fn test_mutation_restarts_animation() {
        let mut app = empty_app();
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);
        let _ = app.line_frame((40, 10));

        for _ in 0..5 {
            app.on_tick();
        }
        assert!(app.bar_reveal.fraction() > 0.0);

        add_via_form(&mut app, "Bus", "5", Category::Transport, TransactionType::Expense);

        assert_eq!(app.bar_reveal.fraction(), 0.0);
        assert!(app.line_reveal.is_none());
        // The new reveal targets the new sums
        let target = app.bar_reveal.target();
        let transport = target.iter().find(|bar| bar.category == Category::Transport).unwrap();
        assert_eq!(transport.total, 5.0);
    }

    #[test]
    fn test_animation_settles_on_targets() {
        let mut app = empty_app();
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);
        let first = app.line_frame((40, 10));
        assert!(first.expense.iter().all(|p| p.x == 0.0));

        for _ in 0..100 {
            app.on_tick();
        }

        assert_eq!(app.bar_reveal.current(), app.dashboard.bars.bars);
        let (w, h) = chart_extent((40, 10));
        assert_eq!(app.line_frame((40, 10)), app.dashboard.line.layout(w, h));
    }

    #[test]
    fn test_bar_hover_shows_exact_sum() {
        let mut app = empty_app();
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);
        app.hit_areas.bars = Some(Rect::new(0, 0, 60, 5));
        app.hit_areas.bar_track = 37.0;

        // Row 1 is Food
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: BAR_LABEL_WIDTH + 2,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.tooltip.as_ref().unwrap().text, "Food\n₦20");

        // Moving off the charts hides it
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 70,
            row: 20,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.tooltip, None);
    }

    #[test]
    fn test_chart_hover_nearest_point() {
        let mut app = empty_app();
        add_via_form(&mut app, "Lunch", "20", Category::Food, TransactionType::Expense);
        app.hit_areas.chart = Some(Rect::new(10, 10, 41, 11));

        // One date => points sit at x = 0; y_max is the floor of 50, so
        // the expense point is at 10 - 20 * 10 / 50 = 6
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 10,
            row: 16,
            modifiers: KeyModifiers::NONE,
        });

        let text = &app.tooltip.as_ref().unwrap().text;
        assert!(text.ends_with("Expense: ₦20"), "{text}");
    }
}
