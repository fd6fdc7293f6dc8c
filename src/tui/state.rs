//! Terminal UI state. `ViewModel` is never mutated in place: every key press,
//! clock tick and store reload becomes an [`Action`] folded in by [`reduce`].

use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;

use crate::analytics::timeline::{self, DEFAULT_PAGE_SIZE, Page};
use crate::analytics::{self, DashboardStats, StageBudget};
use crate::models::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Projects,
    Timeline,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Projects, View::Timeline];

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Projects => "Projects",
            View::Timeline => "Timeline",
        }
    }

    fn index(self) -> usize {
        match self {
            View::Dashboard => 0,
            View::Projects => 1,
            View::Timeline => 2,
        }
    }

    fn shifted(self, delta: isize) -> View {
        let len = Self::ALL.len() as isize;
        Self::ALL[(self.index() as isize + delta).rem_euclid(len) as usize]
    }
}

/// How the Timeline view draws its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineStyle {
    Gantt,
    List,
}

impl TimelineStyle {
    fn toggled(self) -> Self {
        match self {
            TimelineStyle::Gantt => TimelineStyle::List,
            TimelineStyle::List => TimelineStyle::Gantt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Detail,
    Help,
    ConfirmClear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fresh snapshot from the store.
    Loaded(Vec<Project>),
    Tick(DateTime<Utc>),
    NextView,
    PrevView,
    Show(View),
    Down,
    Up,
    NextPage,
    PrevPage,
    ToggleTimelineStyle,
    OpenDetail,
    ToggleHelp,
    AskClear,
    Dismiss,
    /// Store commands. The event loop performs these before reducing them.
    Seed,
    DeleteSelected,
    ClearAll,
    Notice(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub projects: Vec<Project>,
    pub stats: DashboardStats,
    pub budget: Vec<StageBudget>,
    pub total_credit: i64,
    pub view: View,
    pub mode: Mode,
    /// Row selected in the projects table.
    pub selected: usize,
    /// 1-based timeline page.
    pub page: usize,
    pub page_size: usize,
    pub timeline_style: TimelineStyle,
    pub now: DateTime<Utc>,
    pub notice: Option<String>,
    pub running: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DateTime::<Utc>::default())
    }
}

impl ViewModel {
    pub fn new(page_size: usize, now: DateTime<Utc>) -> Self {
        Self {
            projects: Vec::new(),
            stats: DashboardStats::default(),
            budget: Vec::new(),
            total_credit: 0,
            view: View::Dashboard,
            mode: Mode::Normal,
            selected: 0,
            page: 1,
            page_size: page_size.max(1),
            timeline_style: TimelineStyle::Gantt,
            now,
            notice: None,
            running: true,
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    pub fn timeline_page(&self) -> Page<'_> {
        timeline::paginate(&self.projects, self.page, self.page_size)
    }

    fn page_count(&self) -> usize {
        self.projects.len().div_ceil(self.page_size).max(1)
    }
}

/// Wraps an index by `delta` within `len`, returning `None` when the list is empty.
fn wrap_index(current: usize, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(((current as isize + delta).rem_euclid(len as isize)) as usize)
}

fn move_selection(vm: ViewModel, delta: isize) -> ViewModel {
    if vm.view != View::Projects {
        return vm;
    }
    match wrap_index(vm.selected, vm.projects.len(), delta) {
        Some(selected) => ViewModel { selected, ..vm },
        None => vm,
    }
}

pub fn reduce(vm: ViewModel, action: Action) -> ViewModel {
    match action {
        Action::Loaded(projects) => {
            let selected = vm.selected.min(projects.len().saturating_sub(1));
            let mut next = ViewModel {
                stats: analytics::aggregate(&projects),
                budget: analytics::budget_by_stage(&projects),
                total_credit: analytics::total_tax_credit(&projects),
                projects,
                selected,
                ..vm
            };
            next.page = next.page.clamp(1, next.page_count());
            if next.mode == Mode::Detail && next.projects.is_empty() {
                next.mode = Mode::Normal;
            }
            next
        }
        Action::Tick(now) => ViewModel { now, ..vm },
        Action::NextView => ViewModel { view: vm.view.shifted(1), mode: Mode::Normal, ..vm },
        Action::PrevView => ViewModel { view: vm.view.shifted(-1), mode: Mode::Normal, ..vm },
        Action::Show(view) => ViewModel { view, mode: Mode::Normal, ..vm },
        Action::Down => move_selection(vm, 1),
        Action::Up => move_selection(vm, -1),
        Action::NextPage => {
            let page = (vm.page + 1).min(vm.page_count());
            ViewModel { page, ..vm }
        }
        Action::PrevPage => {
            let page = vm.page.saturating_sub(1).max(1);
            ViewModel { page, ..vm }
        }
        Action::ToggleTimelineStyle => ViewModel {
            timeline_style: vm.timeline_style.toggled(),
            ..vm
        },
        Action::OpenDetail if vm.view == View::Projects && vm.selected_project().is_some() => {
            ViewModel { mode: Mode::Detail, ..vm }
        }
        Action::OpenDetail => vm,
        Action::ToggleHelp => {
            let mode = if vm.mode == Mode::Help { Mode::Normal } else { Mode::Help };
            ViewModel { mode, ..vm }
        }
        Action::AskClear => ViewModel { mode: Mode::ConfirmClear, ..vm },
        Action::Dismiss | Action::Seed | Action::DeleteSelected | Action::ClearAll => {
            ViewModel { mode: Mode::Normal, ..vm }
        }
        Action::Notice(message) => ViewModel { notice: Some(message), ..vm },
        Action::Quit => ViewModel { running: false, ..vm },
    }
}

/// Key bindings. Overlays swallow every key except the ones that close them.
pub fn action_for_key(vm: &ViewModel, code: KeyCode) -> Option<Action> {
    match vm.mode {
        Mode::Help => match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::Dismiss),
            _ => None,
        },
        Mode::Detail => match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => Some(Action::Dismiss),
            _ => None,
        },
        Mode::ConfirmClear => match code {
            KeyCode::Char('y') => Some(Action::ClearAll),
            KeyCode::Char('n') | KeyCode::Esc => Some(Action::Dismiss),
            _ => None,
        },
        Mode::Normal => match code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::NextView),
            KeyCode::BackTab => Some(Action::PrevView),
            KeyCode::Char('1') => Some(Action::Show(View::Dashboard)),
            KeyCode::Char('2') => Some(Action::Show(View::Projects)),
            KeyCode::Char('3') => Some(Action::Show(View::Timeline)),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Enter => Some(Action::OpenDetail),
            KeyCode::Char('v') if vm.view == View::Timeline => Some(Action::ToggleTimelineStyle),
            KeyCode::Char('s') => Some(Action::Seed),
            KeyCode::Char('x') | KeyCode::Delete
                if vm.view == View::Projects && vm.selected_project().is_some() =>
            {
                Some(Action::DeleteSelected)
            }
            KeyCode::Char('C') => Some(Action::AskClear),
            _ => None,
        },
    }
}
