use std::io::Stdout;
use std::mem;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::db::Database;
use crate::db::project::{clear_projects, data_watermark, delete_project, list_projects};
use crate::db::seed::seed_projects;
use crate::tui::state::{Action, ViewModel, action_for_key, reduce};
use crate::tui::ui;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the store connection and the current [`ViewModel`]. All side effects
/// of the terminal UI happen here; state transitions go through [`reduce`].
pub struct App {
    db: Database,
    pub vm: ViewModel,
    last_refresh: Instant,
    last_db_watermark: String,
}

impl App {
    pub fn new(db: Database, page_size: usize) -> Result<Self> {
        let mut app = Self {
            db,
            vm: ViewModel::new(page_size, Utc::now()),
            last_refresh: Instant::now(),
            last_db_watermark: String::new(),
        };
        app.reload()?;
        Ok(app)
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while self.vm.running {
            terminal.draw(|frame| ui::draw(frame, &self.vm))?;

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && let Some(action) = action_for_key(&self.vm, key.code)
            {
                self.dispatch(action);
            }

            // Poll the store for outside writes (API, CLI) about once a second
            if self.last_refresh.elapsed() >= POLL_INTERVAL {
                self.apply(Action::Tick(Utc::now()));
                self.check_for_db_changes();
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        let vm = mem::take(&mut self.vm);
        self.vm = reduce(vm, action);
    }

    /// Runs the store side of `action`, if any, then folds it and any
    /// resulting notice into the view model.
    pub fn dispatch(&mut self, action: Action) {
        let notice = self.perform(&action);
        self.apply(action);
        if let Some(message) = notice {
            self.apply(Action::Notice(message));
        }
    }

    fn perform(&mut self, action: &Action) -> Option<String> {
        let outcome = match action {
            Action::Seed => seed_projects(&self.db)
                .map(|n| format!("Loaded {n} demo projects"))
                .map_err(anyhow::Error::from),
            Action::DeleteSelected => {
                let (id, project_id) = self
                    .vm
                    .selected_project()
                    .map(|p| (p.id.clone(), p.project_id.clone()))?;
                delete_project(&self.db, &id).map(|_| format!("Deleted {project_id}"))
            }
            Action::ClearAll => {
                clear_projects(&self.db).map(|n| format!("Cleared {n} projects"))
            }
            _ => return None,
        };

        let message = match outcome {
            Ok(message) => message,
            Err(e) => return Some(format!("Error: {e}")),
        };
        match self.reload() {
            Ok(()) => Some(message),
            Err(e) => Some(format!("Error: {e}")),
        }
    }

    fn reload(&mut self) -> Result<()> {
        let projects = list_projects(&self.db, None)?;
        self.last_db_watermark = data_watermark(&self.db)?;
        self.last_refresh = Instant::now();
        self.apply(Action::Loaded(projects));
        Ok(())
    }

    /// Check if the database has changed since our last refresh, and reload if so.
    fn check_for_db_changes(&mut self) {
        let watermark = data_watermark(&self.db).unwrap_or_default();
        if watermark == self.last_db_watermark {
            self.last_refresh = Instant::now();
            return;
        }
        if let Err(e) = self.reload() {
            self.last_refresh = Instant::now();
            self.apply(Action::Notice(format!("Error: {e}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::project::create_project;
    use crate::db::project::tests::sample_input;
    use crate::db::tests::open_temp_db;
    use crate::tui::state::{Mode, View};
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    fn app_with_projects(n: usize) -> (App, TempDir) {
        let (db, dir) = open_temp_db();
        for i in 0..n {
            create_project(&db, sample_input(&format!("P-{i:02}"))).unwrap();
        }
        let app = App::new(db, 5).unwrap();
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) {
        if let Some(action) = action_for_key(&app.vm, code) {
            app.dispatch(action);
        }
    }

    #[test]
    fn new_loads_projects_and_watermark() {
        let (app, _dir) = app_with_projects(3);
        assert_eq!(app.vm.projects.len(), 3);
        assert_eq!(app.vm.stats.total_projects, 3);
        assert!(app.last_db_watermark.ends_with(":3"));
    }

    #[test]
    fn s_seeds_demo_portfolio() {
        let (mut app, _dir) = app_with_projects(0);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.vm.projects.len(), 57);
        assert_eq!(app.vm.notice.as_deref(), Some("Loaded 57 demo projects"));

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.vm.projects.len(), 57);
        assert!(app.vm.notice.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn x_deletes_selected_project() {
        let (mut app, _dir) = app_with_projects(2);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('x'));

        assert_eq!(app.vm.projects.len(), 1);
        assert_eq!(app.vm.projects[0].project_id, "P-00");
        assert_eq!(app.vm.selected, 0);
        assert_eq!(app.vm.notice.as_deref(), Some("Deleted P-01"));
    }

    #[test]
    fn confirmed_clear_empties_store() {
        let (mut app, _dir) = app_with_projects(3);
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.vm.mode, Mode::ConfirmClear);
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(app.vm.mode, Mode::Normal);
        assert!(app.vm.projects.is_empty());
        assert_eq!(app.vm.stats.total_projects, 0);
    }

    #[test]
    fn cancelled_clear_keeps_store() {
        let (mut app, _dir) = app_with_projects(3);
        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.vm.projects.len(), 3);
    }

    #[test]
    fn check_for_db_changes_picks_up_outside_writes() {
        let (mut app, _dir) = app_with_projects(1);
        assert_eq!(app.vm.view, View::Dashboard);

        create_project(&app.db, sample_input("EXT-1")).unwrap();
        assert_eq!(app.vm.projects.len(), 1);

        app.last_refresh = Instant::now() - Duration::from_secs(2);
        app.check_for_db_changes();
        assert_eq!(app.vm.projects.len(), 2);
        assert!(app.last_refresh.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn unchanged_store_skips_reload() {
        let (mut app, _dir) = app_with_projects(1);
        let watermark = app.last_db_watermark.clone();
        app.check_for_db_changes();
        assert_eq!(app.last_db_watermark, watermark);
        assert_eq!(app.vm.projects.len(), 1);
    }
}
