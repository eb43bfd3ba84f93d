use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tui_input::InputRequest;

use crate::api::ApiClient;
use crate::session::{Command, Outcome, Session};
use crate::theme::{Palette, Resolved, ThemeController};
use crate::ui::{self, Focus, Mode, ViewState};

const TICK: Duration = Duration::from_millis(50);

pub struct App {
    session: Session,
    theme: ThemeController,
    resolved: watch::Receiver<Resolved>,
    view: ViewState,
    client: ApiClient,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    quit: bool,
}

impl App {
    pub fn new(session: Session, theme: ThemeController, client: ApiClient) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let resolved = theme.subscribe();
        Self {
            session,
            theme,
            resolved,
            view: ViewState::new(),
            client,
            outcome_tx,
            outcome_rx,
            quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!(api = %self.client.base_url(), "browser starting");
        self.session.start();

        // Setup terminal
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        stdout().execute(LeaveAlternateScreen)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while !self.quit {
            for command in self.session.take_commands() {
                self.dispatch(command);
            }

            let palette = Palette::for_resolved(*self.resolved.borrow_and_update());
            let theme = self.theme.theme();
            terminal.draw(|frame| ui::draw(frame, &self.session, &mut self.view, &palette, theme))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(outcome) = self.outcome_rx.try_recv() {
                let listing = matches!(outcome, Outcome::Jobs { .. });
                self.session.apply(outcome);
                if listing {
                    self.view.detail_scroll = 0;
                }
            }
            self.theme.poll_system();
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn dispatch(&self, command: Command) {
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(&client, command).await;
            // receiver is gone only when the app is shutting down
            let _ = tx.send(outcome);
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        if self.session.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.session.dismiss_alert();
            }
            return;
        }
        match self.view.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::Locations => self.handle_location_key(key),
            Mode::Help => self.view.mode = Mode::Browse,
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let prev_selected = self.session.selected_index();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => match self.view.focus {
                Focus::List => self.session.select_next(),
                Focus::Detail => self.scroll_detail(1),
            },
            KeyCode::Up | KeyCode::Char('k') => match self.view.focus {
                Focus::List => self.session.select_prev(),
                Focus::Detail => self.scroll_detail(-1),
            },
            KeyCode::Char('J') | KeyCode::PageDown => self.scroll_detail(10),
            KeyCode::Char('K') | KeyCode::PageUp => self.scroll_detail(-10),
            KeyCode::Tab => {
                self.view.focus = match self.view.focus {
                    Focus::List => Focus::Detail,
                    Focus::Detail => Focus::List,
                }
            }
            KeyCode::Right | KeyCode::Char('n') => self.session.next_page(),
            KeyCode::Left | KeyCode::Char('p') => self.session.prev_page(),
            KeyCode::Char('g') | KeyCode::Home => self.session.set_page(1),
            KeyCode::Char('G') | KeyCode::End => {
                let last = self.session.total_pages();
                self.session.set_page(last);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let larger = self.session.filter().per_page().larger();
                self.session.set_per_page(larger);
            }
            KeyCode::Char('-') => {
                let smaller = self.session.filter().per_page().smaller();
                self.session.set_per_page(smaller);
            }
            KeyCode::Char('/') => self.view.mode = Mode::Search,
            KeyCode::Char('s') => self.session.cycle_source(),
            KeyCode::Char('S') => self.session.set_source(None),
            KeyCode::Char('l') => {
                self.view.location_cursor = 0;
                self.view.mode = Mode::Locations;
            }
            KeyCode::Char('F') => self.session.toggle_favorites_only(),
            KeyCode::Char('v') => self.view.expanded_cards = !self.view.expanded_cards,
            KeyCode::Char('f') => self.session.toggle_selected_favorite(),
            KeyCode::Char('t') => self.session.toggle_selected_translation(),
            KeyCode::Char('T') => {
                let theme = self.theme.cycle();
                if let Err(e) = self.session.prefs().set_theme(theme) {
                    warn!(error = %e, "could not persist theme");
                }
            }
            KeyCode::Char('r') => self.session.refresh(),
            KeyCode::Char('?') => self.view.mode = Mode::Help,
            _ => {}
        }
        if self.session.selected_index() != prev_selected {
            self.view.detail_scroll = 0;
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.view.mode = Mode::Browse,
            KeyCode::Esc => {
                if self.view.search.value().is_empty() {
                    self.view.mode = Mode::Browse;
                } else {
                    self.view.search.reset();
                    self.session.set_search("");
                }
            }
            _ => {
                if let Some(request) = input_request(key) {
                    self.view.search.handle(request);
                    self.session.set_search(self.view.search.value());
                }
            }
        }
    }

    fn handle_location_key(&mut self, key: KeyEvent) {
        let matches: Vec<String> = self
            .session
            .matching_locations(self.view.location_query.value())
            .into_iter()
            .map(str::to_string)
            .collect();
        match key.code {
            KeyCode::Esc => {
                self.view.location_query.reset();
                self.view.mode = Mode::Browse;
            }
            KeyCode::Down => {
                if self.view.location_cursor + 1 < matches.len() {
                    self.view.location_cursor += 1;
                }
            }
            KeyCode::Up => {
                self.view.location_cursor = self.view.location_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                let index = self.view.location_cursor.min(matches.len().saturating_sub(1));
                if let Some(location) = matches.get(index) {
                    self.session.toggle_location(location);
                    self.view.location_query.reset();
                }
            }
            KeyCode::Delete => self.session.clear_locations(),
            _ => {
                if let Some(request) = input_request(key) {
                    self.view.location_query.handle(request);
                    self.view.location_cursor = 0;
                }
            }
        }
    }

    fn scroll_detail(&mut self, delta: i32) {
        self.view.detail_scroll = if delta < 0 {
            self.view.detail_scroll.saturating_sub(delta.unsigned_abs() as u16)
        } else {
            self.view.detail_scroll.saturating_add(delta as u16)
        };
    }
}

/// Runs one queued command against the API.
pub async fn execute(client: &ApiClient, command: Command) -> Outcome {
    match command {
        Command::FetchJobs { seq, query } => Outcome::Jobs {
            seq,
            result: client.list_jobs(&query).await,
        },
        Command::FetchSources => Outcome::Sources(client.list_sources().await),
        Command::FetchLocations => Outcome::Locations(client.list_locations().await),
        Command::FetchFavorites => Outcome::Favorites(client.list_favorites().await),
        Command::AddFavorite(job_id) => Outcome::FavoriteAdded {
            job_id,
            result: client.add_favorite(job_id).await,
        },
        Command::RemoveFavorite(job_id) => Outcome::FavoriteRemoved {
            job_id,
            result: client.remove_favorite(job_id).await,
        },
        Command::Translate { job_id, text } => Outcome::Translated {
            job_id,
            result: client.translate(job_id, &text).await,
        },
    }
}

/// Maps editing keys onto text-input requests.
fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}
