use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tui_input::Input;

use crate::markdown;
use crate::models::Job;
use crate::pagination::{page_window, PageItem, WINDOW_DELTA};
use crate::session::Session;
use crate::theme::{Palette, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
    Locations,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Presentation-only state: input fields, focus, scroll positions.
pub struct ViewState {
    pub mode: Mode,
    pub focus: Focus,
    pub search: Input,
    pub location_query: Input,
    pub location_cursor: usize,
    pub detail_scroll: u16,
    /// List rows include a description snippet.
    pub expanded_cards: bool,
    pub list_state: ListState,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Browse,
            focus: Focus::List,
            search: Input::default(),
            location_query: Input::default(),
            location_cursor: 0,
            detail_scroll: 0,
            expanded_cards: false,
            list_state: ListState::default(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// One job as a list row or a card. `compact` drops the description
/// snippet, `show_favorite` adds the heart marker.
pub struct JobCard<'a> {
    job: &'a Job,
    compact: bool,
    show_favorite: bool,
    favorite: bool,
}

impl<'a> JobCard<'a> {
    pub const SNIPPET_CHARS: usize = 150;

    pub fn new(job: &'a Job) -> Self {
        Self {
            job,
            compact: false,
            show_favorite: false,
            favorite: false,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn favorite(mut self, show: bool, is_favorite: bool) -> Self {
        self.show_favorite = show;
        self.favorite = is_favorite;
        self
    }

    pub fn lines(&self, palette: &Palette) -> Vec<Line<'static>> {
        let mut title = Vec::new();
        if self.show_favorite {
            title.push(if self.favorite {
                Span::styled("♥ ", Style::default().fg(palette.favorite))
            } else {
                Span::styled("♡ ", palette.muted())
            });
        }
        title.push(Span::styled(
            self.job.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let mut lines = vec![
            Line::from(title),
            Line::from(Span::styled(
                format!("{} - {}", self.job.company, self.job.location),
                palette.secondary(),
            )),
        ];
        if !self.compact {
            lines.push(Line::from(Span::styled(
                snippet(&self.job.description, Self::SNIPPET_CHARS),
                palette.muted(),
            )));
        }
        lines
    }
}

pub fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

pub fn draw(frame: &mut Frame, session: &Session, view: &mut ViewState, palette: &Palette, theme: Theme) {
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, rows[0], session, palette, theme);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    draw_list_pane(frame, chunks[0], session, view, palette);
    draw_detail(frame, chunks[1], session, view, palette);
    draw_footer(frame, rows[2], session, view, palette);

    match view.mode {
        Mode::Locations => draw_location_picker(frame, session, view, palette),
        Mode::Help => draw_help(frame, palette),
        Mode::Browse | Mode::Search => {}
    }
    if let Some(message) = session.alert() {
        draw_alert(frame, message, palette);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, session: &Session, palette: &Palette, theme: Theme) {
    let filter = session.filter();
    let source = match filter.source() {
        None => "All Sources".to_string(),
        Some(name) => match session.sources().iter().position(|s| s.name == name) {
            Some(i) => format!("{} ({}/{})", name, i + 1, session.sources().len()),
            None => name.to_string(),
        },
    };
    let mut spans = vec![
        Span::styled(" Job Board ", palette.heading().fg(palette.accent)),
        Span::styled(format!("  source: {}", source), palette.secondary()),
        Span::styled(
            format!(
                "  locations: {}/{}",
                filter.locations().len(),
                session.locations().len()
            ),
            palette.secondary(),
        ),
        Span::styled(format!("  per page: {}", filter.per_page()), palette.secondary()),
        Span::styled(
            format!("  ♥ {}", session.favorites().len()),
            Style::default().fg(palette.favorite),
        ),
    ];
    if !filter.search().is_empty() {
        spans.push(Span::styled(
            format!("  search: \"{}\"", filter.search()),
            palette.secondary(),
        ));
    }
    if filter.favorites_only() {
        spans.push(Span::styled(
            "  ♥ favorites only",
            Style::default().fg(palette.favorite),
        ));
    }
    spans.push(Span::styled(format!("  theme: {}", theme.label()), palette.muted()));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_list_pane(frame: &mut Frame, area: Rect, session: &Session, view: &mut ViewState, palette: &Palette) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    // Search box
    let searching = view.mode == Mode::Search;
    let value = view.search.value();
    let search_line = if value.is_empty() && !searching {
        Line::from(Span::styled("/ Search jobs...", palette.muted()))
    } else {
        Line::from(format!("/ {}", value))
    };
    frame.render_widget(
        Paragraph::new(search_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(searching))
                .title(" Search "),
        ),
        parts[0],
    );
    if searching {
        let width = parts[0].width.saturating_sub(4) as usize;
        let scroll = view.search.visual_scroll(width);
        let x = parts[0].x + 3 + (view.search.visual_cursor().saturating_sub(scroll)) as u16;
        frame.set_cursor_position((x.min(parts[0].right().saturating_sub(2)), parts[0].y + 1));
    }

    // Job list
    let items: Vec<ListItem> = session
        .jobs()
        .iter()
        .map(|job| {
            let mut lines = JobCard::new(job)
                .compact(!view.expanded_cards)
                .favorite(true, session.is_favorite(job.id))
                .lines(palette);
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let title = if session.is_loading() {
        format!(" Jobs ({}) loading… ", session.total())
    } else {
        format!(" Jobs ({}) ", session.total())
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(view.focus == Focus::List && view.mode == Mode::Browse))
                .title(title),
        )
        .highlight_style(palette.selected())
        .highlight_symbol("> ");

    view.list_state.select(session.selected_index());
    frame.render_stateful_widget(list, parts[1], &mut view.list_state);

    // Pagination
    frame.render_widget(
        Paragraph::new(pagination_line(session, palette)).alignment(Alignment::Center),
        parts[2],
    );
}

fn pagination_line(session: &Session, palette: &Palette) -> Line<'static> {
    let page = session.filter().page();
    let total_pages = session.total_pages();
    let mut spans = vec![Span::styled("‹ ", palette.muted())];
    for item in page_window(page, total_pages, WINDOW_DELTA) {
        let style = match item {
            PageItem::Page(n) if n == page => palette.selected().fg(palette.accent),
            PageItem::Page(_) => palette.secondary(),
            PageItem::Ellipsis => palette.muted(),
        };
        spans.push(Span::styled(format!(" {} ", item), style));
    }
    spans.push(Span::styled(" ›", palette.muted()));
    Line::from(spans)
}

fn draw_detail(frame: &mut Frame, area: Rect, session: &Session, view: &ViewState, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(view.focus == Focus::Detail && view.mode == Mode::Browse))
        .title(" Detail ");

    let Some(job) = session.selected_job() else {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "Select a job to see details",
            palette.muted(),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let detail = Paragraph::new(build_detail(session, job, palette))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.detail_scroll, 0));
    frame.render_widget(detail, area);
}

pub fn build_detail(session: &Session, job: &Job, palette: &Palette) -> Text<'static> {
    let translations = session.translations();
    let mut lines: Vec<Line<'static>> = Vec::new();

    // Header
    let mut header = vec![Span::styled(job.title.clone(), palette.heading())];
    if session.is_favorite(job.id) {
        header.push(Span::styled("  ♥", Style::default().fg(palette.favorite)));
    }
    lines.push(Line::from(header));

    let mut tags = vec![job.company.clone(), job.location.clone()];
    if let Some(salary) = &job.salary {
        tags.push(salary.clone());
    }
    let tag_spans: Vec<Span> = tags
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| Span::styled(format!("[{}] ", t), Style::default().fg(palette.tag)))
        .collect();
    lines.push(Line::from(tag_spans));

    if let Some(source) = job.source_name() {
        lines.push(Line::from(Span::styled(format!("Source: {}", source), palette.secondary())));
    }
    if let Some(deadline) = &job.deadline {
        lines.push(Line::from(Span::styled(format!("Deadline: {}", deadline), palette.secondary())));
    }

    let translation_note = if translations.is_translating(job.id) {
        Some("Translating...")
    } else if translations.is_showing(job.id) {
        Some("Showing translation (t: show original)")
    } else {
        None
    };
    if let Some(note) = translation_note {
        lines.push(Line::from(Span::styled(note, Style::default().fg(palette.accent))));
    }
    lines.push(Line::from(""));

    let description = translations.display(job.id, &job.description);
    if description.trim().is_empty() {
        lines.push(Line::from(Span::styled("(No description)", palette.muted())));
    } else {
        lines.extend(markdown::render(description, palette).lines);
    }

    lines.push(Line::from(""));
    if !job.url.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Apply: ", palette.heading()),
            Span::styled(
                job.url.clone(),
                Style::default().fg(palette.accent).add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
    let favorite_action = if session.is_favorite(job.id) {
        "f: remove favorite"
    } else {
        "f: save favorite"
    };
    lines.push(Line::from(Span::styled(
        format!("{}   t: translate", favorite_action),
        palette.muted(),
    )));

    Text::from(lines)
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &Session, view: &ViewState, palette: &Palette) {
    let line = if let Some(status) = session.status() {
        Line::from(Span::styled(format!(" {}", status), Style::default().fg(palette.error)))
    } else {
        let help = match view.mode {
            Mode::Search => " type to search  enter/esc: done",
            Mode::Locations => " type to filter  ↑/↓:move  enter:toggle  del:clear all  esc:close",
            Mode::Help => " esc: close help",
            Mode::Browse => {
                " j/k:navigate  tab:focus  /:search  s:source  l:locations  F:favorites  v:snippets  ←/→:page  f:fav  t:translate  T:theme  ?:help  q:quit"
            }
        };
        Line::from(Span::styled(help, palette.muted()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_location_picker(frame: &mut Frame, session: &Session, view: &ViewState, palette: &Palette) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let selected = session.filter().locations();
    let matches = session.matching_locations(view.location_query.value());

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(view.location_query.value().to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(true))
                .title(format!(" Locations ({} selected) ", selected.len())),
        ),
        parts[0],
    );

    let title = format!(
        " {} {} found ",
        matches.len(),
        if matches.len() == 1 { "location" } else { "locations" }
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .title(title);

    if matches.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled("No locations found", palette.secondary())),
                Line::from(Span::styled("Try adjusting your search", palette.muted())),
            ])
            .alignment(Alignment::Center)
            .block(block),
            parts[1],
        );
        return;
    }

    let items: Vec<ListItem> = matches
        .iter()
        .map(|loc| {
            let mark = if selected.contains(*loc) { "[x] " } else { "[ ] " };
            ListItem::new(format!("{}{}", mark, loc))
        })
        .collect();
    let mut state = ListState::default();
    state.select(Some(view.location_cursor.min(matches.len() - 1)));
    frame.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(palette.selected())
            .highlight_symbol("> "),
        parts[1],
        &mut state,
    );
}

fn draw_alert(frame: &mut Frame, message: &str, palette: &Palette) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let alert = Paragraph::new(vec![
        Line::from(Span::styled(message.to_string(), Style::default().fg(palette.error))),
        Line::from(""),
        Line::from(Span::styled("Press enter to dismiss", palette.muted())),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .style(palette.base())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.error))
            .title(" Error "),
    );
    frame.render_widget(alert, area);
}

fn draw_help(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);
    let rows = [
        ("j / k, ↓ / ↑", "move selection (or scroll detail)"),
        ("J / K, PgDn / PgUp", "scroll detail"),
        ("tab", "switch focus between list and detail"),
        ("/", "search"),
        ("s / S", "cycle job source / all sources"),
        ("l", "pick locations (enter toggles, del clears)"),
        ("F", "toggle favorites only"),
        ("v", "show / hide description snippets"),
        ("← / →, p / n", "previous / next page"),
        ("g / G", "first / last page"),
        ("+ / -", "more / fewer jobs per page"),
        ("f", "save or remove favorite"),
        ("t", "translate description / show original"),
        ("T", "cycle theme: light, dark, system"),
        ("r", "reload"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", key), Style::default().fg(palette.accent)),
                Span::raw(*what),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(palette.base()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(true))
                .title(" Keys "),
        ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageResult;
    use crate::prefs::PrefStore;
    use crate::session::{Command, Outcome};
    use crate::theme::LIGHT;
    use ratatui::backend::TestBackend;

    fn job(id: i64, description: &str) -> Job {
        Job {
            id,
            title: format!("Rust Engineer {}", id),
            company: "Acme".to_string(),
            location: "Ha Noi".to_string(),
            description: description.to_string(),
            url: format!("https://jobs/{}", id),
            salary: Some("$2000".to_string()),
            deadline: None,
            source: None,
        }
    }

    fn loaded(jobs: Vec<Job>, total: u64) -> Session {
        let mut session = Session::new(PrefStore::open_in_memory().unwrap());
        session.start();
        let seq = session
            .take_commands()
            .into_iter()
            .find_map(|c| match c {
                Command::FetchJobs { seq, .. } => Some(seq),
                _ => None,
            })
            .unwrap();
        session.apply(Outcome::Jobs {
            seq,
            result: Ok(PageResult { jobs, total }),
        });
        session
    }

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn render(session: &Session) -> String {
        render_with(session, &mut ViewState::new())
    }

    fn render_with(session: &Session, view: &mut ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|frame| draw(frame, session, view, &LIGHT, Theme::Light))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn card_variants() {
        let job = job(1, "Line one\n\nline   two");
        let compact = JobCard::new(&job).compact(true).lines(&LIGHT);
        assert_eq!(text_of(&compact), vec!["Rust Engineer 1", "Acme - Ha Noi"]);

        let full = JobCard::new(&job).favorite(true, true).lines(&LIGHT);
        assert_eq!(
            text_of(&full),
            vec!["♥ Rust Engineer 1", "Acme - Ha Noi", "Line one line two"]
        );
    }

    #[test]
    fn snippet_truncates_on_chars() {
        assert_eq!(snippet("short", 150), "short");
        let long = "é".repeat(200);
        let cut = snippet(&long, 150);
        assert_eq!(cut.chars().count(), 153);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn detail_shows_translation_when_toggled() {
        let mut session = loaded(vec![job(1, "Original text")], 1);
        let selected = session.selected_job().unwrap().clone();
        let before = text_of(&build_detail(&session, &selected, &LIGHT).lines);
        assert!(before.iter().any(|l| l == "Original text"));

        session.toggle_translation(1);
        session.apply(Outcome::Translated {
            job_id: 1,
            result: Ok("Văn bản gốc".to_string()),
        });
        let after = text_of(&build_detail(&session, &selected, &LIGHT).lines);
        assert!(after.iter().any(|l| l == "Văn bản gốc"));
        assert!(!after.iter().any(|l| l == "Original text"));
    }

    #[test]
    fn empty_listing_renders_placeholder() {
        let session = loaded(Vec::new(), 0);
        let screen = render(&session);
        assert!(screen.contains("Select a job to see details"));
        assert!(screen.contains("Jobs (0)"));
    }

    #[test]
    fn listing_renders_rows_and_pages() {
        let session = loaded(vec![job(1, "a"), job(2, "b")], 95);
        let screen = render(&session);
        assert!(screen.contains("Rust Engineer 2"));
        assert!(screen.contains("Apply: https://jobs/1"));
        assert!(screen.contains(" 1  2  3  …  10 "));
    }

    #[test]
    fn expanded_cards_show_snippets() {
        // job 1 is selected, so only the list can show job 2's text
        let session = loaded(vec![job(1, "a"), job(2, "Maintain the billing service")], 2);
        assert!(!render(&session).contains("Maintain the billing"));

        let mut view = ViewState::new();
        view.expanded_cards = true;
        assert!(render_with(&session, &mut view).contains("Maintain the billing"));
    }

    #[test]
    fn header_reflects_lookups_and_search() {
        let mut session = loaded(vec![job(1, "a")], 1);
        session.apply(Outcome::Favorites(Ok([1, 2].into_iter().collect())));
        session.apply(Outcome::Locations(Ok(vec!["Ha Noi".to_string()])));
        session.set_search("rust");
        let header = render(&session).lines().next().unwrap_or_default().to_string();
        assert!(header.contains("locations: 0/1"));
        assert!(header.contains("♥ 2"));
        assert!(header.contains("search: \"rust\""));
    }
}
