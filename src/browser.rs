use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::client::{CatalogPage, ContentGateway, FetchError};
use crate::models::{Content, ContentType, PaginationMeta, SortOrder};
use crate::pages::page_controls;
use crate::query::QueryState;

/// Input interpretation mode: normal keybindings, or typing into the
/// search draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Completion of one fetch, tagged with the generation it was issued
/// under so stale responses can be told apart from current ones.
#[derive(Debug)]
pub struct FetchComplete {
    pub generation: u64,
    pub outcome: Result<CatalogPage, FetchError>,
}

/// All browser state: the query manager plus the current result snapshot
/// and fetch-cycle flags. One writer (the event handler), one reader (the
/// renderer).
pub struct BrowserApp {
    pub state: QueryState,
    pub contents: Vec<Content>,
    pub meta: Option<PaginationMeta>,
    pub loading: bool,
    pub error: Option<String>,
    pub input_mode: InputMode,
    pub generation: u64,
    last_fetched: Option<crate::query::FetchKey>,
    should_quit: bool,
}

impl BrowserApp {
    pub fn new(state: QueryState) -> Self {
        Self {
            state,
            contents: Vec::new(),
            meta: None,
            loading: false,
            error: None,
            input_mode: InputMode::Normal,
            generation: 0,
            last_fetched: None,
            should_quit: false,
        }
    }

    /// True when the query has drifted from the last issued fetch. Also
    /// true before the first fetch, which is how the initial load happens.
    pub fn needs_fetch(&self) -> bool {
        self.last_fetched.as_ref() != Some(&self.state.query.fetch_key())
    }

    /// Marks a fetch as issued: bumps the generation, raises the loading
    /// flag and clears any previous error. Returns the new generation for
    /// tagging the eventual completion.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.last_fetched = Some(self.state.query.fetch_key());
        self.generation
    }

    /// Applies a fetch completion. A completion from a superseded
    /// generation is discarded without touching state; the completion of
    /// the current generation always clears the loading flag, success or
    /// not.
    pub fn apply_fetch(&mut self, done: FetchComplete) {
        if done.generation != self.generation {
            tracing::debug!(
                stale = done.generation,
                current = self.generation,
                "discarding stale fetch completion"
            );
            return;
        }

        self.loading = false;
        match done.outcome {
            Ok(page) => {
                self.contents = page.items;
                // a response without meta keeps the previous snapshot so
                // the page controls stay navigable
                if let Some(meta) = page.meta {
                    self.meta = Some(meta);
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "fetch failed");
                self.error = Some(err.user_message());
            }
        }
    }

    /// Clears filters and drops the held result snapshot, so stale results
    /// are never shown against a clear action.
    pub fn clear(&mut self) {
        self.state.clear();
        self.contents.clear();
        self.meta = None;
    }

    /// The single event the pagination control emits: a request for page N.
    pub fn request_page(&mut self, page: u32) {
        self.state.set_page(page);
    }

    pub fn show_empty_state(&self) -> bool {
        self.contents.is_empty() && !self.loading && self.error.is_none()
    }

    pub fn on_key(&mut self, code: KeyCode) {
        match self.input_mode {
            InputMode::Search => match code {
                KeyCode::Enter => {
                    self.state.commit_search();
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    self.state.draft.pop();
                }
                KeyCode::Char(c) => {
                    self.state.draft.push(c);
                }
                _ => {}
            },
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('/') => {
                    self.input_mode = InputMode::Search;
                }
                KeyCode::Char('t') => self.cycle_type(),
                KeyCode::Char('s') => self.cycle_sort(),
                KeyCode::Char('o') => {
                    self.state.query.sort_order = self.state.query.sort_order.toggled();
                }
                KeyCode::Char('c') => {
                    if self.state.has_active_filters() {
                        self.clear();
                    }
                }
                KeyCode::Left | KeyCode::Char('h') => self.page_prev(),
                KeyCode::Right | KeyCode::Char('l') => self.page_next(),
                KeyCode::Char('g') => {
                    if self.meta.is_some() {
                        self.request_page(1);
                    }
                }
                KeyCode::Char('G') => self.page_last(),
                _ => {}
            },
        }
    }

    fn cycle_type(&mut self) {
        self.state.query.content_type = match self.state.query.content_type {
            None => Some(ContentType::Video),
            Some(ContentType::Video) => Some(ContentType::Article),
            Some(ContentType::Article) => None,
        };
    }

    fn cycle_sort(&mut self) {
        self.state.query.sort_by = self.state.query.sort_by.next();
    }

    fn page_prev(&mut self) {
        if let Some(meta) = &self.meta {
            if meta.current_page > 1 {
                self.request_page(meta.current_page - 1);
            }
        }
    }

    fn page_next(&mut self) {
        if let Some(meta) = &self.meta {
            if meta.current_page < meta.total_pages {
                self.request_page(meta.current_page + 1);
            }
        }
    }

    fn page_last(&mut self) {
        if let Some(meta) = &self.meta {
            if meta.total_pages > 1 {
                self.request_page(meta.total_pages);
            }
        }
    }
}

/// Runs the interactive catalog browser until the user quits.
pub async fn run_browser<G>(gateway: G, state: QueryState) -> Result<()>
where
    G: ContentGateway + Clone + Send + Sync + 'static,
{
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = BrowserApp::new(state);
    let res = run_app(&mut terminal, &mut app, gateway).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<G>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut BrowserApp,
    gateway: G,
) -> Result<()>
where
    G: ContentGateway + Clone + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        if app.needs_fetch() {
            spawn_fetch(app, &gateway, &tx);
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.on_key(key.code);
            }
        }

        while let Ok(done) = rx.try_recv() {
            app.apply_fetch(done);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn spawn_fetch<G>(
    app: &mut BrowserApp,
    gateway: &G,
    tx: &mpsc::UnboundedSender<FetchComplete>,
) where
    G: ContentGateway + Clone + Send + Sync + 'static,
{
    let generation = app.begin_fetch();
    let query = app.state.query.clone();
    let gateway = gateway.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let outcome = gateway.list_contents(&query).await;
        let _ = tx.send(FetchComplete {
            generation,
            outcome,
        });
    });
}

fn ui(f: &mut Frame, app: &BrowserApp) {
    let mut constraints = vec![
        Constraint::Length(3), // search bar
        Constraint::Length(3), // filter summary
    ];
    if app.error.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(8)); // content list
    constraints.push(Constraint::Length(3)); // pagination
    constraints.push(Constraint::Length(3)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.size());

    let mut idx = 0;
    render_search(f, chunks[idx], app);
    idx += 1;
    render_filters(f, chunks[idx], app);
    idx += 1;
    if let Some(ref message) = app.error {
        render_error(f, chunks[idx], message);
        idx += 1;
    }
    render_content(f, chunks[idx], app);
    idx += 1;
    render_pagination(f, chunks[idx], app);
    idx += 1;
    render_footer(f, chunks[idx], app);
}

fn render_search(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let typing = app.input_mode == InputMode::Search;
    let title = if typing {
        " Search (Enter to apply, Esc to cancel) "
    } else {
        " Search (/) "
    };

    let border = if typing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Blue)
    };

    let mut text = app.state.draft.clone();
    if typing {
        text.push('▏');
    }

    let search = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );

    f.render_widget(search, area);
}

fn render_filters(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let query = &app.state.query;

    let type_label = query
        .content_type
        .map_or("All", |t| t.label());
    let order_arrow = match query.sort_order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };

    let mut spans = vec![
        Span::raw("Type: "),
        Span::styled(type_label, Style::default().fg(Color::Cyan)),
        Span::raw("   Sort: "),
        Span::styled(
            format!("{} {}", query.sort_by.label(), order_arrow),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if let Some(ref search) = query.search {
        spans.push(Span::raw("   Search: "));
        spans.push(Span::styled(
            format!("\"{search}\""),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(ref provider) = query.provider {
        spans.push(Span::raw("   Provider: "));
        spans.push(Span::styled(provider.clone(), Style::default().fg(Color::Cyan)));
    }
    if query.published_from.is_some() || query.published_to.is_some() {
        spans.push(Span::raw(format!(
            "   Published: {}..{}",
            query.published_from.as_deref().unwrap_or(""),
            query.published_to.as_deref().unwrap_or("")
        )));
    }
    if app.state.has_active_filters() {
        spans.push(Span::styled(
            "   [c] clear",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let filters = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Filters "),
    );

    f.render_widget(filters, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error "),
    );

    f.render_widget(banner, area);
}

fn render_content(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(" Contents ");

    if app.loading {
        // loading replaces the list entirely, never overlays stale items
        let spinner = Paragraph::new("Loading…")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(spinner, area);
        return;
    }

    if app.show_empty_state() {
        let empty = Paragraph::new(Text::from(vec![
            Line::default(),
            Line::from(Span::styled(
                "No content found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Try changing your search or filters",
                Style::default().fg(Color::DarkGray),
            )),
        ]))
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for content in &app.contents {
        lines.extend(content_lines(content, width));
        lines.push(Line::default());
    }

    let list = Paragraph::new(Text::from(lines)).block(block);
    f.render_widget(list, area);
}

fn content_lines(content: &Content, width: usize) -> Vec<Line<'static>> {
    let type_color = match content.content_type {
        ContentType::Video => Color::Blue,
        ContentType::Article => Color::Green,
    };

    let title = Line::from(Span::styled(
        truncate_to_width(&content.title, width),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let badges = Line::from(vec![
        Span::raw("  "),
        Span::styled(content.content_type.label(), Style::default().fg(type_color)),
        Span::styled(
            format!("  ★ {:.1}", content.score),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  {}", content.provider),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let mut parts = vec![format!(
        "{} views  {} likes",
        content.metrics.views, content.metrics.likes
    )];
    if content.content_type == ContentType::Video {
        if let Some(d) = content.metrics.duration.as_deref().and_then(format_duration) {
            parts.push(d);
        }
    }
    if content.content_type == ContentType::Article {
        if let Some(rt) = content.metrics.reading_time.as_deref() {
            parts.push(format!("{rt} min"));
        }
    }
    if !content.categories.is_empty() {
        parts.push(category_summary(&content.categories));
    }

    let metrics = Line::from(Span::styled(
        format!("  {}", parts.join("  ·  ")),
        Style::default().fg(Color::Gray),
    ));

    vec![title, badges, metrics]
}

/// Seconds-on-the-wire to "3m 5s". Returns None for unparsable values.
fn format_duration(duration: &str) -> Option<String> {
    let seconds: u64 = duration.parse().ok()?;
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes > 0 {
        Some(format!("{minutes}m {rest}s"))
    } else {
        Some(format!("{rest}s"))
    }
}

/// Up to three category labels, with a "+N" marker for the overflow.
fn category_summary(categories: &[String]) -> String {
    let shown: Vec<&str> = categories.iter().take(3).map(String::as_str).collect();
    let mut summary = shown.join(", ");
    if categories.len() > 3 {
        summary.push_str(&format!(" +{}", categories.len() - 3));
    }
    summary
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn render_pagination(f: &mut Frame, area: Rect, app: &BrowserApp) {
    // part of the list view: hidden while loading, suppressed entirely at
    // one page or fewer
    let controls = match (&app.meta, app.loading) {
        (Some(meta), false) => page_controls(meta.current_page, meta.total_pages),
        _ => None,
    };

    let Some(controls) = controls else {
        f.render_widget(Paragraph::new(""), area);
        return;
    };

    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        "◀ Prev ",
        if controls.prev_enabled { enabled } else { disabled },
    )];

    for page in &controls.pages {
        let label = format!(" {page} ");
        if *page == controls.current {
            spans.push(Span::styled(
                label,
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }

    if controls.ellipsis {
        spans.push(Span::styled(" … ", disabled));
    }
    if let Some(last) = controls.last {
        spans.push(Span::raw(format!(" {last} ")));
    }

    spans.push(Span::styled(
        " Next ▶",
        if controls.next_enabled { enabled } else { disabled },
    ));

    let title = app
        .meta
        .as_ref()
        .map(|m| format!(" {} items ", m.total))
        .unwrap_or_default();

    let pagination = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(title)
                .title_alignment(Alignment::Right),
        )
        .alignment(Alignment::Center);

    f.render_widget(pagination, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let key = Style::default().bg(Color::DarkGray).fg(Color::White);

    let footer_text = if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled(" Enter ", key),
            Span::raw(" Apply  "),
            Span::styled(" Esc ", key),
            Span::raw(" Cancel  "),
            Span::raw("Type to edit the search"),
        ])
    } else {
        Line::from(vec![
            Span::styled(" / ", key),
            Span::raw(" Search  "),
            Span::styled(" t ", key),
            Span::raw(" Type  "),
            Span::styled(" s ", key),
            Span::raw(" Sort  "),
            Span::styled(" o ", key),
            Span::raw(" Order  "),
            Span::styled(" ←/→ ", key),
            Span::raw(" Page  "),
            Span::styled(" c ", key),
            Span::raw(" Clear  "),
            Span::styled(" q ", key),
            Span::raw(" Quit "),
        ])
    };

    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
