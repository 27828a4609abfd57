//! Terminal UI for siteconsent using ratatui
//!
//! Renders a placeholder page with the consent banner docked at the bottom
//! and the legal disclosure modal on top. The footer's "cookie settings"
//! link fires the reopen signal, exactly as a site footer would.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::config::{load_config, SitePaths};
use crate::consent::{render, BannerAction, BannerView, CategoryRow, ConsentManager};
use crate::modal::{DetailModal, Disclosure, ModalKey};
use crate::models::Category;
use crate::signal::SignalBus;
use crate::store::PreferenceStore;

/// Rows that can be toggled in the settings view, in display order
const TOGGLABLE: [Category; 3] = [Category::Functional, Category::Statistics, Category::Marketing];

/// Main TUI application state
pub struct TuiApp {
    consent: ConsentManager<Box<dyn PreferenceStore>>,
    bus: SignalBus,
    modal: DetailModal,
    privacy: Disclosure,
    imprint: Disclosure,
    selected_row: usize,
    should_quit: bool,
    status_message: Option<String>,
}

impl TuiApp {
    /// Create a new TUI application
    pub fn new(paths: &SitePaths) -> Result<Self> {
        let config = load_config(paths)?;
        let store = paths.open_store(&config)?;
        let privacy = load_disclosure(paths, &config.legal.privacy, "Privacy Policy");
        let imprint = load_disclosure(paths, &config.legal.imprint, "Imprint");

        let bus = SignalBus::new();
        let consent = ConsentManager::mount(store, &bus, config.consent_options(), Instant::now());

        Ok(Self {
            consent,
            bus,
            modal: DetailModal::new(),
            privacy,
            imprint,
            selected_row: 0,
            should_quit: false,
            status_message: None,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Run event loop
        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    /// Main event loop
    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.consent.tick(Instant::now());
            terminal.draw(|f| self.ui(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key)?;
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // Modal sits on top of everything
        if self.modal.is_open() {
            let modal_key = match key.code {
                KeyCode::Esc => ModalKey::Escape,
                _ => ModalKey::Other,
            };
            self.modal.handle_key(modal_key);
            return Ok(());
        }

        self.status_message = None;
        match render(&self.consent) {
            BannerView::Hidden => self.handle_page_key(key.code)?,
            BannerView::Banner { .. } => match key.code {
                KeyCode::Char('s') => self.apply(BannerAction::OpenSettings)?,
                KeyCode::Char('r') => self.apply(BannerAction::RejectAll)?,
                KeyCode::Char('a') => self.apply(BannerAction::AcceptAll)?,
                code => self.handle_page_key(code)?,
            },
            BannerView::Settings { .. } => match key.code {
                KeyCode::Down | KeyCode::Char('j') => {
                    self.selected_row = (self.selected_row + 1) % TOGGLABLE.len();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected_row = (self.selected_row + TOGGLABLE.len() - 1) % TOGGLABLE.len();
                }
                KeyCode::Char(' ') => {
                    self.consent.toggle(TOGGLABLE[self.selected_row]);
                }
                KeyCode::Char(c @ '1'..='3') => {
                    let idx = c as usize - '1' as usize;
                    self.selected_row = idx;
                    self.consent.toggle(TOGGLABLE[idx]);
                }
                KeyCode::Enter => self.apply(BannerAction::SaveSelection)?,
                KeyCode::Char('r') => self.apply(BannerAction::RejectAll)?,
                KeyCode::Char('a') => self.apply(BannerAction::AcceptAll)?,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                    self.apply(BannerAction::CloseSettings)?
                }
                code => self.handle_page_key(code)?,
            },
        }
        Ok(())
    }

    /// Keys that work on the page regardless of the banner
    fn handle_page_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') => {
                self.selected_row = 0;
                self.bus.emit();
            }
            KeyCode::Char('p') => self.apply(BannerAction::OpenPrivacy)?,
            KeyCode::Char('i') => self.apply(BannerAction::OpenImprint)?,
            _ => {}
        }
        Ok(())
    }

    fn apply(&mut self, action: BannerAction) -> Result<()> {
        let saved = match action {
            BannerAction::OpenSettings => {
                self.selected_row = 0;
                self.consent.open_settings();
                None
            }
            BannerAction::CloseSettings => {
                self.consent.close_settings();
                None
            }
            BannerAction::RejectAll => Some(self.consent.reject_all()),
            BannerAction::AcceptAll => Some(self.consent.accept_all()),
            BannerAction::SaveSelection => Some(self.consent.save_selection()),
            BannerAction::OpenPrivacy => {
                self.modal.open(self.privacy.clone());
                None
            }
            BannerAction::OpenImprint => {
                self.modal.open(self.imprint.clone());
                None
            }
        };

        match saved {
            Some(Ok(_)) => self.status_message = Some("Preferences saved".to_string()),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "failed to save consent decision");
                self.status_message = Some(format!("Could not save preferences: {}", e));
            }
            None => {}
        }
        Ok(())
    }

    fn ui(&mut self, f: &mut Frame) {
        // Main layout: header, content, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_page(f, chunks[1]);
        self.render_footer(f, chunks[2]);

        match render(&self.consent) {
            BannerView::Hidden => {}
            BannerView::Banner { actions } => self.render_banner(f, chunks[1], &actions),
            BannerView::Settings { rows, actions } => {
                self.render_settings(f, chunks[1], &rows, &actions)
            }
        }

        if let Some(disclosure) = self.modal.visible() {
            render_modal(f, disclosure);
        }
    }

    /// Render header
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new("  Portfolio · Home  Work  About  Contact")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    /// Placeholder page body showing the active consent
    fn render_page(&self, f: &mut Frame, area: Rect) {
        let prefs = self.consent.preferences();
        let mut lines = vec![
            Line::from(Span::styled(
                "Welcome",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Active cookie categories:"),
        ];
        for category in Category::ALL {
            let (mark, color) = if prefs.get(category) {
                ("✓", Color::Green)
            } else {
                ("✗", Color::DarkGray)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", mark), Style::default().fg(color)),
                Span::raw(category.title()),
            ]));
        }
        if let Some(message) = &self.status_message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Yellow),
            )));
        }

        let page = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(page, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let footer_text = if self.modal.is_open() {
            "  Esc: Close"
        } else {
            match render(&self.consent) {
                BannerView::Hidden => "  c: Cookie settings  p: Privacy  i: Imprint  q/Esc: Quit",
                BannerView::Banner { .. } => {
                    "  s: Settings  r: Reject  a: Accept all  p: Privacy  i: Imprint  q: Quit"
                }
                BannerView::Settings { .. } => {
                    "  ↑/↓: Select  Space/1-3: Toggle  Enter: Save  r: Reject all  a: Accept all  Esc: Back"
                }
            }
        };

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::White).bg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(footer, area);
    }

    /// Simple banner docked at the bottom of the content area
    fn render_banner(&self, f: &mut Frame, area: Rect, actions: &[BannerAction]) {
        let area = bottom_rect(7, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(
                "We use cookies and similar technologies to run this site and, with your consent, for statistics.",
            ),
            Line::from(""),
            Line::from(action_spans(actions)),
        ];
        let banner = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Privacy settings ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(banner, area);
    }

    /// Expanded settings with one row per category
    fn render_settings(
        &self,
        f: &mut Frame,
        area: Rect,
        rows: &[CategoryRow],
        actions: &[BannerAction],
    ) {
        let area = bottom_rect(rows.len() as u16 * 2 + 5, area);
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let selected = TOGGLABLE[self.selected_row];
        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let mark = if row.checked { "[x]" } else { "[ ]" };
                let mut style = Style::default();
                if !row.togglable {
                    style = style.fg(Color::DarkGray);
                } else if row.category == selected {
                    style = style.bg(Color::Blue).add_modifier(Modifier::BOLD);
                }
                ListItem::new(vec![
                    Line::from(format!("{} {}", mark, row.title)),
                    Line::from(Span::styled(
                        format!("    {}", row.description),
                        Style::default().fg(Color::Gray),
                    )),
                ])
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Customize cookie settings ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(list, chunks[0]);

        let buttons = Paragraph::new(Line::from(action_spans(actions)))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(buttons, chunks[1]);
    }
}

fn render_modal(f: &mut Frame, disclosure: &Disclosure) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    if let Some(title) = &disclosure.title {
        block = block.title(format!(" {} ", title));
    }

    let paragraph = Paragraph::new(disclosure.content.as_str())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn action_spans(actions: &[BannerAction]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for action in actions {
        let key = match action {
            BannerAction::OpenSettings => "s",
            BannerAction::CloseSettings => "Esc",
            BannerAction::RejectAll => "r",
            BannerAction::SaveSelection => "Enter",
            BannerAction::AcceptAll => "a",
            BannerAction::OpenPrivacy => "p",
            BannerAction::OpenImprint => "i",
        };
        let style = if *action == BannerAction::AcceptAll {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(format!(" [{}] {} ", key, action.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Missing legal documents leave an empty disclosure, which the modal never shows
fn load_disclosure(paths: &SitePaths, path: &std::path::Path, fallback_title: &str) -> Disclosure {
    let resolved = paths.resolve(path);
    match Disclosure::load(&resolved) {
        Ok(mut disclosure) => {
            disclosure.title.get_or_insert_with(|| fallback_title.to_string());
            disclosure
        }
        Err(e) => {
            tracing::warn!(error = ?e, "disclosure not loaded");
            Disclosure::new(Some(fallback_title), "")
        }
    }
}

/// Full-width rect of `height` rows at the bottom of `r`
fn bottom_rect(height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    Rect {
        x: r.x,
        y: r.y + r.height - height,
        width: r.width,
        height,
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
