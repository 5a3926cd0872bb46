//! Application core — event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use lorascope_core::{AnalysisParams, Controller, FetchTicket, Route};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::screens::events::EventsScreen;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Device the `ScreenId::Device` screen is pinned to, if one is open.
    device_eui: Option<String>,
    /// Route opened when the loop starts.
    initial_route: Route,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Spawned fetches report back through this sender.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
}

impl App {
    pub fn new(controller: Controller, initial_route: Route) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            active_screen: ScreenId::Dashboard,
            previous_screen: None,
            screens: create_screens().into_iter().collect(),
            device_eui: None,
            initial_route,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            controller,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let route = self.initial_route.clone();
        self.navigate(&route)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(backend = %self.controller.config().url, "TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let captures_escape = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_escape());

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) if !captures_escape => {
                return Ok(Some(Action::Quit));
            }

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                if let Some(screen) = n.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) if !captures_escape => {
                return Ok(Some(Action::GoBack));
            }

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action, updating app state and forwarding to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => debug!(w, h, "terminal resized"),

            Action::Render => {}

            Action::SwitchScreen(target) => {
                if *target != self.active_screen && self.screens.contains_key(target) {
                    self.enter_screen(*target)?;
                }
            }

            Action::Navigate(route) => self.navigate(route)?,

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.enter_screen(prev)?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::FetchEvents { route, ticket } => {
                self.spawn_events_fetch(route.clone(), ticket.clone());
            }

            Action::EventsLoaded { route, .. } => {
                let target = ScreenId::for_route(route);
                self.forward(target, action)?;
            }

            Action::RunAnalysis(params) => self.spawn_analysis(*params),

            Action::AnalysisFinished(_) => self.forward(ScreenId::Analysis, action)?,

            // Tick, Refresh: the active screen only
            _ => self.forward(self.active_screen, action)?,
        }

        Ok(())
    }

    /// Hand `action` to one screen and queue whatever it answers with.
    fn forward(&mut self, target: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&target) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Open the screen for `route`, creating the device page on demand.
    fn navigate(&mut self, route: &Route) -> Result<()> {
        if let Route::Device(eui) = route {
            if self.device_eui.as_deref() != Some(eui.as_str()) {
                debug!(dev_eui = %eui, "opening device page");
                self.screens.insert(
                    ScreenId::Device,
                    Box::new(EventsScreen::for_device(eui.clone())),
                );
                self.device_eui = Some(eui.clone());
            }
        }
        self.enter_screen(ScreenId::for_route(route))
    }

    /// Make `target` active and have it reload its data.
    fn enter_screen(&mut self, target: ScreenId) -> Result<()> {
        if target != self.active_screen {
            debug!("switching screen: {} → {}", self.active_screen, target);
            self.previous_screen = Some(self.active_screen);
            self.active_screen = target;
        }
        self.action_tx.send(Action::Refresh)?;
        Ok(())
    }

    /// Run the three events-page reads in the background. The screen
    /// decides on arrival whether the result is still current.
    fn spawn_events_fetch(&self, route: Route, ticket: FetchTicket) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = controller.load_events_page(&ticket.query).await;
            if let Err(ref e) = result {
                warn!(%route, generation = ticket.generation, error = %e, "events fetch failed");
            }
            let _ = tx.send(Action::EventsLoaded {
                route,
                generation: ticket.generation,
                result: result.map_err(|e| e.to_string()),
            });
        });
    }

    fn spawn_analysis(&self, params: AnalysisParams) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = controller.analyze(params).await;
            if let Err(ref e) = result {
                warn!(kind = %params.kind, error = %e, "analysis failed");
            }
            let _ = tx.send(Action::AnalysisFinished(result.map_err(|e| e.to_string())));
        });
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Bottom tab bar. The device page lights up the Events tab.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active_tab = self.active_screen.tab_index();
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .enumerate()
            .map(|(idx, &id)| {
                let style = if idx == active_tab {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(active_tab);

        frame.render_widget(tabs, area);
    }

    /// Bottom status bar with backend URL, current route and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let route = self
            .active_screen
            .route()
            .or_else(|| self.device_eui.clone().map(Route::Device))
            .unwrap_or_default();

        let mut spans = vec![
            Span::raw(" "),
            Span::styled("● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled(
                self.controller.config().url.to_string(),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::styled(format!("  {route}"), theme::muted()),
        ];

        let screen_hints = self
            .screens
            .get(&self.active_screen)
            .map_or("", |s| s.key_hints());
        if !screen_hints.is_empty() {
            spans.push(Span::styled(format!(" │ {screen_hints}"), theme::key_hint()));
        }
        spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 60u16.min(area.width.saturating_sub(4));
        let help_height = 26u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;

        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let heading = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::NEON_CYAN),
                )),
                Line::from(Span::styled(
                    format!("  {}", "─".repeat(title.chars().count())),
                    theme::key_hint(),
                )),
            ]
        };
        let entry = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let mut help_text = vec![Line::from("")];
        help_text.extend(heading("Navigation"));
        help_text.extend([
            entry("1-3", "Jump to screen"),
            entry("Tab", "Next screen"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("g/G", "Top / bottom"),
            entry("Enter", "Details / open / run"),
            entry("Esc", "Back / close"),
            Line::from(""),
        ]);
        help_text.extend(heading("Events"));
        help_text.extend([
            entry("f", "Show / hide filters"),
            entry("d t l", "Cycle device, type, limit"),
            entry("D T L", "Cycle backwards"),
            entry("c", "Clear filters"),
            entry("o", "Open device page"),
            entry("r", "Refresh"),
            Line::from(""),
        ]);
        help_text.extend(heading("ML Analysis"));
        help_text.extend([
            entry("h/l ←/→", "Change parameter"),
            entry("J/K", "Scroll result"),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ]);

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
