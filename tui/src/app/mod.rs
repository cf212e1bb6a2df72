//! Interactive terminal screens.
//!
//! The command palette is the home screen, the create page dialog and the
//! settings panel open over it. Notices are drawn on top of everything.

mod create_dialog;
mod events;
mod input;
mod notices;
mod palette;
mod settings_panel;

pub use create_dialog::{CreateDialog, DialogEvent};
pub use events::{Event, EventHandler};
pub use notices::NoticeBoard;
pub use palette::{CommandPalette, PaletteEvent};
pub use settings_panel::{PanelEvent, SettingsPanel};

use std::{
    io::{self, Stdout},
    sync::Arc,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use quickpage_core::{QuickPage, command::CREATE_PAGE_COMMAND_ID};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::{debug, warn};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartScreen {
    Palette,
    CreatePage,
    Settings,
}

enum Screen {
    Palette,
    CreatePage(CreateDialog),
    Settings(SettingsPanel),
}

enum Transition {
    Palette,
    RunCommand(&'static str),
    Settings,
    Quit,
}

pub struct App {
    quick_page: QuickPage,
    notices: Arc<NoticeBoard>,
    palette: CommandPalette,
    screen: Screen,
    should_quit: bool,
}

impl App {
    pub fn new(quick_page: QuickPage, start: StartScreen) -> Self {
        let palette = CommandPalette::new(quick_page.commands());
        let mut app = Self {
            quick_page,
            notices: Arc::new(NoticeBoard::default()),
            palette,
            screen: Screen::Palette,
            should_quit: false,
        };
        match start {
            StartScreen::Palette => {}
            StartScreen::CreatePage => app.apply(Transition::RunCommand(CREATE_PAGE_COMMAND_ID)),
            StartScreen::Settings => app.apply(Transition::Settings),
        }
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn tick(&mut self) {
        self.notices.prune(Instant::now());
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let transition = match &mut self.screen {
            Screen::Palette => match self.palette.handle_key(key) {
                PaletteEvent::None => None,
                PaletteEvent::Run(id) => Some(Transition::RunCommand(id)),
                PaletteEvent::OpenSettings => Some(Transition::Settings),
                PaletteEvent::Quit => Some(Transition::Quit),
            },
            Screen::CreatePage(dialog) => match dialog.handle_key(key) {
                DialogEvent::None => None,
                DialogEvent::Cancel => Some(Transition::Palette),
                DialogEvent::Submit => {
                    if let Err(e) = dialog.submit().await {
                        debug!("Page not created: {}", e);
                    }
                    // no folder keeps the dialog around
                    (!dialog.is_open()).then_some(Transition::Palette)
                }
            },
            Screen::Settings(panel) => match panel.handle_key(key) {
                PanelEvent::None => None,
                PanelEvent::Close => Some(Transition::Palette),
            },
        };

        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Palette => self.screen = Screen::Palette,
            Transition::RunCommand(id) => {
                match self.quick_page.run_command(id, self.notices.clone()) {
                    Some(creator) => self.screen = Screen::CreatePage(CreateDialog::new(creator)),
                    None => {
                        warn!("Command `{}` is not available", id);
                        self.screen = Screen::Palette;
                    }
                }
            }
            Transition::Settings => {
                self.screen = Screen::Settings(SettingsPanel::new(
                    self.quick_page.settings().clone(),
                    self.quick_page.vault().as_ref(),
                    self.notices.clone(),
                ))
            }
            Transition::Quit => self.should_quit = true,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    "Quick Page ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("│ templates: "),
                Span::styled(
                    self.quick_page.settings().template_folder_path(),
                    Style::default().fg(Color::Yellow),
                ),
            ])),
            header,
        );

        self.palette.render(frame, body);
        match &self.screen {
            Screen::Palette => {}
            Screen::CreatePage(dialog) => dialog.render(frame, body),
            Screen::Settings(panel) => panel.render(frame, body),
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "↑/↓: select  Enter: run  q: quit",
                Style::default().fg(Color::DarkGray),
            )),
            footer,
        );
        self.notices.render(frame, body);
    }
}

/// A rect `percent_x` wide and `height` rows high in the middle of `area`
pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    // u16 math overflows on wide terminals
    let width = u32::from(area.width) * u32::from(percent_x.min(100)) / 100;
    let width = width as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

pub async fn run(quick_page: QuickPage, start: StartScreen) -> Result<()> {
    let mut terminal = init()?;

    // Restores the terminal even on early return
    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut app = App::new(quick_page, start);
    let mut events = EventHandler::new(TICK_RATE);
    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;
        match events.next().await? {
            Event::Key(key) => app.handle_key(key).await,
            Event::Tick => app.tick(),
            Event::Resize(width, height) => debug!("Terminal resized to {}x{}", width, height),
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend, layout::Rect};

    use super::{
        App, Screen, StartScreen, centered_rect,
        test_support::{key, quick_page},
    };

    fn is_dialog(app: &App) -> bool {
        matches!(app.screen, Screen::CreatePage(_))
    }

    #[tokio::test]
    async fn starts_with_the_dialog_and_returns_to_the_palette() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, _) = quick_page(vault.path(), "Templates");
        let mut app = App::new(quick_page, StartScreen::CreatePage);
        assert!(is_dialog(&app));

        // no folder: the dialog stays
        app.handle_key(key(KeyCode::Enter)).await;
        assert!(is_dialog(&app));
        assert_eq!(vec!["Please select a folder."], app.notices().messages());

        app.handle_key(key(KeyCode::Tab)).await;
        app.handle_key(key(KeyCode::Right)).await;
        app.handle_key(key(KeyCode::Right)).await;
        app.handle_key(key(KeyCode::Enter)).await;

        assert!(matches!(app.screen, Screen::Palette));
        assert!(vault.path().join("Notes/NewPage.md").exists());
        assert_eq!(
            Some("Page created: Notes/NewPage.md"),
            app.notices().messages().last().map(String::as_str)
        );
    }

    #[tokio::test]
    async fn palette_opens_a_fresh_dialog_and_quits() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, _) = quick_page(vault.path(), "");
        let mut app = App::new(quick_page, StartScreen::Palette);

        app.handle_key(key(KeyCode::Enter)).await;
        assert!(is_dialog(&app));
        app.handle_key(key(KeyCode::Esc)).await;
        assert!(matches!(app.screen, Screen::Palette));

        app.handle_key(key(KeyCode::Char('q'))).await;
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_any_screen() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, _) = quick_page(vault.path(), "");
        let mut app = App::new(quick_page, StartScreen::Settings);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await;
        assert!(app.should_quit());
    }

    #[test]
    fn renders_the_dialog() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, _) = quick_page(vault.path(), "Templates");
        let app = App::new(quick_page, StartScreen::CreatePage);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Create Page"));
        assert!(content.contains("Blank Page"));
        assert!(content.contains("Select a folder"));
    }

    #[test]
    fn wide_terminals_center_the_popup() {
        let popup = centered_rect(70, 9, Rect::new(0, 0, 1000, 50));

        assert_eq!(Rect::new(150, 20, 700, 9), popup);
    }

    #[test]
    fn popup_fits_a_small_area() {
        let popup = centered_rect(150, 30, Rect::new(2, 1, 40, 10));

        assert_eq!(Rect::new(2, 1, 40, 10), popup);
    }
}
