use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use quickpage_core::{
    creator::list_folders,
    notice::Notifier,
    settings::{DEFAULT_TEMPLATE_FOLDER, SettingsHandle},
    vault::Vault,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::error;

use super::{centered_rect, input::TextInput};

const PATH_PLACEHOLDER: &str = "Example: Templates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    None,
    Close,
}

/// Edits the template folder, saving on every change
pub struct SettingsPanel {
    settings: SettingsHandle,
    notifier: Arc<dyn Notifier>,
    input: TextInput,
    folders: Vec<String>,
    focus: Field,
}

impl SettingsPanel {
    pub fn new(settings: SettingsHandle, vault: &dyn Vault, notifier: Arc<dyn Notifier>) -> Self {
        let mut folders = vec![DEFAULT_TEMPLATE_FOLDER.to_string()];
        folders.extend(
            list_folders(vault)
                .map(|folder| folder.to_string())
                .filter(|folder| folder != DEFAULT_TEMPLATE_FOLDER),
        );
        let input = TextInput::new(settings.template_folder_path());
        Self {
            settings,
            notifier,
            input,
            folders,
            focus: Field::Path,
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PanelEvent {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => return PanelEvent::Close,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Field::Path => Field::Folder,
                    Field::Folder => Field::Path,
                }
            }
            _ => match self.focus {
                Field::Path => {
                    if self.input.handle_key(key) {
                        self.write();
                    }
                }
                Field::Folder => match key.code {
                    KeyCode::Left => self.cycle_folder(false),
                    KeyCode::Right | KeyCode::Char(' ') => self.cycle_folder(true),
                    _ => {}
                },
            },
        }
        PanelEvent::None
    }

    fn selected_folder(&self) -> Option<usize> {
        self.folders.iter().position(|f| f == self.input.value())
    }

    fn cycle_folder(&mut self, forward: bool) {
        let len = self.folders.len();
        let index = match (self.selected_folder(), forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        if let Some(folder) = self.folders.get(index) {
            self.input.set_value(folder.clone());
            self.write();
        }
    }

    fn write(&self) {
        if let Err(e) = self.settings.set_template_folder_path(self.input.value()) {
            error!("Error saving the settings: {}", e);
            self.notifier.notify(&format!("Settings not saved: {}", e));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 9, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Quick Page Creator Settings ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [label, description, path, folder, _, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Template Folder Path",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            label,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Path to the folder containing templates.",
                Style::default().fg(Color::Gray),
            )),
            description,
        );

        let focused = Style::default().fg(Color::Yellow);
        let path_line = if self.input.value().is_empty() {
            Line::from(Span::styled(PATH_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(self.input.value().to_string())
        };
        let [marker, path_value] =
            Layout::horizontal([Constraint::Length(2), Constraint::Min(0)]).areas(path);
        frame.render_widget(
            Paragraph::new(Span::styled(focus_marker(self.focus == Field::Path), focused)),
            marker,
        );
        frame.render_widget(Paragraph::new(path_line), path_value);

        let folder_label = match self.selected_folder() {
            Some(_) => "Folder in the vault",
            None => "Not a folder in the vault",
        };
        let folder_style = if self.focus == Field::Folder {
            focused
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(focus_marker(self.focus == Field::Folder), focused),
                Span::styled(format!("‹ pick a folder › {}", folder_label), folder_style),
            ])),
            folder,
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Tab: switch  ←/→: pick a folder  Esc: close",
                Style::default().fg(Color::DarkGray),
            )),
            help,
        );

        if self.focus == Field::Path {
            frame.set_cursor_position((path_value.x + self.input.cursor_column(), path_value.y));
        }
    }
}

fn focus_marker(focused: bool) -> &'static str {
    if focused { "> " } else { "  " }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::test_support::{key, quick_page};

    use super::{PanelEvent, SettingsPanel};

    #[test]
    fn typing_saves_every_change() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "");
        let mut panel = SettingsPanel::new(
            quick_page.settings().clone(),
            quick_page.vault().as_ref(),
            notices,
        );

        for c in "Tem".chars() {
            panel.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!("Tem", quick_page.settings().template_folder_path());

        panel.handle_key(key(KeyCode::Backspace));
        assert_eq!("Te", quick_page.settings().template_folder_path());
    }

    #[test]
    fn picking_a_folder_writes_its_path() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "Notes");
        let mut panel = SettingsPanel::new(
            quick_page.settings().clone(),
            quick_page.vault().as_ref(),
            notices,
        );

        panel.handle_key(key(KeyCode::Tab));
        panel.handle_key(key(KeyCode::Right));

        assert_eq!("Templates", panel.value());
        assert_eq!("Templates", quick_page.settings().template_folder_path());

        panel.handle_key(key(KeyCode::Right));
        assert_eq!("/", quick_page.settings().template_folder_path());
    }

    #[test]
    fn clearing_the_path_is_allowed() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "Templates");
        let mut panel = SettingsPanel::new(
            quick_page.settings().clone(),
            quick_page.vault().as_ref(),
            notices,
        );

        panel.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        assert_eq!("", quick_page.settings().template_folder_path());
        assert_eq!(PanelEvent::Close, panel.handle_key(key(KeyCode::Esc)));
    }
}
