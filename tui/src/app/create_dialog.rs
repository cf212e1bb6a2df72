use crossterm::event::{KeyCode, KeyEvent};
use quickpage_core::{
    creator::{FolderRef, PageCreator, TemplateChoice},
    error::ValidationError,
    nfs::VaultPath,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::debug;

use super::{centered_rect, input::TextInput};

const NAME_PLACEHOLDER: &str = "Enter file name (default: NewPage)";
const NO_FOLDER_LABEL: &str = "Select a folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FileName,
    Folder,
    Template,
    Create,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::FileName => Field::Folder,
            Field::Folder => Field::Template,
            Field::Template => Field::Create,
            Field::Create => Field::FileName,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::FileName => Field::Create,
            Field::Folder => Field::FileName,
            Field::Template => Field::Folder,
            Field::Create => Field::Template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    None,
    Submit,
    Cancel,
}

/// The create page dialog: a name field and the folder and template choices
pub struct CreateDialog {
    creator: PageCreator,
    name: TextInput,
    folders: Vec<FolderRef>,
    folder_index: Option<usize>,
    templates: Vec<TemplateChoice>,
    template_index: usize,
    focus: Field,
}

impl CreateDialog {
    pub fn new(creator: PageCreator) -> Self {
        let folders: Vec<FolderRef> = creator.list_folders().collect();
        let templates = creator.templates();
        debug!(
            "[Dialog] {} folders, {} template choices",
            folders.len(),
            templates.len()
        );
        Self {
            creator,
            name: TextInput::default(),
            folders,
            folder_index: None,
            templates,
            template_index: 0,
            focus: Field::FileName,
        }
    }

    pub fn is_open(&self) -> bool {
        self.creator.is_open()
    }

    pub fn creator(&self) -> &PageCreator {
        &self.creator
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogEvent {
        match key.code {
            KeyCode::Esc => {
                self.creator.close();
                return DialogEvent::Cancel;
            }
            KeyCode::Enter => return DialogEvent::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            _ => match self.focus {
                Field::FileName => {
                    if self.name.handle_key(key) {
                        self.creator.set_file_name(self.name.value());
                    }
                }
                Field::Folder => match key.code {
                    KeyCode::Left => self.cycle_folder(false),
                    KeyCode::Right | KeyCode::Char(' ') => self.cycle_folder(true),
                    _ => {}
                },
                Field::Template => match key.code {
                    KeyCode::Left => self.cycle_template(false),
                    KeyCode::Right | KeyCode::Char(' ') => self.cycle_template(true),
                    _ => {}
                },
                Field::Create => {}
            },
        }
        DialogEvent::None
    }

    pub async fn submit(&mut self) -> Result<VaultPath, ValidationError> {
        self.creator.submit().await
    }

    fn cycle_folder(&mut self, forward: bool) {
        if self.folders.is_empty() {
            return;
        }
        let len = self.folders.len();
        let index = match (self.folder_index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.folder_index = Some(index);
        self.creator.select_folder(self.folders.get(index).cloned());
    }

    fn cycle_template(&mut self, forward: bool) {
        // there's always the blank choice
        let len = self.templates.len();
        self.template_index = if forward {
            (self.template_index + 1) % len
        } else {
            (self.template_index + len - 1) % len
        };
        if let Some(choice) = self.templates.get(self.template_index) {
            self.creator.select_source(choice.source.clone());
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 9, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Create Page ")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([
            Constraint::Length(1), // File name
            Constraint::Length(1), // Folder
            Constraint::Length(1), // Template
            Constraint::Length(1),
            Constraint::Length(1), // Button
            Constraint::Min(0),
            Constraint::Length(1), // Help
        ])
        .split(inner);

        let name = self.name_line();
        let name_area = self.render_row(frame, rows[0], "File Name", Field::FileName, name);
        let folder = self
            .folder_index
            .and_then(|i| self.folders.get(i))
            .map_or_else(|| NO_FOLDER_LABEL.to_string(), |f| f.to_string());
        let folder = choice_line(folder);
        self.render_row(frame, rows[1], "Folder", Field::Folder, folder);
        let template = self
            .templates
            .get(self.template_index)
            .map(|t| t.label.clone())
            .unwrap_or_default();
        let template = choice_line(template);
        self.render_row(frame, rows[2], "Template", Field::Template, template);

        let button_style = if self.focus == Field::Create {
            Style::default()
                .bg(Color::Green)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("[ Create Page ]", button_style)))
                .alignment(Alignment::Center),
            rows[4],
        );

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab: next field  ←/→: change  Enter: create  Esc: cancel",
                Style::default().fg(Color::DarkGray),
            ))),
            rows[6],
        );

        if self.focus == Field::FileName {
            frame.set_cursor_position((name_area.x + self.name.cursor_column(), name_area.y));
        }
    }

    /// Draws the label and the control, returning the control's area
    fn render_row(
        &self,
        frame: &mut Frame,
        area: Rect,
        label: &str,
        field: Field,
        control: Line,
    ) -> Rect {
        let [label_area, control_area] = Layout::horizontal([
            Constraint::Percentage(20),
            Constraint::Percentage(80),
        ])
        .areas(area);
        let label_style = if self.focus == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        frame.render_widget(Paragraph::new(Span::styled(label, label_style)), label_area);
        frame.render_widget(Paragraph::new(control), control_area);
        control_area
    }

    fn name_line(&self) -> Line<'static> {
        if self.name.value().is_empty() {
            Line::from(Span::styled(
                NAME_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.name.value().to_string())
        }
    }

    /// The name the page will get, as shown to the user
    pub fn effective_name(&self) -> &str {
        &self.creator.draft().file_name
    }
}

fn choice_line(value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
        Span::raw(value),
        Span::styled(" ›", Style::default().fg(Color::DarkGray)),
    ])
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use quickpage_core::{
        creator::{ContentSource, DialogState},
        error::ValidationError,
    };

    use crate::app::test_support::{key, quick_page, type_text};

    use super::{CreateDialog, DialogEvent};

    #[test]
    fn starts_without_a_folder_and_blank() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "Templates");
        let dialog = CreateDialog::new(quick_page.page_creator(notices));

        let draft = dialog.creator().draft();
        assert_eq!(None, draft.folder);
        assert_eq!(ContentSource::Blank, draft.source);
        assert_eq!("NewPage", dialog.effective_name());
    }

    #[test]
    fn choices_cycle_both_ways() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "Templates");
        let mut dialog = CreateDialog::new(quick_page.page_creator(notices));

        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Left));
        let folder = dialog.creator().draft().folder.clone().unwrap();
        assert_eq!("Templates", folder.to_string());

        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Right));
        assert!(matches!(
            dialog.creator().draft().source,
            ContentSource::Template(_)
        ));
        dialog.handle_key(key(KeyCode::Left));
        assert_eq!(ContentSource::Blank, dialog.creator().draft().source);
    }

    #[tokio::test]
    async fn submit_without_folder_stays_open() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "");
        let mut dialog = CreateDialog::new(quick_page.page_creator(notices.clone()));

        assert_eq!(DialogEvent::Submit, dialog.handle_key(key(KeyCode::Enter)));
        let result = dialog.submit().await;

        assert!(matches!(result, Err(ValidationError::NoFolderSelected)));
        assert!(dialog.is_open());
        assert_eq!(vec!["Please select a folder."], notices.messages());
    }

    #[tokio::test]
    async fn typed_name_and_template_create_the_page() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "Templates");
        let mut dialog = CreateDialog::new(quick_page.page_creator(notices.clone()));

        type_text(&mut dialog, "  my page  ");
        dialog.handle_key(key(KeyCode::Tab));
        // `/`, `Notes`, `Templates`
        dialog.handle_key(key(KeyCode::Right));
        dialog.handle_key(key(KeyCode::Right));
        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Right));

        let path = dialog.submit().await.unwrap();

        assert_eq!("Notes/my page.md", path.to_string());
        assert_eq!(DialogState::Closed, dialog.creator().state());
        assert_eq!(
            "# Daily\n",
            std::fs::read_to_string(vault.path().join("Notes/my page.md")).unwrap()
        );
        assert_eq!(vec!["Page created: Notes/my page.md"], notices.messages());
    }

    #[test]
    fn escape_cancels() {
        let vault = tempfile::tempdir().unwrap();
        let (quick_page, notices) = quick_page(vault.path(), "");
        let mut dialog = CreateDialog::new(quick_page.page_creator(notices));

        assert_eq!(DialogEvent::Cancel, dialog.handle_key(key(KeyCode::Esc)));
        assert!(!dialog.is_open());
    }
}
