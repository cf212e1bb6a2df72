use crossterm::event::{KeyCode, KeyEvent};
use quickpage_core::command::CommandRegistry;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum PaletteItem {
    Command {
        id: &'static str,
        name: &'static str,
    },
    Settings,
    Quit,
}

impl PaletteItem {
    fn label(&self) -> &str {
        match self {
            PaletteItem::Command { name, .. } => name,
            PaletteItem::Settings => "Settings",
            PaletteItem::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteEvent {
    None,
    Run(&'static str),
    OpenSettings,
    Quit,
}

/// The list of registered commands, shown when no dialog is open
#[derive(Debug, Clone)]
pub struct CommandPalette {
    items: Vec<PaletteItem>,
    selected: usize,
}

impl CommandPalette {
    pub fn new(commands: &CommandRegistry) -> Self {
        let mut items: Vec<PaletteItem> = commands
            .enabled()
            .map(|command| PaletteItem::Command {
                id: command.id,
                name: command.name,
            })
            .collect();
        items.push(PaletteItem::Settings);
        items.push(PaletteItem::Quit);
        Self { items, selected: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PaletteEvent {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                PaletteEvent::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.items.len() - 1);
                PaletteEvent::None
            }
            KeyCode::Esc | KeyCode::Char('q') => PaletteEvent::Quit,
            KeyCode::Enter => match &self.items[self.selected] {
                PaletteItem::Command { id, .. } => PaletteEvent::Run(*id),
                PaletteItem::Settings => PaletteEvent::OpenSettings,
                PaletteItem::Quit => PaletteEvent::Quit,
            },
            _ => PaletteEvent::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem::new(item.label().to_string()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Commands "))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
