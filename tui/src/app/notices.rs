use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use quickpage_core::notice::Notifier;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::info;

pub const NOTICE_DURATION: Duration = Duration::from_secs(4);
const MAX_NOTICES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    message: String,
    expires_at: Instant,
}

/// Notices shown over the screen until they expire
#[derive(Debug)]
pub struct NoticeBoard {
    notices: Mutex<VecDeque<Notice>>,
    duration: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            notices: Mutex::new(VecDeque::new()),
            duration,
        }
    }

    /// Drops the expired notices
    pub fn prune(&self, now: Instant) {
        self.lock().retain(|notice| notice.expires_at > now);
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let messages = self.messages();
        if messages.is_empty() {
            return;
        }
        let width = messages
            .iter()
            .map(|m| unicode_width::UnicodeWidthStr::width(m.as_str()) as u16 + 4)
            .max()
            .unwrap_or_default()
            .min(area.width);
        let height = (messages.len() as u16 + 2).min(area.height);
        let notice_area = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y + area.height.saturating_sub(height),
            width,
            height,
        };

        let lines: Vec<Line> = messages.into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(Clear, notice_area);
        frame.render_widget(paragraph, notice_area);
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, message: &str) {
        info!("[Notice] {}", message);
        let mut notices = self.lock();
        notices.push_back(Notice {
            message: message.to_string(),
            expires_at: Instant::now() + self.duration,
        });
        while notices.len() > MAX_NOTICES {
            notices.pop_front();
        }
    }
}
