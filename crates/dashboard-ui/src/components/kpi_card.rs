use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// A bordered card showing one headline figure with a caption.
pub struct KpiCard<'a> {
    pub title: &'a str,
    pub value: &'a str,
    pub value_style: Style,
    pub theme: &'a Theme,
}

impl<'a> KpiCard<'a> {
    pub fn new(title: &'a str, value: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            value,
            value_style: theme.kpi_value,
            theme,
        }
    }

    pub fn with_value_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }

    /// Caption and value, each centred to `inner_width` columns.
    pub fn to_lines(&self, inner_width: usize) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(center(self.title, inner_width), self.theme.kpi_title)),
            Line::from(Span::styled(center(self.value, inner_width), self.value_style)),
        ]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let paragraph = Paragraph::new(Text::from(self.to_lines(inner_width)))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.kpi_border),
            );
        frame.render_widget(paragraph, area);
    }
}

/// Pad `text` on both sides to `width` display columns.  Text wider than
/// `width` is returned unchanged.
pub fn center(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width >= width {
        return text.to_string();
    }
    let left = (width - text_width) / 2;
    let right = width - text_width - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
