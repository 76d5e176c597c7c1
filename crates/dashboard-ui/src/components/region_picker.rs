use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Horizontal radio-style list of region options.
///
/// Renders as `Region: [ all ]  north  south` with the selected option
/// highlighted.
pub struct RegionPicker<'a> {
    pub options: &'a [String],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> RegionPicker<'a> {
    pub fn new(options: &'a [String], selected: usize, theme: &'a Theme) -> Self {
        Self {
            options,
            selected,
            theme,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let mut spans = vec![Span::styled("Region: ", self.theme.label)];
        for (i, option) in self.options.iter().enumerate() {
            if i == self.selected {
                spans.push(Span::styled(format!("[ {option} ]"), self.theme.region_selected));
            } else {
                spans.push(Span::styled(format!("  {option}  "), self.theme.region_idle));
            }
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("  ←/→ change · a all · t table · q quit", self.theme.dim));
        Line::from(spans)
    }
}
