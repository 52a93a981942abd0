use crate::ui::widgets::popup::centered_rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const KEYS: &[(&str, &str)] = &[
    ("/  s", "Search for a destination"),
    ("Enter", "Navigate to the selected lot"),
    ("Esc", "Cancel / dismiss message / clear"),
    ("c", "Clear selection and highlight"),
    ("Tab  Shift-Tab", "Next / previous nearby lot"),
    ("←↓↑→  hjkl", "Pan the map"),
    ("+  -  wheel", "Zoom in / out"),
    ("Click", "Select the lot under the cursor"),
    ("r", "Refresh parking data"),
    ("1  2", "Map / lot list"),
    ("/ (lot list)", "Filter lots"),
    ("?  F1", "Toggle this help"),
    ("q", "Quit"),
];

pub fn render_help(f: &mut Frame<'_>) {
    let height = u16::try_from(KEYS.len()).unwrap_or(u16::MAX).saturating_add(4);
    let area = centered_rect(58, height, f.area());

    let lines: Vec<TextLine<'_>> = KEYS
        .iter()
        .map(|(key, action)| {
            TextLine::from(vec![
                Span::styled(
                    format!("{key:>16}  "),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Help · Esc to close ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
