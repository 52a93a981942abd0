use crate::app::App;
use crate::ui::widgets::map_canvas::status_color;
use chrono::NaiveDateTime;
use parkmap_core::lot::parse_update_time;
use parkmap_core::scene::{LotDetail, Scene};
use parkmap_core::OccupancyStatus;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline, Wrap};
use ratatui::Frame;

/// How long ago `updated` was, coarsely.
pub fn age_text(updated: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - updated).num_minutes();
    match minutes {
        m if m < 1 => "just now".to_string(),
        m if m < 60 => format!("{m} min ago"),
        m if m < 24 * 60 => format!("{} h ago", m / 60),
        m => format!("{} d ago", m / (24 * 60)),
    }
}

/// Lot detail and history when a lot is selected, the legend otherwise.
pub fn render_side_panel(f: &mut Frame<'_>, area: Rect, app: &App, scene: &Scene) {
    let Some(detail) = &scene.detail else {
        render_legend(f, area, app);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(area);

    let now = chrono::Local::now().naive_local();
    let paragraph = Paragraph::new(detail_lines(detail, scene.confirm_open, now))
        .block(
            Block::default()
                .title(format!(" Lot {} ", detail.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(status_color(detail.status))),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[0]);

    render_history(f, chunks[1], app, detail.status);
}

fn detail_lines(detail: &LotDetail, confirm_open: bool, now: NaiveDateTime) -> Vec<TextLine<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        TextLine::from(Span::styled(
            detail.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(detail.address.clone()),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled("Free     ", label),
            Span::styled(
                detail.occupancy.clone(),
                Style::default().fg(status_color(detail.status)),
            ),
            Span::raw(
                detail
                    .percentage
                    .map_or_else(String::new, |pct| format!(" ({pct:.0}%)")),
            ),
        ]),
        TextLine::from(vec![
            Span::styled("Status   ", label),
            Span::raw(detail.status.label()),
        ]),
    ];

    if let Some(km) = detail.distance_km {
        lines.push(TextLine::from(vec![
            Span::styled("Distance ", label),
            Span::raw(format!("{km:.2} km from you")),
        ]));
    }
    for (name, value) in [
        ("Hours    ", &detail.business_hours),
        ("Weekdays ", &detail.weekdays),
        ("Holidays ", &detail.holiday),
    ] {
        if !value.is_empty() {
            lines.push(TextLine::from(vec![
                Span::styled(name, label),
                Span::raw(value.clone()),
            ]));
        }
    }

    let updated = parse_update_time(&detail.update_time)
        .map_or_else(|| detail.update_time.clone(), |at| age_text(at, now));
    if !updated.is_empty() {
        lines.push(TextLine::from(vec![
            Span::styled("Updated  ", label),
            Span::raw(updated),
        ]));
    }

    if confirm_open {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            "Navigate here?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(TextLine::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(": yes   "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": no"),
        ]));
    }

    lines
}

fn render_history(f: &mut Frame<'_>, area: Rect, app: &App, status: OccupancyStatus) {
    let block = Block::default()
        .title(" Free spaces, recent ")
        .borders(Borders::ALL);

    match app.selected_history() {
        Some(history) if !history.is_empty() => {
            let sparkline = Sparkline::default()
                .block(block)
                .data(history)
                .style(Style::default().fg(status_color(status)));
            f.render_widget(sparkline, area);
        }
        _ => {
            let text = if app.history_enabled {
                "No readings recorded yet"
            } else {
                "History database unavailable"
            };
            let paragraph = Paragraph::new(text)
                .block(block)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(paragraph, area);
        }
    }
}

fn render_legend(f: &mut Frame<'_>, area: Rect, app: &App) {
    let mut lines = vec![TextLine::from(Span::styled(
        "Availability",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for status in OccupancyStatus::ALL {
        let count = app
            .map
            .registry
            .all()
            .iter()
            .filter(|marker| marker.status == status)
            .count();
        lines.push(TextLine::from(vec![
            Span::styled("● ", Style::default().fg(status_color(status))),
            Span::raw(format!("{:<16}{count:>4}", status.label())),
        ]));
    }

    lines.push(TextLine::from(""));
    for (symbol, meaning, color) in [
        ("◉ ", "You", Color::LightBlue),
        ("✚ ", "Search result", Color::Magenta),
        ("⚑ ", "Destination", Color::Cyan),
    ] {
        lines.push(TextLine::from(vec![
            Span::styled(symbol, Style::default().fg(color)),
            Span::raw(meaning),
        ]));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "Click a marker or press Tab to pick a lot",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Legend ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 16)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    #[test]
    fn age_reads_coarsely() {
        assert_eq!(age_text(at(10, 0), at(10, 0)), "just now");
        assert_eq!(age_text(at(10, 0), at(10, 7)), "7 min ago");
        assert_eq!(age_text(at(8, 0), at(10, 30)), "2 h ago");
        assert_eq!(
            age_text(at(10, 0), at(10, 0) + chrono::Duration::days(3)),
            "3 d ago"
        );
    }

    #[test]
    fn clock_skew_is_just_now() {
        assert_eq!(age_text(at(10, 5), at(10, 0)), "just now");
    }

    fn detail() -> LotDetail {
        LotDetail {
            id: "004".into(),
            name: "East Gate Garage".to_string(),
            address: "Zhongzheng Rd".to_string(),
            business_hours: "24H".to_string(),
            weekdays: String::new(),
            holiday: String::new(),
            occupancy: "22/292".to_string(),
            percentage: Some(7.5),
            status: OccupancyStatus::Low,
            distance_km: Some(0.42),
            update_time: "2024-10-16 10:00:00".to_string(),
        }
    }

    fn text(lines: &[TextLine<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn detail_lists_what_is_known() {
        let rendered = text(&detail_lines(&detail(), false, at(10, 12)));
        assert!(rendered.contains("22/292 (8%)"));
        assert!(rendered.contains("0.42 km from you"));
        assert!(rendered.contains("12 min ago"));
        assert!(rendered.contains("Hours    24H"));
        assert!(!rendered.contains("Weekdays"));
        assert!(!rendered.contains("Navigate here?"));
    }

    #[test]
    fn unreadable_update_time_is_shown_as_is() {
        let mut detail = detail();
        detail.update_time = "yesterday".to_string();
        let rendered = text(&detail_lines(&detail, false, at(10, 12)));
        assert!(rendered.contains("Updated  yesterday"));
    }

    #[test]
    fn confirm_prompt_when_open() {
        let rendered = text(&detail_lines(&detail(), true, at(10, 12)));
        assert!(rendered.contains("Navigate here?"));
    }
}
