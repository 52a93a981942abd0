use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rect of `width` x `height` cells centred in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width - width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_inside_the_area() {
        let popup = centered_rect(40, 10, Rect::new(0, 0, 100, 30));
        assert_eq!(popup, Rect::new(30, 10, 40, 10));
    }

    #[test]
    fn shrinks_to_small_areas() {
        let popup = centered_rect(40, 10, Rect::new(0, 0, 20, 6));
        assert_eq!(popup, Rect::new(0, 0, 20, 6));
    }
}
