use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use unicode_width::UnicodeWidthStr;

use crate::field::{FieldGeometry, Point};
use crate::session::SessionState;

const HORIZONTAL_MARGIN: u16 = 1;
const POPUP_PADDING: u16 = 6;
const POPUP_HEIGHT: u16 = 5;

pub const RETRY_LABEL: &str = "[ ↻ retry ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub field: Rect,
    pub legend: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // button, timer, score
            Constraint::Min(3),    // bordered field
            Constraint::Length(1), // legend
        ])
        .split(area);

    ScreenLayout {
        header: chunks[0],
        field: chunks[1],
        legend: chunks[2],
    }
}

/// The play/stop button disappears once a session has ended; the popup
/// takes over from there.
pub fn button_label(state: SessionState) -> Option<&'static str> {
    match state {
        SessionState::Idle => Some("[▶ play]"),
        SessionState::Running => Some("[■ stop]"),
        SessionState::Finished => None,
    }
}

pub fn button_area(header: Rect, label: &str) -> Rect {
    Rect::new(
        header.x,
        header.y,
        (label.width() as u16).min(header.width),
        header.height.min(1),
    )
}

pub fn popup_area(area: Rect, text: &str) -> Rect {
    let width = (text.width().max(RETRY_LABEL.width()) as u16 + POPUP_PADDING).min(area.width);
    let height = POPUP_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Row three of the popup: border, message, spacer, button.
pub fn retry_button_area(popup: Rect) -> Rect {
    let width = (RETRY_LABEL.width() as u16).min(popup.width);
    Rect::new(
        popup.x + (popup.width - width) / 2,
        popup.y + 3.min(popup.height.saturating_sub(1)),
        width,
        popup.height.min(1),
    )
}

/// Maps between terminal cells inside the field border and field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    inner: Rect,
    geometry: FieldGeometry,
}

impl Viewport {
    /// `field` is the bordered block; the border itself is not playable.
    pub fn new(field: Rect, geometry: FieldGeometry) -> Self {
        let inner = Rect::new(
            field.x.saturating_add(1),
            field.y.saturating_add(1),
            field.width.saturating_sub(2),
            field.height.saturating_sub(2),
        );
        Self { inner, geometry }
    }

    pub fn inner(&self) -> Rect {
        self.inner
    }

    /// Center of the clicked cell in field units, or None outside the field.
    pub fn to_field(&self, column: u16, row: u16) -> Option<Point> {
        if self.inner.is_empty() || !self.inner.contains(Position::new(column, row)) {
            return None;
        }
        let cx = (column - self.inner.x) as f64 + 0.5;
        let cy = (row - self.inner.y) as f64 + 0.5;
        Some(Point::new(
            cx * self.geometry.width / self.inner.width as f64,
            cy * self.geometry.height / self.inner.height as f64,
        ))
    }

    /// Cell covering `point`, clamped to the field interior.
    pub fn to_cell(&self, point: Point) -> Option<(u16, u16)> {
        if self.inner.is_empty() || self.geometry.width <= 0.0 || self.geometry.height <= 0.0 {
            return None;
        }
        let col = (point.x / self.geometry.width * self.inner.width as f64)
            .floor()
            .clamp(0.0, (self.inner.width - 1) as f64) as u16;
        let row = (point.y / self.geometry.height * self.inner.height as f64)
            .floor()
            .clamp(0.0, (self.inner.height - 1) as f64) as u16;
        Some((self.inner.x + col, self.inner.y + row))
    }
}
