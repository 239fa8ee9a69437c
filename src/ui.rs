pub mod layout;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    field::{Field, ItemKind},
    popup::Popup,
    session::SessionState,
    util::format_remaining,
};

use self::layout::{button_label, popup_area, screen_layout, Viewport, RETRY_LABEL};

const CARROT_GLYPH: &str = "🥕";
const BUG_GLYPH: &str = "🐛";

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = screen_layout(area);

        render_header(self, layout.header, buf);
        render_field(self.game.field(), layout.field, buf, Instant::now());

        let legend = Paragraph::new(Span::styled(
            "(space) button / (r)etry / (esc)ape / click the carrots, spare the bugs",
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        legend.render(layout.legend, buf);

        if self.popup.is_visible() {
            render_popup(&self.popup, area, buf);
        }
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let game = &app.game;

    let mut spans = Vec::new();
    if let Some(label) = button_label(game.state()) {
        spans.push(Span::styled(label, bold_style.fg(Color::Yellow)));
        spans.push(Span::raw("   "));
    }
    // timer and score only appear once the first session has begun
    if game.state() != SessionState::Idle {
        spans.push(Span::styled(
            format_remaining(game.remaining_secs()),
            bold_style,
        ));
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} {}", CARROT_GLYPH, game.carrots_left()),
            bold_style.fg(Color::LightRed),
        ));
    }

    Paragraph::new(Line::from(spans)).render(area, buf);
}

fn render_field(field: &Field, area: Rect, buf: &mut Buffer, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title("carrot field");
    block.render(area, buf);

    let viewport = Viewport::new(area, *field.geometry());
    let inner = viewport.inner();
    let half = field.geometry().item_size / 2.0;

    for item in field.items() {
        let glyph = match item.kind {
            ItemKind::Carrot => CARROT_GLYPH,
            ItemKind::Bug => BUG_GLYPH,
        };
        let centre = crate::field::Point::new(
            item.position.x + half + field.sway_offset(item, now),
            item.position.y + half,
        );
        let Some((mut x, y)) = viewport.to_cell(centre) else {
            continue;
        };
        // keep wide glyphs off the right border
        let width = glyph.width() as u16;
        if x + width > inner.right() {
            x = inner.right().saturating_sub(width).max(inner.x);
        }
        buf.set_string(x, y, glyph, Style::default());
    }
}

fn render_popup(popup: &Popup, area: Rect, buf: &mut Buffer) {
    let rect = popup_area(area, popup.text());
    Clear.render(rect, buf);

    let text = vec![
        Line::from(Span::styled(
            popup.text().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            RETRY_LABEL,
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(rect, buf);
}
