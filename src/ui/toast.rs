//! Toast banner drawn over the top-right corner.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::toast::{ToastKind, ToastState};
use crate::ui::clear_popup;

pub fn render_toast(toasts: &ToastState, area: Rect, buf: &mut Buffer) {
    let Some(toast) = toasts.active() else {
        return;
    };

    let width = (toast.message.len() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 1,
    };
    if rect.width == 0 {
        return;
    }

    let bg = match toast.kind {
        ToastKind::Error => Color::Red,
        ToastKind::Success => Color::Green,
        ToastKind::Info => Color::Blue,
    };
    let mut style = Style::default().fg(Color::White).bg(bg);
    if toast.is_transitioning() {
        style = style.add_modifier(Modifier::DIM);
    } else {
        style = style.add_modifier(Modifier::BOLD);
    }

    clear_popup(rect, buf);
    Paragraph::new(Line::from(Span::styled(
        format!("  {}  ", toast.message),
        style,
    )))
    .render(rect, buf);
}
