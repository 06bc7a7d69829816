use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub mod chips;
pub mod color;
pub mod confirm_quit;
pub mod help;
pub mod input_buffer;
pub mod status_bar;
pub mod tag_input;

/// Centered rect taking the given percentages of `area`
pub(crate) fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
