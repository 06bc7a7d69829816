use ratatui::layout::{Rect, Layout as RatLayout, Direction, Constraint};

pub struct Layout {
    pub inner_area: Rect,  // Area inside the outer border
    pub header_area: Rect,
    pub chips_area: Rect,
    pub input_area: Rect,
    /// Free space under the input; the suggestion dropdown opens here
    pub dropdown_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions, excluding the outer border
    /// Height: 1 header + 3 chips + 3 input + 2 dropdown + 1 status
    pub const MIN_WIDTH: u16 = 30;
    pub const MIN_HEIGHT: u16 = 10;

    /// Chips get at most this many rows; the rest scroll within the chip box
    const MAX_CHIP_ROWS: u16 = 8;

    pub fn calculate(size: Rect, chip_rows: u16) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let chips_height = chip_rows.clamp(1, Self::MAX_CHIP_ROWS) + 2;

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),             // Header
                Constraint::Length(chips_height),  // Chips (with borders)
                Constraint::Length(3),             // Input (with borders)
                Constraint::Min(0),                // Dropdown space
                Constraint::Length(1),             // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            header_area: vertical[0],
            chips_area: vertical[1],
            input_area: vertical[2],
            dropdown_area: vertical[3],
            status_area: vertical[4],
        }
    }

    /// Width available to chips inside their border
    pub fn chip_row_width(size: Rect) -> u16 {
        size.width.max(Self::MIN_WIDTH + 2).saturating_sub(4)
    }
}
