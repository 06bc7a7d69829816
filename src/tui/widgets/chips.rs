use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

const REMOVE_GLYPH: &str = "×";

/// Where one chip lands inside the chip row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipPlacement {
    pub index: usize,
    pub row: u16,
    pub col: u16,
    pub width: u16,
}

impl ChipPlacement {
    /// Column of the removal glyph, relative to the row start
    pub fn remove_col(&self) -> u16 {
        self.col + self.width.saturating_sub(2)
    }
}

/// Chip text: " tag × "
pub fn chip_label(tag: &str) -> String {
    format!(" {} {} ", tag, REMOVE_GLYPH)
}

/// Wrap chips into rows of `width` columns, one space between chips.
/// A chip wider than the row gets a row of its own and is clipped at render time.
pub fn layout_chips(tags: &[String], width: u16) -> Vec<ChipPlacement> {
    let mut placements = Vec::with_capacity(tags.len());
    let mut row = 0u16;
    let mut col = 0u16;

    for (index, tag) in tags.iter().enumerate() {
        let chip_width = chip_label(tag).chars().count() as u16;
        if col > 0 && col + chip_width > width {
            row += 1;
            col = 0;
        }
        placements.push(ChipPlacement { index, row, col, width: chip_width });
        col = col.saturating_add(chip_width + 1);
    }

    placements
}

/// Render the committed tags as chips.
/// Rows that do not fit scroll: a focused chip row follows the selection,
/// otherwise the newest row stays in view.
/// Returns the screen cell of each on-screen removal glyph for mouse hit testing.
pub fn render_chips(
    f: &mut Frame,
    area: Rect,
    tags: &[String],
    selected: Option<usize>,
    focused: bool,
    theme: &Theme,
) -> Vec<(Rect, String)> {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let chip_bg = parse_color(&theme.chip_bg);
    let chip_fg = get_contrast_text_color(chip_bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = parse_color(&theme.highlight_fg);

    let title = if focused {
        format!("> Tags ({})", tags.len())
    } else {
        format!("  Tags ({})", tags.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);

    if tags.is_empty() {
        let empty = Paragraph::new(Span::styled("No tags yet", Style::default().fg(parse_color(&theme.placeholder_fg))))
            .block(block);
        f.render_widget(empty, area);
        return Vec::new();
    }

    let placements = layout_chips(tags, inner.width);
    let row_count = placements.last().map(|p| p.row + 1).unwrap_or(0);
    let mut lines: Vec<Vec<Span>> = vec![Vec::new(); row_count as usize];
    let mut hits = Vec::new();

    let anchor_row = match selected.and_then(|i| placements.get(i)) {
        Some(placement) if focused => placement.row,
        _ => row_count.saturating_sub(1),
    };
    let scroll = (anchor_row + 1).saturating_sub(inner.height);

    for placement in &placements {
        let tag = &tags[placement.index];
        let spans = &mut lines[placement.row as usize];
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        let style = if focused && selected == Some(placement.index) {
            Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(chip_fg).bg(chip_bg)
        };
        spans.push(Span::styled(chip_label(tag), style));

        let on_screen = placement.row >= scroll && placement.row - scroll < inner.height;
        let x = inner.x + placement.remove_col();
        if on_screen && x < inner.x + inner.width {
            let y = inner.y + placement.row - scroll;
            hits.push((Rect::new(x, y, 1, 1), tag.clone()));
        }
    }

    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    f.render_widget(Paragraph::new(text).scroll((scroll, 0)).block(block), area);

    hits
}
