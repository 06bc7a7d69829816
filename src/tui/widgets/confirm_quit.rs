use ratatui::widgets::{Block, Borders, Paragraph, Clear, Wrap};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment};
use ratatui::text::{Line, Span};
use crate::config::Theme;
use crate::tui::app::QuitChoice;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};
use crate::tui::widgets::popup_area;

/// Ask what to do with unsaved changes before quitting
pub fn render_confirm_quit(f: &mut Frame, area: Rect, collection: &str, selection: usize, theme: &Theme) {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let normal = Style::default().fg(fg_color).bg(bg_color);

    let popup_area = popup_area(area, 50, 40);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(format!("'{}' has unsaved changes.", collection), normal)),
        Line::from(""),
    ];

    for (index, choice) in QuitChoice::ALL.iter().enumerate() {
        let (prefix, style) = if index == selection {
            ("> ", Style::default().fg(highlight_fg).bg(highlight_bg))
        } else {
            ("  ", normal)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, choice.label()), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("↑↓ to choose, Enter to confirm, Esc to cancel", normal)));

    let paragraph = Paragraph::new(lines)
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Quit")
            .title_alignment(Alignment::Center)
            .style(normal))
        .style(normal)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
