use ratatui::widgets::{Block, Borders, Paragraph, Clear, Wrap};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment};
use crate::config::KeyBindings;
use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as show;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(&config.key_bindings))
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(kb: &KeyBindings) -> String {
    let mut text = String::new();

    text.push_str("Tag input:\n");
    text.push_str(&format!("  {}: Add typed tag (or highlighted suggestion)\n", show(&kb.commit)));
    text.push_str(&format!("  {}: Remove last tag when input is empty\n", show(&kb.remove_last)));
    text.push_str(&format!("  {} / {}: Move through suggestions\n", show(&kb.suggestion_up), show(&kb.suggestion_down)));
    text.push_str(&format!("  {} / {}: Word navigation\n", show(&kb.word_left), show(&kb.word_right)));
    text.push_str(&format!("  {}: Undo typing\n", show(&kb.undo)));
    text.push_str("  Esc: Close suggestions\n");
    text.push_str("  Click a suggestion to add it\n");
    text.push('\n');

    text.push_str("Tags:\n");
    text.push_str(&format!("  {}: Switch between input and tags\n", show(&kb.next_field)));
    text.push_str("  Left / Right: Select tag\n");
    text.push_str(&format!("  {}: Remove selected tag\n", show(&kb.remove_chip)));
    text.push_str("  Click × on a tag to remove it\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Save collection\n", show(&kb.save)));
    text.push_str(&format!("  {}: Copy tags to clipboard\n", show(&kb.copy)));
    text.push_str(&format!("  {}: Show/hide help\n", show(&kb.help)));
    text.push_str(&format!("  {}: Quit\n", show(&kb.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_reflects_configured_bindings() {
        let mut kb = KeyBindings::default();
        kb.commit = ",".to_string();
        let text = build_help_text(&kb);
        assert!(text.contains("  ,: Add typed tag"));
        assert!(text.contains("Remove selected tag"));
    }
}
