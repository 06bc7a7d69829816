use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use crate::tui::{App, Layout};
use crate::tui::app::{Focus, Mode};
use crate::tui::widgets::{
    chips::{layout_chips, render_chips},
    color::parse_color,
    confirm_quit::render_confirm_quit,
    help::render_help,
    status_bar::render_status_bar,
    tag_input::{render_suggestions, render_tag_input, TagInputProps},
};
use crate::utils::format_key_binding_for_display as show;

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let theme = app.config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let chip_rows = layout_chips(&app.tags, Layout::chip_row_width(area))
        .last()
        .map(|p| p.row + 1)
        .unwrap_or(1);
    let layout = Layout::calculate(area, chip_rows);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Tagin")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, area);

    let mut header = vec![
        Span::raw("Collection: "),
        Span::styled(app.collection_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" ({} tags)", app.tags.len())),
    ];
    if app.is_dirty() {
        header.push(Span::styled(" [modified]", Style::default().fg(parse_color(&theme.placeholder_fg))));
    }
    f.render_widget(
        Paragraph::new(Line::from(header)).style(Style::default().fg(fg_color).bg(bg_color)),
        layout.header_area,
    );

    app.hit_areas.chips = layout.chips_area;
    app.hit_areas.chip_removals = render_chips(
        f,
        layout.chips_area,
        &app.tags,
        Some(app.chip_index),
        app.focus == Focus::Chips,
        &theme,
    );

    let props = TagInputProps::new(&app.tags)
        .placeholder(&app.config.placeholder)
        .suggestions(&app.suggestions);
    app.hit_areas.input = layout.input_area;
    render_tag_input(f, layout.input_area, &mut app.tag_input, &props, &theme);

    app.hit_areas.suggestions = render_suggestions(f, layout.input_area, layout.dropdown_area, &app.tag_input, &props, &theme);

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &theme);

    match app.mode {
        Mode::Help => render_help(f, area, &app.config),
        Mode::ConfirmQuit => render_confirm_quit(f, area, &app.collection_name, app.quit_selection, &theme),
        Mode::Edit => {}
    }
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", show(&kb.help))],
        Mode::ConfirmQuit => vec![
            "↑/↓: Choose".to_string(),
            "Enter: Confirm".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Edit => {
            let mut hints = match app.focus {
                Focus::Input => vec![
                    format!("{}: Add tag", show(&kb.commit)),
                    format!("{}: Remove last", show(&kb.remove_last)),
                    format!("{}/{}: Suggestions", show(&kb.suggestion_up), show(&kb.suggestion_down)),
                ],
                Focus::Chips => vec![
                    "←/→: Select tag".to_string(),
                    format!("{}: Remove tag", show(&kb.remove_chip)),
                ],
            };
            hints.push(format!("{}: Switch", show(&kb.next_field)));
            hints.push(format!("{}: Save", show(&kb.save)));
            hints.push(format!("{}: Copy", show(&kb.copy)));
            hints.push(format!("{}: Help", show(&kb.help)));
            hints.push(format!("{}: Quit", show(&kb.quit)));
            hints
        }
    }
}
