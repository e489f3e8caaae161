//! Rendering for the zdetach TUI.
//!
//! One screen: a header with the session state, the package checkbox list,
//! the search input, and a footer carrying key hints and the most recent
//! notice. The list area doubles as the surface for the loading, fatal, and
//! no-match placeholders.
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Position,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    state::{AppState, LoadingState, NoticeLevel},
    theme::theme,
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Draw one frame.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let th = theme();
    let area = f.area();

    f.render_widget(Block::default().style(Style::default().bg(th.base)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(f, app, chunks[0]);
    draw_list(f, app, chunks[1]);
    draw_input(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    let state_label = match app.loading {
        LoadingState::Idle | LoadingState::Loading => "loading",
        LoadingState::Ready => "ready",
        LoadingState::Committing => "committing",
        LoadingState::Error => "error",
    };
    let mut spans = vec![
        Span::styled(
            " zdetach ",
            Style::default().fg(th.mauve).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{}/{} detached", app.selection.len(), app.entries.len()),
            Style::default().fg(th.subtext),
        ),
        Span::styled(format!("  [{state_label}]"), Style::default().fg(th.overlay)),
    ];
    if app.loading.busy() {
        let frame = SPINNER[app.spinner_frame % SPINNER.len()];
        spans.push(Span::styled(
            format!(" {frame}"),
            Style::default().fg(th.sapphire),
        ));
    }
    if app.dry_run {
        spans.push(Span::styled(
            "  DRY RUN",
            Style::default().fg(th.yellow).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_list(f: &mut Frame, app: &mut AppState, area: Rect) {
    let th = theme();
    let block = Block::default()
        .title(Span::styled(
            format!("Apps ({})", app.view.len()),
            Style::default().fg(th.overlay),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(th.surface));

    let placeholder = match app.loading {
        LoadingState::Idle | LoadingState::Loading => Some(("Loading apps...", th.subtext)),
        LoadingState::Error => Some(("No apps found or failed to load.", th.red)),
        _ if app.no_match => Some(("No apps match your search.", th.subtext)),
        _ => None,
    };
    if let Some((text, color)) = placeholder {
        let p = Paragraph::new(text)
            .style(Style::default().fg(color).bg(th.base))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = app
        .view
        .iter()
        .map(|&i| {
            let e = &app.entries[i];
            let checked = app.selection.is_selected(&e.name);
            let mut segs = vec![
                Span::styled(
                    if checked { "[x] " } else { "[ ] " },
                    Style::default().fg(if checked { th.green } else { th.overlay }),
                ),
                Span::styled(
                    e.name.clone(),
                    Style::default().fg(th.text).add_modifier(if checked {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
                ),
            ];
            if e.orphaned {
                segs.push(Span::styled(
                    "  (not installed)",
                    Style::default().fg(th.yellow),
                ));
            }
            ListItem::new(Line::from(segs))
        })
        .collect();

    let list = List::new(items)
        .style(Style::default().fg(th.text).bg(th.base))
        .block(block)
        .highlight_style(Style::default().fg(th.crust).bg(th.lavender))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_input(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    let active = app.loading.interactive();
    let input_line = Line::from(vec![
        Span::styled(
            "> ",
            Style::default().fg(if active { th.sapphire } else { th.overlay }),
        ),
        Span::styled(
            app.input.clone(),
            Style::default().fg(if active { th.text } else { th.subtext }),
        ),
    ]);
    let input = Paragraph::new(input_line).block(
        Block::default()
            .title(Span::styled("Search", Style::default().fg(th.overlay)))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if active { th.mauve } else { th.surface })),
    );
    f.render_widget(input, area);

    if active {
        let right = area.x + area.width.saturating_sub(1);
        let w = app.input.as_str().width() as u16;
        let x = std::cmp::min(area.x + 1 + 2 + w, right);
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn draw_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let hints = Paragraph::new(Line::from(Span::styled(
        " space/enter toggle · type to search · ^S commit · ^R reload · esc quit",
        Style::default().fg(th.overlay),
    )));
    f.render_widget(hints, rows[0]);

    if let Some(notice) = app.latest_notice() {
        let color = match notice.level {
            NoticeLevel::Info => th.green,
            NoticeLevel::Warn => th.yellow,
            NoticeLevel::Error => th.red,
        };
        let p = Paragraph::new(Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(color),
        )));
        f.render_widget(p, rows[1]);
    }
}
