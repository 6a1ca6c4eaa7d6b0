//! TUI rendering for Mediq using ratatui.

mod input;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Palette, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use mediq_engine::{App, DisplayBlock, EXTERNAL_LINKS, Speaker, Turn};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let palette = palette(app.high_contrast());

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Transcript
            Constraint::Length(1), // Suggestion chips
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_transcript(frame, app, chunks[0], &palette);
    draw_chips(frame, app, chunks[1], &palette);
    draw_input(frame, app, chunks[2], &palette);
    draw_status_bar(frame, app, chunks[3], &palette);

    if app.help_visible() {
        draw_help_panel(frame, chunks[0], &palette);
    }
}

fn draw_transcript(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette) {
    let block = Block::default()
        .title(" Mediq ")
        .title_style(styles::assistant_name(palette))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);

    let mut lines: Vec<Line> = Vec::new();
    for (index, turn) in app.transcript().iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        push_turn(&mut lines, turn, palette);
    }

    if app.is_thinking() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!("typing {}", spinner_frame(app.ticks())),
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Starting up...",
            Style::default().fg(palette.text_muted),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });

    // Pin to the bottom unless the user scrolled up; `scroll` is an offset
    // in lines from the bottom.
    let total = paragraph.line_count(inner.width) as u16;
    let max_scroll = total.saturating_sub(inner.height);
    app.update_scroll_max(max_scroll);
    let offset = max_scroll.saturating_sub(app.scroll());

    frame.render_widget(paragraph.block(block).scroll((offset, 0)), area);
}

fn push_turn(lines: &mut Vec<Line<'_>>, turn: &Turn, palette: &Palette) {
    let (name, name_style) = match turn.speaker() {
        Speaker::User => ("You", styles::user_name(palette)),
        Speaker::Assistant => ("Mediq", styles::assistant_name(palette)),
    };
    lines.push(Line::from(Span::styled(name, name_style)));

    for block in turn.payload().blocks() {
        match block {
            DisplayBlock::Paragraph(text) => {
                lines.push(Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(palette.text_secondary),
                )));
            }
            DisplayBlock::Emphasis(text) => {
                lines.push(Line::from(Span::styled(
                    text.clone(),
                    styles::emphasis(palette),
                )));
            }
            DisplayBlock::Labeled { label, text } => {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label}: "), styles::emphasis(palette)),
                    Span::styled(text.clone(), Style::default().fg(palette.text_secondary)),
                ]));
            }
            DisplayBlock::Bullets { heading, items } => {
                lines.push(Line::from(Span::styled(
                    (*heading).to_string(),
                    Style::default()
                        .fg(palette.warning)
                        .add_modifier(Modifier::BOLD),
                )));
                for item in items {
                    lines.push(Line::from(Span::styled(
                        format!("  • {item}"),
                        Style::default().fg(palette.warning),
                    )));
                }
            }
            DisplayBlock::Links { heading, links } => {
                lines.push(Line::from(Span::styled(
                    (*heading).to_string(),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )));
                for link in links {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("  • {} ", link.name),
                            Style::default().fg(palette.text_secondary),
                        ),
                        Span::styled(
                            link.url,
                            Style::default()
                                .fg(palette.link)
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                    ]));
                }
            }
        }
    }
}

fn draw_chips(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let Some(suggestions) = app.suggestions() else {
        return;
    };

    let mut spans: Vec<Span> = Vec::with_capacity(suggestions.len() * 2 + 1);
    for (index, text) in suggestions.iter().enumerate() {
        spans.push(Span::styled(
            format!(" {}:{text} ", index + 1),
            Style::default().fg(palette.accent).bg(palette.bg_highlight),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        "(Alt+number to send)",
        Style::default().fg(palette.text_muted),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);

    let paragraph = Paragraph::new(app.input().text())
        .style(Style::default().fg(palette.text_primary))
        .block(block);
    frame.render_widget(paragraph, area);

    let cursor_x = inner.x + app.input().prefix().width() as u16;
    frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mut spans = vec![Span::styled(
        " Enter send · ↑/↓ scroll · F1 help · Esc quit ",
        Style::default().fg(palette.text_muted),
    )];

    if app.is_degraded() {
        spans.push(Span::styled(
            " knowledge base unavailable ",
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        ));
    } else if app.condition_count() > 0 {
        spans.push(Span::styled(
            format!(" {} conditions loaded ", app.condition_count()),
            Style::default().fg(palette.text_muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_panel(frame: &mut Frame, area: Rect, palette: &Palette) {
    let width = 44.min(area.width.saturating_sub(2));
    let panel = Rect {
        x: area.right().saturating_sub(width),
        y: area.y,
        width,
        height: area.height,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  Enter      send message"),
        Line::from("  Alt+1..5   send suggestion"),
        Line::from("  Up/Down    scroll transcript"),
        Line::from("  F1/Ctrl+H  toggle this panel"),
        Line::from("  Esc        quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Trusted resources",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    for link in EXTERNAL_LINKS {
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", link.name)),
            Span::styled(link.url, Style::default().fg(palette.link)),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_panel));

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(Style::default().fg(palette.text_secondary))
            .block(block),
        panel,
    );
}
