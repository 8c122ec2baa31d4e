use std::io;
use ratatui::{
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    layout::{Layout, Constraint, Direction, Rect},
    style::{Style, Color, Modifier},
    Terminal, Frame,
    text::Line,
    prelude::{Span, Text},
};
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    execute,
    event::{DisableMouseCapture, EnableMouseCapture},
};

use crate::controllers::app_controller::{App, EditorMode, Field, Severity};
use crate::views::widgets::centered_rect;

pub fn setup_terminal() -> io::Result<Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn restore_terminal(terminal: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

pub fn render_ui<B: ratatui::backend::Backend>(f: &mut Frame<B>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.size());

    render_feed(f, app, chunks[0]);
    render_status_line(f, app, chunks[1]);

    if app.editor.is_some() {
        render_editor(f, app);
    }
}

fn render_feed<B: ratatui::backend::Backend>(f: &mut Frame<B>, app: &mut App, area: Rect) {
    // Create the feed of posts
    let items: Vec<ListItem> = app.feed.items
        .iter()
        .map(|post| {
            // Header line with author and timestamp
            let verb = if post.is_edited() { "updated at" } else { "posted at" };
            let header = Line::from(vec![
                Span::styled(
                    format!("{} {} {}", post.author, verb, post.display_time()),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                )
            ]);

            let content = Text::raw(&post.content);

            let mut all_lines = vec![
                header,
                Line::from(""), // Empty line for spacing
            ];
            all_lines.extend(content.lines);
            if !post.image_url.is_empty() {
                all_lines.push(Line::from(Span::styled(
                    format!("image: {}", post.image_url),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            all_lines.push(Line::from(""));

            ListItem::new(all_lines)
                .style(Style::default())
        })
        .collect();

    let title = if app.loading {
        "Loading..."
    } else if app.submitting {
        "Saving..."
    } else if app.deleting {
        "Deleting..."
    } else {
        "Feed"
    };

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Gray)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        );

    f.render_stateful_widget(list, area, &mut app.feed.state);
}

fn render_status_line<B: ratatui::backend::Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let line = match &app.status {
        Some(status) => {
            let color = match status.severity {
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
            };
            Line::from(Span::styled(
                status.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            "j/k move  n new  e edit  d delete  r reload  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_editor<B: ratatui::backend::Backend>(f: &mut Frame<B>, app: &App) {
    let Some(editor) = &app.editor else {
        return;
    };

    let area = centered_rect(60, 60, f.size());
    f.render_widget(Clear, area);

    let title = match editor.mode {
        EditorMode::Create => "Create New Post",
        EditorMode::Edit => "Edit Post",
    };
    f.render_widget(Block::default().title(title).borders(Borders::ALL), area);

    // Editing never exposes the author field
    let mut constraints = vec![Constraint::Min(3), Constraint::Length(3)];
    if editor.mode == EditorMode::Create {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area);

    f.render_widget(
        field_widget("Content", &editor.draft.content, editor.field == Field::Content),
        chunks[0],
    );
    f.render_widget(
        field_widget("Image URL", &editor.draft.image_url, editor.field == Field::ImageUrl),
        chunks[1],
    );
    if editor.mode == EditorMode::Create {
        f.render_widget(
            field_widget("Author", &editor.draft.author, editor.field == Field::Author),
            chunks[2],
        );
    }

    let hint = Line::from(Span::styled(
        "Tab next field  Enter submit  Esc cancel",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(hint), chunks[chunks.len() - 1]);
}

fn field_widget<'a>(label: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Paragraph::new(value)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(label)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
}
