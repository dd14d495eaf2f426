use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Tabs, Wrap},
};
use spotswipe_core::{Place, Theme, View};

use crate::app::{App, CreateField, LoginField, Popup};

struct Palette {
    base: Style,
    accent: Color,
    muted: Color,
    like: Color,
    dislike: Color,
    bar: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            base: Style::default().fg(Color::White).bg(Color::Reset),
            accent: Color::Cyan,
            muted: Color::DarkGray,
            like: Color::Green,
            dislike: Color::Red,
            bar: Style::default().bg(Color::DarkGray).fg(Color::White),
        },
        Theme::Light => Palette {
            base: Style::default().fg(Color::Black).bg(Color::White),
            accent: Color::Blue,
            muted: Color::Gray,
            like: Color::Green,
            dislike: Color::Red,
            bar: Style::default().bg(Color::Gray).fg(Color::Black),
        },
    }
}

/// A rectangle of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn counts_line(place: &Place, colors: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("▲ {}", place.like_count),
            Style::default().fg(colors.like),
        ),
        Span::raw("   "),
        Span::styled(
            format!("▼ {}", place.dislike_count),
            Style::default().fg(colors.dislike),
        ),
    ])
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let colors = palette(app.theme);

    frame.render_widget(Block::default().style(colors.base), area);

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(area);

    render_header(app, &colors, frame, header_area);

    match app.session.current_view() {
        View::Landing => render_landing(app, &colors, frame, body_area),
        View::Home => render_home(app, &colors, frame, body_area),
        View::Likes => render_likes(app, &colors, frame, body_area),
        View::Stats => render_stats(app, &colors, frame, body_area),
    }

    render_footer(app, &colors, frame, footer_area);

    // Popups, highest priority last
    if app.session.is_place_detail_open() {
        render_place_detail(app, &colors, frame, area);
    }
    match app.popup {
        Popup::Login => render_login(app, &colors, frame, area),
        Popup::CreatePlace => render_create_place(app, &colors, frame, area),
        Popup::None => {}
    }
}

fn render_header(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let who = match app.session.auth().username() {
        Some(username) => format!(" @{} ", username),
        None if app.session.is_guest_mode() => " guest ".to_string(),
        None => String::new(),
    };

    let mut spans = vec![
        Span::styled(" SpotSwipe ", Style::default().fg(colors.accent).bold()),
        Span::styled(who, Style::default().fg(colors.like)),
    ];
    if app.session.is_loading() {
        spans.push(Span::styled(
            format!(" syncing{}", app.loading_dots()),
            Style::default().fg(colors.muted),
        ));
    }
    spans.push(Span::styled(
        format!(" v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(colors.muted),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(colors.bar), area);
}

fn render_footer(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let [tabs_area, hints_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    if app.session.current_view() != View::Landing {
        let views = View::navigable();
        let titles: Vec<String> = views
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{} {}", i + 1, v.display_name()))
            .collect();
        let selected = views
            .iter()
            .position(|v| *v == app.session.current_view())
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(colors.muted))
            .highlight_style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, tabs_area);
    }

    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {} ", status),
            Style::default().fg(colors.accent),
        ))
    } else if let Some(error) = app.session.last_error() {
        Line::from(Span::styled(
            format!(" {} (r to retry) ", error),
            Style::default().fg(colors.dislike),
        ))
    } else {
        let key_style = colors.bar;
        let view = app.session.current_view();
        let hints: &[(&str, &str)] = match (view, app.session.is_place_detail_open()) {
            (_, true) => &[("Esc", "close")],
            (View::Landing, _) => &[
                ("g", "guest"),
                ("l", "log in"),
                ("t", "theme"),
                ("q", "quit"),
            ],
            (View::Home, _) => &[
                ("←/h", "nope"),
                ("→/l", "like"),
                ("i", "details"),
                ("Tab", "next"),
                ("o", "log out"),
            ],
            (View::Likes | View::Stats, _) => &[
                ("j/k", "move"),
                ("Enter", "details"),
                ("r", "reload"),
                ("c", "add place"),
                ("o", "log out"),
            ],
        };
        let mut spans = Vec::new();
        for (k, label) in hints {
            spans.push(Span::styled(format!(" {} ", k), key_style));
            spans.push(Span::raw(format!(" {}  ", label)));
        }
        spans.push(Span::styled(
            format!("[{}]", app.theme.as_str()),
            Style::default().fg(colors.muted),
        ));
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line), hints_area);
}

fn render_landing(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let card = centered(area, 52, 11);

    let mut lines = vec![
        Line::from(Span::styled("SpotSwipe", Style::default().fg(colors.accent).bold())),
        Line::from(Span::styled(
            "Swipe through places worth visiting.",
            Style::default().fg(colors.muted),
        )),
        Line::from(""),
    ];

    let places = app.session.places();
    if places.is_empty() {
        lines.push(Line::from(if app.session.is_loading() {
            format!("Loading places{}", app.loading_dots())
        } else {
            "No places yet".to_string()
        }));
    } else {
        lines.push(Line::from(format!(
            "{} places · {} likes · {} dislikes",
            places.len(),
            app.session.total_likes(),
            app.session.total_dislikes()
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" g ", colors.bar),
        Span::raw(" continue as guest    "),
        Span::styled(" l ", colors.bar),
        Span::raw(" log in"),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, card);
}

fn render_home(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let card_area = centered(area, 56, 14);
    let remaining = app.session.swipe_stack().len();
    let total = app.session.places().len();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent))
        .title(format!(" {} of {} left ", remaining, total));

    let Some(place) = app.session.top_card() else {
        let message = if app.session.is_loading() {
            format!("Loading places{}", app.loading_dots())
        } else if total == 0 {
            "No places to show yet. Press r to reload.".to_string()
        } else {
            "You've seen every place. Check your likes with 2.".to_string()
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, card_area);
        return;
    };

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let [body_area, gauge_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let mut lines = vec![
        Line::from(Span::styled(place.name.clone(), Style::default().bold())),
        Line::from(""),
    ];
    if let Some(address) = &place.address {
        lines.push(Line::from(Span::styled(
            address.clone(),
            Style::default().fg(colors.muted),
        )));
    }
    if let Some(description) = &place.description {
        lines.push(Line::from(description.clone()));
        lines.push(Line::from(""));
    }
    lines.push(counts_line(place, colors));

    let body = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, body_area);

    let (ratio, label) = match place.approval() {
        Some(ratio) => (ratio, format!("{:.0}% liked", ratio * 100.0)),
        None => (0.0, "no votes yet".to_string()),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors.like).bg(colors.dislike))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, gauge_area);
}

fn render_likes(app: &mut App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent))
        .title(format!(
            " Liked this session ({}) ",
            app.session.liked_places().len()
        ));

    if app.session.liked_places().is_empty() {
        let empty = Paragraph::new("Nothing liked yet. Swipe right on a place you'd visit.")
            .style(Style::default().fg(colors.muted))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .session
        .liked_places()
        .iter()
        .map(|place| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {} ", place.name)),
                Span::styled(
                    place.address.clone().unwrap_or_default(),
                    Style::default().fg(colors.muted),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut app.likes_state);
}

fn render_stats(app: &mut App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let [summary_area, list_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let likes = app.session.total_likes();
    let dislikes = app.session.total_dislikes();
    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("▲ {} likes", likes),
                Style::default().fg(colors.like).bold(),
            ),
            Span::raw("    "),
            Span::styled(
                format!("▼ {} dislikes", dislikes),
                Style::default().fg(colors.dislike).bold(),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} places · {} swiped this session",
                app.session.places().len(),
                app.session.swiped_ids().len()
            ),
            Style::default().fg(colors.muted),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.accent))
            .title(" Community "),
    );
    frame.render_widget(summary, summary_area);

    let items: Vec<ListItem> = app
        .ranked_places()
        .into_iter()
        .enumerate()
        .map(|(rank, place)| {
            let mut line = vec![Span::raw(format!("{:>3}. {} ", rank + 1, place.name))];
            line.extend(counts_line(place, colors).spans);
            ListItem::new(Line::from(line))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.muted))
                .title(" Top places "),
        )
        .highlight_style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut app.stats_state);
}

fn render_place_detail(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let Some(place) = app.session.selected_place() else {
        return;
    };

    let popup_area = centered(area, 60, 12);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![counts_line(place, colors), Line::from("")];
    if let Some(address) = &place.address {
        lines.push(Line::from(vec![
            Span::styled("Address: ", Style::default().fg(colors.muted)),
            Span::raw(address.clone()),
        ]));
    }
    lines.push(Line::from(
        place
            .description
            .clone()
            .unwrap_or_else(|| "No description yet.".to_string()),
    ));

    let paragraph = Paragraph::new(Text::from(lines))
        .style(colors.base)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent))
                .title(format!(" {} (Esc to close) ", place.name)),
        );
    frame.render_widget(paragraph, popup_area);
}

/// The one-line row `offset` lines below the top of `inner`, if it fits.
fn form_row(inner: Rect, offset: u16) -> Option<Rect> {
    let y = inner.y.saturating_add(offset);
    (inner.width > 0 && y < inner.bottom()).then(|| Rect::new(inner.x, y, inner.width, 1))
}

/// Render one labelled single-line input inside a form popup.
fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    active: bool,
    colors: &Palette,
) {
    let label_style = if active {
        Style::default().fg(colors.accent).bold()
    } else {
        Style::default().fg(colors.muted)
    };
    let line = Line::from(vec![
        Span::styled(format!("{:<12}", label), label_style),
        Span::raw(value.to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if active {
        let cursor_x = (12 + value.chars().count() as u16).min(area.width.saturating_sub(1));
        frame.set_cursor_position((area.x + cursor_x, area.y));
    }
}

fn render_login(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let popup_area = centered(area, 50, 8);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent))
        .style(colors.base)
        .title(" Log in (Enter to submit, Esc to cancel) ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let form = &app.login_form;
    let masked = "*".repeat(form.password.chars().count());

    let fields = [
        ("Username", form.username.as_str(), LoginField::Username),
        ("Password", masked.as_str(), LoginField::Password),
    ];
    for (row, (label, value, field)) in fields.into_iter().enumerate() {
        if let Some(row_area) = form_row(inner, 1 + row as u16) {
            render_field(frame, row_area, label, value, form.field == field, colors);
        }
    }

    render_form_error(form.error.as_deref(), colors, frame, form_row(inner, 4));
}

fn render_create_place(app: &App, colors: &Palette, frame: &mut Frame, area: Rect) {
    let popup_area = centered(area, 60, 9);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.like))
        .style(colors.base)
        .title(" Add a place (Tab next field, Enter to save) ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let form = &app.create_form;
    let fields = [
        ("Name", &form.name, CreateField::Name),
        ("Description", &form.description, CreateField::Description),
        ("Address", &form.address, CreateField::Address),
    ];
    for (row, (label, value, field)) in fields.into_iter().enumerate() {
        if let Some(row_area) = form_row(inner, 1 + row as u16) {
            render_field(frame, row_area, label, value, form.field == field, colors);
        }
    }

    render_form_error(form.error.as_deref(), colors, frame, form_row(inner, 5));
}

fn render_form_error(error: Option<&str>, colors: &Palette, frame: &mut Frame, row: Option<Rect>) {
    if let (Some(error), Some(row)) = (error, row) {
        let error = Paragraph::new(error).style(Style::default().fg(colors.dislike));
        frame.render_widget(error, row);
    }
}
