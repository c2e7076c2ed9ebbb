use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use socialspark_core::content::{self, SUGGESTIONS};
use socialspark_core::markup::{self, Block as MarkupBlock, Inline, InlineStyle};
use socialspark_core::ChatRole;
use crate::app::{App, FocusPane, InputMode, OnboardingFocus, Screen};

const ACCENT: Color = Color::Magenta;

fn inline_style(style: InlineStyle) -> Style {
    let mut out = Style::default();
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.strikethrough {
        out = out.add_modifier(Modifier::CROSSED_OUT);
    }
    if style.code {
        out = out.fg(Color::Yellow);
    }
    if style.link {
        out = out.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
    }
    out
}

/// Display columns taken by `text`; wide characters count twice.
fn text_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn char_width(c: char) -> usize {
    let mut buf = [0; 4];
    text_width(c.encode_utf8(&mut buf))
}

/// Word-wrap styled spans to `width` columns, prefixing every line with
/// `indent`. Words longer than a line are split.
fn wrap_spans(spans: &[Span<'static>], width: usize, indent: &Span<'static>) -> Vec<Line<'static>> {
    let width = width.saturating_sub(indent.width()).max(1);

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_len = 0;

    let take_line = |current: &mut Vec<Span<'static>>| {
        let mut line = vec![indent.clone()];
        line.append(current);
        Line::from(line)
    };

    // Spaces are only emitted once the following word is known to fit.
    let mut pending_space: Option<Style> = None;

    for span in spans {
        for (i, word) in span.content.split(' ').enumerate() {
            if i > 0 && current_len > 0 {
                pending_space = Some(span.style);
            }

            if word.is_empty() {
                continue;
            }
            let word_width = text_width(word);

            let space = usize::from(pending_space.is_some());
            if current_len > 0 && current_len + space + word_width > width {
                lines.push(take_line(&mut current));
                current_len = 0;
                pending_space = None;
            }
            if let Some(style) = pending_space.take() {
                current.push(Span::styled(" ", style));
                current_len += 1;
            }

            if current_len + word_width <= width {
                current_len += word_width;
                current.push(Span::styled(word.to_string(), span.style));
                continue;
            }

            let mut piece = String::new();
            for c in word.chars() {
                let w = char_width(c);
                if current_len > 0 && current_len + w > width {
                    if !piece.is_empty() {
                        current.push(Span::styled(std::mem::take(&mut piece), span.style));
                    }
                    lines.push(take_line(&mut current));
                    current_len = 0;
                }
                piece.push(c);
                current_len += w;
            }
            if !piece.is_empty() {
                current.push(Span::styled(piece, span.style));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(take_line(&mut current));
    }
    lines
}

/// Split inlines on hard breaks into spans per visual paragraph line.
fn inline_rows(inlines: &[Inline], base: Style) -> Vec<Vec<Span<'static>>> {
    let mut rows = vec![Vec::new()];
    for inline in inlines {
        let style = base.patch(inline_style(inline.style));
        for (i, part) in inline.text.split('\n').enumerate() {
            if i > 0 {
                rows.push(Vec::new());
            }
            if !part.is_empty() {
                if let Some(row) = rows.last_mut() {
                    row.push(Span::styled(part.to_string(), style));
                }
            }
        }
    }
    rows
}

fn wrap_inlines(inlines: &[Inline], width: usize, indent: Span<'static>, base: Style) -> Vec<Line<'static>> {
    inline_rows(inlines, base)
        .iter()
        .flat_map(|row| wrap_spans(row, width, &indent))
        .collect()
}

fn table_lines(header: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>]) -> Vec<Line<'static>> {
    let columns = header.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(text_width(&markup::inline_text(cell)));
        }
    }

    let border = Style::default().fg(Color::DarkGray);
    let render_row = |row: &[Vec<Inline>], base: Style| -> Line<'static> {
        let mut spans = Vec::new();
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", border));
            }
            let cell = row.get(i).map(Vec::as_slice).unwrap_or(&[]);
            let mut used = 0;
            for inline in cell {
                let text = inline.text.replace('\n', " ");
                used += text_width(&text);
                spans.push(Span::styled(text, base.patch(inline_style(inline.style))));
            }
            spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
        }
        Line::from(spans)
    };

    let mut lines = vec![render_row(header, Style::default().add_modifier(Modifier::BOLD))];
    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    lines.push(Line::from(Span::styled(separator.join("─┼─"), border)));
    for row in rows {
        lines.push(render_row(row, Style::default()));
    }
    lines
}

/// Render sanitized message content to display lines.
fn content_lines(text: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let blocks = markup::render(text);
    for (i, block) in blocks.iter().enumerate() {
        let continues_list = matches!(block, MarkupBlock::ListItem { .. })
            && matches!(
                i.checked_sub(1).and_then(|prev| blocks.get(prev)),
                Some(MarkupBlock::ListItem { .. })
            );
        if i > 0 && !continues_list {
            lines.push(Line::default());
        }
        match block {
            MarkupBlock::Paragraph(inlines) => {
                lines.extend(wrap_inlines(inlines, width, Span::raw(""), Style::default()));
            }
            MarkupBlock::Heading { level, content } => {
                let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                if *level <= 2 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                lines.extend(wrap_inlines(content, width, Span::raw(""), style));
            }
            MarkupBlock::CodeBlock { language, code } => {
                let gutter = Style::default().fg(Color::DarkGray);
                if let Some(language) = language {
                    lines.push(Line::from(Span::styled(format!("┌ {}", language), gutter)));
                }
                for code_line in code.lines() {
                    lines.push(Line::from(vec![
                        Span::styled("│ ", gutter),
                        Span::styled(code_line.to_string(), Style::default().fg(Color::Green)),
                    ]));
                }
            }
            MarkupBlock::ListItem { depth, marker, content } => {
                let prefix = format!("{}{} ", "  ".repeat(*depth), marker);
                let hang = " ".repeat(text_width(&prefix));
                let mut item = wrap_inlines(content, width, Span::raw(hang), Style::default());
                if let Some(first) = item.first_mut() {
                    if let Some(lead) = first.spans.first_mut() {
                        *lead = Span::styled(prefix, Style::default().fg(ACCENT));
                    }
                }
                lines.extend(item);
            }
            MarkupBlock::Quote(inlines) => {
                let bar = Span::styled("│ ", Style::default().fg(Color::DarkGray));
                lines.extend(wrap_inlines(inlines, width, bar, Style::default().add_modifier(Modifier::ITALIC)));
            }
            MarkupBlock::Table { header, rows } => lines.extend(table_lines(header, rows)),
            MarkupBlock::Rule => {
                lines.push(Line::from(Span::styled(
                    "─".repeat(width.min(40)),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }
    lines
}

/// Every line of the transcript, including the pending-reply indicator.
fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let state = app.session.state();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in state.transcript() {
        match msg.role {
            ChatRole::User => lines.push(Line::from(Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))),
            ChatRole::Assistant => lines.push(Line::from(Span::styled(
                "✦ SocialSpark:",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ))),
        }
        lines.extend(content_lines(&msg.content, width));
        lines.push(Line::default());
    }

    if state.is_sending() {
        lines.push(Line::from(Span::styled(
            "✦ SocialSpark:",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    app.transcript_area = None;
    app.landing_area = None;
    match app.screen {
        Screen::Landing => render_landing(app, frame, body_area),
        Screen::Chat if app.is_connected() => render_chat(app, frame, body_area),
        Screen::Chat => render_onboarding(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" ✦ {} ", content::BRAND),
        Style::default().fg(ACCENT).bold(),
    )];

    if app.screen == Screen::Chat {
        spans.push(Span::styled("Chat ", Style::default().fg(Color::White)));
        if app.is_connected() {
            spans.push(Span::styled(
                " ✓ Social Media Connected ",
                Style::default().fg(Color::Green),
            ));
        }
    }

    spans.push(Span::styled(
        format!(" {} ", app.backend_url),
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match (app.screen, app.is_connected()) {
        (Screen::Landing, _) => " HOME ",
        (Screen::Chat, false) => " CONNECT ",
        (Screen::Chat, true) => " CHAT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [Span::styled(key, key_style), Span::styled(label, label_style)]
    };

    let hints: Vec<Span> = match (app.screen, app.is_connected(), app.input_mode) {
        (Screen::Landing, _, _) => [
            hint(" Enter ", " get started "),
            hint(" j/k ", " scroll "),
            hint(" q ", " quit "),
        ]
        .concat(),
        (Screen::Chat, false, InputMode::Editing) => [
            hint(" Enter ", " connect "),
            hint(" Tab ", " next "),
            hint(" Esc ", " done "),
        ]
        .concat(),
        (Screen::Chat, false, InputMode::Normal) => [
            hint(" Enter ", " select "),
            hint(" Tab ", " next "),
            hint(" i ", " edit "),
            hint(" s ", " skip "),
            hint(" b ", " home "),
            hint(" q ", " quit "),
        ]
        .concat(),
        (Screen::Chat, true, InputMode::Editing) => [
            hint(" Enter ", " send "),
            hint(" Tab ", " suggestions "),
            hint(" Esc ", " done "),
        ]
        .concat(),
        (Screen::Chat, true, InputMode::Normal) => {
            let mut hints = match app.focus {
                FocusPane::Suggestions => [hint(" j/k ", " choose "), hint(" Enter ", " use ")].concat(),
                FocusPane::Transcript => [hint(" j/k ", " scroll "), hint(" g/G ", " top/bottom ")].concat(),
                FocusPane::Input => [hint(" i ", " type ")].concat(),
            };
            hints.extend([hint(" Tab ", " focus "), hint(" b ", " home "), hint(" q ", " quit ")].concat());
            hints
        }
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn landing_lines(width: usize) -> Vec<Line<'static>> {
    let landing = content::landing();
    let width = width.min(90);
    let dim = Style::default().fg(Color::Gray);
    let title = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let wrap = |text: &str, style: Style| wrap_spans(&[Span::styled(text.to_string(), style)], width, &Span::raw(""));

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(format!(" ⚡ {} ", landing.badge), Style::default().fg(ACCENT))),
        Line::default(),
        Line::from(Span::styled(landing.headline[0], title)),
        Line::from(Span::styled(landing.headline[1], Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))),
        Line::default(),
    ];
    lines.extend(wrap(landing.pitch, dim));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(" ▶ {} (Enter) ", landing.primary_action),
        Style::default().bg(ACCENT).fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(
        landing
            .checks
            .iter()
            .flat_map(|check| {
                [
                    Span::styled("✓ ", Style::default().fg(Color::Green)),
                    Span::styled(format!("{}   ", check), dim),
                ]
            })
            .collect::<Vec<_>>(),
    ));
    lines.push(Line::default());
    lines.push(Line::from(
        landing
            .stats
            .iter()
            .flat_map(|stat| {
                [
                    Span::styled(stat.number, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
                    Span::styled(format!(" {}    ", stat.label), dim),
                ]
            })
            .collect::<Vec<_>>(),
    ));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(landing.features_title, title)));
    lines.extend(wrap(landing.features_subtitle, dim));
    for feature in landing.features {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            feature.title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.extend(wrap(feature.description, dim));
    }
    lines.push(Line::default());
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(landing.cta_headline[0], title)));
    lines.push(Line::from(Span::styled(
        landing.cta_headline[1],
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    lines.extend(wrap(landing.cta_body, dim));
    lines.push(Line::from(Span::styled(
        format!(" ▶ {} (Enter) ", landing.cta_action),
        Style::default().bg(ACCENT).fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(landing.footer_links.join("  ·  "), dim)));
    lines.push(Line::from(Span::styled(landing.copyright, Style::default().fg(Color::DarkGray))));
    lines
}

fn render_landing(app: &mut App, frame: &mut Frame, area: Rect) {
    app.landing_area = Some(area);

    let lines = landing_lines(area.width.saturating_sub(4) as usize);
    let max_scroll = (lines.len() as u16).saturating_sub(area.height);
    app.landing_scroll = app.landing_scroll.min(max_scroll);

    let landing = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .scroll((app.landing_scroll, 0));
    frame.render_widget(landing, area);
}

fn button<'a>(label: String, focused: bool, enabled: bool) -> Paragraph<'a> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let text = if enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(Span::styled(label, text))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)))
}

fn render_onboarding(app: &mut App, frame: &mut Frame, area: Rect) {
    let width = area.width.min(72);
    let [_, column, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(area);

    let state = app.session.state();
    let banner_height = if state.transient_error().is_some() { 3 } else { 0 };

    let [intro_area, banner_area, handle_area, connect_area, or_area, skip_area, benefits_area, _] =
        Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(content::ONBOARDING_BENEFITS.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .areas(column);

    let intro = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(content::ONBOARDING_TITLE, Style::default().fg(Color::White).bold())),
        Line::from(Span::styled(content::ONBOARDING_BODY, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, intro_area);

    if let Some(error) = state.transient_error() {
        let banner = Paragraph::new(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
        frame.render_widget(banner, banner_area);
    }

    // Handle input
    let editing = app.input_mode == InputMode::Editing && app.onboarding_focus == OnboardingFocus::Handle;
    let handle_border = if editing || app.onboarding_focus == OnboardingFocus::Handle {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let handle_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(handle_border))
        .title(" Social Media Handle ");
    let (visible, cursor_x) = visible_input(&app.handle_input, app.handle_cursor, handle_area);
    let handle = if app.handle_input.is_empty() {
        Paragraph::new(Span::styled(content::HANDLE_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(Span::styled(visible, Style::default().fg(Color::Cyan)))
    };
    frame.render_widget(handle.block(handle_block), handle_area);

    let connect_label = if state.is_connecting() {
        format!("Processing{}", ".".repeat(app.animation_frame as usize + 1))
    } else {
        "✦ Connect Account".to_string()
    };
    frame.render_widget(
        button(connect_label, app.onboarding_focus == OnboardingFocus::Connect, app.can_connect()),
        connect_area,
    );

    frame.render_widget(
        Paragraph::new(Span::styled("or", Style::default().fg(Color::Gray))).alignment(Alignment::Center),
        or_area,
    );

    frame.render_widget(
        button(
            "Continue without connecting".to_string(),
            app.onboarding_focus == OnboardingFocus::Skip,
            true,
        ),
        skip_area,
    );

    let benefits: Vec<Line> = content::ONBOARDING_BENEFITS
        .iter()
        .map(|b| Line::from(vec![Span::styled(" • ", Style::default().fg(ACCENT)), Span::raw(*b)]))
        .collect();
    let benefits = Paragraph::new(benefits).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" What you'll get "),
    );
    frame.render_widget(benefits, benefits_area);

    if editing {
        frame.set_cursor_position((handle_area.x + cursor_x + 1, handle_area.y + 1));
    }
}

/// Visible slice of a single-line input, scrolled so the cursor stays in
/// view, and the cursor column within it.
fn visible_input(text: &str, cursor: usize, area: Rect) -> (String, u16) {
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    // Drop leading characters until the cursor cell fits.
    let mut offset = 0;
    let mut before: usize = chars[..cursor].iter().map(|c| char_width(*c)).sum();
    while offset < cursor && before + 1 > inner_width {
        before -= char_width(chars[offset]);
        offset += 1;
    }

    let mut used = 0;
    let visible = chars[offset..]
        .iter()
        .take_while(|c| {
            used += char_width(**c);
            used <= inner_width
        })
        .collect();
    (visible, before as u16)
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [sidebar_area, chat_area] = Layout::horizontal([
        Constraint::Length(34.min(area.width / 3)),
        Constraint::Min(0),
    ])
    .areas(area);

    render_sidebar(app, frame, sidebar_area);

    let banner = app.session.state().transient_error().map(str::to_string);
    let [transcript_area, banner_area, input_area, hint_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(u16::from(banner.is_some())),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(chat_area);

    if let Some(error) = banner {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" ⚠ {}", error), Style::default().fg(Color::Red))),
            banner_area,
        );
    }

    app.transcript_area = Some(transcript_area);

    // Inner size minus borders
    let inner_height = transcript_area.height.saturating_sub(2);
    let inner_width = transcript_area.width.saturating_sub(2);

    let transcript_focused = app.focus == FocusPane::Transcript;
    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if transcript_focused { Color::Cyan } else { Color::DarkGray }))
        .title(" Conversation ");

    let state = app.session.state();
    if state.transcript().is_empty() && !state.is_sending() {
        app.set_chat_metrics(0, inner_height, inner_width);
        let empty = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled("💬", Style::default().fg(ACCENT))),
            Line::from(Span::styled(content::EMPTY_CHAT_TITLE, Style::default().fg(Color::White).bold())),
            Line::from(Span::styled(content::EMPTY_CHAT_BODY, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(transcript_block);
        frame.render_widget(empty, transcript_area);
    } else {
        let lines = transcript_lines(app, inner_width as usize);
        let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        app.set_chat_metrics(total, inner_height, inner_width);

        let transcript = Paragraph::new(Text::from(lines))
            .block(transcript_block)
            .scroll((app.chat_scroll, 0));
        frame.render_widget(transcript, transcript_area);
    }

    // Input box, disabled while a reply is pending
    let sending = app.session.state().is_sending();
    let editing = app.input_mode == InputMode::Editing && app.focus == FocusPane::Input;
    let input_border = if sending {
        Color::DarkGray
    } else if editing || app.focus == FocusPane::Input {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border))
        .title(if sending { " Waiting for reply... " } else { " Message " });

    let draft = app.session.state().draft_input();
    let (visible, cursor_x) = visible_input(draft, app.draft_cursor, input_area);
    let input = if draft.is_empty() {
        Paragraph::new(Span::styled(content::INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else if sending {
        Paragraph::new(Span::styled(visible, Style::default().fg(Color::DarkGray)))
    } else {
        // Cyan matches the "You:" label
        Paragraph::new(Span::styled(visible, Style::default().fg(Color::Cyan)))
    };
    frame.render_widget(input.block(input_block), input_area);

    let hint_style = if app.can_send() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", content::INPUT_HINT), hint_style)),
        hint_area,
    );

    if editing && !sending {
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn render_sidebar(app: &mut App, frame: &mut Frame, area: Rect) {
    let [suggestions_area, tips_area] = Layout::vertical([
        Constraint::Length(SUGGESTIONS.len() as u16 + 2),
        Constraint::Min(0),
    ])
    .areas(area);

    let focused = app.focus == FocusPane::Suggestions;
    let items: Vec<ListItem> = SUGGESTIONS.iter().map(|s| ListItem::new(*s)).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
                .title(" ✦ Suggested Questions "),
        )
        .highlight_style(if focused {
            Style::default().bg(ACCENT).fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, suggestions_area, &mut app.suggestion_state);

    let tips = Paragraph::new(Span::styled(content::CHAT_TIPS, Style::default().fg(Color::Gray)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Chat Tips "),
        );
    frame.render_widget(tips, tips_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_spans_breaks_on_words() {
        let spans = [Span::raw("post at six pm daily")];
        let lines = wrap_spans(&spans, 10, &Span::raw(""));
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts, vec!["post at", "six pm", "daily"]);
        assert!(lines.iter().all(|l| l.width() <= 10));
    }

    #[test]
    fn test_wrap_spans_splits_long_words_and_indents() {
        let spans = [Span::raw("#supercalifragilistic")];
        let lines = wrap_spans(&spans, 10, &Span::raw("> "));
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts, vec!["> #superca", "> lifragil", "> istic"]);
    }

    #[test]
    fn test_wide_characters_wrap_by_display_width() {
        let lines = content_lines("🚀🚀🚀🚀🚀🚀🚀🚀🚀🚀 grow 📈📈📈📈📈", 10);

        assert!(lines.iter().all(|l| l.width() <= 10), "{:?}", lines);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["🚀🚀🚀🚀🚀", "🚀🚀🚀🚀🚀", "grow", "📈📈📈📈📈"]);

        let lines = wrap_spans(&[Span::raw("粉丝增长 很快")], 6, &Span::raw(""));
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["粉丝增", "长", "很快"]);
    }

    #[test]
    fn test_table_columns_use_display_width() {
        let lines = content_lines("| Tag | Uses |\n|---|---|\n| 🔥🔥 | 3 |", 60);

        assert_eq!(line_text(&lines[0]), "Tag  │ Uses");
        assert_eq!(lines[0].width(), lines[2].width());
    }

    #[test]
    fn test_content_lines_table_aligned() {
        let lines = content_lines("| Day | Reach |\n|---|---|\n| Monday | 1K |", 60);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts[0], "Day    │ Reach");
        assert_eq!(texts[1], "───────┼──────");
        assert_eq!(texts[2], "Monday │ 1K   ");
    }

    #[test]
    fn test_content_lines_list_prefix() {
        let lines = content_lines("- first tip\n- second tip", 40);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts, vec!["• first tip", "• second tip"]);
    }

    #[test]
    fn test_content_lines_strip_html() {
        let lines = content_lines("<img src=x onerror=alert(1)>\n\nHello", 40);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts, vec!["Hello"]);
    }

    #[test]
    fn test_visible_input_scrolls_to_cursor() {
        let area = Rect::new(0, 0, 7, 3);
        assert_eq!(visible_input("hello", 2, area), ("hello".to_string(), 2));
        assert_eq!(visible_input("hello world", 11, area), ("orld".to_string(), 4));
    }

    #[test]
    fn test_visible_input_wide_characters() {
        let area = Rect::new(0, 0, 7, 3);
        // Five columns inside the borders; each character takes two.
        assert_eq!(visible_input("粉丝增长", 4, area), ("增长".to_string(), 4));
        assert_eq!(visible_input("粉丝增长", 1, area), ("粉丝".to_string(), 2));
    }
}
