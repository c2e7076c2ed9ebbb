//! Restricted markdown rendering for chat content.
//!
//! Message text is parsed into a small block model that any front end can
//! draw. Raw HTML is dropped, images collapse to their alt text, links keep
//! their label only, and control characters (terminal escape sequences
//! included) never reach the output.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
}

/// A run of text sharing one style. May contain `\n` from hard breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inline {
    pub text: String,
    pub style: InlineStyle,
}

impl Inline {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    ListItem {
        depth: usize,
        marker: String,
        content: Vec<Inline>,
    },
    Quote(Vec<Inline>),
    Table {
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Rule,
}

#[derive(Default)]
struct TableBuilder {
    header: Vec<Vec<Inline>>,
    rows: Vec<Vec<Vec<Inline>>>,
    row: Vec<Vec<Inline>>,
}

#[derive(Default)]
struct StyleDepth {
    bold: u8,
    italic: u8,
    strikethrough: u8,
    link: u8,
}

impl StyleDepth {
    fn current(&self) -> InlineStyle {
        InlineStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            strikethrough: self.strikethrough > 0,
            code: false,
            link: self.link > 0,
        }
    }
}

struct ListLevel {
    /// Next number; `None` for bullet lists.
    next: Option<u64>,
    /// The open item already emitted its marker.
    marked: bool,
}

#[derive(Default)]
struct Renderer {
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    styles: StyleDepth,
    lists: Vec<ListLevel>,
    quote_depth: usize,
    code: Option<(Option<String>, String)>,
    table: Option<TableBuilder>,
}

impl Renderer {
    fn push_text(&mut self, text: &str, style: InlineStyle) {
        let text = sanitize_text(text);
        if text.is_empty() {
            return;
        }
        match self.inlines.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.inlines.push(Inline { text, style }),
        }
    }

    fn take_inlines(&mut self) -> Vec<Inline> {
        let mut inlines = std::mem::take(&mut self.inlines);
        if let Some(first) = inlines.first_mut() {
            let trimmed = first.text.trim_start().to_string();
            first.text = trimmed;
        }
        if let Some(last) = inlines.last_mut() {
            let trimmed = last.text.trim_end().to_string();
            last.text = trimmed;
        }
        inlines.retain(|i| !i.text.is_empty());
        inlines
    }

    fn flush_paragraph(&mut self) {
        let content = self.take_inlines();
        if content.is_empty() {
            return;
        }
        if self.quote_depth > 0 {
            self.blocks.push(Block::Quote(content));
        } else {
            self.blocks.push(Block::Paragraph(content));
        }
    }

    fn flush_list_item(&mut self) {
        let content = self.take_inlines();
        if content.is_empty() {
            return;
        }
        let depth = self.lists.len().saturating_sub(1);
        let marker = match self.lists.last_mut() {
            // Text after a nested block continues the item under a blank marker.
            Some(level) if level.marked => {
                let width = match level.next {
                    Some(n) => format!("{}.", n.saturating_sub(1)).len(),
                    None => 1,
                };
                " ".repeat(width)
            }
            Some(level) => {
                level.marked = true;
                match level.next.as_mut() {
                    Some(n) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker
                    }
                    None => "•".to_string(),
                }
            }
            None => "•".to_string(),
        };
        self.blocks.push(Block::ListItem {
            depth,
            marker,
            content,
        });
    }

    /// Emit pending text before a nested block starts.
    fn flush_before_block(&mut self) {
        if self.lists.is_empty() {
            self.flush_paragraph();
        } else {
            self.flush_list_item();
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { .. } | Tag::Paragraph => {}
            Tag::BlockQuote(_) => {
                self.flush_before_block();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush_before_block();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(sanitize_text)
                        .filter(|lang| !lang.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => {
                // Text before a nested list belongs to the enclosing item.
                if !self.lists.is_empty() {
                    self.flush_list_item();
                }
                self.lists.push(ListLevel {
                    next: start,
                    marked: false,
                });
            }
            Tag::Item => {
                if let Some(level) = self.lists.last_mut() {
                    level.marked = false;
                }
            }
            Tag::Table(_) => {
                self.flush_before_block();
                self.table = Some(TableBuilder::default());
            }
            Tag::TableCell => self.inlines.clear(),
            Tag::Emphasis => self.styles.italic += 1,
            Tag::Strong => self.styles.bold += 1,
            Tag::Strikethrough => self.styles.strikethrough += 1,
            Tag::Link { .. } => self.styles.link += 1,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.flush_paragraph();
                } else {
                    self.push_text(" ", InlineStyle::default());
                }
            }
            TagEnd::Heading(level) => {
                let content = self.take_inlines();
                if !content.is_empty() {
                    self.blocks.push(Block::Heading {
                        level: heading_level(level),
                        content,
                    });
                }
            }
            TagEnd::BlockQuote { .. } => {
                self.flush_paragraph();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    let code = code.trim_end_matches('\n').to_string();
                    self.blocks.push(Block::CodeBlock { language, code });
                }
            }
            TagEnd::Item => self.flush_list_item(),
            TagEnd::List { .. } => {
                self.lists.pop();
            }
            TagEnd::TableCell => {
                let cell = self.take_inlines();
                if let Some(table) = self.table.as_mut() {
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(Block::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            TagEnd::Emphasis => self.styles.italic = self.styles.italic.saturating_sub(1),
            TagEnd::Strong => self.styles.bold = self.styles.bold.saturating_sub(1),
            TagEnd::Strikethrough => {
                self.styles.strikethrough = self.styles.strikethrough.saturating_sub(1)
            }
            TagEnd::Link { .. } => self.styles.link = self.styles.link.saturating_sub(1),
            _ => {}
        }
    }

    fn event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&sanitize_code(&text));
                } else {
                    let style = self.styles.current();
                    self.push_text(&text, style);
                }
            }
            Event::Code(text) => {
                let style = InlineStyle {
                    code: true,
                    ..self.styles.current()
                };
                self.push_text(&text, style);
            }
            Event::SoftBreak => self.push_text(" ", self.styles.current()),
            Event::HardBreak => {
                let style = self.styles.current();
                match self.inlines.last_mut() {
                    Some(last) if last.style == style => last.text.push('\n'),
                    _ => self.inlines.push(Inline {
                        text: "\n".to_string(),
                        style,
                    }),
                }
            }
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " }, InlineStyle::default())
            }
            Event::Rule => {
                self.flush_before_block();
                self.blocks.push(Block::Rule);
            }
            // Raw HTML is active content; it never reaches the output.
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse chat content into sanitized blocks.
pub fn render(markdown: &str) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // Escape sequences go before parsing; the parser splits text at '[' and ']'.
    let markdown = sanitize_text(markdown);

    let mut renderer = Renderer::default();
    for event in Parser::new_ext(&markdown, options) {
        renderer.event(event);
    }
    renderer.flush_paragraph();
    renderer.blocks
}

/// Remove terminal escape sequences, control characters and bidi overrides.
/// Newlines survive; tabs become spaces.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => skip_escape_sequence(&mut chars),
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn sanitize_code(text: &str) -> String {
    sanitize_text(&text.replace("\r\n", "\n"))
}

fn skip_escape_sequence(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match chars.peek() {
        // CSI: parameters then a final byte in '@'..='~'
        Some('[') => {
            chars.next();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        // OSC: terminated by BEL or ESC '\'
        Some(']') => {
            chars.next();
            while let Some(c) = chars.next() {
                if c == '\u{7}' {
                    break;
                }
                if c == '\u{1b}' {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    break;
                }
            }
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

/// Concatenated text of a run of inlines.
pub fn inline_text(inlines: &[Inline]) -> String {
    inlines.iter().map(|i| i.text.as_str()).collect()
}
