//! Markdown rendering for job descriptions.
//!
//! Parsing is pulldown-cmark's; this module maps its events onto palette
//! styles. Line breaks inside a paragraph are kept, since scraped
//! descriptions use them as layout.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::theme::Palette;

pub fn render(source: &str, palette: &Palette) -> Text<'static> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut writer = Writer::new(palette);
    for event in Parser::new_ext(source, options) {
        writer.event(event);
    }
    writer.finish()
}

/// What an open tag does when its end event arrives.
enum Open {
    Block,
    Heading,
    Quote,
    CodeBlock,
    List,
    Item,
    Style,
    Other,
}

struct Writer<'p> {
    palette: &'p Palette,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    open: Vec<Open>,
    styles: Vec<Style>,
    /// Next number per nested list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    code: Option<String>,
}

impl<'p> Writer<'p> {
    fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            lines: Vec::new(),
            current: Vec::new(),
            open: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            code: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    let style = self.style();
                    self.push(&text, style);
                }
            }
            Event::Code(code) => {
                let style = self.style().fg(self.palette.tag);
                self.push(&code, style);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = self.style();
                self.push(html.trim_end_matches('\n'), style);
            }
            Event::SoftBreak | Event::HardBreak => self.flush(),
            Event::Rule => {
                self.gap();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(40), self.palette.muted())));
            }
            Event::TaskListMarker(done) => {
                let style = self.style();
                self.push(if done { "[x] " } else { "[ ] " }, style);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.gap();
                }
                Open::Block
            }
            Tag::Heading { level, .. } => {
                self.gap();
                let mut style = self.palette.heading();
                if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                self.styles.push(style);
                Open::Heading
            }
            Tag::BlockQuote(_) => {
                self.gap();
                self.quote_depth += 1;
                self.styles.push(self.palette.secondary());
                Open::Quote
            }
            Tag::CodeBlock(_) => {
                self.gap();
                self.code = Some(String::new());
                Open::CodeBlock
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.gap();
                } else {
                    self.flush();
                }
                self.lists.push(first);
                Open::List
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.current
                    .push(Span::raw(format!("{}{}", "  ".repeat(depth), marker)));
                Open::Item
            }
            Tag::Emphasis => self.open_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.open_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.open_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { .. } => self.open_style(
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        match self.open.pop() {
            Some(Open::Block | Open::Item) => self.flush(),
            Some(Open::Heading) => {
                self.flush();
                self.styles.pop();
            }
            Some(Open::Quote) => {
                self.flush();
                self.styles.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Some(Open::CodeBlock) => {
                let code = self.code.take().unwrap_or_default();
                let style = Style::default().fg(self.palette.tag);
                for line in code.lines() {
                    let mut spans = self.quote_prefix();
                    spans.push(Span::styled(format!("  {}", line), style));
                    self.lines.push(Line::from(spans));
                }
            }
            Some(Open::List) => {
                self.flush();
                self.lists.pop();
            }
            Some(Open::Style) => {
                self.styles.pop();
            }
            Some(Open::Other) | None => {}
        }
    }

    fn open_style(&mut self, style: Style) -> Open {
        self.styles.push(style);
        Open::Style
    }

    fn style(&self) -> Style {
        self.styles
            .iter()
            .fold(Style::default(), |acc, style| acc.patch(*style))
    }

    /// Appends text, merging with the previous span when the style matches.
    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.current.last_mut() {
            if last.style == style {
                last.content.to_mut().push_str(text);
                return;
            }
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn quote_prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth)
            .map(|_| Span::styled("│ ", self.palette.muted()))
            .collect()
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = self.quote_prefix();
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    /// Separates top-level blocks with one blank line.
    fn gap(&mut self) {
        self.flush();
        if self.lists.is_empty() && self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }
}
