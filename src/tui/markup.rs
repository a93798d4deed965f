//! Answer markup → ratatui `Text` renderers.
//!
//! The answering service replies with server-sanitized HTML (current
//! contract) or markdown (legacy `answer` field). Both are rendered to
//! styled `Line`/`Span` values through one shared [`Writer`], so the two
//! paths can't drift apart visually. Fenced/`<pre>` code gets syntect
//! highlighting when the language is recognized.
//!
//! The HTML path understands exactly the sanitizer's allowlist: p, pre,
//! code, h1–h6, ul, ol, li, strong, em, b, i, a, blockquote, hr, br.
//! Anything else is dropped as a tag while its inner text is kept.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Render the sanitized-HTML answer body into styled `Text`.
///
/// Returns owned text (`'static`) so callers aren't constrained by input
/// lifetime.
pub fn render_html(content: &str, base_fg: Color) -> Text<'static> {
    let tokens = tokenize(content);
    let mut w = Writer::new(base_fg);
    let mut in_pre = false;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            HtmlToken::Text(raw) => {
                if in_pre {
                    w.text(decode_entities(raw));
                } else {
                    let collapsed = collapse_whitespace(raw);
                    let text = if w.line_has_content() {
                        collapsed
                    } else {
                        collapsed.trim_start().to_string()
                    };
                    if !text.is_empty() {
                        w.text(decode_entities(&text));
                    }
                }
            }
            HtmlToken::Open { name, href, .. } => match name.as_str() {
                "p" => w.open_paragraph(),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let depth = name[1..].parse().unwrap_or(6);
                    w.open_heading(depth);
                }
                "blockquote" => w.open_quote(),
                "pre" => {
                    // The sanitizer emits <pre><code class="language-x">;
                    // the language rides on the inner code tag.
                    let lang = match tokens.get(i + 1) {
                        Some(HtmlToken::Open { name, class, .. }) if name == "code" => {
                            i += 1; // consume the code tag
                            class
                                .as_deref()
                                .and_then(|c| c.strip_prefix("language-"))
                                .map(str::to_string)
                        }
                        _ => None,
                    };
                    w.open_code_block(lang.as_deref().unwrap_or(""));
                    in_pre = true;
                }
                "code" => w.push_style(inline_code_style()),
                "ul" => w.open_list(None),
                "ol" => w.open_list(Some(1)),
                "li" => w.open_item(),
                "strong" | "b" => w.push_style(Style::default().add_modifier(Modifier::BOLD)),
                "em" | "i" => w.push_style(Style::default().add_modifier(Modifier::ITALIC)),
                "a" => w.open_link(href.clone()),
                "br" => w.hard_break(),
                "hr" => w.rule(),
                _ => {} // outside the allowlist; tag dropped, content kept
            },
            HtmlToken::Close(name) => match name.as_str() {
                "p" => w.close_paragraph(),
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => w.close_heading(),
                "blockquote" => w.close_quote(),
                "pre" => {
                    w.close_code_block();
                    in_pre = false;
                }
                "code" => {
                    if !in_pre {
                        w.pop_style();
                    }
                }
                "ul" | "ol" => w.close_list(),
                "li" => {}
                "strong" | "b" | "em" | "i" => w.pop_style(),
                "a" => w.close_link(),
                _ => {}
            },
        }
        i += 1;
    }

    w.finish()
}

/// Render a legacy markdown answer into styled `Text`.
///
/// Raw HTML embedded in the markdown is dropped, never interpreted.
pub fn render_markdown(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => w.open_paragraph(),
                Tag::Heading { level, .. } => {
                    let depth = heading_depth(level);
                    w.open_heading(depth);
                    // Markdown keeps its `##` marker in the output
                    let hs = w.style();
                    w.push_span(Span::styled(format!("{} ", "#".repeat(depth as usize)), hs));
                }
                Tag::BlockQuote(_) => w.open_quote(),
                Tag::CodeBlock(kind) => {
                    let lang = match &kind {
                        CodeBlockKind::Fenced(l) => l.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    w.open_code_block(&lang);
                }
                Tag::List(start) => w.open_list(start),
                Tag::Item => w.open_item(),
                Tag::Emphasis => w.push_style(Style::default().add_modifier(Modifier::ITALIC)),
                Tag::Strong => w.push_style(Style::default().add_modifier(Modifier::BOLD)),
                Tag::Strikethrough => {
                    w.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
                }
                Tag::Link { dest_url, .. } => w.open_link(Some(dest_url.to_string())),
                _ => {} // tables, images, definitions: skip
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph => w.close_paragraph(),
                TagEnd::Heading(_) => w.close_heading(),
                TagEnd::BlockQuote(_) => w.close_quote(),
                TagEnd::CodeBlock => w.close_code_block(),
                TagEnd::List(_) => w.close_list(),
                TagEnd::Item => {}
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => w.pop_style(),
                TagEnd::Link => w.close_link(),
                _ => {}
            },
            Event::Text(t) => w.text(t.to_string()),
            Event::Code(c) => {
                w.push_span(Span::styled(c.to_string(), inline_code_style()));
            }
            Event::SoftBreak => w.push_span(Span::raw(" ")),
            Event::HardBreak => w.hard_break(),
            Event::Rule => w.rule(),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                w.push_span(Span::raw(marker));
            }
            _ => {} // HTML, footnotes, math: skip
        }
    }
    w.finish()
}

fn inline_code_style() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

// ── Writer ──────────────────────────────────────────────────────────────────

/// Accumulates styled lines. Both front-ends speak in block/inline ops so
/// the visual treatment stays identical regardless of the source markup.
struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack (bold, italic, heading text, etc.). Styles compose
    /// via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote `│`, code border).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Active syntax highlighter for code blocks.
    highlighter: Option<HighlightLines<'static>>,
    /// True when inside a code block without syntax highlighting.
    in_plain_code: bool,
    /// Stored link URL, appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_newline: false,
        }
    }

    fn finish(self) -> Text<'static> {
        self.text
    }

    // ── Style helpers ───────────────────────────────────────────────────

    /// Current effective style: top of stack, or base foreground color.
    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    /// Push a style that composes with the current one (inherits parent modifiers).
    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    /// True if the last line carries any non-prefix content.
    fn line_has_content(&self) -> bool {
        self.text
            .lines
            .last()
            .is_some_and(|l| l.spans.len() > self.line_prefixes.len())
    }

    // ── Block ops ───────────────────────────────────────────────────────

    fn open_paragraph(&mut self) {
        self.blank_line_if_needed();
        self.push_line(Line::default());
    }

    fn close_paragraph(&mut self) {
        self.needs_newline = true;
    }

    fn open_heading(&mut self, depth: u8) {
        self.blank_line_if_needed();
        self.push_line(Line::default());
        self.push_style(heading_style(self.base_fg, depth));
    }

    fn close_heading(&mut self) {
        self.pop_style();
        self.needs_newline = true;
    }

    fn open_quote(&mut self) {
        self.blank_line_if_needed();
        self.line_prefixes
            .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
        self.push_style(
            Style::default()
                .fg(self.base_fg)
                .add_modifier(Modifier::DIM | Modifier::ITALIC),
        );
    }

    fn close_quote(&mut self) {
        self.line_prefixes.pop();
        self.pop_style();
        self.needs_newline = true;
    }

    fn open_code_block(&mut self, lang: &str) {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }

        // Top border: ╭── lang ──  or just ╭──
        let bs = Style::default().fg(Color::DarkGray);
        let top = if lang.is_empty() {
            Line::from(Span::styled("╭──", bs))
        } else {
            Line::from(vec![
                Span::styled("╭── ", bs),
                Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", bs),
            ])
        };
        self.push_line(top);

        // Left border prefix for code content
        self.line_prefixes.push(Span::styled("│ ", bs));

        // Syntax highlighting setup
        if !lang.is_empty()
            && let Some(syn) = SYNTAX_SET.find_syntax_by_token(lang)
        {
            let theme = &THEME_SET.themes["base16-ocean.dark"];
            self.highlighter = Some(HighlightLines::new(syn, theme));
        }
        if self.highlighter.is_none() {
            self.in_plain_code = true;
        }
    }

    fn close_code_block(&mut self) {
        self.highlighter = None;
        self.in_plain_code = false;
        self.line_prefixes.pop(); // remove │ prefix before bottom border
        let bs = Style::default().fg(Color::DarkGray);
        self.push_line(Line::from(Span::styled("╰──", bs)));
        self.needs_newline = true;
    }

    fn open_list(&mut self, start: Option<u64>) {
        if self.list_indices.is_empty() {
            self.blank_line_if_needed();
        }
        self.list_indices.push(start);
    }

    fn close_list(&mut self) {
        self.list_indices.pop();
        self.needs_newline = true;
    }

    fn open_item(&mut self) {
        self.push_line(Line::default());
        let depth = self.list_indices.len().saturating_sub(1);
        let indent = "  ".repeat(depth);
        if let Some(idx) = self.list_indices.last_mut() {
            let marker = match idx {
                None => format!("{indent}- "),
                Some(n) => {
                    let s = format!("{indent}{}. ", n);
                    *n += 1;
                    s
                }
            };
            self.push_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
        }
    }

    fn open_link(&mut self, url: Option<String>) {
        self.link_url = url;
        self.push_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        );
    }

    fn close_link(&mut self) {
        self.pop_style();
        if let Some(url) = self.link_url.take() {
            self.push_span(Span::raw(" ("));
            self.push_span(Span::styled(
                url,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ));
            self.push_span(Span::raw(")"));
        }
    }

    fn hard_break(&mut self) {
        self.push_line(Line::default());
    }

    fn rule(&mut self) {
        self.blank_line_if_needed();
        self.push_line(Line::from(Span::styled(
            "─".repeat(40),
            Style::default().fg(Color::DarkGray),
        )));
        self.needs_newline = true;
    }

    // ── Content ─────────────────────────────────────────────────────────

    fn text(&mut self, raw: String) {
        // Expand tabs → 4 spaces (ratatui renders \t as zero-width)
        let text = if raw.contains('\t') {
            raw.replace('\t', "    ")
        } else {
            raw
        };

        // Syntax-highlighted code block: take highlighter out to avoid
        // double-mutable-borrow (highlight_line borrows it, push_line borrows self)
        if self.highlighter.is_some() {
            let mut hl = self.highlighter.take().unwrap();
            for line in LinesWithEndings::from(text.as_str()) {
                if let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) {
                    let spans: Vec<Span<'static>> = ranges
                        .into_iter()
                        .filter_map(|(hl_style, frag)| {
                            let content = frag.trim_end_matches('\n').to_string();
                            if content.is_empty() {
                                return None;
                            }
                            let fg = Color::Rgb(
                                hl_style.foreground.r,
                                hl_style.foreground.g,
                                hl_style.foreground.b,
                            );
                            Some(Span::styled(content, Style::default().fg(fg)))
                        })
                        .collect();
                    if !spans.is_empty() {
                        self.push_line(Line::from(spans));
                    }
                }
            }
            self.highlighter = Some(hl);
            return;
        }

        // Plain code block (no highlighting available)
        if self.in_plain_code {
            let code_style = Style::default().fg(Color::White);
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), code_style)));
            }
            return;
        }

        // Normal text: inherits current style (heading, bold, etc.)
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }
}

// ── HTML scanning ───────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum HtmlToken {
    Text(String),
    Open {
        name: String,
        class: Option<String>,
        href: Option<String>,
    },
    Close(String),
}

/// Splits HTML into text runs and tags. The input is server-sanitized so
/// this stays deliberately simple: no CDATA, no script/style special
/// cases, comments skipped.
fn tokenize(html: &str) -> Vec<HtmlToken> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        if lt > 0 {
            tokens.push(HtmlToken::Text(rest[..lt].to_string()));
        }
        rest = &rest[lt..];

        // A '<' not opening a tag (e.g. "x < y") stays literal text
        let next = rest[1..].chars().next();
        if !matches!(next, Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!') {
            tokens.push(HtmlToken::Text("<".to_string()));
            rest = &rest[1..];
            continue;
        }

        if let Some(after) = rest.strip_prefix("<!--") {
            // Comment: skip to -->
            rest = after
                .find("-->")
                .map(|end| &after[end + 3..])
                .unwrap_or("");
            continue;
        }

        let Some(gt) = rest.find('>') else {
            // Dangling '<' with no closing '>', keep it as text
            tokens.push(HtmlToken::Text(rest.to_string()));
            return tokens;
        };

        let body = rest[1..gt].trim().trim_end_matches('/').trim();
        rest = &rest[gt + 1..];

        if let Some(name) = body.strip_prefix('/') {
            tokens.push(HtmlToken::Close(name.trim().to_ascii_lowercase()));
        } else if !body.is_empty() {
            let name = body
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            tokens.push(HtmlToken::Open {
                class: attr_value(body, "class"),
                href: attr_value(body, "href"),
                name,
            });
        }
    }

    if !rest.is_empty() {
        tokens.push(HtmlToken::Text(rest.to_string()));
    }
    tokens
}

/// Extracts a quoted attribute value from a tag body, if present.
fn attr_value(tag_body: &str, attr: &str) -> Option<String> {
    let needle = format!("{attr}=");
    let at = tag_body.find(&needle)? + needle.len();
    let rest = tag_body.get(at..)?;
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        // Unquoted value: read to whitespace
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        return Some(rest[..end].to_string());
    }
    let inner = &rest[1..];
    let end = inner.find(quote)?;
    Some(inner[..end].to_string())
}

/// Decodes the named and numeric entities the sanitizer can emit.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // Entities are short; bound the search (byte-wise, so multibyte
        // text after a stray '&' can't split a char boundary)
        let Some(semi) = rest.as_bytes().iter().take(10).position(|&b| b == b';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            "nbsp" => out.push(' '),
            _ => {
                let decoded = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32);
                match decoded {
                    Some(c) => out.push(c),
                    None => {
                        // Unknown entity: keep it verbatim
                        out.push_str(&rest[..semi + 1]);
                    }
                }
            }
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    out
}

/// Collapses runs of whitespace (including newlines between tags) into
/// single spaces, the way a browser lays out non-pre text.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_style(base_fg: Color, depth: u8) -> Style {
    match depth {
        1 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => Style::default().fg(base_fg).add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
