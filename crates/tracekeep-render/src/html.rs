//! HTML response payloads to Markdown
//!
//! A small tag tokenizer rather than a DOM: the payloads are well-formed
//! fragments produced by one service, and only a handful of tags matter.

use regex::Regex;
use std::sync::OnceLock;

static ATTR_RE: OnceLock<Regex> = OnceLock::new();
static LANGUAGE_RE: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Start { name: String, attrs: &'a str },
    End(String),
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let tail = &rest[lt..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(gt) = tail.find('>') else {
            tokens.push(Token::Text(tail));
            break;
        };
        let inner = &tail[1..gt];
        rest = &tail[gt + 1..];

        if let Some(name) = inner.strip_prefix('/') {
            tokens.push(Token::End(name.trim().to_ascii_lowercase()));
            continue;
        }
        if inner.starts_with('!') || inner.starts_with('?') {
            continue;
        }

        let inner = inner.trim_end_matches('/');
        let (name, attrs) = match inner.find(|c: char| c.is_whitespace()) {
            Some(split) => (&inner[..split], &inner[split..]),
            None => (inner, ""),
        };
        if name.is_empty() {
            tokens.push(Token::Text(&tail[..gt + 1]));
            continue;
        }
        tokens.push(Token::Start {
            name: name.to_ascii_lowercase(),
            attrs,
        });
    }

    tokens
}

fn attribute(attrs: &str, wanted: &str) -> Option<String> {
    let re = ATTR_RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .unwrap()
    });
    re.captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(wanted) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| decode_entities(m.as_str()))
    })
}

/// Decode named and numeric character references
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| entity_char(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "hellip" => Some('\u{2026}'),
        "copy" => Some('\u{a9}'),
        _ => None,
    }
}

#[derive(Debug)]
enum ListKind {
    Unordered,
    Ordered(u32),
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Option<String>,
}

impl Table {
    fn render(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        let mut lines = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            lines.push(format!("| {} |", row.join(" | ")));
            if i == 0 {
                let sep: Vec<String> = row
                    .iter()
                    .map(|cell| "-".repeat(cell.chars().count().max(3)))
                    .collect();
                lines.push(format!("| {} |", sep.join(" | ")));
            }
        }
        format!("\n{}\n", lines.join("\n"))
    }
}

#[derive(Debug, Default)]
struct Converter {
    out: String,
    lists: Vec<ListKind>,
    in_pre: bool,
    table: Option<Table>,
    link_href: Option<String>,
}

impl Converter {
    fn emit(&mut self, text: &str) {
        match self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell.push_str(text),
            None => self.out.push_str(text),
        }
    }

    fn start(&mut self, name: &str, attrs: &str) {
        match name {
            "p" | "br" => self.emit("\n"),
            "strong" | "b" => self.emit("**"),
            "em" | "i" => self.emit("*"),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(name.as_bytes()[1] - b'0');
                self.emit(&format!("\n{} ", "#".repeat(level)));
            }
            "ul" => {
                self.lists.push(ListKind::Unordered);
                self.emit("\n");
            }
            "ol" => {
                self.lists.push(ListKind::Ordered(0));
                self.emit("\n");
            }
            "li" => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        *n += 1;
                        format!("{}. ", n)
                    }
                    _ => "- ".to_string(),
                };
                self.emit(&format!("{}{}", indent, marker));
            }
            "code" if !self.in_pre => self.emit("`"),
            "pre" => {
                self.in_pre = true;
                let re = LANGUAGE_RE.get_or_init(|| Regex::new(r"language-(\w+)").unwrap());
                let lang = attribute(attrs, "class")
                    .and_then(|class| re.captures(&class).map(|c| c[1].to_string()))
                    .unwrap_or_default();
                self.emit(&format!("\n```{}\n", lang));
            }
            "a" => {
                self.link_href = Some(attribute(attrs, "href").unwrap_or_default());
                self.emit("[");
            }
            "hr" => self.emit("\n---\n"),
            "table" => self.table = Some(Table::default()),
            "tr" => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            "td" | "th" => {
                if let Some(table) = self.table.as_mut() {
                    table.cell = Some(String::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &str) {
        match name {
            "p" | "li" => self.emit("\n"),
            "strong" | "b" => self.emit("**"),
            "em" | "i" => self.emit("*"),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.emit("\n"),
            "ul" | "ol" => {
                self.lists.pop();
                self.emit("\n");
            }
            "code" if !self.in_pre => self.emit("`"),
            "pre" => {
                self.in_pre = false;
                self.emit("\n```\n");
            }
            "a" => {
                let href = self.link_href.take().unwrap_or_default();
                self.emit(&format!("]({})", href));
            }
            "table" => {
                if let Some(table) = self.table.take() {
                    self.out.push_str(&table.render());
                }
            }
            "tr" => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            "td" | "th" => {
                if let Some(table) = self.table.as_mut() {
                    if let Some(cell) = table.cell.take() {
                        table.row.push(cell.trim().to_string());
                    }
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> String {
        let re = BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
        re.replace_all(&self.out, "\n\n").trim().to_string()
    }
}

/// Convert an HTML fragment to Markdown
///
/// Character references are decoded inside text and attribute values only,
/// so escaped markup stays literal.
pub fn html_to_markdown(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let mut converter = Converter::default();
    for token in tokenize(html) {
        match token {
            Token::Text(text) => converter.emit(&decode_entities(text)),
            Token::Start { name, attrs } => converter.start(&name, attrs),
            Token::End(name) => converter.end(&name),
        }
    }
    converter.finish()
}
