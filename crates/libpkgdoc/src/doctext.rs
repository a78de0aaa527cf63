//! Synopsis extraction and HTML rendering for documentation text.
//!
//! Documentation text is plain text with a few conventions:
//!
//! - paragraphs are separated by blank lines;
//! - indented lines, and lines between ```` ``` ```` fences, are preformatted;
//! - a lone line set off by blank lines that reads like a title, or a line starting with `#`,
//!   is a heading;
//! - bare URLs become links.
//!
//! Text is always escaped; markup in comments is never passed through.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bare URLs. The final character may not be trailing punctuation.
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:(?:https?|ftp|file)://|mailto:)[^\s<>"'`]*[^\s<>"'`.,:;!?)\]]"#)
        .expect("URL pattern must compile")
});

/// Synopses starting with these are boilerplate, not summaries.
const BOILERPLATE: &[&str] = &["copyright", "all rights", "author"];

/// Characters that disqualify a line from being a heading.
const NON_HEADING_CHARS: &str = ";:!?+*/=[]{}_^°&§~%#@<\">\\";

/// The first sentence of `text`.
///
/// Only the first paragraph is considered. A sentence ends at a period followed by whitespace,
/// at a full-width period, or at the end of the paragraph. Whitespace runs are collapsed.
pub fn synopsis(text: &str) -> String {
    let paragraph = first_paragraph(text);
    let sentence = &paragraph[..first_sentence_len(&paragraph)];
    let sentence = sentence.split_whitespace().collect::<Vec<_>>().join(" ");

    let lower = sentence.to_lowercase();
    if BOILERPLATE.iter().any(|prefix| lower.starts_with(prefix)) {
        return String::new();
    }
    sentence
}

fn first_paragraph(text: &str) -> String {
    text.lines()
        .skip_while(|line| is_blank(line))
        .take_while(|line| !is_blank(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_sentence_len(s: &str) -> usize {
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        if prev == '。' || prev == '．' {
            return i;
        }
        if c.is_whitespace() && prev == '.' {
            return i;
        }
        prev = c;
    }
    s.len()
}

/// A block of documentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Paragraph(Vec<String>),
    Heading(String),
    Preformatted(Vec<String>),
}

/// Render documentation text as an HTML fragment.
pub fn to_html(text: &str) -> String {
    let mut out = String::new();
    for block in blocks(text) {
        match block {
            Block::Paragraph(lines) => {
                out.push_str("<p>\n");
                for line in lines {
                    emphasize(&mut out, &line, true);
                    out.push('\n');
                }
                out.push_str("</p>\n");
            }
            Block::Heading(title) => {
                out.push_str(&format!("<h3 id=\"{}\">", anchor_id(&title)));
                emphasize(&mut out, &title, true);
                out.push_str("</h3>\n");
            }
            Block::Preformatted(lines) => {
                out.push_str("<pre>");
                for line in lines {
                    emphasize(&mut out, &line, false);
                    out.push('\n');
                }
                out.push_str("</pre>\n");
            }
        }
    }
    out
}

fn blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut last_was_blank = false;
    let mut last_was_heading = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_blank(line) {
            last_was_blank = true;
            i += 1;
            continue;
        }

        if is_fence(line) {
            let start = i + 1;
            i = start;
            while i < lines.len() && !is_fence(lines[i]) {
                i += 1;
            }
            blocks.push(Block::Preformatted(unindent(&lines[start..i])));
            // Skip the closing fence.
            i += 1;
            last_was_blank = false;
            last_was_heading = false;
            continue;
        }

        if indent_len(line) > 0 {
            let start = i;
            while i < lines.len() && (is_blank(lines[i]) || indent_len(lines[i]) > 0) {
                i += 1;
            }
            let mut end = i;
            while end > start && is_blank(lines[end - 1]) {
                end -= 1;
            }
            blocks.push(Block::Preformatted(unindent(&lines[start..end])));
            last_was_blank = false;
            last_was_heading = false;
            continue;
        }

        let start = i;
        while i < lines.len()
            && !is_blank(lines[i])
            && indent_len(lines[i]) == 0
            && !is_fence(lines[i])
        {
            i += 1;
        }
        let paragraph = &lines[start..i];

        if let [single] = paragraph {
            if let Some(title) = marked_heading(single) {
                blocks.push(Block::Heading(title));
                last_was_blank = false;
                last_was_heading = true;
                continue;
            }
            let followed_by_text = i + 1 < lines.len()
                && is_blank(lines[i])
                && !is_blank(lines[i + 1])
                && indent_len(lines[i + 1]) == 0;
            if last_was_blank
                && !last_was_heading
                && followed_by_text
                && let Some(title) = heading(single)
            {
                blocks.push(Block::Heading(title));
                last_was_blank = false;
                last_was_heading = true;
                continue;
            }
        }

        blocks.push(Block::Paragraph(
            paragraph.iter().map(|line| line.to_string()).collect(),
        ));
        last_was_blank = false;
        last_was_heading = false;
    }
    blocks
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Number of leading whitespace characters.
pub(crate) fn indent_len(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `line` without up to `n` leading whitespace characters.
pub(crate) fn strip_indent(line: &str, n: usize) -> &str {
    let mut rest = line;
    for _ in 0..n {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_whitespace() => rest = chars.as_str(),
            _ => break,
        }
    }
    rest
}

fn unindent(lines: &[&str]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| indent_len(line))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| strip_indent(line, indent).trim_end().to_string())
        .collect()
}

/// A `# Title` style heading.
fn marked_heading(line: &str) -> Option<String> {
    let title = line.trim_start_matches('#');
    if title.len() == line.len() || !title.starts_with(' ') {
        return None;
    }
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// A line that reads like a section title.
fn heading(line: &str) -> Option<String> {
    let line = line.trim();
    let first = line.chars().next()?;
    if !first.is_alphabetic() || !first.is_uppercase() {
        return None;
    }
    let last = line.chars().next_back()?;
    if !last.is_alphanumeric() {
        return None;
    }
    if line.contains(|c| NON_HEADING_CHARS.contains(c)) {
        return None;
    }

    let chars: Vec<char> = line.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            // Apostrophes only for possessives.
            '\'' if chars.get(i + 1) != Some(&'s')
                || chars.get(i + 2).is_some_and(|c| !c.is_whitespace()) =>
            {
                return None;
            }
            '.' if chars.get(i + 1).is_none_or(|c| c.is_whitespace()) => return None,
            _ => {}
        }
    }
    Some(line.to_string())
}

fn anchor_id(title: &str) -> String {
    let id: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("hdr-{id}")
}

/// Write `line` escaped, with bare URLs turned into links. With `nice` set, doubled backticks
/// and apostrophes become typographic quotes.
fn emphasize(out: &mut String, line: &str, nice: bool) {
    let mut last = 0;
    for m in URL.find_iter(line) {
        escape_text(out, &line[last..m.start()], nice);
        let url = html_escape(m.as_str());
        out.push_str(&format!("<a href=\"{url}\">{url}</a>"));
        last = m.end();
    }
    escape_text(out, &line[last..], nice);
}

fn escape_text(out: &mut String, text: &str, nice: bool) {
    if nice {
        out.push_str(&html_escape(&text.replace("``", "\u{201c}").replace("''", "\u{201d}")));
    } else {
        out.push_str(&html_escape(text));
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
