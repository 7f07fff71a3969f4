//! # format
//!
//! Pure text helpers consumed by the presentation layer. The controller
//! itself only uses [`format_usd`] for trade notices; [`segment_message`]
//! exists so renderers never pattern-match on raw assistant text themselves.

// ─── Message Segmentation ─────────────────────────────────────────────────────

/// Renderable block of an assistant/system message. Closed set — renderers
/// match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Paragraph(String),
    /// Contents between a pair of ``` fences, fence lines stripped.
    CodeBlock(String),
    /// Line introduced by `- `, `* ` or `• `, prefix stripped.
    BulletLine(String),
    /// Line introduced by `N. `, prefix stripped.
    NumberedLine { number: u32, text: String },
}

/// Split message content into renderable segments.
///
/// ``` fences alternate text and code; outside code, each line becomes its
/// own segment (the dashboard renders line-wise).
pub fn segment_message(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for (i, part) in content.split("```").enumerate() {
        if i % 2 == 1 {
            // Inside a fence. An unclosed trailing fence still renders as code.
            let code = part.strip_prefix('\n').unwrap_or(part);
            segments.push(Segment::CodeBlock(code.trim_end_matches('\n').to_string()));
            continue;
        }

        // A closing fence leaves its newline on the following text chunk.
        let part = if i > 0 { part.strip_prefix('\n').unwrap_or(part) } else { part };
        for line in part.lines() {
            segments.push(segment_line(line));
        }
    }

    segments
}

fn segment_line(line: &str) -> Segment {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Segment::BulletLine(rest.to_string());
        }
    }

    if let Some((number, rest)) = split_numbered(line) {
        return Segment::NumberedLine { number, text: rest.to_string() };
    }

    Segment::Paragraph(line.to_string())
}

/// `"12. text"` → `Some((12, "text"))`, anything else → `None`.
fn split_numbered(line: &str) -> Option<(u32, &str)> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let rest = line[digits_end..].strip_prefix(". ")?;
    let number = line[..digits_end].parse().ok()?;
    Some((number, rest))
}

// ─── Currency ─────────────────────────────────────────────────────────────────

/// `1234567.891` → `"$1,234,567.89"`. Two fraction digits, grouped thousands,
/// sign ahead of the `$`.
pub fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}
