//! Next-steps section splitting.

/// Heading that agents are asked to place above their suggestions.
pub const NEXT_STEPS_HEADING: &str = "### Next Steps";

/// Body text and suggestions split out of an agent response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NextStepsSplit {
    /// Text before the heading, trimmed.
    pub body: String,
    /// Dash bullets after the heading, in source order.
    pub next_steps: Vec<String>,
}

fn is_heading_line(line: &str) -> bool {
    let stripped = line
        .trim()
        .trim_start_matches('#')
        .trim_matches(|c: char| c == '*' || c.is_whitespace());
    let stripped = stripped.strip_suffix(':').unwrap_or(stripped).trim_end_matches('*');
    stripped.eq_ignore_ascii_case("next steps")
}

/// Splits `text` at the next-steps heading.
///
/// Without a heading the body is the whole trimmed text and there are no
/// suggestions.
#[must_use]
pub fn split_next_steps(text: &str) -> NextStepsSplit {
    let mut offset = 0;
    let mut heading_at = None;
    for line in text.split_inclusive('\n') {
        if is_heading_line(line) {
            heading_at = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((start, end)) = heading_at else {
        return NextStepsSplit {
            body: text.trim().to_string(),
            next_steps: Vec::new(),
        };
    };

    let next_steps = text[end..]
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix('-'))
        .map(str::trim)
        .filter(|step| !step.is_empty() && !step.starts_with('-'))
        .map(str::to_string)
        .collect();

    NextStepsSplit {
        body: text[..start].trim().to_string(),
        next_steps,
    }
}
