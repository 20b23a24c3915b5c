use ratatui::{
    style::Stylize,
    text::{Line, Span, Text},
};

#[derive(Debug, Clone)]
pub struct UsageInfoLine {
    pub keys: Vec<String>,
    pub description: String,
}

impl UsageInfoLine {
    pub fn new(keys: &[&str], description: impl Into<String>) -> Self {
        UsageInfoLine {
            keys: keys.iter().map(|key| String::from(*key)).collect(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UsageInfo {
    pub description: Option<String>,
    pub lines: Vec<UsageInfoLine>,
}

pub trait HasUsageInfo {
    fn usage_info(&self) -> UsageInfo;
}

fn key_to_span<'a>(key: &str) -> Span<'a> {
    Span::from(format!("({})", key)).bold()
}

// "(a)", "(a) or (b)", "(a), (b) or (c)"
fn key_bindings<'a>(keys: &[String]) -> Vec<Span<'a>> {
    let mut bindings: Vec<Span> = Vec::with_capacity(keys.len() * 2);

    for (idx, key) in keys.iter().enumerate() {
        if idx > 0 {
            let separator = if idx == keys.len() - 1 { " or " } else { ", " };
            bindings.push(Span::from(separator));
        }
        bindings.push(key_to_span(key));
    }

    bindings
}

pub fn widget_usage_to_text<'a>(usage: UsageInfo) -> Text<'a> {
    let mut lines: Vec<Line> = vec![];
    if let Some(description) = usage.description {
        lines.push(Line::from(description));
    }

    for line in usage.lines {
        let mut spans = key_bindings(&line.keys);
        spans.push(Span::from(format!(" {}", line.description)));

        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_key_bindings_are_joined() {
        let text = widget_usage_to_text(UsageInfo {
            description: Some("Usage".into()),
            lines: vec![
                UsageInfoLine::new(&["q"], "to exit"),
                UsageInfoLine::new(&["←", "→"], "to hover"),
                UsageInfoLine::new(&["Tab", "↑", "↓"], "to switch fields"),
            ],
        });

        let lines = text.lines.iter().map(line_text).collect::<Vec<String>>();
        assert_eq!(
            lines,
            vec![
                "Usage",
                "(q) to exit",
                "(←) or (→) to hover",
                "(Tab), (↑) or (↓) to switch fields",
            ]
        );
    }
}
