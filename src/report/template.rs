//! Prose templates with named insertion points.
//!
//! A template is plain text in which `{{name}}` marks an insertion point.
//! Names are made of ASCII letters, digits, `_`, `.` and `-`; anything else
//! between double braces is left alone as literal text.

use crate::types::PlatformIdentity;

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Slot(String),
}

/// What an insertion point refers to once its name is split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget<'a> {
    /// `{{key}}`: the platform's table, or a fragment of that name
    Whole(&'a str),
    /// `{{key.title}}`
    Title(&'a str),
    /// `{{key.details}}`
    Details(&'a str),
}

impl<'a> SlotTarget<'a> {
    pub fn from_name(name: &'a str) -> Self {
        match name.rsplit_once('.') {
            Some((key, "title")) if !key.is_empty() => SlotTarget::Title(key),
            Some((key, "details")) if !key.is_empty() => SlotTarget::Details(key),
            _ => SlotTarget::Whole(name),
        }
    }

    pub fn key(&self) -> &'a str {
        match *self {
            SlotTarget::Whole(key) | SlotTarget::Title(key) | SlotTarget::Details(key) => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let slot = after_open
                .find("}}")
                .map(|close| (close, after_open[..close].trim()))
                .filter(|(_, name)| is_slot_name(name));

            match slot {
                Some((close, name)) => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(name.to_string()));
                    rest = &after_open[close + 2..];
                }
                None => {
                    literal.push_str(&rest[..open + 2]);
                    rest = after_open;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }
        Template { segments }
    }

    /// Layout used when the caller supplies no template: every fragment in
    /// order, then one `## title` section per platform with its details as
    /// bullets and its table in a fenced block.
    pub fn default_layout(fragment_names: &[&str], platforms: &[&PlatformIdentity]) -> Self {
        let mut segments = Vec::new();
        let text = |s: &str| Segment::Text(s.to_string());

        for (i, name) in fragment_names.iter().enumerate() {
            if i > 0 {
                segments.push(text("\n\n"));
            }
            segments.push(Segment::Slot(name.to_string()));
        }
        if !fragment_names.is_empty() {
            segments.push(text(if platforms.is_empty() { "\n" } else { "\n\n" }));
        }

        for (i, platform) in platforms.iter().enumerate() {
            if i > 0 {
                segments.push(text("\n"));
            }
            segments.push(text("## "));
            segments.push(Segment::Slot(format!("{}.title", platform.key)));
            segments.push(text("\n\n"));
            if !platform.details.is_empty() {
                segments.push(Segment::Slot(format!("{}.details", platform.key)));
                segments.push(text("\n\n"));
            }
            segments.push(text("```\n"));
            segments.push(Segment::Slot(platform.key.clone()));
            segments.push(text("\n```\n"));
        }

        Template { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Insertion point names in template order (repeats included)
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }
}

pub(crate) fn is_slot_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_and_slots() {
        let template = Template::parse("# Title\n\n```\n{{nano}}\n```\n{{ esp32.title }}");
        assert_eq!(
            template.segments(),
            &[
                Segment::Text("# Title\n\n```\n".to_string()),
                Segment::Slot("nano".to_string()),
                Segment::Text("\n```\n".to_string()),
                Segment::Slot("esp32.title".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_slot_braces_stay_literal() {
        let text = "empty body `{{}}` and {{not a slot}} and {single}";
        let template = Template::parse(text);
        assert_eq!(template.slots().count(), 0);
        assert_eq!(template.segments(), &[Segment::Text(text.to_string())]);
    }

    #[test]
    fn test_unclosed_braces_stay_literal() {
        let template = Template::parse("a {{nano b");
        assert_eq!(template.segments(), &[Segment::Text("a {{nano b".to_string())]);
    }

    #[test]
    fn test_literal_braces_before_slot() {
        let template = Template::parse("{{ }} then {{nano}}");
        let slots: Vec<&str> = template.slots().collect();
        assert_eq!(slots, vec!["nano"]);
        assert_eq!(template.segments()[0], Segment::Text("{{ }} then ".to_string()));
    }

    #[test]
    fn test_slot_target_split() {
        assert_eq!(SlotTarget::from_name("nano"), SlotTarget::Whole("nano"));
        assert_eq!(SlotTarget::from_name("nano.title"), SlotTarget::Title("nano"));
        assert_eq!(SlotTarget::from_name("nano.details"), SlotTarget::Details("nano"));
        assert_eq!(SlotTarget::from_name("esp32.s3"), SlotTarget::Whole("esp32.s3"));
        assert_eq!(SlotTarget::from_name(".title"), SlotTarget::Whole(".title"));
    }

    #[test]
    fn test_default_layout_slot_order() {
        let nano = PlatformIdentity::new("nano").with_details(vec!["16MHz ATmega328P".to_string()]);
        let esp32 = PlatformIdentity::new("esp32");
        let template = Template::default_layout(&["intro"], &[&nano, &esp32]);

        let slots: Vec<&str> = template.slots().collect();
        assert_eq!(slots, vec!["intro", "nano.title", "nano.details", "nano", "esp32.title", "esp32"]);
    }
}
