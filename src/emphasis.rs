/// Rendering split for one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emphasis {
    /// Token with no alphanumeric core, shown as-is
    Plain(String),
    Split {
        prefix: String,
        bold: String,
        light: String,
        suffix: String,
    },
}

/// Separate leading and trailing non-alphanumeric runs from the core word.
///
/// A token without any alphanumeric character ends up entirely in `prefix`.
pub fn split_affixes(text: &str) -> (&str, &str, &str) {
    let start = text
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, _)| i);

    let Some(start) = start else {
        return (text, "", "");
    };

    let end = text
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(text.len());

    (&text[..start], &text[start..end], &text[end..])
}

pub fn emphasize(text: &str, bold_ratio: f64) -> Emphasis {
    let (prefix, core, suffix) = split_affixes(text);
    if core.is_empty() {
        return Emphasis::Plain(text.to_string());
    }

    let ratio = bold_ratio.clamp(0.0, 1.0);
    let core_len = core.chars().count();
    let bold_len = (core_len as f64 * ratio).ceil() as usize;
    let bold_len = bold_len.clamp(1, core_len);
    let split_at = core
        .char_indices()
        .nth(bold_len)
        .map(|(i, _)| i)
        .unwrap_or(core.len());

    Emphasis::Split {
        prefix: prefix.to_string(),
        bold: core[..split_at].to_string(),
        light: core[split_at..].to_string(),
        suffix: suffix.to_string(),
    }
}
