//! Small text helpers shared by modules and backends

/// Append `text` with every non-empty line indented by `spaces`
pub fn push_indented(out: &mut String, text: &str, spaces: usize) {
    for line in text.lines() {
        if !line.trim().is_empty() {
            out.extend(std::iter::repeat(' ').take(spaces));
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// Append `text`, guaranteeing it ends with a newline
pub fn push_block(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}

/// Convert CRLF and lone CR line endings to LF
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Substitute `%KEY%` placeholders in a template
pub fn replace_placeholders(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in replacements {
        result = result.replace(&format!("%{}%", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_indented_skips_blank_lines() {
        let mut out = String::new();
        push_indented(&mut out, "a\n\nb", 2);
        assert_eq!(out, "  a\n\n  b\n");
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_replace_placeholders() {
        let text = replace_placeholders("#pragma target %TARGET%", &[("TARGET", "4.6")]);
        assert_eq!(text, "#pragma target 4.6");
    }
}
