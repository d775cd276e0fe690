//! Normalization of raw document text into canonical content.
//!
//! The canonical form is what every downstream hash and shingle is computed
//! over, so two documents that differ only in front matter, line endings, or
//! blank-line padding normalize to identical text.

/// Normalize raw text into canonical content.
///
/// One pass removes a leading front-matter block, unifies line endings to
/// `\n`, collapses runs of three or more newlines to exactly two, and
/// trims surrounding whitespace. Passes repeat until the text is stable,
/// so `normalize(normalize(x)) == normalize(x)` holds even when trimming
/// or an earlier removal exposes a new fence at the start. Any input is
/// valid; the result may be empty.
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        // Every changing pass strictly shrinks the text, so this
        // terminates.
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let body = strip_front_matter(raw);
    let unified = unify_line_endings(body);
    let collapsed = collapse_blank_runs(&unified);
    collapsed.trim().to_string()
}

/// Count lines the way the canonical form defines them: empty content has
/// zero lines, otherwise one more than the number of `\n` separators.
pub fn count_lines(content: &str) -> usize {
    if content.is_empty() {
        return 0;
    }
    content.split('\n').count()
}

/// Remove a front-matter block at the very start of the text.
///
/// The block is opened by a first line of exactly `---` and closed by the
/// first subsequent line of exactly `---`. Front matter is detected, not
/// assumed: without a closing fence nothing is removed.
fn strip_front_matter(raw: &str) -> &str {
    let after_open = if let Some(rest) = raw.strip_prefix("---\n") {
        rest
    } else if let Some(rest) = raw.strip_prefix("---\r\n") {
        rest
    } else {
        return raw;
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        if content == "---" {
            return &after_open[offset + line.len()..];
        }
        offset += line.len();
    }
    raw
}

fn unify_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Cap any run of 3+ consecutive newlines at exactly 2, i.e. at most one
/// blank line between paragraphs.
fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_front_matter_block() {
        let raw = "---\ntitle: Test\ntags: [a, b]\n---\nBody text";
        assert_eq!(normalize(raw), "Body text");
    }

    #[test]
    fn front_matter_with_crlf_fences() {
        let raw = "---\r\ntitle: Test\r\n---\r\nBody text";
        assert_eq!(normalize(raw), "Body text");
    }

    #[test]
    fn unterminated_front_matter_left_alone() {
        let raw = "---\ntitle: Test\nno closing fence here";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn fence_must_start_at_position_zero() {
        let raw = "intro\n---\ntitle: Test\n---\nBody";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn closing_fence_must_be_exact() {
        // "----" is not a closing fence; the later exact "---" line is.
        let raw = "---\na\n----\nb\n---\nBody";
        assert_eq!(normalize(raw), "Body");
    }

    #[test]
    fn only_first_block_removed() {
        let raw = "---\nfm\n---\nBody\n---\nmore\n---\ntail";
        assert_eq!(normalize(raw), "Body\n---\nmore\n---\ntail");
    }

    #[test]
    fn unifies_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        // A single blank line is preserved as-is.
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  \n\n  hello  \n\n  "), "hello");
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \r\n\t \n"), "");
    }

    #[test]
    fn front_matter_only_document_is_empty() {
        assert_eq!(normalize("---\ntitle: x\n---\n"), "");
        assert_eq!(normalize("---\ntitle: x\n---"), "");
    }

    #[test]
    fn front_matter_hidden_by_leading_whitespace_still_removed() {
        // Trimming exposes the fence; normalization keeps going until the
        // text is stable instead of leaving it for a second call.
        assert_eq!(normalize("\n---\ntitle: x\n---\nbody text"), "body text");
        assert_eq!(normalize("  \r\n---\ntitle: x\n---\nbody text"), "body text");
    }

    #[test]
    fn stacked_front_matter_blocks_reach_a_fixpoint() {
        assert_eq!(normalize("---\na\n---\n---\nb\n---\nc"), "c");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "---\nfm\n---\r\n\r\n\r\nBody  with   spaces\n\n\n\nEnd  ",
            "plain text",
            "",
            "a\rb\r\nc",
            "---\nunterminated",
            "\n---\ntitle: x\n---\nbody text",
            "  \n---\na\n---\n---\nb\n---\nc",
        ];
        for raw in inputs {
            let once = normalize(raw);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn count_lines_basics() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\ntwo"), 2);
        assert_eq!(count_lines("one\ntwo\n"), 3);
    }
}
