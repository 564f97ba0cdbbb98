//! Filename sanitization and unique on-disk name allocation.
//!
//! [`sanitize_filename`] turns arbitrary link text into a safe filesystem
//! name component; [`UniqueNameAllocator`] hands out collision-free final
//! names to concurrent download workers.

mod allocator;

pub use allocator::UniqueNameAllocator;

/// Maximum filename length in characters, extension included.
pub(crate) const MAX_FILENAME_CHARS: usize = 200;

/// Sanitizes arbitrary text into a safe filesystem name component.
///
/// Rules, applied in order:
/// 1. Characters illegal on common filesystems (`< > : " / \ | ? *` and
///    control characters) become `_`.
/// 2. Runs of whitespace or underscores collapse into a single `_`.
/// 3. Leading/trailing spaces, dots, and underscores are trimmed.
/// 4. Names longer than 200 characters are truncated at the stem,
///    preserving the extension.
/// 5. An empty result becomes the literal name `unnamed`.
///
/// Total function: the output is always non-empty and never contains a
/// forbidden character.
#[must_use]
pub fn sanitize_filename(raw: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in raw.chars() {
        let mapped = match ch {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '_' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }

    let trimmed = out.trim_matches([' ', '.', '_']);
    let capped = truncate_preserving_extension(trimmed, MAX_FILENAME_CHARS);

    if capped.is_empty() {
        "unnamed".to_string()
    } else {
        capped
    }
}

/// Splits a filename into `(stem, extension)` at the last dot.
///
/// A leading dot is part of the stem (`.profile` has no extension), and
/// the extension keeps its dot (`report.pdf` splits as `("report", ".pdf")`).
pub(crate) fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

/// Caps `name` at `max_chars` characters, dropping stem characters so
/// the extension survives intact.
pub(crate) fn truncate_preserving_extension(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    let keep = max_chars.saturating_sub(ext.chars().count());
    let truncated: String = stem.chars().take(keep).collect();
    format!("{truncated}{ext}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    #[test]
    fn test_sanitize_replaces_illegal_chars() {
        assert_eq!(sanitize_filename("a/b\\c:d.pdf"), "a_b_c_d.pdf");
        assert_eq!(sanitize_filename("q?u*o\"te.pdf"), "q_u_o_te.pdf");
        assert_eq!(sanitize_filename("pipe|br<ack>ets.pdf"), "pipe_br_ack_ets.pdf");
    }

    #[test]
    fn test_sanitize_replaces_control_chars() {
        assert_eq!(sanitize_filename("re\x00po\x1frt.pdf"), "re_po_rt.pdf");
    }

    #[test]
    fn test_sanitize_collapses_whitespace_and_underscore_runs() {
        assert_eq!(sanitize_filename("Annual   Report"), "Annual_Report");
        assert_eq!(sanitize_filename("a__b___c"), "a_b_c");
        assert_eq!(sanitize_filename("mixed \t _ run"), "mixed_run");
    }

    #[test]
    fn test_sanitize_trims_spaces_dots_underscores() {
        assert_eq!(sanitize_filename("._ report _."), "report");
        assert_eq!(sanitize_filename("...dots..."), "dots");
    }

    #[test]
    fn test_sanitize_empty_becomes_unnamed() {
        assert_eq!(sanitize_filename(""), "unnamed");
        assert_eq!(sanitize_filename("   "), "unnamed");
        assert_eq!(sanitize_filename("///"), "unnamed");
        assert_eq!(sanitize_filename("..."), "unnamed");
    }

    #[test]
    fn test_sanitize_preserves_valid_names() {
        assert_eq!(sanitize_filename("valid-file.name.pdf"), "valid-file.name.pdf");
        assert_eq!(sanitize_filename("日本語.pdf"), "日本語.pdf");
    }

    #[test]
    fn test_sanitize_truncates_long_name_preserving_extension() {
        let long = format!("{}.pdf", "a".repeat(300));
        let result = sanitize_filename(&long);
        assert_eq!(result.chars().count(), 200);
        assert!(result.ends_with(".pdf"));
        assert!(result.starts_with("aaa"));
    }

    #[test]
    fn test_sanitize_truncates_long_name_without_extension() {
        let result = sanitize_filename(&"b".repeat(250));
        assert_eq!(result.chars().count(), 200);
    }

    #[test]
    fn test_sanitize_output_invariants_hold_for_hostile_inputs() {
        let long = "a".repeat(1000);
        let inputs = [
            "<<<>>>",
            "  \u{0007}bell\u{0007}  ",
            long.as_str(),
            "CON:PRN?NUL*",
            "\\\\server\\share\\file.xls",
        ];

        for input in inputs {
            let out = sanitize_filename(input);
            assert!(!out.is_empty(), "empty output for {input:?}");
            assert!(out.chars().count() <= 200, "too long for {input:?}");
            assert!(
                !out.chars().any(|c| FORBIDDEN.contains(&c) || c.is_control()),
                "forbidden char in {out:?}"
            );
        }
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }
}
