//! Filename cleanup for extracted entries.
//!
//! The invalid set is the union of what common filesystems refuse in a single
//! path component, so a cleaned name is usable everywhere. Path separators
//! are part of the set: this works on one component, not on whole paths.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::{ArcioError, Result};

pub const PLACEHOLDER: char = '_';

static INVALID_CHARS: LazyLock<HashSet<char>> = LazyLock::new(|| {
    (0u8..0x20)
        .map(char::from)
        .chain(['"', '<', '>', '|', ':', '*', '?', '\\', '/'])
        .collect()
});

pub fn is_invalid_filename_char(c: char) -> bool {
    INVALID_CHARS.contains(&c)
}

/// Replaces every invalid character with `_`.
///
/// Valid characters and the character count are preserved.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if is_invalid_filename_char(c) { PLACEHOLDER } else { c })
        .collect()
}

/// [`sanitize`] with a caller supplied replacement.
///
/// The placeholder must itself be valid, otherwise the output would not be.
pub fn sanitize_with(name: &str, placeholder: char) -> Result<String> {
    if is_invalid_filename_char(placeholder) {
        return Err(ArcioError::invalid(format!(
            "placeholder {:?} is not a valid filename character",
            placeholder
        )));
    }
    Ok(name
        .chars()
        .map(|c| if is_invalid_filename_char(c) { placeholder } else { c })
        .collect())
}

#[cfg(test)]
mod test_sanitize {
    use super::*;

    #[test]
    fn untouched() {
        assert_eq!(sanitize("report-2024 (final).tar.gz"), "report-2024 (final).tar.gz");
        assert_eq!(sanitize("ünïcödé ファイル"), "ünïcödé ファイル");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn replaces_each_invalid() {
        assert_eq!(sanitize("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize("tab\there\0nul"), "tab_here_nul");
    }

    #[test]
    fn keeps_length() {
        let name = "x:y/ファ?イル";
        assert_eq!(sanitize(name).chars().count(), name.chars().count());
        assert_eq!(sanitize(name).len(), name.len());
    }

    #[test]
    fn del_is_allowed() {
        assert!(!is_invalid_filename_char('\u{7f}'));
        assert!(is_invalid_filename_char('\u{1f}'));
        assert!(!is_invalid_filename_char(' '));
    }

    #[test]
    fn custom_placeholder() {
        assert_eq!(sanitize_with("a:b", '-').unwrap(), "a-b");
        assert!(matches!(sanitize_with("a:b", '/'), Err(ArcioError::InvalidArgument(_))));
    }

    #[test]
    fn shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || sanitize(&format!("{}:{}", i, i))))
            .collect();

        for (i, h) in handles.into_iter().enumerate() {
            assert_eq!(h.join().unwrap(), format!("{}_{}", i, i));
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn idempotent(s in "\\PC*") {
                let once = sanitize(&s);
                prop_assert_eq!(sanitize(&once), once.clone());
            }

            #[test]
            fn no_invalid_left(s in any::<String>()) {
                prop_assert!(!sanitize(&s).chars().any(is_invalid_filename_char));
            }
        }
    }
}
