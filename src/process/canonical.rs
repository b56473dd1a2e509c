//! Canonical program name derivation.
//!
//! This module reduces a raw executable identifier (an absolute path such as
//! `/usr/local/sbin/foo`, or a kernel-thread style string such as
//! `kthreadd/23`) to the stable group name used as the metric label value.

/// Directory components that say nothing about the program itself.
const GENERIC_SEGMENTS: [&str; 4] = ["usr", "bin", "sbin", "local"];

/// Derives the canonical group name for a raw executable identifier.
///
/// Absolute paths collapse to their most descriptive trailing component:
/// `/usr/bin/foo` and `/usr/local/sbin/foo` both become `foo`. Identifiers
/// without a leading separator keep only the part before the first `/`,
/// which handles kernel-thread instance qualifiers like `kthreadd/23`.
pub fn canonical_name(raw: &str) -> String {
    if raw.starts_with('/') {
        let mut best = "";
        for segment in raw.split('/') {
            if best.is_empty() {
                best = segment;
                continue;
            }
            // Ignore segments which are not descriptive of the program.
            if !GENERIC_SEGMENTS.contains(&segment) {
                best = segment;
            }
        }
        best.to_string()
    } else {
        // The first part is the program name, anything after a `/` is an
        // instance qualifier.
        raw.split('/').next().unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_paths_collapse_to_program_name() {
        assert_eq!(canonical_name("/usr/bin/foo"), "foo");
        assert_eq!(canonical_name("/usr/local/sbin/foo"), "foo");
        assert_eq!(canonical_name("/bin/bash"), "bash");
        assert_eq!(canonical_name("/opt/app/server"), "server");
    }

    #[test]
    fn test_variants_of_same_program_share_a_name() {
        assert_eq!(
            canonical_name("/usr/bin/foo"),
            canonical_name("/usr/local/sbin/foo")
        );
    }

    #[test]
    fn test_kernel_thread_identifiers_keep_first_part() {
        assert_eq!(canonical_name("kthreadd/23"), "kthreadd");
        assert_eq!(canonical_name("ksoftirqd/0"), "ksoftirqd");
    }

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(canonical_name("systemd"), "systemd");
        assert_eq!(canonical_name("nginx"), "nginx");
    }

    #[test]
    fn test_result_contains_no_separator() {
        for raw in ["/usr/bin/foo", "/a/b/c/d", "kworker/1:2", "/usr/sbin/sshd"] {
            assert!(!canonical_name(raw).contains('/'), "input: {}", raw);
        }
    }

    #[test]
    fn test_generic_segment_only_wins_for_degenerate_input() {
        // Every segment is generic, so the first one sticks.
        assert_eq!(canonical_name("/usr/bin"), "usr");
        // A trailing descriptive segment always wins over generic ones.
        assert_eq!(canonical_name("/usr/local/bin/usrtool"), "usrtool");
    }

    #[test]
    fn test_empty_input_yields_empty_name() {
        assert_eq!(canonical_name(""), "");
    }
}
