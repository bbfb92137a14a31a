//! File-name part sanitization.

/// Characters a Windows file name may not contain, plus raw control whitespace.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\r', '\n', '\t'];

const REPLACEMENT: char = '-';

/// Make `input` safe to embed in a file name.
///
/// Forbidden characters become `-`; surrounding whitespace and trailing dots
/// or spaces are removed. All-whitespace input yields an empty string.
pub fn sanitize_file_name_part(input: &str) -> String {
    let replaced: String = input
        .trim()
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { REPLACEMENT } else { c })
        .collect();
    replaced.trim().trim_end_matches(['.', ' ']).to_string()
}
