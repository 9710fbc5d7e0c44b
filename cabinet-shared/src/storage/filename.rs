/// Filename sanitizing and upload allow-list
///
/// Client filenames are reduced to a flat, ASCII-only name before they
/// touch the filesystem:
///
/// 1. NFKD decomposition folds accents off (`é` becomes `e`), then any
///    remaining non-ASCII character is dropped
/// 2. Path separators (`/`, `\`) become spaces
/// 3. Whitespace runs are joined with `_`
/// 4. Anything outside `[A-Za-z0-9._-]` is dropped
/// 5. Leading and trailing `.` and `_` are stripped
///
/// The result never contains a separator and never starts with `.`, so it
/// cannot name a parent directory or a hidden file.
///
/// ```
/// use cabinet_shared::storage::filename::{sanitize, is_allowed};
///
/// assert_eq!(sanitize("../../etc/passwd"), "etc_passwd");
/// assert_eq!(sanitize("My Report.pdf"), "My_Report.pdf");
/// assert!(is_allowed("photo.JPG"));
/// assert!(!is_allowed("setup.exe"));
/// ```

use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for upload (matched case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["txt", "pdf", "png", "jpg", "jpeg", "gif"];

/// Reduces a client-supplied filename to a safe flat name
///
/// May return an empty string, which callers must reject.
pub fn sanitize(filename: &str) -> String {
    let flattened: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Returns the lowercased suffix after the last `.`, if any
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether the filename carries an allow-listed extension
///
/// Decided by suffix only; content is never inspected.
pub fn is_allowed(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type sent with a download
pub fn content_type(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("txt") => "text/plain; charset=utf-8",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
