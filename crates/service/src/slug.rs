//! URL slugs for stores and categories.

use unicode_normalization::UnicodeNormalization;

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || ('\u{0e01}'..='\u{0e59}').contains(&c)
}

/// Lowercase, strip Latin accents, keep ASCII alphanumerics and Thai, join everything else with `-`.
///
/// ```
/// assert_eq!(service::slug::to_slug("Café Déjà Vu!"), "cafe-deja-vu");
/// ```
pub fn to_slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.to_lowercase().nfkd().filter(|c| !is_combining_mark(*c)) {
        if is_slug_char(c) {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}
