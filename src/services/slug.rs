//! Slug derivation for relation entities.

use crate::models::SlugSanitization;

/// Derive the slug stored with a relation entity.
///
/// The name is lower-cased, sanitized against `[a-zA-Z0-9 ]` according to
/// `mode`, stripped of spaces and finally passed through [`slugify`].
///
/// With [`SlugSanitization::FirstOnly`] only the first offending character is
/// removed; later ones survive into `slugify`, which keeps punctuation such as
/// `-`, `.` or `:`. Combined with [`slugify`]'s edge-hyphen and unmapped
/// character handling this reproduces slugs written by earlier runs.
pub fn relation_slug(name: &str, mode: SlugSanitization) -> String {
    let mut current = name.to_lowercase();
    sanitize(&mut current, mode);
    let compact: String = current.chars().filter(|c| *c != ' ').collect();
    slugify(&compact)
}

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

fn sanitize(text: &mut String, mode: SlugSanitization) {
    match mode {
        SlugSanitization::FirstOnly => {
            if let Some((idx, c)) = text.char_indices().find(|(_, c)| !is_plain(*c)) {
                text.replace_range(idx..idx + c.len_utf8(), "");
            }
        }
        SlugSanitization::All => text.retain(is_plain),
    }
}

/// Turn arbitrary text into a URL-safe token.
///
/// Latin, Greek and Cyrillic letters are transliterated; any other non-ASCII
/// character is dropped, as are characters outside `[\w\s$*_+~.()'"!:@-]`.
/// Surrounding whitespace is trimmed, then every run of whitespace or hyphens
/// becomes a single `-`. Leading or trailing hyphens are kept.
pub fn slugify(input: &str) -> String {
    let mut kept = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii() {
            if is_slug_char(c) {
                kept.push(c);
            }
        } else if let Some(mapped) = deunicode::deunicode_char(c).filter(|_| has_fold(c)) {
            kept.extend(mapped.trim().chars().filter(|m| is_slug_char(*m)));
        }
    }

    let mut slug = String::with_capacity(kept.len());
    let mut in_separator = false;
    for c in kept.trim().chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        } else {
            slug.push(c);
            in_separator = false;
        }
    }

    slug.to_lowercase()
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || "_$*+~.()'\"!:@-".contains(c)
}

/// Scripts with a transliteration table: Latin-1 through Latin Extended-B,
/// Greek, Cyrillic and Latin Extended Additional.
fn has_fold(c: char) -> bool {
    matches!(
        c,
        '\u{00C0}'..='\u{024F}'
            | '\u{0370}'..='\u{03FF}'
            | '\u{0400}'..='\u{04FF}'
            | '\u{1E00}'..='\u{1EFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_names() {
        let mode = SlugSanitization::FirstOnly;
        assert_eq!(relation_slug("Action", mode), "action");
        assert_eq!(relation_slug("Dev1", mode), "dev1");
        assert_eq!(relation_slug("CD PROJEKT RED", mode), "cdprojektred");
    }

    #[test]
    fn first_only_keeps_later_offenders() {
        let mode = SlugSanitization::FirstOnly;
        assert_eq!(relation_slug("Role-playing", mode), "roleplaying");
        assert_eq!(relation_slug("Point-and-click", mode), "pointand-click");
        assert_eq!(relation_slug("Pokémon Café", mode), "pokmoncafe");
    }

    #[test]
    fn all_strips_every_offender() {
        let mode = SlugSanitization::All;
        assert_eq!(relation_slug("Point-and-click", mode), "pointandclick");
        assert_eq!(relation_slug("Pokémon Café", mode), "pokmoncaf");
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = relation_slug("Devolver Digital", SlugSanitization::FirstOnly);
        let second = relation_slug("Devolver Digital", SlugSanitization::FirstOnly);
        assert_eq!(first, second);
    }

    #[test]
    fn edge_hyphens_survive_first_only() {
        let mode = SlugSanitization::FirstOnly;
        assert_eq!(relation_slug("-Foo-", mode), "foo-");
        assert_eq!(relation_slug("Foo-", mode), "foo");
        assert_eq!(relation_slug("-Foo--Bar-", mode), "foo-bar-");
    }

    #[test]
    fn unmapped_scripts_are_dropped() {
        let mode = SlugSanitization::FirstOnly;
        assert_eq!(relation_slug("a中文", mode), "a");
        assert_eq!(slugify("東方 Project"), "project");
        assert_eq!(slugify("Ωmega"), "omega");
    }

    #[test]
    fn slugify_folds_and_collapses() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("  a -- b  "), "a-b");
        assert_eq!(slugify("50% off!"), "50-off!");
        assert_eq!(slugify("a.b:c"), "a.b:c");
        assert_eq!(slugify("-a b-"), "-a-b-");
    }
}
