//! Slug derivation for note titles.

/// Latin spelling of a lowercase Cyrillic letter.
///
/// `ъ` and `ь` have no spelling and are dropped.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "yi",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Convert a title to a URL-safe slug
///
/// - Lowercases the title
/// - Transliterates Cyrillic to Latin
/// - Spells `&` as `and`
/// - Keeps ASCII letters, digits and `_`; everything else becomes a hyphen
/// - Collapses consecutive hyphens and trims them at both ends
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // Start true to trim leading hyphens

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            last_was_hyphen = false;
        } else if let Some(latin) = transliterate(c) {
            if !latin.is_empty() {
                slug.push_str(latin);
                last_was_hyphen = false;
            }
        } else if c == '&' {
            if !last_was_hyphen {
                slug.push('-');
            }
            slug.push_str("and-");
            last_was_hyphen = true;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    // Trim trailing hyphen
    if slug.ends_with('-') {
        slug.pop();
    }

    // Ensure non-empty slug
    if slug.is_empty() {
        slug = "untitled".to_string();
    }

    slug
}

/// Truncate a slug to at most `max_chars` characters without leaving a
/// trailing hyphen behind.
pub fn truncate(slug: &str, max_chars: usize) -> String {
    let cut: String = slug.chars().take(max_chars).collect();
    cut.trim_end_matches('-').to_string()
}

/// Whether `slug` only uses characters allowed in a note URL.
pub fn is_valid(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
