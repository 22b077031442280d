/// Minor words kept lower-case inside a title
///
/// Articles, short prepositions and coordinating conjunctions. They are
/// still capitalized as the first or last word, or right after a colon.
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "via", "vs",
];

/// Attribution prefix the catalog puts in front of contributor names
const ATTRIBUTION_PREFIX: &str = "by ";

/// Normalizes a raw contributor string into an author name
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Strip a leading `by ` attribution token (case-insensitive)
/// 3. Trim again
///
/// # Examples
///
/// ```
/// use bestseller_harvest::normalize_author;
///
/// assert_eq!(normalize_author("by Jane Doe"), "Jane Doe");
/// assert_eq!(normalize_author("  Byron Katie "), "Byron Katie");
/// ```
pub fn normalize_author(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = match trimmed.get(..ATTRIBUTION_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(ATTRIBUTION_PREFIX) => {
            &trimmed[ATTRIBUTION_PREFIX.len()..]
        }
        _ => trimmed,
    };
    stripped.trim().to_string()
}

/// Applies title-case capitalization to a raw title
///
/// # Rules
///
/// - A title written entirely in upper case is lower-cased first
/// - Minor words stay lower-case unless first, last, or following a colon
/// - Other words get their first letter capitalized
/// - Words with inner capitals (`iPhone`, `McCarthy`) are left alone
/// - Each part of a hyphenated word is cased on its own
///
/// # Examples
///
/// ```
/// use bestseller_harvest::title_case;
///
/// assert_eq!(title_case("the book"), "The Book");
/// assert_eq!(title_case("THE GIRL ON THE TRAIN"), "The Girl on the Train");
/// ```
pub fn title_case(raw: &str) -> String {
    let trimmed = raw.trim();
    let all_caps =
        trimmed.chars().any(char::is_alphabetic) && !trimmed.chars().any(char::is_lowercase);
    let source = if all_caps {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    };

    let words: Vec<&str> = source.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    let mut cased = Vec::with_capacity(words.len());
    let mut after_colon = false;
    for (index, word) in words.iter().enumerate() {
        let forced = index == 0 || index == last || after_colon;
        cased.push(case_word(word, forced));
        after_colon = word.ends_with(':');
    }
    cased.join(" ")
}

fn case_word(word: &str, forced: bool) -> String {
    word.split('-')
        .enumerate()
        .map(|(index, part)| {
            if is_minor(part) && !(forced && index == 0) {
                part.to_lowercase()
            } else {
                capitalize(part)
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn is_minor(part: &str) -> bool {
    let core = part
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    MINOR_WORDS.contains(&core.as_str())
}

fn capitalize(part: &str) -> String {
    let has_inner_capital = part
        .chars()
        .filter(|c| c.is_alphabetic())
        .skip(1)
        .any(char::is_uppercase);
    if has_inner_capital {
        return part.to_string();
    }

    let mut out = String::with_capacity(part.len());
    let mut seen_alpha = false;
    for c in part.chars() {
        if !seen_alpha && c.is_alphabetic() {
            seen_alpha = true;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
