//! English inflection for Rails naming conventions.
//!
//! Covers what route and association resolution need: `posts` ↔ `post`,
//! `admin/users` → `Admin::Users`, `PostsController` → `posts_controller`.
//! The rule tables are a subset of ActiveSupport's defaults, applied
//! last-rule-first like the original inflector.

use once_cell::sync::Lazy;
use regex::Regex;

/// Builds a regex from a literal pattern known to be valid.
#[allow(clippy::expect_used)]
pub(crate) fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex is valid")
}

const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

static PLURALS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"$", "s"),
        (r"(?i)s$", "s"),
        (r"(?i)^(ax|test)is$", "${1}es"),
        (r"(?i)(octop|vir)(us|i)$", "${1}i"),
        (r"(?i)(alias|status)$", "${1}es"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(buffal|tomat)o$", "${1}oes"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)([ti])a$", "${1}a"),
        (r"(?i)sis$", "ses"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)(hive)$", "${1}s"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)^(m|l)ouse$", "${1}ice"),
        (r"(?i)^(m|l)ice$", "${1}ice"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)^(oxen)$", "${1}"),
        (r"(?i)(quiz)$", "${1}zes"),
    ]
    .into_iter()
    .rev()
    .map(|(pattern, replacement)| (static_regex(pattern), replacement))
    .collect()
});

static SINGULARS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)s$", ""),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)([ti])a$", "${1}um"),
        (
            r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(s)eries$", "${1}eries"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)^(m|l)ice$", "${1}ouse"),
        (r"(?i)(bus)(es)?$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(cris|test)(is|es)$", "${1}is"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(octop|vir)(us|i)$", "${1}us"),
        (r"(?i)(alias|status)(es)?$", "${1}"),
        (r"(?i)^(ox)en", "${1}"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(database)s$", "${1}"),
    ]
    .into_iter()
    .rev()
    .map(|(pattern, replacement)| (static_regex(pattern), replacement))
    .collect()
});

fn apply(word: &str, rules: &[(Regex, &str)], irregular: impl Fn(&str) -> Option<String>) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word.to_lowercase().as_str()) {
        return word.to_string();
    }
    // Only the last path segment of `admin/post` is inflected.
    let (prefix, last) = match word.rfind(['/', '_']) {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };
    if let Some(replaced) = irregular(last) {
        return format!("{prefix}{replaced}");
    }
    for (regex, replacement) in rules {
        if regex.is_match(word) {
            return regex.replace(word, *replacement).into_owned();
        }
    }
    word.to_string()
}

/// Returns the plural form of `word` (`post` → `posts`, `category` → `categories`).
#[must_use]
pub fn pluralize(word: &str) -> String {
    apply(word, &PLURALS, |last| {
        IRREGULARS
            .iter()
            .find(|(singular, plural)| last == *singular || last == *plural)
            .map(|(_, plural)| (*plural).to_string())
    })
}

/// Returns the singular form of `word` (`posts` → `post`, `people` → `person`).
#[must_use]
pub fn singularize(word: &str) -> String {
    apply(word, &SINGULARS, |last| {
        IRREGULARS
            .iter()
            .find(|(singular, plural)| last == *singular || last == *plural)
            .map(|(singular, _)| (*singular).to_string())
    })
}

/// `admin/user_posts` → `Admin::UserPosts`.
#[must_use]
pub fn camelize(word: &str) -> String {
    word.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// `Admin::UserPosts` → `admin/user_posts`.
#[must_use]
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let mut out = String::with_capacity(word.len() + 4);
    let chars: Vec<char> = word.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c == '-' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

/// Table name to class name: `user_posts` → `UserPost`.
#[must_use]
pub fn classify(word: &str) -> String {
    camelize(&singularize(word))
}

/// Class name to table name: `UserPost` → `user_posts`.
#[must_use]
pub fn tableize(word: &str) -> String {
    pluralize(&underscore(word))
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
