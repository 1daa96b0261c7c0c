use super::model::Table;

// ---------------------------------------------------------------------------
// Column-name normalization
// ---------------------------------------------------------------------------

/// Canonical form of a raw header: trimmed, lowercased, spaces turned into
/// underscores, then everything that is not a letter, digit or underscore
/// dropped.
///
/// The space replacement must run before the character filter, otherwise the
/// spaces would simply disappear.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|&c| is_word_char(c))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c == '_' || (c.is_alphanumeric() && !is_combining_mark(c))
}

/// Combining marks (vowel signs, viramas, diacritics) that `char::is_alphabetic`
/// still reports as alphabetic. They are not letters of their own.
const COMBINING_MARKS: &[(char, char)] = &[
    ('\u{0300}', '\u{036F}'),
    ('\u{0483}', '\u{0489}'),
    ('\u{0591}', '\u{05BD}'),
    ('\u{05BF}', '\u{05BF}'),
    ('\u{05C1}', '\u{05C2}'),
    ('\u{05C4}', '\u{05C5}'),
    ('\u{05C7}', '\u{05C7}'),
    ('\u{0610}', '\u{061A}'),
    ('\u{064B}', '\u{065F}'),
    ('\u{0670}', '\u{0670}'),
    ('\u{06D6}', '\u{06DC}'),
    ('\u{06DF}', '\u{06E4}'),
    ('\u{06E7}', '\u{06E8}'),
    ('\u{06EA}', '\u{06ED}'),
    // Devanagari
    ('\u{0900}', '\u{0903}'),
    ('\u{093A}', '\u{093C}'),
    ('\u{093E}', '\u{094F}'),
    ('\u{0951}', '\u{0957}'),
    ('\u{0962}', '\u{0963}'),
    // Bengali
    ('\u{0981}', '\u{0983}'),
    ('\u{09BC}', '\u{09BC}'),
    ('\u{09BE}', '\u{09CD}'),
    ('\u{09D7}', '\u{09D7}'),
    ('\u{09E2}', '\u{09E3}'),
    // Gurmukhi
    ('\u{0A01}', '\u{0A03}'),
    ('\u{0A3C}', '\u{0A51}'),
    ('\u{0A70}', '\u{0A71}'),
    ('\u{0A75}', '\u{0A75}'),
    // Gujarati
    ('\u{0A81}', '\u{0A83}'),
    ('\u{0ABC}', '\u{0ABC}'),
    ('\u{0ABE}', '\u{0ACD}'),
    ('\u{0AE2}', '\u{0AE3}'),
    ('\u{0AFA}', '\u{0AFF}'),
    // Oriya
    ('\u{0B01}', '\u{0B03}'),
    ('\u{0B3C}', '\u{0B3C}'),
    ('\u{0B3E}', '\u{0B57}'),
    ('\u{0B62}', '\u{0B63}'),
    // Tamil
    ('\u{0B82}', '\u{0B82}'),
    ('\u{0BBE}', '\u{0BCD}'),
    ('\u{0BD7}', '\u{0BD7}'),
    // Telugu
    ('\u{0C00}', '\u{0C04}'),
    ('\u{0C3C}', '\u{0C3C}'),
    ('\u{0C3E}', '\u{0C56}'),
    ('\u{0C62}', '\u{0C63}'),
    // Kannada
    ('\u{0C81}', '\u{0C83}'),
    ('\u{0CBC}', '\u{0CBC}'),
    ('\u{0CBE}', '\u{0CD6}'),
    ('\u{0CE2}', '\u{0CE3}'),
    // Malayalam
    ('\u{0D00}', '\u{0D03}'),
    ('\u{0D3B}', '\u{0D3C}'),
    ('\u{0D3E}', '\u{0D4D}'),
    ('\u{0D57}', '\u{0D57}'),
    ('\u{0D62}', '\u{0D63}'),
    // Thai
    ('\u{0E31}', '\u{0E31}'),
    ('\u{0E34}', '\u{0E3A}'),
    ('\u{0E47}', '\u{0E4E}'),
    ('\u{1AB0}', '\u{1AFF}'),
    ('\u{1DC0}', '\u{1DFF}'),
    ('\u{20D0}', '\u{20FF}'),
    ('\u{3099}', '\u{309A}'),
    ('\u{FE20}', '\u{FE2F}'),
];

fn is_combining_mark(c: char) -> bool {
    COMBINING_MARKS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Normalize a header list, preserving length and order.
pub fn normalize_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| normalize_column_name(n.as_ref()))
        .collect()
}

/// Rewrite the column names of `table` in place. Cell data is untouched.
///
/// Distinct headers may collapse onto the same name; that is allowed, but
/// logged.
pub fn normalize_columns(table: &mut Table) {
    let names = normalize_names(&table.column_names());
    for (col, name) in table.columns.iter_mut().zip(names) {
        col.name = name;
    }

    for dup in table.duplicate_column_names() {
        log::warn!(
            "{}: several columns normalize to '{dup}'; lookups use the first one",
            table.source.display()
        );
    }
}
