//! Documentation links for table entries

/// Replace every character that is not an ASCII letter with `-`.
pub fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { '-' })
        .collect()
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Link to the vendor page for an instruction: `<base><slug(heading)>--<Slug(brief)>-`.
pub fn doc_url(base: &str, heading: &str, brief: &str) -> String {
    format!("{base}{}--{}-", slug(heading), capitalize(&slug(brief)))
}
