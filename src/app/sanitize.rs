const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const WINDOWS_RESERVED_NAMES: [&str; 22] = [
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

const MAX_LENGTH: usize = 100;

/// Turns an arbitrary string into something safe to use as a file name.
///
/// Unsafe characters are replaced with `replacement`, repeated replacements
/// collapse into one and are trimmed from both ends. May return an empty string.
pub fn sanitize_filename(name: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut leading_dots = true;

    for c in name.chars() {
        let unsafe_char = RESERVED_CHARS.contains(&c) || c.is_control();
        let relative_dot = leading_dots && c == '.';
        if c != '.' {
            leading_dots = false;
        }

        if unsafe_char || relative_dot {
            if !out.ends_with(replacement) || replacement.is_empty() {
                out.push_str(replacement);
            }
        } else {
            out.push(c);
        }
    }

    let mut out = trim_replacement(&out, replacement).to_string();

    // Only a bare device name is reserved; `CON.m3u8` is a fine file name.
    if WINDOWS_RESERVED_NAMES.contains(&out.to_lowercase().as_str()) {
        out.push_str(replacement);
    }

    truncate_keeping_extension(out)
}

fn trim_replacement<'a>(s: &'a str, replacement: &str) -> &'a str {
    if replacement.is_empty() {
        return s;
    }
    let mut s = s;
    while let Some(rest) = s.strip_prefix(replacement) {
        s = rest;
    }
    while let Some(rest) = s.strip_suffix(replacement) {
        s = rest;
    }
    s
}

fn truncate_keeping_extension(name: String) -> String {
    if name.chars().count() <= MAX_LENGTH {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name.as_str(), ""),
    };
    let keep = MAX_LENGTH.saturating_sub(ext.chars().count());
    let mut truncated: String = stem.chars().take(keep).collect();
    truncated.push_str(ext);
    truncated
}
