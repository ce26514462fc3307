const FALLBACK_NAME: &str = "download.zip";
const MAX_NAME_BYTES: usize = 255;

/// Makes a server-suggested or user-derived name safe to create on disk.
///
/// Path separators and characters rejected by common file systems become `_`,
/// surrounding spaces and dots are trimmed, and reserved Windows device names
/// get a trailing `_` on their stem.
pub fn sanitize_filename(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut name = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    let stem_len = name.find('.').unwrap_or(name.len());
    if is_reserved_windows_name(&name[..stem_len]) {
        name.insert(stem_len, '_');
    }

    if name.len() > MAX_NAME_BYTES {
        name = shorten_keeping_extension(&name, MAX_NAME_BYTES);
    }
    name
}

/// Cuts the stem so the whole name fits in `max` bytes; the extension survives.
fn shorten_keeping_extension(name: &str, max: usize) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot < max => name.split_at(dot),
        _ => (name, ""),
    };
    let mut end = max - ext.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ext}", &stem[..end])
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
