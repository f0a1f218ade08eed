/// A raw field metadata string in the conventional `key:"value"` grammar,
/// extended to tolerate values that span multiple physical lines.
///
/// Keys may carry stray whitespace introduced by multi-line formatting (a key
/// on its own indented line still matches its plain spelling), and quoted
/// values may contain raw newline, carriage-return, and tab characters which
/// are preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagStr<'a>(&'a str);

impl<'a> TagStr<'a> {
    pub fn new(raw: &'a str) -> Self {
        TagStr(raw)
    }

    /// Returns the value for `key`, or an empty string when absent.
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Scans the tag left to right for `key` and returns its decoded value.
    ///
    /// The first pair whose sanitized key equals `key` wins. Malformed
    /// trailing content (a missing `:"` boundary or an unterminated quote)
    /// ends the scan silently; a pair whose value fails to decode is skipped
    /// and the scan continues.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut tag = self.0;
        while !tag.is_empty() {
            // Skip leading spaces.
            let bytes = tag.as_bytes();
            let mut i = 0;
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            tag = &tag[i..];
            if tag.is_empty() {
                break;
            }

            // Scan the key token up to a `:` immediately followed by `"`.
            // LF, CR and tab are allowed inside the token so a key may sit
            // on its own formatted line; they are stripped before comparison.
            let bytes = tag.as_bytes();
            let mut i = 0;
            while i < bytes.len() && key_byte(bytes[i]) {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                break;
            }

            let name = sanitize_key(&tag[..i]);
            tag = &tag[i + 1..];

            // Scan the quoted value; a backslash escapes the next byte.
            let bytes = tag.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            let qvalue = &tag[..=i];
            tag = &tag[i + 1..];

            if name == key {
                if let Some(value) = unescape(qvalue.trim_matches('"')) {
                    return Some(value);
                }
            }
        }
        None
    }
}

/// Bytes permitted inside a key token: printable characters plus LF/CR/tab,
/// excluding `:`, `"` and DEL.
fn key_byte(b: u8) -> bool {
    match b {
        b':' | b'"' | 0x7f => false,
        b'\n' | b'\r' | b'\t' => true,
        _ => b >= b' ',
    }
}

/// Removes the whitespace that multi-line tag formatting leaves inside a key.
fn sanitize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r' | ' '))
        .collect()
}

/// Decodes backslash escapes, passing raw control characters through
/// verbatim so multi-line values keep their physical line breaks and
/// indentation. Returns `None` on an unknown escape or a trailing backslash.
fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            _ => return None,
        }
    }
    Some(out)
}
