//! Small shared helpers: shell quoting, diagnostics text munging, and
//! timestamp formatting for the log writer.

/// Quote `s` so that a POSIX shell passes it through as exactly one word.
///
/// Embedded single quotes are closed, escaped, and reopened (`'"'"'`), the
/// only portable way to carry a quote through `sh -c`.
pub fn shell_single_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// First non-empty line of `text`, trimmed; `None` when there is none.
pub fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

/// Format seconds since the Unix epoch as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Deliberately avoids a date crate; the log timestamp is the only consumer.
pub fn epoch_to_datetime(secs: i64) -> String {
    if secs < 0 {
        return secs.to_string();
    }
    let mut days = secs / 86_400;
    let sod = secs % 86_400;
    let (hour, minute, second) = (sod / 3600, (sod % 3600) / 60, sod % 60);

    let mut year: i64 = 1970;
    loop {
        let len = if is_leap(year) { 366 } else { 365 };
        if days < len {
            break;
        }
        days -= len;
        year += 1;
    }
    let month_lens = [
        31,
        if is_leap(year) { 29 } else { 28 },
        31,
        30,
        31,
        30,
        31,
        31,
        30,
        31,
        30,
        31,
    ];
    let mut month = 1;
    for len in month_lens {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }
    format!(
        "{year:04}-{month:02}-{:02} {hour:02}:{minute:02}:{second:02}",
        days + 1
    )
}

/// Gregorian leap-year rule.
fn is_leap(y: i64) -> bool {
    (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_handles_edges() {
        assert_eq!(shell_single_quote(""), "''");
        assert_eq!(shell_single_quote("com.example.app"), "'com.example.app'");
        assert_eq!(shell_single_quote("a'b"), "'a'\"'\"'b'");
    }

    #[test]
    fn first_line_skips_blanks() {
        assert_eq!(first_line(""), None);
        assert_eq!(first_line("\n\n"), None);
        assert_eq!(
            first_line("permission denied\nmore context"),
            Some("permission denied")
        );
        assert_eq!(first_line("\n  spaced  \nrest"), Some("spaced"));
    }

    #[test]
    fn epoch_formatting() {
        assert_eq!(epoch_to_datetime(0), "1970-01-01 00:00:00");
        // 2000-02-29 00:00:00 UTC, a century leap day
        assert_eq!(epoch_to_datetime(951_782_400), "2000-02-29 00:00:00");
        assert_eq!(epoch_to_datetime(-1), "-1");
    }
}
