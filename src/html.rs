//! html.rs — escaping for text interpolated into the generated page.

/// Escape text for element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// Percent-encode the characters that could close a CSS `url('…')` or the
/// surrounding attribute. The result still needs [`escape`] for `&`.
pub fn css_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\'' | '"' | '(' | ')' | '\\' | '<' | '>' | ';' => out.push_str(&format!("%{:02X}", c as u32)),
            c if c.is_whitespace() || c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Make serialized JSON safe to embed inside a `<script>` element.
pub fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape("Célula Água"), "Célula Água");
    }

    #[test]
    fn css_url_cannot_leave_the_url_function() {
        let out = css_url("x');background:red;x:('");
        assert_eq!(out, "x%27%29%3Bbackground:red%3Bx:%28%27");
        assert_eq!(css_url("a b\\c\"d\n"), "a%20b%5Cc%22d%0A");
        assert_eq!(css_url("https://cdn.x/p.jpg?s=1&t=2"), "https://cdn.x/p.jpg?s=1&t=2");
    }

    #[test]
    fn script_payload_cannot_close_the_tag() {
        assert!(!script_safe(r#"{"a":"</script>"}"#).contains("</script>"));
    }
}
