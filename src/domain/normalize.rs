/// Lowercases `s`, then uppercases the first character of every
/// whitespace-separated word. Whitespace itself is preserved.
pub fn capitalize_word(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_whitespace() {
            out.push(c);
            at_word_start = true;
        } else if at_word_start {
            out.push(c.to_ascii_uppercase());
            at_word_start = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }

    out
}

pub fn normalize_email(s: &str) -> String {
    s.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_word() {
        assert_eq!(capitalize_word("john"), "John");
        assert_eq!(capitalize_word("SMITH"), "Smith");
        assert_eq!(capitalize_word("mary ANNE"), "Mary Anne");
        assert_eq!(capitalize_word("o'connor"), "O'connor");
        assert_eq!(capitalize_word(""), "");
    }

    #[test]
    fn test_capitalize_word_preserves_whitespace() {
        assert_eq!(capitalize_word("van  der\tberg"), "Van  Der\tBerg");
    }

    #[test]
    fn test_capitalize_word_is_idempotent() {
        for input in ["john", "JOHN SMITH", "jOhN sMiTh", "a b c", "ALREADY Fine"] {
            let once = capitalize_word(input);
            assert_eq!(capitalize_word(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("JOHN@EXAMPLE.COM"), "john@example.com");
        // no trimming
        assert_eq!(normalize_email(" A@B.COM "), " a@b.com ");
    }

    #[test]
    fn test_normalize_email_is_idempotent_and_case_insensitive() {
        for input in ["John@Example.com", "john@example.com", "JOHN@EXAMPLE.COM"] {
            let once = normalize_email(input);
            assert_eq!(normalize_email(&once), once);
            assert_eq!(once, "john@example.com");
        }
    }
}
