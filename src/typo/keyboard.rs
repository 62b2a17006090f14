//! QWERTY neighbour and look-alike character tables
//!
//! Used by the typo editor to pick plausible mistyped characters.
//! Uppercase input maps to uppercase output.

/// Keys physically adjacent to `c` on a QWERTY layout (letters only)
///
/// # Examples
/// ```
/// use corpaug::typo::keyboard::keyboard_neighbours;
/// assert_eq!(keyboard_neighbours('s'), "adwezx");
/// assert_eq!(keyboard_neighbours('5'), "");
/// ```
pub fn keyboard_neighbours(c: char) -> &'static str {
    // Same row first, then the staggered rows above and below
    match c.to_ascii_lowercase() {
        'q' => "wa",
        'w' => "qeas",
        'e' => "wrsd",
        'r' => "etdf",
        't' => "ryfg",
        'y' => "tugh",
        'u' => "yihj",
        'i' => "uojk",
        'o' => "ipkl",
        'p' => "ol",
        'a' => "sqwz",
        's' => "adwezx",
        'd' => "sferxc",
        'f' => "dgrtcv",
        'g' => "fhtyvb",
        'h' => "gjyubn",
        'j' => "hkuinm",
        'k' => "jliom",
        'l' => "kop",
        'z' => "xas",
        'x' => "zcsd",
        'c' => "xvdf",
        'v' => "cbfg",
        'b' => "vngh",
        'n' => "bmhj",
        'm' => "njk",
        _ => "",
    }
}

/// Characters that look like `c`
pub fn similar_chars(c: char) -> &'static str {
    match c {
        'a' => "áàâäå",
        'A' => "ÁÀÂÄÅ",
        'c' => "ç",
        'C' => "Ç",
        'e' => "éèêë",
        'E' => "ÉÈÊË",
        'i' => "íìîï1l",
        'I' => "ÍÌÎÏ1l",
        'l' => "1I",
        'n' => "ñ",
        'N' => "Ñ",
        'o' => "óòôöø0",
        'O' => "ÓÒÔÖØ0",
        'u' => "úùûü",
        'U' => "ÚÙÛÜ",
        'y' => "ýÿ",
        's' => "5",
        'S' => "5",
        'B' => "8",
        'g' => "9",
        'Z' => "2",
        '0' => "oO",
        '1' => "lI",
        '5' => "S",
        '8' => "B",
        _ => "",
    }
}

/// Applies the case of `original` to `replacement`.
pub fn match_case(original: char, replacement: char) -> char {
    if original.is_uppercase() {
        replacement.to_uppercase().next().unwrap_or(replacement)
    } else {
        replacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_are_symmetric() {
        for c in 'a'..='z' {
            for n in keyboard_neighbours(c).chars() {
                assert!(
                    keyboard_neighbours(n).contains(c),
                    "{} -> {} is not symmetric",
                    c,
                    n
                );
            }
        }
    }

    #[test]
    fn test_every_letter_has_neighbours() {
        for c in 'a'..='z' {
            assert!(!keyboard_neighbours(c).is_empty(), "{}", c);
        }
        assert_eq!(keyboard_neighbours('Q'), "wa");
    }

    #[test]
    fn test_similar_chars_never_whitespace() {
        for c in ('a'..='z').chain('A'..='Z').chain('0'..='9') {
            assert!(similar_chars(c).chars().all(|s| !s.is_whitespace() && s != c));
        }
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case('Q', 'w'), 'W');
        assert_eq!(match_case('q', 'w'), 'w');
        assert_eq!(match_case('7', 'w'), 'w');
    }
}
