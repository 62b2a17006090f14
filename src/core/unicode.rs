//! Unicode script tables for synthetic noise words
//!
//! Noise words are drawn from letters of a single non-Latin script so they
//! never collide with real vocabulary of the usual training languages.

use rand::Rng;

/// Inclusive code point range of one script's letters.
/// Every code point in each range is assigned.
const NOISE_SCRIPTS: [(u32, u32); 8] = [
    (0x0410, 0x044F), // Cyrillic А..я
    (0x03B1, 0x03C9), // Greek α..ω
    (0x0531, 0x0556), // Armenian Ա..Ֆ
    (0x05D0, 0x05EA), // Hebrew א..ת
    (0x0915, 0x0939), // Devanagari क..ह
    (0x0995, 0x09A8), // Bengali ক..ন
    (0x0E01, 0x0E2E), // Thai ก..ฮ
    (0x10D0, 0x10FA), // Georgian ა..ჺ
];

/// Is `c` a letter any noise word could contain
pub fn is_noise_char(c: char) -> bool {
    let code = c as u32;
    NOISE_SCRIPTS
        .iter()
        .any(|&(first, last)| (first..=last).contains(&code))
}

/// A random word of `len` letters from script `script` (index into the table,
/// wrapped).
fn random_word<R: Rng + ?Sized>(rng: &mut R, script: usize, len: usize) -> String {
    let (first, last) = NOISE_SCRIPTS[script % NOISE_SCRIPTS.len()];
    (0..len)
        .filter_map(|_| char::from_u32(rng.gen_range(first..=last)))
        .collect()
}

/// Exactly `count` noise words, each `min_len..=max_len` letters long, all
/// from one randomly chosen script.
pub fn noise_words<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min_len: usize,
    max_len: usize,
) -> Vec<String> {
    let min_len = min_len.max(1);
    let max_len = max_len.max(min_len);
    let script = rng.gen_range(0..NOISE_SCRIPTS.len());

    (0..count)
        .map(|_| {
            let len = rng.gen_range(min_len..=max_len);
            random_word(rng, script, len)
        })
        .collect()
}

/// `1..=max_words` noise words (see [`noise_words`]).
pub fn random_noise_words<R: Rng + ?Sized>(
    rng: &mut R,
    min_len: usize,
    max_len: usize,
    max_words: usize,
) -> Vec<String> {
    let count = rng.gen_range(1..=max_words.max(1));
    noise_words(rng, count, min_len, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_script_ranges_are_letters() {
        for &(first, last) in NOISE_SCRIPTS.iter() {
            for code in first..=last {
                let c = char::from_u32(code).unwrap();
                assert!(c.is_alphabetic(), "U+{:04X}", code);
                assert!(!c.is_ascii());
            }
        }
    }

    #[test]
    fn test_noise_words_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let words = noise_words(&mut rng, 3, 2, 5);
            assert_eq!(words.len(), 3);
            for word in &words {
                let len = word.chars().count();
                assert!((2..=5).contains(&len));
                assert!(word.chars().all(is_noise_char));
            }
        }
    }

    #[test]
    fn test_single_script_per_call() {
        let mut rng = StdRng::seed_from_u64(9);
        let words = noise_words(&mut rng, 4, 3, 3);
        let joined: String = words.concat();
        let script = NOISE_SCRIPTS
            .iter()
            .position(|&(f, l)| (f..=l).contains(&(joined.chars().next().unwrap() as u32)))
            .unwrap();
        let (first, last) = NOISE_SCRIPTS[script];
        assert!(joined.chars().all(|c| (first..=last).contains(&(c as u32))));
    }

    #[test]
    fn test_random_noise_words_count() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let words = random_noise_words(&mut rng, 1, 2, 4);
            assert!((1..=4).contains(&words.len()));
        }
    }

    #[test]
    fn test_degenerate_lengths() {
        let mut rng = StdRng::seed_from_u64(5);
        let words = noise_words(&mut rng, 2, 0, 0);
        assert!(words.iter().all(|w| w.chars().count() == 1));
    }
}
