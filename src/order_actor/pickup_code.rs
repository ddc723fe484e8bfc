//! Pickup code minting.
//!
//! Codes are short strings a buyer reads out at the counter, so the alphabet
//! drops `0/O` and `1/I` to keep them unambiguous when spoken or scribbled.

use std::collections::HashSet;

use rand::Rng;

/// 32 characters: uppercase alphanumerics minus the four look-alikes.
pub const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

pub const DEFAULT_CODE_LENGTH: usize = 6;

/// One uniformly random code. Callers that need uniqueness among live codes
/// go through [`mint`].
pub fn generate(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Generates until the result collides with nothing outstanding. A retired
/// code (redeemed or expired order) may be handed out again later.
pub fn mint(length: usize, outstanding: &HashSet<String>) -> String {
    loop {
        let code = generate(length);
        if !outstanding.contains(&code) {
            return code;
        }
    }
}

/// Exact comparison: no case folding, no trimming, no prefix acceptance.
pub fn matches(expected: &str, presented: &str) -> bool {
    expected == presented
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_use_only_the_unambiguous_alphabet() {
        for _ in 0..100 {
            let code = generate(DEFAULT_CODE_LENGTH);
            assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn mint_skips_every_outstanding_code() {
        // With length 1 and 31 of the 32 characters taken, only one code is
        // mintable.
        let outstanding: HashSet<String> = CODE_ALPHABET[1..]
            .iter()
            .map(|b| (*b as char).to_string())
            .collect();
        for _ in 0..20 {
            assert_eq!(mint(1, &outstanding), "2");
        }
    }

    #[test]
    fn a_thousand_outstanding_codes_are_pairwise_distinct() {
        let mut outstanding = HashSet::new();
        for _ in 0..1000 {
            let code = mint(DEFAULT_CODE_LENGTH, &outstanding);
            assert!(outstanding.insert(code));
        }
    }

    #[test]
    fn validation_is_exact() {
        assert!(matches("AB2CD3", "AB2CD3"));
        assert!(!matches("AB2CD3", "ab2cd3"));
        assert!(!matches("AB2CD3", "AB2CD"));
        assert!(!matches("AB2CD3", "AB2CD3 "));
        assert!(!matches("AB2CD3", "AB2CD34"));
    }
}
