use apphub_fingerprint::{join_plugins, simple_hash};
use proptest::prelude::*;

proptest! {
    #[test]
    fn hash_is_deterministic(s in ".*") {
        prop_assert_eq!(simple_hash(&s), simple_hash(&s));
    }

    #[test]
    fn hash_is_lowercase_hex_without_sign(s in ".{0,200}") {
        let h = simple_hash(&s);
        prop_assert!(!h.is_empty());
        prop_assert!(!h.starts_with('-'));
        prop_assert!(
            h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "not hex: {}",
            h
        );
        // At most 32 bits of output
        prop_assert!(h.len() <= 8);
    }

    #[test]
    fn hash_fits_in_u32(s in ".{1,100}") {
        let h = simple_hash(&s);
        prop_assert!(u32::from_str_radix(&h, 16).is_ok());
    }

    #[test]
    fn plugin_order_does_not_matter(
        names in prop::collection::vec("[A-Za-z0-9 ]{0,16}", 0..8),
        seed in any::<u64>(),
    ) {
        let mut shuffled = names.clone();
        // Deterministic rotation + reversal driven by the seed
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        prop_assert_eq!(join_plugins(names), join_plugins(shuffled));
    }

    #[test]
    fn plugin_permutations_hash_identically(names in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let mut reversed = names.clone();
        reversed.reverse();
        prop_assert_eq!(
            simple_hash(&join_plugins(names)),
            simple_hash(&join_plugins(reversed))
        );
    }
}
