use intake_submit::{column_index, column_letter};
use proptest::prelude::*;

proptest! {
    #[test]
    fn letters_round_trip(index in 0usize..1000) {
        let letters = column_letter(index);
        prop_assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(column_index(&letters), Some(index));
        prop_assert_eq!(column_index(&letters.to_lowercase()), Some(index));
    }

    #[test]
    fn letters_sort_by_length_then_alphabet(a in 0usize..1000, b in 0usize..1000) {
        let (la, lb) = (column_letter(a), column_letter(b));
        let key = |s: &String| (s.len(), s.clone());
        prop_assert_eq!(a.cmp(&b), key(&la).cmp(&key(&lb)));
    }
}
