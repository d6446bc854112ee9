use rand::Rng;

/// Returns a uniformly shuffled copy of `items` using a forward
/// Fisher-Yates pass. The input is left untouched and elements may stay
/// where they were.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    let len = shuffled.len();
    if len <= 1 {
        return shuffled;
    }

    for i in 0..len - 1 {
        let r = rng.gen_range(i..len);
        shuffled.swap(i, r);
    }

    shuffled
}

#[cfg(test)]
mod tests {
    use super::shuffle;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn short_inputs_are_copied() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<u8> = Vec::new();
        assert!(shuffle(&empty, &mut rng).is_empty());
        assert_eq!(shuffle(&["only"], &mut rng), vec!["only"]);
    }

    #[test]
    fn output_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..50).chain(0..10).collect();
        let mut output = shuffle(&input, &mut rng);
        assert_eq!(output.len(), input.len());

        let mut sorted_input = input.clone();
        sorted_input.sort();
        output.sort();
        assert_eq!(output, sorted_input);
    }

    #[test]
    fn input_is_not_modified() {
        let mut rng = StdRng::seed_from_u64(3);
        let input = vec!['a', 'b', 'c', 'd'];
        let _ = shuffle(&input, &mut rng);
        assert_eq!(input, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn same_seed_same_permutation() {
        let input: Vec<u32> = (0..20).collect();
        let a = shuffle(&input, &mut StdRng::seed_from_u64(99));
        let b = shuffle(&input, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn permutations_of_three_are_uniform() {
        const TRIALS: usize = 12_000;
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut counts: HashMap<String, usize> = HashMap::new();

        for _ in 0..TRIALS {
            let s: String = shuffle(&['a', 'b', 'c'], &mut rng).into_iter().collect();
            *counts.entry(s).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6);

        // Chi-square with 5 degrees of freedom; 20.52 is the 0.999 quantile.
        let expected = TRIALS as f64 / 6.0;
        let chi_square: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi_square < 20.52, "chi-square too large: {chi_square}");
    }
}
