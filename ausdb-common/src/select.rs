//! Uniform random record selection
//!
//! The random endpoints pick one record from a filtered subset. The RNG is
//! passed in by the caller so tests can substitute a seeded generator.

use crate::{Error, Result};
use rand::Rng;

/// Pick one element uniformly at random from `records`.
///
/// Returns the chosen element together with the subset size, which the
/// random endpoints report back as `count`. An empty subset is a
/// `NotFound` error; the caller decides how to phrase it at the boundary.
pub fn pick_random<'a, T, R: Rng>(records: &'a [T], rng: &mut R) -> Result<(&'a T, usize)> {
    if records.is_empty() {
        return Err(Error::NotFound(
            "no records match the given criteria".to_string(),
        ));
    }
    let index = rng.gen_range(0..records.len());
    Ok((&records[index], records.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_slice_is_not_found() {
        let mut rng = StdRng::seed_from_u64(0);
        let records: Vec<u32> = vec![];
        let result = pick_random(&records, &mut rng);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_count_matches_subset_size() {
        let mut rng = StdRng::seed_from_u64(0);
        let records = vec![10, 20, 30];
        let (_, count) = pick_random(&records, &mut rng).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_selection_stays_within_subset() {
        let records = vec![10, 20, 30, 40];
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (picked, count) = pick_random(&records, &mut rng).unwrap();
            assert!(records.contains(picked));
            assert_eq!(count, records.len());
        }
    }

    #[test]
    fn test_single_element_always_selected() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (picked, count) = pick_random(&[7], &mut rng).unwrap();
            assert_eq!(*picked, 7);
            assert_eq!(count, 1);
        }
    }
}
