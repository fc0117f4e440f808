//! K-fold partitioning for cross-validation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::pipeline::error::PipelineError;

/// One train/held-out split
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Cut `n_samples` rows into `k` folds.
///
/// Without a seed the folds are contiguous blocks in row order; with a seed
/// the rows are shuffled first. The first `n_samples % k` folds hold one
/// extra row.
pub fn k_fold(n_samples: usize, k: usize, seed: Option<u64>) -> Result<Vec<Fold>, PipelineError> {
    if k < 2 || n_samples < k {
        return Err(PipelineError::TooFewRows {
            rows: n_samples,
            folds: k,
        });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    }

    let base = n_samples / k;
    let remainder = n_samples % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;

    for fold_idx in 0..k {
        let size = if fold_idx < remainder { base + 1 } else { base };
        let end = start + size;
        let test = indices[start..end].to_vec();
        let train = indices[..start]
            .iter()
            .chain(indices[end..].iter())
            .copied()
            .collect();
        folds.push(Fold { train, test });
        start = end;
    }

    Ok(folds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_folds_cover_all_rows_once() {
        let folds = k_fold(12, 5, None).unwrap();
        assert_eq!(folds.len(), 5);
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2, 2]);
        assert_eq!(folds[0].test, vec![0, 1, 2]);

        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), 12);
        }
    }

    #[test]
    fn test_seeded_folds_are_reproducible() {
        let a = k_fold(20, 5, Some(0)).unwrap();
        let b = k_fold(20, 5, Some(0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_rows() {
        assert_eq!(
            k_fold(3, 5, None),
            Err(PipelineError::TooFewRows { rows: 3, folds: 5 })
        );
    }
}
