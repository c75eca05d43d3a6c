//! Bounded fan-out for independent history queries.

use rayon::prelude::*;

/// Apply `f` to every item on at most `workers` threads, keeping input order.
///
/// Runs inline when one worker is requested, when there is at most one item,
/// or when the thread pool cannot be built.
pub(crate) fn map_bounded<T, R, F>(items: Vec<T>, workers: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    if workers <= 1 || items.len() <= 1 {
        return items.into_iter().map(f).collect();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| items.into_par_iter().map(&f).collect()),
        Err(_) => items.into_iter().map(f).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_across_workers() {
        let items: Vec<u64> = (0..200).collect();
        let doubled = map_bounded(items, 8, |n| n * 2);
        let expected: Vec<u64> = (0..200).map(|n| n * 2).collect();
        assert_eq!(doubled, expected);
    }

    #[test]
    fn single_worker_runs_inline() {
        let out = map_bounded(vec!["a", "b"], 1, str::to_uppercase);
        assert_eq!(out, vec!["A", "B"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let out: Vec<u8> = map_bounded(Vec::<u8>::new(), 4, |n| n);
        assert!(out.is_empty());
    }
}
