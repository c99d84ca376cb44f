//! Row mapping with or without rayon.
//!
//! With the `parallel` feature the rows are distributed over rayon's thread
//! pool; without it (e.g. for WASM builds) they are mapped sequentially.
//! Results come back in row order either way.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `f` to every row index in `0..rows`; any error aborts the mapping
pub(crate) fn try_map_rows<R, E, F>(rows: usize, f: F) -> Result<Vec<R>, E>
where
    R: Send,
    E: Send,
    F: Fn(usize) -> Result<R, E> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..rows).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..rows).map(f).collect()
    }
}
