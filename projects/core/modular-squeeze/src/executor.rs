//! Row level parallelism for squeeze steps.
//!
//! Every squeeze step produces two channels (averages and residuals) whose rows can be
//! computed independently of each other. An [`Executor`] decides whether those rows are
//! computed on the calling thread or spread over a `rayon` thread pool.

use modular_squeeze_common::Pixel;

#[cfg(feature = "multithreaded")]
use alloc::sync::Arc;
#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

/// Minimum number of rows handed to a single `rayon` task.
#[cfg(feature = "multithreaded")]
const MIN_ROWS_PER_TASK: usize = 8;

/// Where squeeze steps run their per-row work.
#[derive(Debug, Clone)]
pub enum Executor {
    /// Process all rows on the calling thread.
    Sequential,

    /// Process rows on the global `rayon` thread pool.
    #[cfg(feature = "multithreaded")]
    Global,

    /// Process rows on a caller supplied `rayon` thread pool.
    #[cfg(feature = "multithreaded")]
    Pool(Arc<rayon::ThreadPool>),
}

impl Default for Executor {
    fn default() -> Self {
        #[cfg(feature = "multithreaded")]
        {
            Self::Global
        }
        #[cfg(not(feature = "multithreaded"))]
        {
            Self::Sequential
        }
    }
}

impl Executor {
    /// Runs `work(y, out_row, res_row)` for every `y` in `0..rows`.
    ///
    /// `out` and `res` hold rows of `out_w` and `res_w` pixels respectively; only their first
    /// `rows` rows are handed out. Each invocation receives disjoint mutable rows, so `work`
    /// may run concurrently for different `y`.
    ///
    /// # Panics
    ///
    /// If either buffer holds fewer than `rows` rows.
    pub fn for_each_row_pair<F>(
        &self,
        out: &mut [Pixel],
        out_w: usize,
        res: &mut [Pixel],
        res_w: usize,
        rows: usize,
        work: F,
    ) where
        F: Fn(usize, &mut [Pixel], &mut [Pixel]) + Sync + Send,
    {
        let out = &mut out[..rows * out_w];
        let res = &mut res[..rows * res_w];

        match self {
            Self::Sequential => for_each_row_pair_sequential(out, out_w, res, res_w, rows, &work),
            #[cfg(feature = "multithreaded")]
            Self::Global => for_each_row_pair_parallel(out, out_w, res, res_w, rows, &work),
            #[cfg(feature = "multithreaded")]
            Self::Pool(pool) => {
                pool.install(|| for_each_row_pair_parallel(out, out_w, res, res_w, rows, &work))
            }
        }
    }
}

fn for_each_row_pair_sequential<F>(
    out: &mut [Pixel],
    out_w: usize,
    res: &mut [Pixel],
    res_w: usize,
    rows: usize,
    work: &F,
) where
    F: Fn(usize, &mut [Pixel], &mut [Pixel]),
{
    for y in 0..rows {
        let out_row = &mut out[y * out_w..(y + 1) * out_w];
        let res_row = &mut res[y * res_w..(y + 1) * res_w];
        work(y, out_row, res_row);
    }
}

#[cfg(feature = "multithreaded")]
fn for_each_row_pair_parallel<F>(
    out: &mut [Pixel],
    out_w: usize,
    res: &mut [Pixel],
    res_w: usize,
    rows: usize,
    work: &F,
) where
    F: Fn(usize, &mut [Pixel], &mut [Pixel]) + Sync + Send,
{
    // Chunking needs a non-zero width; empty rows carry no work worth splitting.
    if out_w == 0 || res_w == 0 {
        for_each_row_pair_sequential(out, out_w, res, res_w, rows, work);
        return;
    }

    out.par_chunks_mut(out_w)
        .zip(res.par_chunks_mut(res_w))
        .with_min_len(MIN_ROWS_PER_TASK)
        .enumerate()
        .for_each(|(y, (out_row, res_row))| work(y, out_row, res_row));
}
