/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Running per tile jobs, possibly on multiple threads
//!
//! Workers pull tile indices from a shared counter, results are stored
//! by index so the order in which tiles finish never shows in the output.
//! There is no way to stop a call midway, a call runs until every tile is
//! coded or one of them fails.
use alloc::vec::Vec;

use zune_core::log::{error, trace};

use crate::errors::{TicDecodeErrors, TicEncodeErrors};

/// A job finished without leaving a result behind
#[derive(Copy, Clone, Debug)]
pub(crate) struct MissingResult(pub usize);

impl From<MissingResult> for TicEncodeErrors {
    fn from(value: MissingResult) -> Self {
        error!("Tile {} left no result", value.0);
        TicEncodeErrors::Internal("tile job left no result")
    }
}

impl From<MissingResult> for TicDecodeErrors {
    fn from(value: MissingResult) -> Self {
        error!("Tile {} left no result", value.0);
        TicDecodeErrors::Internal("tile job left no result")
    }
}

/// Place `(index, result)` pairs arriving in any order into index order
///
/// The error of the lowest failing index wins, so the reported error does
/// not depend on scheduling.
pub(crate) fn collect_in_order<T, E>(
    count: usize, results: impl IntoIterator<Item = (usize, Result<T, E>)>
) -> Result<Vec<T>, E>
where
    E: From<MissingResult>
{
    let mut slots: Vec<Option<Result<T, E>>> = (0..count).map(|_| None).collect();

    for (index, result) in results {
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(result);
        }
    }
    let mut output = Vec::with_capacity(count);

    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(result) => output.push(result?),
            None => return Err(MissingResult(index).into())
        }
    }
    Ok(output)
}

/// Run `job` for every index in `0..count` and return the results in
/// index order
///
/// With `num_threads <= 1`, a single job, or without the `threads`
/// feature everything runs on the calling thread.
pub(crate) fn run_ordered<T, E, F>(count: usize, num_threads: usize, job: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send + From<MissingResult>,
    F: Fn(usize) -> Result<T, E> + Sync
{
    #[cfg(feature = "threads")]
    {
        if num_threads > 1 && count > 1 {
            return run_threaded(count, num_threads.min(count), &job);
        }
    }
    let _ = num_threads;

    trace!("Running {count} tile jobs on the calling thread");
    (0..count).map(job).collect()
}

#[cfg(feature = "threads")]
fn run_threaded<T, E, F>(count: usize, workers: usize, job: &F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send + From<MissingResult>,
    F: Fn(usize) -> Result<T, E> + Sync
{
    use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    trace!("Running {count} tile jobs on {workers} threads");

    let next = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);

    let results = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut done = Vec::new();

                    // stop picking up work once any tile failed
                    while !failed.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);

                        if index >= count {
                            break;
                        }
                        let result = job(index);

                        if result.is_err() {
                            failed.store(true, Ordering::Relaxed);
                        }
                        done.push((index, result));
                    }
                    done
                })
            })
            .collect();

        let mut results = Vec::with_capacity(count);

        for handle in handles {
            match handle.join() {
                Ok(done) => results.extend(done),
                Err(panic) => std::panic::resume_unwind(panic)
            }
        }
        results
    });

    if failed.load(Ordering::Relaxed) {
        // skipped tiles leave holes, report the first real error instead
        let mut errors: Vec<(usize, E)> = results
            .into_iter()
            .filter_map(|(i, r)| r.err().map(|e| (i, e)))
            .collect();
        errors.sort_by_key(|(i, _)| *i);

        if let Some((_, err)) = errors.into_iter().next() {
            return Err(err);
        }
        return Err(MissingResult(count).into());
    }
    collect_in_order(count, results)
}
