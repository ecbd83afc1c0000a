//! Jacobi relaxation for the discrete Poisson equation.
//!
//! With `div` produced by [`crate::gradient::divergence`] (and cropped to the
//! image), the system solved at every interior pixel is
//! `4 I(x, y) - (sum of 4 neighbors) = div(x, y)`, giving the update
//! `I'(x, y) = (sum of 4 neighbors + div(x, y)) / 4`.
//!
//! Border pixels are Dirichlet: they keep the values of the initial solution.

use cv_core::{ensure_same_dimensions, install_in_pool, Result, ScalarGrid};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Iterations between progress log lines.
const PROGRESS_INTERVAL: usize = 500;

/// Run `iterations` Jacobi sweeps starting from `initial`.
///
/// There is no convergence test; the cost is always
/// `O(iterations * width * height)`. Zero iterations return `initial`.
pub fn solve_poisson(
    initial: &ScalarGrid,
    divergence: &ScalarGrid,
    iterations: usize,
) -> Result<ScalarGrid> {
    solve_poisson_in_pool(initial, divergence, iterations, None)
}

pub fn solve_poisson_in_pool(
    initial: &ScalarGrid,
    divergence: &ScalarGrid,
    iterations: usize,
    pool: Option<&ThreadPool>,
) -> Result<ScalarGrid> {
    ensure_same_dimensions(initial, divergence, "poisson initial solution vs divergence")?;

    let (w, h) = initial.dimensions();
    let mut current = initial.clone();
    if w < 3 || h < 3 || iterations == 0 {
        // No interior pixels to relax.
        return Ok(current);
    }
    // Both buffers start from the initial guess so their borders already hold
    // the boundary values; sweeps only ever write interior pixels.
    let mut next = initial.clone();

    install_in_pool(pool, || {
        for iter in 0..iterations {
            if iter % PROGRESS_INTERVAL == 0 {
                tracing::debug!("[{}/{}] Solving Poisson equation...", iter, iterations);
            }
            jacobi_sweep(&current, divergence, &mut next);
            std::mem::swap(&mut current, &mut next);
        }
    });
    tracing::debug!("[{}/{}] Poisson solve finished", iterations, iterations);

    Ok(current)
}

/// One Jacobi update of every interior pixel of `next` from `current`.
fn jacobi_sweep(current: &ScalarGrid, divergence: &ScalarGrid, next: &mut ScalarGrid) {
    let w = current.width();
    let h = current.height();
    let src = current.data();
    let div = divergence.data();

    next.data_mut()[w..(h - 1) * w]
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(i, row)| {
            let base = (i + 1) * w;
            for x in 1..w - 1 {
                let idx = base + x;
                let neighbors = src[idx - 1] + src[idx + 1] + src[idx - w] + src[idx + w];
                row[x] = (neighbors + div[idx]) * 0.25;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_divergence() {
        let init = ScalarGrid::new(4, 4).unwrap();
        let div = ScalarGrid::new(6, 6).unwrap();
        assert!(solve_poisson(&init, &div, 10).is_err());
    }

    #[test]
    fn zero_iterations_return_initial() {
        let init = ScalarGrid::from_fn(4, 4, |x, y| (x + y) as f32).unwrap();
        let div = ScalarGrid::filled(4, 4, 100.0).unwrap();
        assert_eq!(solve_poisson(&init, &div, 0).unwrap(), init);
    }

    #[test]
    fn border_is_never_modified() {
        let init = ScalarGrid::from_fn(6, 5, |x, y| (x * 3 + y) as f32).unwrap();
        let div = ScalarGrid::filled(6, 5, 1.0).unwrap();
        let out = solve_poisson(&init, &div, 25).unwrap();
        for y in 0..5 {
            for x in 0..6 {
                if x == 0 || y == 0 || x == 5 || y == 4 {
                    assert_eq!(out.at(x, y), init.at(x, y));
                }
            }
        }
    }

    #[test]
    fn single_sweep_matches_update_rule() {
        let init = ScalarGrid::from_fn(3, 3, |x, y| (x + 3 * y) as f32).unwrap();
        let div = ScalarGrid::filled(3, 3, 2.0).unwrap();
        let out = solve_poisson(&init, &div, 1).unwrap();
        // neighbors of the center: 3 + 5 + 1 + 7 = 16
        assert_eq!(out.at(1, 1), (16.0 + 2.0) / 4.0);
    }

    #[test]
    fn thin_grid_has_no_interior() {
        let init = ScalarGrid::filled(2, 5, 1.0).unwrap();
        let div = ScalarGrid::filled(2, 5, 3.0).unwrap();
        assert_eq!(solve_poisson(&init, &div, 5).unwrap(), init);
    }
}
