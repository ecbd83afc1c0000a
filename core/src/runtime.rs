//! Process-wide rayon configuration.

use crate::{Error, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::env;
use std::sync::OnceLock;

/// Environment variable consulted when no explicit thread count is given.
pub const THREADS_ENV: &str = "CV_PHOTO_THREADS";

/// Outcome of the first configuration attempt: worker count or error message.
static GLOBAL_POOL: OnceLock<std::result::Result<usize, String>> = OnceLock::new();

/// Configure the global rayon pool and return its worker count.
///
/// `num_threads` wins over [`THREADS_ENV`]; with neither, rayon picks the
/// count. The pool can be configured once per process, so every later call
/// reports the first outcome regardless of its argument.
pub fn init_global_thread_pool(num_threads: Option<usize>) -> Result<usize> {
    GLOBAL_POOL
        .get_or_init(|| configure_global_pool(num_threads))
        .clone()
        .map_err(Error::ThreadPool)
}

fn configure_global_pool(num_threads: Option<usize>) -> std::result::Result<usize, String> {
    let requested = match num_threads {
        Some(0) => return Err("thread count must be >= 1".to_string()),
        Some(n) => Some(n),
        None => match env::var(THREADS_ENV) {
            Ok(raw) => Some(parse_thread_count(&raw)?),
            Err(env::VarError::NotPresent) => None,
            Err(e) => return Err(format!("{}: {}", THREADS_ENV, e)),
        },
    };

    let builder = match requested {
        Some(n) => ThreadPoolBuilder::new().num_threads(n),
        None => ThreadPoolBuilder::new(),
    };
    builder.build_global().map_err(|e| e.to_string())?;
    tracing::debug!("global thread pool ready with {} workers", rayon::current_num_threads());
    Ok(rayon::current_num_threads())
}

fn parse_thread_count(raw: &str) -> std::result::Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!(
            "{} must be a positive integer, got {:?}",
            THREADS_ENV, raw
        )),
    }
}

pub fn current_cpu_threads() -> usize {
    rayon::current_num_threads()
}

/// Run `op` inside `pool` when one is given, otherwise on the global pool.
pub fn install_in_pool<R, F>(pool: Option<&ThreadPool>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match pool {
        Some(p) => p.install(op),
        None => op(),
    }
}
