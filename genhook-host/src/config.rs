//! The configuration for the host, given from environment variables and lazy
//! initialized when needed.

use once_cell::race::{OnceBool, OnceNonZeroUsize};
use std::num::NonZeroUsize;
use std::env;


/// Number of chunk worker threads.
///
/// To change it, set `GENHOOK_WORKERS=<count>`, defaults to 4.
pub fn workers() -> usize {
    static ENV: OnceNonZeroUsize = OnceNonZeroUsize::new();
    ENV.get_or_init(|| env_usize("GENHOOK_WORKERS", 4)).get()
}

/// Radius, in chunks, of the square generated around the origin in each phase.
///
/// To change it, set `GENHOOK_RADIUS=<radius>`, defaults to 2.
pub fn radius() -> i32 {
    static ENV: OnceNonZeroUsize = OnceNonZeroUsize::new();
    ENV.get_or_init(|| env_usize("GENHOOK_RADIUS", 2)).get() as i32
}

/// Return true if the host world has a chunk task scheduler, which must be patched
/// in addition to the provider and chunk map.
///
/// To enable this, set `GENHOOK_THREADED_HOST=1`.
pub fn threaded_host() -> bool {
    static ENV: OnceBool = OnceBool::new();
    ENV.get_or_init(|| {
        env::var_os("GENHOOK_THREADED_HOST")
            .map(|s| s.as_encoded_bytes() == b"1")
            .unwrap_or(false)
    })
}

/// Internal function to read a strictly positive integer, falling back to default.
fn env_usize(key: &str, default: usize) -> NonZeroUsize {
    env::var(key).ok()
        .and_then(|s| s.parse::<NonZeroUsize>().ok())
        .or(NonZeroUsize::new(default))
        .unwrap_or(NonZeroUsize::MIN)
}
