//! Member code allocation
//!
//! Draws random numeric codes until one is unused. After
//! [`DRAWS_PER_LENGTH`] collisions at one length the length grows by one and
//! drawing starts over; there is no upper bound on the length.

use std::future::Future;

use rand::Rng;
use tracing::debug;

use tally_core::traits::RepoResult;
use tally_core::value_objects::{MemberCode, DRAWS_PER_LENGTH};

/// Allocate a code that `exists` reports as unused.
///
/// `exists` is asked about each candidate in turn; storage errors abort the
/// allocation.
pub async fn allocate_code<R, F, Fut>(
    rng: &mut R,
    start_length: usize,
    mut exists: F,
) -> RepoResult<MemberCode>
where
    R: Rng + ?Sized,
    F: FnMut(MemberCode) -> Fut,
    Fut: Future<Output = RepoResult<bool>>,
{
    let mut length = start_length.max(1);
    loop {
        for _ in 0..DRAWS_PER_LENGTH {
            let candidate = MemberCode::random(rng, length);
            if !exists(candidate.clone()).await? {
                return Ok(candidate);
            }
        }
        debug!(length, "Code space crowded, growing code length");
        length += 1;
    }
}
