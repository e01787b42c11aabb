//! Length-capped copies and skips between streams.
//!
//! Each operation has a blocking form over `std::io` and a suspendable form
//! over `tokio::io`. The suspendable forms take a [`CancellationToken`] that
//! is checked between chunks and raced against every pending read; once it
//! fires the call returns [`crate::ArcioError::Cancelled`]. Bytes already
//! written to a destination stay written.
//!
//! `chunk_size` is only the scratch buffer granularity, it never changes how
//! many bytes end up moved.

pub mod aio;
mod bounded;
mod seek;
mod transfer;

pub use bounded::BoundedReader;
pub use seek::{AsyncMaybeSeek, MaybeSeek, Sequential};
pub use tokio_util::sync::CancellationToken;
pub use transfer::{skip, transfer_bounded};

use crate::error::{ArcioError, Result};

/// 80Kb scratch buffer
pub const DEFAULT_CHUNK_SIZE: usize = 80 * 1024;

fn check_chunk(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(ArcioError::invalid("chunk size must be non-zero"));
    }
    Ok(())
}

// Scratch buffer no larger than what the operation can ever use
fn scratch(limit: u64, chunk_size: usize) -> Vec<u8> {
    let len = usize::try_from(limit).map_or(chunk_size, |l| l.min(chunk_size));
    vec![0u8; len]
}
