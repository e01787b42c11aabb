use std::cmp;
use std::io::{ErrorKind, Read, SeekFrom, Write};

use log::{debug, trace};

use crate::error::{ArcioError, Result};
use crate::stream::bounded::BoundedReader;
use crate::stream::seek::MaybeSeek;
use crate::stream::{check_chunk, scratch};

/// Copies at most `max_len` bytes from `source` to `destination`.
///
/// Returns the count actually moved, which is less than `max_len` only when
/// the source ended first. `source` is left right after the last byte copied.
pub fn transfer_bounded<R, W>(
    source: &mut R,
    destination: &mut W,
    max_len: u64,
    chunk_size: usize,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    check_chunk(chunk_size)?;

    let mut view = BoundedReader::new(source, max_len);
    let mut chunk = scratch(max_len, chunk_size);
    let mut moved: u64 = 0;

    loop {
        let n = match view.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        destination.write_all(&chunk[..n])?;
        moved += n as u64;
    }

    if moved < max_len {
        debug!("source ended after {} of {} bytes", moved, max_len);
    }
    Ok(moved)
}

pub(crate) fn seek_delta(amount: u64) -> Result<i64> {
    i64::try_from(amount)
        .map_err(|_| ArcioError::invalid(format!("cannot seek by {} bytes", amount)))
}

/// Advances `source` by `amount` bytes.
///
/// Seekable sources are repositioned without reading. Others are drained in
/// `chunk_size` reads, stopping quietly if the source ends. Returns how far
/// the source moved.
pub fn skip<R: MaybeSeek + ?Sized>(source: &mut R, amount: u64, chunk_size: usize) -> Result<u64> {
    check_chunk(chunk_size)?;
    if amount == 0 {
        return Ok(0);
    }

    if let Some(seek) = source.as_seek() {
        seek.seek(SeekFrom::Current(seek_delta(amount)?))?;
        trace!("skipped {} bytes by seeking", amount);
        return Ok(amount);
    }

    debug!("source not seekable, draining {} bytes", amount);
    let mut chunk = scratch(amount, chunk_size);
    let mut left = amount;

    while left > 0 {
        let want = cmp::min(left, chunk.len() as u64) as usize;
        match source.read(&mut chunk[..want]) {
            Ok(0) => {
                debug!("source ended with {} of {} bytes left to skip", left, amount);
                break;
            }
            Ok(n) => left -= n as u64,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(amount - left)
}
