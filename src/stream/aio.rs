//! Async (tokio) forms of the stream operations.
//!
//! Suspension only happens inside the reads, writes and seeks issued here.
//! Every loop iteration checks the token first and a pending read is dropped
//! as soon as the token fires.

use std::cmp;
use std::io::SeekFrom;

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::buf::sub_range;
use crate::error::{ArcioError, Result};
use crate::stream::bounded::BoundedReader;
use crate::stream::seek::AsyncMaybeSeek;
use crate::stream::transfer::seek_delta;
use crate::stream::{check_chunk, scratch};

fn check_cancel(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        debug!("cancellation observed");
        return Err(ArcioError::Cancelled);
    }
    Ok(())
}

async fn read_cancellable<R>(
    source: &mut R,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    check_cancel(cancel)?;
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("cancelled while waiting on a read");
            Err(ArcioError::Cancelled)
        }
        res = source.read(buf) => Ok(res?),
    }
}

/// Async [`crate::stream::transfer_bounded`].
///
/// On cancellation `destination` keeps every chunk written before the token
/// fired.
pub async fn transfer_bounded_async<R, W>(
    source: &mut R,
    destination: &mut W,
    max_len: u64,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    check_chunk(chunk_size)?;

    let mut view = BoundedReader::new(source, max_len);
    let mut chunk = scratch(max_len, chunk_size);
    let mut moved: u64 = 0;

    loop {
        let n = read_cancellable(&mut view, &mut chunk, cancel).await?;
        if n == 0 {
            break;
        }
        destination.write_all(&chunk[..n]).await?;
        moved += n as u64;
    }

    if moved < max_len {
        debug!("source ended after {} of {} bytes", moved, max_len);
    }
    Ok(moved)
}

/// Async [`crate::stream::skip`].
pub async fn skip_async<R>(
    source: &mut R,
    amount: u64,
    chunk_size: usize,
    cancel: &CancellationToken,
) -> Result<u64>
where
    R: AsyncMaybeSeek + ?Sized,
{
    check_chunk(chunk_size)?;
    check_cancel(cancel)?;
    if amount == 0 {
        return Ok(0);
    }

    if let Some(seek) = source.as_async_seek() {
        let delta = seek_delta(amount)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ArcioError::Cancelled),
            res = seek.seek(SeekFrom::Current(delta)) => { res?; }
        }
        trace!("skipped {} bytes by seeking", amount);
        return Ok(amount);
    }

    debug!("source not seekable, draining {} bytes", amount);
    let mut chunk = scratch(amount, chunk_size);
    let mut left = amount;

    while left > 0 {
        let want = cmp::min(left, chunk.len() as u64) as usize;
        match read_cancellable(source, &mut chunk[..want], cancel).await? {
            0 => {
                debug!("source ended with {} of {} bytes left to skip", left, amount);
                break;
            }
            n => left -= n as u64,
        }
    }
    Ok(amount - left)
}

async fn fill_buf_async<R>(
    source: &mut R,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match read_cancellable(source, &mut buf[filled..], cancel).await? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Async [`crate::buf::read_exactly`].
pub async fn read_exactly_async<R>(
    source: &mut R,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<bool>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let filled = fill_buf_async(source, buf, cancel).await?;
    Ok(filled == buf.len())
}

/// Async [`crate::buf::read_exactly_at`].
pub async fn read_exactly_at_async<R>(
    source: &mut R,
    buf: &mut [u8],
    offset: usize,
    count: usize,
    cancel: &CancellationToken,
) -> Result<bool>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let range = sub_range(buf.len(), offset, count)?;
    read_exactly_async(source, &mut buf[range], cancel).await
}

/// Async [`crate::buf::read_exact_or_fail`].
pub async fn read_exact_or_fail_async<R>(
    source: &mut R,
    buf: &mut [u8],
    offset: usize,
    count: usize,
    cancel: &CancellationToken,
) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let range = sub_range(buf.len(), offset, count)?;
    let filled = fill_buf_async(source, &mut buf[range], cancel).await?;

    if filled < count {
        return Err(ArcioError::UnexpectedEndOfStream {
            expected: count,
            actual: filled,
        });
    }
    Ok(())
}
