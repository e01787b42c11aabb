//! Full-buffer reads over blocking streams.
//!
//! Two flavours that callers pick on purpose:
//! - lenient [`read_exactly`] / [`read_exactly_at`] report a short read as `Ok(false)`
//! - strict [`read_exact_or_fail`] reports it as [`ArcioError::UnexpectedEndOfStream`]

use std::io::{ErrorKind, Read};
use std::ops::Range;

use log::trace;

use crate::error::{ArcioError, Result};

/// Reads until `buf` is full or the source runs dry.
///
/// Returns `(eof, filled)`; `eof` is only set when the source ended before
/// the buffer was full.
pub fn fill_buf<R: Read + ?Sized>(data: &mut R, buf: &mut [u8]) -> std::io::Result<(bool, usize)> {
    let mut buf_read = 0;

    while buf_read < buf.len() {
        match data.read(&mut buf[buf_read..]) {
            Ok(0) => return Ok((true, buf_read)),
            Ok(x) => buf_read += x,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
    }
    Ok((false, buf_read))
}

pub(crate) fn sub_range(len: usize, offset: usize, count: usize) -> Result<Range<usize>> {
    if offset > len {
        return Err(ArcioError::invalid(format!(
            "offset {} past buffer of length {}",
            offset, len
        )));
    }
    if count > len - offset {
        return Err(ArcioError::invalid(format!(
            "count {} at offset {} past buffer of length {}",
            count, offset, len
        )));
    }
    Ok(offset..offset + count)
}

/// Fills all of `buf`, returning `false` if the source ended first.
///
/// Bytes already read on a short read stay in `buf`; nothing past its end
/// is touched.
pub fn read_exactly<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> Result<bool> {
    let (_, filled) = fill_buf(source, buf)?;
    if filled < buf.len() {
        trace!("short read: {} of {} bytes", filled, buf.len());
    }
    Ok(filled == buf.len())
}

/// [`read_exactly`] over `buf[offset..offset + count]`.
pub fn read_exactly_at<R: Read + ?Sized>(
    source: &mut R,
    buf: &mut [u8],
    offset: usize,
    count: usize,
) -> Result<bool> {
    let range = sub_range(buf.len(), offset, count)?;
    read_exactly(source, &mut buf[range])
}

/// Fills `buf[offset..offset + count]` or fails.
///
/// The range is validated before any read is issued.
pub fn read_exact_or_fail<R: Read + ?Sized>(
    source: &mut R,
    buf: &mut [u8],
    offset: usize,
    count: usize,
) -> Result<()> {
    let range = sub_range(buf.len(), offset, count)?;
    let (_, filled) = fill_buf(source, &mut buf[range])?;

    if filled < count {
        return Err(ArcioError::UnexpectedEndOfStream {
            expected: count,
            actual: filled,
        });
    }
    Ok(())
}
