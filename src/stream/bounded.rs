use std::cmp;
use std::io::Read;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Exposes at most `max_len` bytes of `inner` starting at its current position.
///
/// Only counts what it hands out; dropping the view leaves `inner` positioned
/// right after the last byte read through it.
pub struct BoundedReader<R> {
    inner: R,
    remaining: u64,
}

impl<R> BoundedReader<R> {
    pub fn new(inner: R, max_len: u64) -> Self {
        BoundedReader {
            inner,
            remaining: max_len,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = cmp::min(buf.len() as u64, self.remaining) as usize;
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for BoundedReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.remaining == 0 || buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        let this = &mut *self;
        let max = cmp::min(buf.remaining() as u64, this.remaining) as usize;

        let dst = buf.initialize_unfilled_to(max);
        let mut limited = ReadBuf::new(dst);
        ready!(Pin::new(&mut this.inner).poll_read(cx, &mut limited))?;
        let n = limited.filled().len();

        buf.advance(n);
        this.remaining -= n as u64;
        Poll::Ready(Ok(()))
    }
}
