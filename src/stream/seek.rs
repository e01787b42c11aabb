use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};

/// A blocking source that may support direct positioning.
///
/// `skip` seeks when [`MaybeSeek::as_seek`] hands back a handle and drains
/// reads otherwise.
pub trait MaybeSeek: Read {
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        None
    }
}

/// Async counterpart of [`MaybeSeek`].
pub trait AsyncMaybeSeek: AsyncRead + Unpin {
    fn as_async_seek(&mut self) -> Option<&mut (dyn AsyncSeek + Unpin)> {
        None
    }
}

/// Forces a source to be treated as forward-only.
pub struct Sequential<R>(pub R);

impl MaybeSeek for File {
    // Pipes and character devices open as File too
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        match self.metadata() {
            Ok(meta) if meta.is_file() => Some(self),
            _ => None,
        }
    }
}

impl<T: AsRef<[u8]>> MaybeSeek for Cursor<T> {
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        Some(self)
    }
}

impl<R: Read + Seek> MaybeSeek for BufReader<R> {
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        Some(self)
    }
}

impl MaybeSeek for &[u8] {}
impl MaybeSeek for std::io::Stdin {}
impl MaybeSeek for std::net::TcpStream {}
impl MaybeSeek for std::process::ChildStdout {}

impl<R: MaybeSeek + ?Sized> MaybeSeek for &mut R {
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        (**self).as_seek()
    }
}

impl<R: MaybeSeek + ?Sized> MaybeSeek for Box<R> {
    fn as_seek(&mut self) -> Option<&mut dyn Seek> {
        (**self).as_seek()
    }
}

impl<R: Read> Read for Sequential<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read> MaybeSeek for Sequential<R> {}

// tokio::fs::File gets no metadata probe here, wrap pipes in Sequential
impl AsyncMaybeSeek for tokio::fs::File {
    fn as_async_seek(&mut self) -> Option<&mut (dyn AsyncSeek + Unpin)> {
        Some(self)
    }
}

impl<T: AsRef<[u8]> + Unpin> AsyncMaybeSeek for Cursor<T> {
    fn as_async_seek(&mut self) -> Option<&mut (dyn AsyncSeek + Unpin)> {
        Some(self)
    }
}

impl AsyncMaybeSeek for &[u8] {}
impl AsyncMaybeSeek for tokio::io::Stdin {}
impl AsyncMaybeSeek for tokio::net::TcpStream {}
impl AsyncMaybeSeek for tokio::io::DuplexStream {}

impl<R: AsyncMaybeSeek + ?Sized> AsyncMaybeSeek for &mut R {
    fn as_async_seek(&mut self) -> Option<&mut (dyn AsyncSeek + Unpin)> {
        (**self).as_async_seek()
    }
}

impl<R: AsyncMaybeSeek + ?Sized> AsyncMaybeSeek for Box<R> {
    fn as_async_seek(&mut self) -> Option<&mut (dyn AsyncSeek + Unpin)> {
        (**self).as_async_seek()
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for Sequential<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.0).poll_read(cx, buf)
    }
}

impl<R: AsyncRead + Unpin> AsyncMaybeSeek for Sequential<R> {}
