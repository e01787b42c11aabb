//! Binary I/O support for archive format readers and writers.
//!
//! The pieces here sit underneath the container parsers:
//! - [`endian`] packs header integers into buffers in a declared byte order
//! - [`dostime`] converts the packed legacy date/time fields
//! - [`buf`] and [`stream`] move exact byte counts between streams
//! - [`sanitize`] makes entry names safe to create on disk
//!
//! Nothing in here keeps state between calls.

pub mod buf;
pub mod dostime;
pub mod endian;
mod error;
pub mod sanitize;
pub mod stream;
pub mod util;

pub use buf::{read_exact_or_fail, read_exactly, read_exactly_at};
pub use dostime::{
    decode_packed, encode_packed, unix_seconds_to_timestamp, PackedDateTime, DOS_EPOCH,
};
pub use endian::{byte_swap32, write_u32_be, write_u32_le};
pub use error::{ArcioError, Result};
pub use sanitize::sanitize;
pub use stream::aio::{
    read_exact_or_fail_async, read_exactly_async, read_exactly_at_async, skip_async,
    transfer_bounded_async,
};
pub use stream::{
    skip, transfer_bounded, BoundedReader, CancellationToken, MaybeSeek, Sequential,
    DEFAULT_CHUNK_SIZE,
};
