//! Fixed width integer packing for header fields.
//!
//! Every accessor is bounds checked: `offset + width` must fit inside the
//! buffer or the call fails with [`ArcioError::OutOfRange`] and the buffer is
//! left untouched.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{ArcioError, Result};

fn slot(len: usize, offset: usize, width: usize) -> Result<std::ops::Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(ArcioError::OutOfRange { offset, width, len }),
    }
}

pub fn write_u16<B: ByteOrder>(buf: &mut [u8], value: u16, offset: usize) -> Result<()> {
    let range = slot(buf.len(), offset, 2)?;
    B::write_u16(&mut buf[range], value);
    Ok(())
}

pub fn write_u32<B: ByteOrder>(buf: &mut [u8], value: u32, offset: usize) -> Result<()> {
    let range = slot(buf.len(), offset, 4)?;
    B::write_u32(&mut buf[range], value);
    Ok(())
}

pub fn write_u64<B: ByteOrder>(buf: &mut [u8], value: u64, offset: usize) -> Result<()> {
    let range = slot(buf.len(), offset, 8)?;
    B::write_u64(&mut buf[range], value);
    Ok(())
}

pub fn read_u16<B: ByteOrder>(buf: &[u8], offset: usize) -> Result<u16> {
    let range = slot(buf.len(), offset, 2)?;
    Ok(B::read_u16(&buf[range]))
}

pub fn read_u32<B: ByteOrder>(buf: &[u8], offset: usize) -> Result<u32> {
    let range = slot(buf.len(), offset, 4)?;
    Ok(B::read_u32(&buf[range]))
}

pub fn read_u64<B: ByteOrder>(buf: &[u8], offset: usize) -> Result<u64> {
    let range = slot(buf.len(), offset, 8)?;
    Ok(B::read_u64(&buf[range]))
}

/// Writes `value` as 4 little endian bytes at `offset..offset + 4`.
pub fn write_u32_le(buf: &mut [u8], value: u32, offset: usize) -> Result<()> {
    write_u32::<LittleEndian>(buf, value, offset)
}

/// Writes `value` as 4 big endian bytes at `offset..offset + 4`.
pub fn write_u32_be(buf: &mut [u8], value: u32, offset: usize) -> Result<()> {
    write_u32::<BigEndian>(buf, value, offset)
}

pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32> {
    read_u32::<LittleEndian>(buf, offset)
}

pub fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32> {
    read_u32::<BigEndian>(buf, offset)
}

pub fn write_u16_le(buf: &mut [u8], value: u16, offset: usize) -> Result<()> {
    write_u16::<LittleEndian>(buf, value, offset)
}

pub fn write_u16_be(buf: &mut [u8], value: u16, offset: usize) -> Result<()> {
    write_u16::<BigEndian>(buf, value, offset)
}

pub fn read_u16_le(buf: &[u8], offset: usize) -> Result<u16> {
    read_u16::<LittleEndian>(buf, offset)
}

pub fn read_u16_be(buf: &[u8], offset: usize) -> Result<u16> {
    read_u16::<BigEndian>(buf, offset)
}

pub fn write_u64_le(buf: &mut [u8], value: u64, offset: usize) -> Result<()> {
    write_u64::<LittleEndian>(buf, value, offset)
}

pub fn write_u64_be(buf: &mut [u8], value: u64, offset: usize) -> Result<()> {
    write_u64::<BigEndian>(buf, value, offset)
}

pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<u64> {
    read_u64::<LittleEndian>(buf, offset)
}

pub fn read_u64_be(buf: &[u8], offset: usize) -> Result<u64> {
    read_u64::<BigEndian>(buf, offset)
}

pub fn byte_swap16(value: u16) -> u16 {
    value.swap_bytes()
}

/// Reverses the byte order of a 32-bit value.
pub fn byte_swap32(value: u32) -> u32 {
    value.swap_bytes()
}

pub fn byte_swap64(value: u64) -> u64 {
    value.swap_bytes()
}
