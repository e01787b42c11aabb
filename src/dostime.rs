//! Packed legacy date/time fields as found in archive headers.
//!
//! | Field | Bits  | Content            |
//! | ----: | ----- | ------------------ |
//! | date  | 15..9 | year - 1980        |
//! | date  | 8..5  | month (1-12)       |
//! | date  | 4..0  | day (1-31)         |
//! | time  | 15..11| hour (0-23)        |
//! | time  | 10..5 | minute (0-59)      |
//! | time  | 4..0  | second / 2 (0-29)  |
//!
//! The combined 32-bit form carries the date in the high half.
//!
//! Decoding never fails. Malformed headers are common in the wild so bad
//! fields degrade to [`DOS_EPOCH`] instead of erroring out.

use log::debug;
use time::macros::datetime;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::{ArcioError, Result};

/// 1980-01-01 00:00:00, the earliest packed value and the decode fallback.
pub const DOS_EPOCH: PrimitiveDateTime = datetime!(1980-01-01 0:00);

pub const MIN_YEAR: i32 = 1980;
pub const MAX_YEAR: i32 = 1980 + 127;

const SENTINEL: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedDateTime {
    pub date: u16,
    pub time: u16,
}

impl PackedDateTime {
    pub fn new(date: u16, time: u16) -> Self {
        PackedDateTime { date, time }
    }

    pub fn from_u32(value: u32) -> Self {
        PackedDateTime {
            date: (value >> 16) as u16,
            time: value as u16,
        }
    }

    pub fn to_u32(self) -> u32 {
        (self.date as u32) << 16 | self.time as u32
    }

    pub fn decode(self) -> OffsetDateTime {
        decode_packed(self.date, self.time)
    }

    pub fn to_primitive(self) -> PrimitiveDateTime {
        decode_packed_naive(self.date, self.time)
    }
}

// Local offset in force at `instant`. Falls back to UTC when the platform
// cannot determine it (e.g. multithreaded unix processes).
fn local_offset_at(instant: OffsetDateTime) -> UtcOffset {
    UtcOffset::local_offset_at(instant).unwrap_or(UtcOffset::UTC)
}

fn build(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> Option<PrimitiveDateTime> {
    let month = Month::try_from(month).ok()?;
    let date = Date::from_calendar_date(year, month, day).ok()?;
    let time = Time::from_hms(hour, minute, second).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}

/// Decodes the packed fields into a wall-clock value with no offset attached.
pub fn decode_packed_naive(date: u16, time: u16) -> PrimitiveDateTime {
    let mut year = (date >> 9) as i32 + MIN_YEAR;
    let mut month = ((date >> 5) & 0x0F) as u8;
    let mut day = (date & 0x1F) as u8;

    let mut hour = (time >> 11) as u8;
    let mut minute = ((time >> 5) & 0x3F) as u8;
    let mut second = ((time & 0x1F) * 2) as u8;

    if date == SENTINEL || month == 0 || day == 0 {
        year = MIN_YEAR;
        month = 1;
        day = 1;
    }
    if time == SENTINEL {
        hour = 0;
        minute = 0;
        second = 0;
    }

    match build(year, month, day, hour, minute, second) {
        Some(dt) => dt,
        None => {
            // Lossy fallback, decoding never errors
            debug!(
                "packed date/time {:#06x}/{:#06x} is not a calendar value, using DOS epoch",
                date, time
            );
            DOS_EPOCH
        }
    }
}

/// Decodes the packed fields as local time.
///
/// The offset is the one in force at the decoded wall-clock time, not today's.
pub fn decode_packed(date: u16, time: u16) -> OffsetDateTime {
    let naive = decode_packed_naive(date, time);
    // Guess from the wall clock read as UTC, then settle on the offset in
    // force at the instant that guess produces
    let guess = local_offset_at(naive.assume_utc());
    let shift = Duration::seconds(guess.whole_seconds().into());
    let offset = match naive.checked_sub(shift) {
        Some(instant) => local_offset_at(instant.assume_utc()),
        None => guess,
    };
    naive.assume_offset(offset)
}

/// Decodes the packed fields as wall-clock time at a fixed `offset`.
pub fn decode_with_offset(date: u16, time: u16, offset: UtcOffset) -> OffsetDateTime {
    decode_packed_naive(date, time).assume_offset(offset)
}

/// Packs a wall-clock value as is.
///
/// Years outside [`MIN_YEAR`]..=[`MAX_YEAR`] are not rejected; the year
/// field silently wraps the same way legacy writers do.
pub fn encode_primitive(dt: PrimitiveDateTime) -> u32 {
    let year = (dt.year() - MIN_YEAR) as u32;

    (dt.second() as u32 / 2)
        | (dt.minute() as u32) << 5
        | (dt.hour() as u32) << 11
        | (dt.day() as u32) << 16
        | (u8::from(dt.month()) as u32) << 21
        | year.wrapping_shl(25)
}

fn wall_clock(ts: OffsetDateTime, offset: UtcOffset) -> PrimitiveDateTime {
    let local = ts.checked_to_offset(offset).unwrap_or(ts);
    PrimitiveDateTime::new(local.date(), local.time())
}

fn to_local(ts: OffsetDateTime) -> PrimitiveDateTime {
    wall_clock(ts, local_offset_at(ts))
}

/// Packs `ts` as wall-clock time at a fixed `offset`.
pub fn encode_with_offset(ts: OffsetDateTime, offset: UtcOffset) -> u32 {
    encode_primitive(wall_clock(ts, offset))
}

/// Converts to local time and packs. An absent timestamp packs to 0.
pub fn encode_packed(ts: Option<OffsetDateTime>) -> u32 {
    match ts {
        None => 0,
        Some(ts) => encode_primitive(to_local(ts)),
    }
}

/// Like [`encode_packed`] but refuses years the 7-bit field cannot hold.
pub fn try_encode_packed(ts: OffsetDateTime) -> Result<u32> {
    let local = to_local(ts);
    if !(MIN_YEAR..=MAX_YEAR).contains(&local.year()) {
        return Err(ArcioError::invalid(format!(
            "year {} outside packable range {}..={}",
            local.year(),
            MIN_YEAR,
            MAX_YEAR
        )));
    }
    Ok(encode_primitive(local))
}

pub fn unix_seconds_to_timestamp(seconds: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| ArcioError::TimestampRange)
}

pub fn timestamp_to_unix_seconds(ts: OffsetDateTime) -> i64 {
    ts.unix_timestamp()
}

#[cfg(test)]
mod test_dostime {
    use super::*;
    use time::macros::offset;

    // 2025-03-14 15:26:58
    const DATE: u16 = 0x5A6E;
    const TIME: u16 = 0x7B5D;

    fn fields(dt: PrimitiveDateTime) -> (i32, u8, u8, u8, u8, u8) {
        (dt.year(), u8::from(dt.month()), dt.day(), dt.hour(), dt.minute(), dt.second())
    }

    #[test]
    fn decode_known() {
        assert_eq!(fields(decode_packed_naive(DATE, TIME)), (2025, 3, 14, 15, 26, 58));
    }

    #[test]
    fn decode_is_local_wall_clock() {
        let dt = decode_packed(DATE, TIME);
        assert_eq!(dt.offset(), local_offset_at(dt));
        assert_eq!((dt.year(), dt.hour(), dt.second()), (2025, 15, 58));
    }

    #[test]
    fn decode_at_fixed_offset() {
        let winter = decode_with_offset(DATE, TIME, offset!(-5));
        assert_eq!(winter, datetime!(2025-03-14 20:26:58 UTC));
        assert_eq!((winter.hour(), winter.offset()), (15, offset!(-5)));

        let summer = decode_with_offset(DATE, TIME, offset!(-4));
        assert_eq!(summer - winter, Duration::hours(-1));
    }

    #[test]
    fn sentinel_date() {
        assert_eq!(fields(decode_packed_naive(0xFFFF, TIME)), (1980, 1, 1, 15, 26, 58));
    }

    #[test]
    fn zero_month_or_day() {
        let no_month = (45 << 9) | 14;
        let no_day = (45 << 9) | (3 << 5);
        assert_eq!(fields(decode_packed_naive(no_month, 0)), (1980, 1, 1, 0, 0, 0));
        assert_eq!(fields(decode_packed_naive(no_day, 0)), (1980, 1, 1, 0, 0, 0));
    }

    #[test]
    fn sentinel_time() {
        assert_eq!(fields(decode_packed_naive(DATE, 0xFFFF)), (2025, 3, 14, 0, 0, 0));
    }

    #[test]
    fn both_sentinels() {
        assert_eq!(decode_packed_naive(0xFFFF, 0xFFFF), DOS_EPOCH);
    }

    #[test]
    fn impossible_day_falls_back() {
        // 2024-02-30
        let date = (44 << 9) | (2 << 5) | 30;
        assert_eq!(decode_packed_naive(date, TIME), DOS_EPOCH);
    }

    #[test]
    fn month_thirteen_falls_back() {
        let date = (44 << 9) | (13 << 5) | 1;
        assert_eq!(decode_packed_naive(date, 0), DOS_EPOCH);
    }

    #[test]
    fn impossible_time_falls_back() {
        let hour_24 = 24 << 11;
        let second_60 = 30;
        assert_eq!(decode_packed_naive(DATE, hour_24), DOS_EPOCH);
        assert_eq!(decode_packed_naive(DATE, second_60), DOS_EPOCH);
    }

    #[test]
    fn encode_known() {
        let dt = datetime!(2025-03-14 15:26:58);
        assert_eq!(encode_primitive(dt), 0x5A6E_7B5D);
        assert_eq!(PackedDateTime::from_u32(0x5A6E_7B5D), PackedDateTime::new(DATE, TIME));
    }

    #[test]
    fn encode_drops_odd_second() {
        let dt = datetime!(2025-03-14 15:26:59);
        assert_eq!(encode_primitive(dt), 0x5A6E_7B5D);
    }

    #[test]
    fn encode_absent() {
        assert_eq!(encode_packed(None), 0);
    }

    #[test]
    fn encode_local_roundtrip() {
        let packed = PackedDateTime::new(DATE, TIME);
        assert_eq!(encode_packed(Some(packed.decode())), packed.to_u32());
    }

    #[test]
    fn encode_shifts_hour_by_offset() {
        let january = datetime!(2025-01-15 12:00 UTC);
        let july = datetime!(2025-07-15 12:00 UTC);

        // Standard and daylight time in the same zone pack different hours
        let est = encode_with_offset(january, offset!(-5));
        let edt = encode_with_offset(july, offset!(-4));
        let utc = encode_with_offset(january, UtcOffset::UTC);

        assert_eq!(est, encode_primitive(datetime!(2025-01-15 7:00)));
        assert_eq!(edt, encode_primitive(datetime!(2025-07-15 8:00)));
        assert_eq!(utc, encode_primitive(datetime!(2025-01-15 12:00)));
    }

    #[test]
    fn encode_crosses_midnight() {
        let late = datetime!(2025-03-14 23:30 UTC);
        let packed = encode_with_offset(late, offset!(+2));
        assert_eq!(packed, encode_primitive(datetime!(2025-03-15 1:30)));
    }

    #[test]
    fn fixed_offset_roundtrip() {
        let ts = datetime!(2025-01-15 12:00 UTC);
        let packed = PackedDateTime::from_u32(encode_with_offset(ts, offset!(-5)));
        assert_eq!(decode_with_offset(packed.date, packed.time, offset!(-5)), ts);
    }

    #[test]
    fn encode_uses_offset_at_timestamp() {
        let ts = datetime!(2025-01-15 12:00 UTC);
        assert_eq!(encode_packed(Some(ts)), encode_with_offset(ts, local_offset_at(ts)));
    }

    #[test]
    fn encode_truncates_year() {
        let past = datetime!(2108-06-01 12:00);
        let wrapped = datetime!(1980-06-01 12:00);
        assert_eq!(encode_primitive(past), encode_primitive(wrapped));
    }

    #[test]
    fn strict_encode_range() {
        // Mid-year noon stays in the same year under any offset
        let low = datetime!(1979-06-01 12:00 UTC);
        let high = datetime!(2108-06-01 12:00 UTC);
        let max = datetime!(2107-06-01 12:00 UTC);

        assert!(matches!(try_encode_packed(low), Err(ArcioError::InvalidArgument(_))));
        assert!(matches!(try_encode_packed(high), Err(ArcioError::InvalidArgument(_))));
        assert_eq!(try_encode_packed(max).unwrap(), encode_packed(Some(max)));
    }

    #[test]
    fn unix_epoch() {
        let ts = unix_seconds_to_timestamp(0).unwrap();
        assert_eq!(ts, datetime!(1970-01-01 0:00 UTC));
        assert_eq!(ts.offset(), UtcOffset::UTC);
    }

    #[test]
    fn unix_known() {
        let ts = unix_seconds_to_timestamp(1_700_000_000).unwrap();
        assert_eq!(ts, datetime!(2023-11-14 22:13:20 UTC));
        assert_eq!(timestamp_to_unix_seconds(ts), 1_700_000_000);
    }

    #[test]
    fn unix_negative() {
        let ts = unix_seconds_to_timestamp(-86_400).unwrap();
        assert_eq!(ts, datetime!(1969-12-31 0:00 UTC));
    }

    #[test]
    fn unix_overflow() {
        assert!(matches!(unix_seconds_to_timestamp(i64::MAX), Err(ArcioError::TimestampRange)));
        assert!(matches!(unix_seconds_to_timestamp(i64::MIN), Err(ArcioError::TimestampRange)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn valid_packed() -> impl Strategy<Value = (u16, u16)> {
            (0u16..128, 1u16..=12, 1u16..=28, 0u16..24, 0u16..60, 0u16..30).prop_map(
                |(y, mo, d, h, mi, s)| ((y << 9) | (mo << 5) | d, (h << 11) | (mi << 5) | s),
            )
        }

        proptest! {
            #[test]
            fn decode_encode_roundtrip((date, time) in valid_packed()) {
                let packed = PackedDateTime::new(date, time);
                prop_assert_eq!(encode_primitive(packed.to_primitive()), packed.to_u32());
                prop_assert_eq!(encode_packed(Some(packed.decode())), packed.to_u32());
            }

            #[test]
            fn sentinel_date_any_time(time: u16) {
                let dt = decode_packed_naive(0xFFFF, time);
                prop_assert_eq!((dt.year(), u8::from(dt.month()), dt.day()), (1980, 1, 1));
            }

            #[test]
            fn sentinel_time_any_date(date: u16) {
                let dt = decode_packed_naive(date, 0xFFFF);
                prop_assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
            }
        }
    }
}
