//! Snowflake identifier decoding
//!
//! Platform ids pack a creation timestamp into their high 42 bits: the value
//! shifted right by 22 is a millisecond offset from [`SNOWFLAKE_EPOCH_MS`].
//! The low 22 bits carry worker/process/sequence metadata that this service
//! never interprets but surfaces for diagnostics. Decoding is total: every
//! 64-bit value is a valid snowflake.

use chrono::{DateTime, Utc};

/// Platform epoch: 2015-01-01T00:00:00Z in Unix milliseconds.
pub const SNOWFLAKE_EPOCH_MS: u64 = 1_420_070_400_000;

/// The fields packed into a 64-bit snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snowflake {
    /// Creation time from the high 42 bits.
    pub timestamp: DateTime<Utc>,
    /// Worker id (bits 17-21).
    pub worker: u8,
    /// Process id (bits 12-16).
    pub process: u8,
    /// Per-process sequence counter (low 12 bits).
    pub sequence: u16,
}

/// Decode a snowflake. Pure and infallible; ids from the far future simply
/// decode to far-future timestamps.
pub fn decode(id: u64) -> Snowflake {
    let ms = (id >> 22) + SNOWFLAKE_EPOCH_MS;
    // Max offset lands around year 2154, well inside chrono's range.
    let timestamp =
        DateTime::from_timestamp_millis(ms as i64).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Snowflake {
        timestamp,
        worker: ((id >> 17) & 0x1f) as u8,
        process: ((id >> 12) & 0x1f) as u8,
        sequence: (id & 0xfff) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The worked example from the platform's developer docs.
    const KNOWN_ID: u64 = 175928847299117063;

    #[test]
    fn test_known_answer() {
        let snowflake = decode(KNOWN_ID);
        assert_eq!(snowflake.timestamp.timestamp_millis(), 1462015105796);
        assert_eq!(
            snowflake.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2016-04-30T11:18:25.796Z"
        );
        assert_eq!(snowflake.worker, 1);
        assert_eq!(snowflake.process, 0);
        assert_eq!(snowflake.sequence, 7);
    }

    #[test]
    fn test_zero_decodes_to_epoch() {
        let snowflake = decode(0);
        assert_eq!(
            snowflake.timestamp.timestamp_millis() as u64,
            SNOWFLAKE_EPOCH_MS
        );
        assert_eq!(snowflake.worker, 0);
        assert_eq!(snowflake.process, 0);
        assert_eq!(snowflake.sequence, 0);
    }

    #[test]
    fn test_routing_bits_round_trip() {
        let ms_offset: u64 = 41_944_705_796;
        let id = (ms_offset << 22) | (3 << 17) | (29 << 12) | 0xabc;
        let snowflake = decode(id);
        assert_eq!(snowflake.worker, 3);
        assert_eq!(snowflake.process, 29);
        assert_eq!(snowflake.sequence, 0xabc);
        assert_eq!(
            snowflake.timestamp.timestamp_millis() as u64,
            ms_offset + SNOWFLAKE_EPOCH_MS
        );
    }

    #[test]
    fn test_timestamps_monotonic_in_id() {
        let ids = [
            0u64,
            1 << 22,
            KNOWN_ID,
            KNOWN_ID + 1,
            466378653216014359,
            859579547458043975,
            u64::MAX,
        ];
        let mut sorted = ids;
        sorted.sort_unstable();
        let stamps: Vec<_> = sorted.iter().map(|&id| decode(id).timestamp).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_decode_is_pure() {
        assert_eq!(decode(KNOWN_ID), decode(KNOWN_ID));
        assert_eq!(decode(u64::MAX), decode(u64::MAX));
    }

    #[test]
    fn test_far_future_id_still_decodes() {
        let snowflake = decode(u64::MAX);
        // (2^42 - 1) ms past the epoch, not an error.
        assert_eq!(
            snowflake.timestamp.timestamp_millis() as u64,
            (u64::MAX >> 22) + SNOWFLAKE_EPOCH_MS
        );
        assert_eq!(snowflake.sequence, 0xfff);
    }
}
