use super::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use super::protocol::{MAX_SNAPSHOT_LEVELS, SNAPSHOT_HEADER_SIZE, SNAPSHOT_LEVEL_SIZE};
use crate::orderbook::{LevelSummary, MarketDataSnapshot};
use crate::symbol::Symbol;
use byteorder::{ByteOrder, LittleEndian};

/// Encoded size of `snapshot`
pub fn encoded_snapshot_len(snapshot: &MarketDataSnapshot) -> usize {
    SNAPSHOT_HEADER_SIZE + (snapshot.bids.len() + snapshot.asks.len()) * SNAPSHOT_LEVEL_SIZE
}

fn check_level_count(count: usize) -> EncodeResult<()> {
    if count > MAX_SNAPSHOT_LEVELS {
        return Err(EncodeError::TooManyLevels {
            count,
            max: MAX_SNAPSHOT_LEVELS,
        });
    }
    Ok(())
}

fn write_level(buffer: &mut [u8], level: &LevelSummary) {
    LittleEndian::write_i64(&mut buffer[0..8], level.price);
    // The wire carries 32-bit quantities
    let quantity = u32::try_from(level.total_quantity).unwrap_or(u32::MAX);
    LittleEndian::write_u32(&mut buffer[8..12], quantity);
    LittleEndian::write_u32(&mut buffer[12..16], level.order_count);
}

fn read_level(buffer: &[u8]) -> LevelSummary {
    LevelSummary {
        price: LittleEndian::read_i64(&buffer[0..8]),
        total_quantity: u64::from(LittleEndian::read_u32(&buffer[8..12])),
        order_count: LittleEndian::read_u32(&buffer[12..16]),
    }
}

/// Writes `snapshot` at the start of `buffer`, returning the number of bytes
/// written. Each side may carry at most `MAX_SNAPSHOT_LEVELS` levels.
pub fn encode_snapshot(snapshot: &MarketDataSnapshot, buffer: &mut [u8]) -> EncodeResult<usize> {
    check_level_count(snapshot.bids.len())?;
    check_level_count(snapshot.asks.len())?;

    let size = encoded_snapshot_len(snapshot);
    if buffer.len() < size {
        return Err(EncodeError::BufferTooSmall {
            need: size,
            have: buffer.len(),
        });
    }

    LittleEndian::write_u32(&mut buffer[0..4], snapshot.symbol.ordinal());
    LittleEndian::write_u64(&mut buffer[4..12], snapshot.timestamp);
    LittleEndian::write_u32(&mut buffer[12..16], snapshot.bids.len() as u32);
    LittleEndian::write_u32(&mut buffer[16..20], snapshot.asks.len() as u32);

    let mut offset = SNAPSHOT_HEADER_SIZE;
    for level in snapshot.bids.iter().chain(snapshot.asks.iter()) {
        write_level(&mut buffer[offset..offset + SNAPSHOT_LEVEL_SIZE], level);
        offset += SNAPSHOT_LEVEL_SIZE;
    }
    Ok(offset)
}

/// Parses a snapshot written by [`encode_snapshot`]
pub fn decode_snapshot(buffer: &[u8]) -> DecodeResult<MarketDataSnapshot> {
    if buffer.len() < SNAPSHOT_HEADER_SIZE {
        return Err(DecodeError::BufferTooSmall {
            need: SNAPSHOT_HEADER_SIZE,
            have: buffer.len(),
        });
    }

    let ordinal = LittleEndian::read_u32(&buffer[0..4]);
    let symbol = Symbol::from_ordinal(ordinal).ok_or(DecodeError::UnknownSymbol(ordinal))?;
    let timestamp = LittleEndian::read_u64(&buffer[4..12]);
    let bid_count = LittleEndian::read_u32(&buffer[12..16]) as usize;
    let ask_count = LittleEndian::read_u32(&buffer[16..20]) as usize;

    for count in [bid_count, ask_count] {
        if count > MAX_SNAPSHOT_LEVELS {
            return Err(DecodeError::TooManyLevels {
                count,
                max: MAX_SNAPSHOT_LEVELS,
            });
        }
    }

    let need = SNAPSHOT_HEADER_SIZE + (bid_count + ask_count) * SNAPSHOT_LEVEL_SIZE;
    if buffer.len() < need {
        return Err(DecodeError::BufferTooSmall {
            need,
            have: buffer.len(),
        });
    }

    let mut levels = buffer[SNAPSHOT_HEADER_SIZE..need]
        .chunks_exact(SNAPSHOT_LEVEL_SIZE)
        .map(read_level);

    let mut snapshot = MarketDataSnapshot::new(symbol, timestamp);
    snapshot.bids = levels.by_ref().take(bid_count).collect();
    snapshot.asks = levels.collect();
    Ok(snapshot)
}
