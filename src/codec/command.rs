use super::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use super::protocol::{MAX_ORDER_QUANTITY, MessageType, TYPE_TAG_SIZE};
use crate::orderbook::Side;
use crate::symbol::Symbol;
use byteorder::{ByteOrder, LittleEndian};

/// A decoded inbound command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCommand {
    /// Enter a new limit order; the engine assigns its id
    NewOrder {
        symbol: Symbol,
        side: Side,
        price: i64,
        quantity: u32,
        user_id: u64,
    },
    /// Remove a resting order
    CancelOrder { symbol: Symbol, order_id: u64 },
    /// Change a resting order's price and/or quantity
    ModifyOrder {
        symbol: Symbol,
        order_id: u64,
        new_price: i64,
        new_quantity: u32,
    },
}

fn ensure_len(buffer: &[u8], need: usize) -> DecodeResult<()> {
    if buffer.len() < need {
        return Err(DecodeError::BufferTooSmall {
            need,
            have: buffer.len(),
        });
    }
    Ok(())
}

fn read_symbol(buffer: &[u8]) -> DecodeResult<Symbol> {
    let ordinal = LittleEndian::read_u32(buffer);
    Symbol::from_ordinal(ordinal).ok_or(DecodeError::UnknownSymbol(ordinal))
}

impl OrderCommand {
    pub fn message_type(&self) -> MessageType {
        match self {
            OrderCommand::NewOrder { .. } => MessageType::NewOrder,
            OrderCommand::CancelOrder { .. } => MessageType::CancelOrder,
            OrderCommand::ModifyOrder { .. } => MessageType::ModifyOrder,
        }
    }

    pub fn symbol(&self) -> Symbol {
        match self {
            OrderCommand::NewOrder { symbol, .. }
            | OrderCommand::CancelOrder { symbol, .. }
            | OrderCommand::ModifyOrder { symbol, .. } => *symbol,
        }
    }

    /// Encoded size, type tag included
    pub fn encoded_len(&self) -> usize {
        self.message_type().message_size()
    }

    /// Parses one command from the start of `buffer`. Bytes past the end of
    /// the fixed layout are ignored.
    pub fn decode(buffer: &[u8]) -> DecodeResult<Self> {
        ensure_len(buffer, TYPE_TAG_SIZE)?;
        let tag = LittleEndian::read_u32(&buffer[0..4]);
        let message_type =
            MessageType::from_u32(tag).ok_or(DecodeError::UnknownMessageType(tag))?;
        ensure_len(buffer, message_type.message_size())?;

        let symbol = read_symbol(&buffer[4..8])?;

        let command = match message_type {
            MessageType::NewOrder => {
                let side_byte = buffer[8];
                let side = Side::from_wire(side_byte).ok_or(DecodeError::InvalidSide(side_byte))?;
                let price = LittleEndian::read_i64(&buffer[9..17]);
                let quantity = LittleEndian::read_u32(&buffer[17..21]);
                let user_id = LittleEndian::read_u64(&buffer[21..29]);
                if quantity == 0 || quantity > MAX_ORDER_QUANTITY {
                    return Err(DecodeError::InvalidQuantity(quantity));
                }
                OrderCommand::NewOrder {
                    symbol,
                    side,
                    price,
                    quantity,
                    user_id,
                }
            }
            MessageType::CancelOrder => OrderCommand::CancelOrder {
                symbol,
                order_id: LittleEndian::read_u64(&buffer[8..16]),
            },
            MessageType::ModifyOrder => {
                let new_quantity = LittleEndian::read_u32(&buffer[24..28]);
                // Zero is a valid modify and removes the order
                if new_quantity > MAX_ORDER_QUANTITY {
                    return Err(DecodeError::InvalidQuantity(new_quantity));
                }
                OrderCommand::ModifyOrder {
                    symbol,
                    order_id: LittleEndian::read_u64(&buffer[8..16]),
                    new_price: LittleEndian::read_i64(&buffer[16..24]),
                    new_quantity,
                }
            }
        };
        Ok(command)
    }

    /// Writes the command at the start of `buffer`, returning the number of
    /// bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> EncodeResult<usize> {
        let size = self.encoded_len();
        if buffer.len() < size {
            return Err(EncodeError::BufferTooSmall {
                need: size,
                have: buffer.len(),
            });
        }

        LittleEndian::write_u32(&mut buffer[0..4], self.message_type().tag());
        LittleEndian::write_u32(&mut buffer[4..8], self.symbol().ordinal());

        match *self {
            OrderCommand::NewOrder {
                side,
                price,
                quantity,
                user_id,
                ..
            } => {
                buffer[8] = side.to_wire();
                LittleEndian::write_i64(&mut buffer[9..17], price);
                LittleEndian::write_u32(&mut buffer[17..21], quantity);
                LittleEndian::write_u64(&mut buffer[21..29], user_id);
            }
            OrderCommand::CancelOrder { order_id, .. } => {
                LittleEndian::write_u64(&mut buffer[8..16], order_id);
            }
            OrderCommand::ModifyOrder {
                order_id,
                new_price,
                new_quantity,
                ..
            } => {
                LittleEndian::write_u64(&mut buffer[8..16], order_id);
                LittleEndian::write_i64(&mut buffer[16..24], new_price);
                LittleEndian::write_u32(&mut buffer[24..28], new_quantity);
            }
        }
        Ok(size)
    }

    /// Encodes into a freshly allocated buffer of exactly the encoded size
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.encoded_len()];
        let written = self.encode(&mut buffer);
        debug_assert_eq!(written, Ok(buffer.len()));
        buffer
    }
}
