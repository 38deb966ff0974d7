//! Layout constants for the wire protocol
//!
//! NEW_ORDER    (29 bytes): type:4 symbol:4 side:1 price:8 quantity:4 user_id:8
//! CANCEL_ORDER (16 bytes): type:4 symbol:4 order_id:8
//! MODIFY_ORDER (28 bytes): type:4 symbol:4 order_id:8 new_price:8 new_quantity:4
//!
//! SNAPSHOT: symbol:4 timestamp:8 bid_count:4 ask_count:4, then bid_count bid
//! levels and ask_count ask levels of price:8 quantity:4 order_count:4

/// Size of the message type tag
pub const TYPE_TAG_SIZE: usize = 4;

pub const NEW_ORDER_SIZE: usize = 29;
pub const CANCEL_ORDER_SIZE: usize = 16;
pub const MODIFY_ORDER_SIZE: usize = 28;

/// Largest order quantity accepted; quantities are signed 32-bit on the wire
/// producers' side, so anything above this is a negative value
pub const MAX_ORDER_QUANTITY: u32 = i32::MAX as u32;

pub const SNAPSHOT_HEADER_SIZE: usize = 20;
pub const SNAPSHOT_LEVEL_SIZE: usize = 16;

/// Most levels a snapshot carries per side
pub const MAX_SNAPSHOT_LEVELS: usize = 5;

/// Largest encoded snapshot
pub const MAX_SNAPSHOT_SIZE: usize =
    SNAPSHOT_HEADER_SIZE + 2 * MAX_SNAPSHOT_LEVELS * SNAPSHOT_LEVEL_SIZE;

/// Size of the buffer publishers encode snapshots into
pub const SNAPSHOT_BUFFER_CAPACITY: usize = 1024;

/// Inbound command kinds
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    NewOrder = 1,
    CancelOrder = 2,
    ModifyOrder = 3,
}

impl MessageType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(MessageType::NewOrder),
            2 => Some(MessageType::CancelOrder),
            3 => Some(MessageType::ModifyOrder),
            _ => None,
        }
    }

    /// The type tag written on the wire
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Encoded size of a message of this type, tag included
    pub fn message_size(self) -> usize {
        match self {
            MessageType::NewOrder => NEW_ORDER_SIZE,
            MessageType::CancelOrder => CANCEL_ORDER_SIZE,
            MessageType::ModifyOrder => MODIFY_ORDER_SIZE,
        }
    }
}

const _: () = {
    assert!(NEW_ORDER_SIZE == TYPE_TAG_SIZE + 4 + 1 + 8 + 4 + 8);
    assert!(CANCEL_ORDER_SIZE == TYPE_TAG_SIZE + 4 + 8);
    assert!(MODIFY_ORDER_SIZE == TYPE_TAG_SIZE + 4 + 8 + 8 + 4);
    assert!(MAX_SNAPSHOT_SIZE <= SNAPSHOT_BUFFER_CAPACITY);
};
