//! Fixture buffers for the integration tests.
//!
//! Buffers are backed by `Vec<u32>` so their base address is always 4-byte
//! aligned, as the strict decoder requires.

#![allow(dead_code)]

use engine_protocol::protocol::layout::{
    HEADER_SIZE, OFFSET_ACTION, OFFSET_ID, OFFSET_PARAM_COUNT, ID_SIZE,
};

pub struct Frame {
    words: Vec<u32>,
    len: usize,
}

impl Frame {
    /// A zero-filled, aligned buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0u32; len.div_ceil(4)],
            len,
        }
    }

    /// A message with a size table built from `sizes` followed by `payload`.
    pub fn message(id: [u8; ID_SIZE], action: u32, sizes: &[u32], payload: &[u8]) -> Self {
        let table_end = HEADER_SIZE + sizes.len() * 4;
        let mut frame = Self::zeroed(table_end + payload.len());
        frame.set_id(id);
        frame.set_action(action);
        frame.set_param_count(sizes.len() as u16);
        for (index, size) in sizes.iter().enumerate() {
            let at = HEADER_SIZE + index * 4;
            frame.bytes_mut()[at..at + 4].copy_from_slice(&size.to_ne_bytes());
        }
        frame.bytes_mut()[table_end..].copy_from_slice(payload);
        frame
    }

    pub fn set_id(&mut self, id: [u8; ID_SIZE]) {
        self.bytes_mut()[OFFSET_ID..OFFSET_ID + ID_SIZE].copy_from_slice(&id);
    }

    pub fn set_action(&mut self, action: u32) {
        self.bytes_mut()[OFFSET_ACTION..OFFSET_ACTION + 4].copy_from_slice(&action.to_ne_bytes());
    }

    pub fn set_param_count(&mut self, count: u16) {
        self.bytes_mut()[OFFSET_PARAM_COUNT..OFFSET_PARAM_COUNT + 2]
            .copy_from_slice(&count.to_ne_bytes());
    }

    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.len]
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[..self.len]
    }
}

/// The identifier used by most tests.
pub const SAMPLE_ID: [u8; ID_SIZE] = [
    0xb9, 0xf3, 0x7d, 0xa5, 0x26, 0xd1, 0x4d, 0x87, 0x9e, 0xd3, 0xb8, 0x0b, 0x88, 0x65, 0xb3, 0x4b,
];

/// The 42-byte, three-parameter message: sizes `[1, 2, 3]`, payload
/// `AA | BB CC | DD EE FF` at offsets 36, 37..39 and 39..42.
pub fn three_params() -> Frame {
    Frame::message(
        SAMPLE_ID,
        0x0000_0001,
        &[1, 2, 3],
        &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF],
    )
}
