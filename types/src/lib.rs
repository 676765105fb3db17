//! Fixed-size neuromorphic event records.
//!
//! Records are stored exactly as they travel on the wire (little-endian, no
//! padding, alignment 1), so a byte buffer holding packed records can be
//! viewed as a slice of records without copying. Byte order is handled in the
//! `data`/`timestamp` accessors only; the bit-field helpers below work on host
//! integers.

/// Bit 0 of every record's first word marks the record as valid.
pub const VALID_MARK_SHIFT: u32 = 0;
pub const VALID_MARK_MASK: u32 = 0x0000_0001;

/// 32 core IDs, 64 chip IDs and up to a million neuron IDs.
pub const SPIKE_SOURCE_CORE_ID_SHIFT: u32 = 1;
pub const SPIKE_SOURCE_CORE_ID_MASK: u32 = 0x0000_001F;
pub const SPIKE_CHIP_ID_SHIFT: u32 = 6;
pub const SPIKE_CHIP_ID_MASK: u32 = 0x0000_003F;
pub const SPIKE_NEURON_ID_SHIFT: u32 = 12;
pub const SPIKE_NEURON_ID_MASK: u32 = 0x000F_FFFF;

/// Position of the overflow counter in a 64-bit timestamp.
pub const TS_OVERFLOW_SHIFT: u32 = 31;

#[inline]
pub const fn get_bits(word: u32, shift: u32, mask: u32) -> u32 {
    (word >> shift) & mask
}

#[inline]
pub const fn clear_bits(word: u32, shift: u32, mask: u32) -> u32 {
    word & !(mask << shift)
}

/// Clears the field, then writes `value` truncated to the field width.
#[inline]
pub const fn set_bits(word: u32, shift: u32, mask: u32, value: u32) -> u32 {
    clear_bits(word, shift, mask) | ((value & mask) << shift)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("negative timestamp {0} (bit 31 is reserved)")]
    NegativeTimestamp(i32),
}

/// Spike emitted by a neuron-array chip.
///
/// Layout:
/// ```text
///   data:      u32 LE (4B) - valid mark (bit 0), core (1..6), chip (6..12), neuron (12..32)
///   timestamp: i32 LE (4B) - microseconds, non-negative, wraps at 2^31
/// ```
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SpikeEvent {
    data: [u8; 4],
    timestamp: [u8; 4],
}

const _: () = assert!(std::mem::size_of::<SpikeEvent>() == SpikeEvent::SIZE);
const _: () = assert!(std::mem::align_of::<SpikeEvent>() == 1);

macro_rules! fields {
    ($($name:ident: $type:ty => ($shift:ident, $mask:ident)),+ $(,)?) => {
        paste::paste! {
            impl SpikeEvent {
                $(
                    pub fn $name(&self) -> $type {
                        get_bits(self.data(), $shift, $mask) as $type
                    }

                    /// Values wider than the field are truncated to its low-order bits.
                    pub fn [<set_ $name>](&mut self, $name: $type) {
                        self.set_data(set_bits(self.data(), $shift, $mask, $name as u32));
                    }
                )+
            }
        }
    };
}

fields! {
    source_core_id: u8 => (SPIKE_SOURCE_CORE_ID_SHIFT, SPIKE_SOURCE_CORE_ID_MASK),
    chip_id: u8 => (SPIKE_CHIP_ID_SHIFT, SPIKE_CHIP_ID_MASK),
    neuron_id: u32 => (SPIKE_NEURON_ID_SHIFT, SPIKE_NEURON_ID_MASK),
}

impl SpikeEvent {
    pub const SIZE: usize = 8;

    /// Byte offset of the timestamp within the record.
    pub const TIMESTAMP_OFFSET: usize = 4;

    /// Builds an invalid record. Packets count it once it is validated.
    pub fn new(
        source_core_id: u8,
        chip_id: u8,
        neuron_id: u32,
        timestamp: i32,
    ) -> Result<Self, Error> {
        let mut event = Self::default();
        event.set_source_core_id(source_core_id);
        event.set_chip_id(chip_id);
        event.set_neuron_id(neuron_id);
        event.set_timestamp(timestamp)?;
        Ok(event)
    }

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            data: [bytes[0], bytes[1], bytes[2], bytes[3]],
            timestamp: [bytes[4], bytes[5], bytes[6], bytes[7]],
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [
            self.data[0],
            self.data[1],
            self.data[2],
            self.data[3],
            self.timestamp[0],
            self.timestamp[1],
            self.timestamp[2],
            self.timestamp[3],
        ]
    }

    pub fn data(&self) -> u32 {
        u32::from_le_bytes(self.data)
    }

    fn set_data(&mut self, data: u32) {
        self.data = data.to_le_bytes();
    }

    pub fn is_valid(&self) -> bool {
        get_bits(self.data(), VALID_MARK_SHIFT, VALID_MARK_MASK) == 1
    }

    /// Writes the valid mark and nothing else.
    ///
    /// Packet counters are not updated; records that belong to a packet must
    /// go through the packet's validate/invalidate instead.
    pub fn set_valid_mark(&mut self, valid: bool) {
        self.set_data(set_bits(
            self.data(),
            VALID_MARK_SHIFT,
            VALID_MARK_MASK,
            valid as u32,
        ));
    }

    /// 32-bit microsecond timestamp. It wraps around; see [`Self::timestamp64`].
    pub fn timestamp(&self) -> i32 {
        i32::from_le_bytes(self.timestamp)
    }

    /// Negative values would use bit 31 and are rejected, leaving the record untouched.
    pub fn set_timestamp(&mut self, timestamp: i32) -> Result<(), Error> {
        if timestamp < 0 {
            return Err(Error::NegativeTimestamp(timestamp));
        }
        self.timestamp = timestamp.to_le_bytes();
        Ok(())
    }

    /// 64-bit microsecond timestamp, given the overflow counter of the packet
    /// that holds this record. The counter is trusted as is.
    pub fn timestamp64(&self, ts_overflow: i32) -> i64 {
        (((ts_overflow as u64) << TS_OVERFLOW_SHIFT) | (self.timestamp() as u64)) as i64
    }

    pub fn fields(&self) -> SpikeFields {
        SpikeFields {
            valid: self.is_valid(),
            source_core_id: self.source_core_id(),
            chip_id: self.chip_id(),
            neuron_id: self.neuron_id(),
            timestamp: self.timestamp(),
        }
    }
}

/// Decoded copy of a [`SpikeEvent`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SpikeFields {
    pub valid: bool,
    pub source_core_id: u8,
    pub chip_id: u8,
    pub neuron_id: u32,
    pub timestamp: i32,
}

impl TryFrom<SpikeFields> for SpikeEvent {
    type Error = Error;

    fn try_from(fields: SpikeFields) -> Result<Self, Self::Error> {
        let mut event = SpikeEvent::new(
            fields.source_core_id,
            fields.chip_id,
            fields.neuron_id,
            fields.timestamp,
        )?;
        event.set_valid_mark(fields.valid);
        Ok(event)
    }
}

/// Reinterprets packed records as bytes.
pub fn events_as_bytes(events: &[SpikeEvent]) -> &[u8] {
    // SAFETY: SpikeEvent is repr(C), 8 bytes of u8 arrays, alignment 1, no padding
    unsafe {
        std::slice::from_raw_parts(
            events.as_ptr() as *const u8,
            std::mem::size_of_val(events),
        )
    }
}

/// Reinterprets bytes as packed records. Trailing bytes that do not form a
/// whole record are ignored.
pub fn events_from_bytes(bytes: &[u8]) -> &[SpikeEvent] {
    // SAFETY: any bit pattern is a valid SpikeEvent and its alignment is 1
    unsafe {
        std::slice::from_raw_parts(
            bytes.as_ptr() as *const SpikeEvent,
            bytes.len() / SpikeEvent::SIZE,
        )
    }
}

pub fn events_from_bytes_mut(bytes: &mut [u8]) -> &mut [SpikeEvent] {
    // SAFETY: see events_from_bytes, the exclusive borrow is carried over
    unsafe {
        std::slice::from_raw_parts_mut(
            bytes.as_mut_ptr() as *mut SpikeEvent,
            bytes.len() / SpikeEvent::SIZE,
        )
    }
}
