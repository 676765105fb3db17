macro_rules! register {
    ($($type:ident = $value:literal),+) => {
        paste::paste! {
            #[repr(i16)]
            #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
            pub enum EventType {
                $(
                    [<$type:camel>] = $value,
                )+
            }

            impl std::fmt::Display for EventType {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match self {
                        $(
                            Self::[<$type:camel>] => write!(formatter, stringify!($type)),
                        )+
                    }
                }
            }

            impl TryFrom<i16> for EventType {
                type Error = i16;

                fn try_from(value: i16) -> Result<Self, Self::Error> {
                    match value {
                        $(
                            $value => Ok(Self::[<$type:camel>]),
                        )+
                        value => Err(value),
                    }
                }
            }

            #[derive(Debug, PartialEq, Eq)]
            pub struct ParseTypeError {
                on: String
            }

            impl std::fmt::Display for ParseTypeError {
                fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(formatter, "unknow event type \"{}\"", self.on)
                }
            }

            impl std::str::FromStr for EventType {
                type Err = ParseTypeError;

                fn from_str(string: &str) -> Result<Self, Self::Err> {
                    match string {
                        $(
                            stringify!($type) => Ok(Self::[<$type:camel>]),
                        )+
                        _ => Err(Self::Err {on: string.to_owned()}),
                    }
                }
            }
        }
    };
}

register! {
    special = 0,
    polarity = 1,
    frame = 2,
    imu6 = 3,
    imu9 = 4,
    sample = 5,
    ear = 6,
    config = 7,
    point1d = 8,
    point2d = 9,
    point3d = 10,
    point4d = 11,
    spike = 12
}

/// Common header at the start of every event packet.
///
/// Only the counters can be written from outside this crate, so a typed view
/// never sees its packet retagged:
/// ```compile_fail
/// let mut packet = neuromorphic_event_packets::spike::allocate(1, 0, 0).unwrap();
/// let mut spikes = packet.spike_mut().unwrap();
/// let (header, _) = spikes.split_mut();
/// header.set_event_type(1);
/// ```
///
/// Layout (little-endian, no padding):
/// ```text
///   event_type:        i16 (2B)
///   event_source:      i16 (2B)
///   event_size:        i32 (4B) - bytes per event
///   event_ts_offset:   i32 (4B) - byte offset of the timestamp within an event
///   event_ts_overflow: i32 (4B) - timestamp wraps before this packet
///   event_capacity:    i32 (4B)
///   event_number:      i32 (4B) - slots written so far
///   event_valid:       i32 (4B) - written slots that are still valid
/// ```
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    event_type: [u8; 2],
    event_source: [u8; 2],
    event_size: [u8; 4],
    event_ts_offset: [u8; 4],
    event_ts_overflow: [u8; 4],
    event_capacity: [u8; 4],
    event_number: [u8; 4],
    event_valid: [u8; 4],
}

const _: () = assert!(std::mem::size_of::<Header>() == Header::SIZE);
const _: () = assert!(std::mem::align_of::<Header>() == 1);

macro_rules! accessors {
    ($($visibility:vis $name:ident: $type:ty),+ $(,)?) => {
        paste::paste! {
            impl Header {
                $(
                    pub fn $name(&self) -> $type {
                        <$type>::from_le_bytes(self.$name)
                    }

                    $visibility fn [<set_ $name>](&mut self, $name: $type) {
                        self.$name = $name.to_le_bytes();
                    }
                )+
            }
        }
    };
}

accessors! {
    pub(crate) event_type: i16,
    pub(crate) event_source: i16,
    pub(crate) event_size: i32,
    pub(crate) event_ts_offset: i32,
    pub(crate) event_ts_overflow: i32,
    pub(crate) event_capacity: i32,
    pub event_number: i32,
    pub event_valid: i32,
}

impl Header {
    pub const SIZE: usize = 28;

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type() == event_type as i16
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<&Header> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        // SAFETY: the length was checked above
        Some(unsafe { Self::from_bytes_unchecked(bytes) })
    }

    pub fn from_bytes_mut(bytes: &mut [u8]) -> Option<&mut Header> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        // SAFETY: the length was checked above
        Some(unsafe { Self::from_bytes_unchecked_mut(bytes) })
    }

    /// # Safety
    /// `bytes` must hold at least [`Header::SIZE`] bytes.
    pub(crate) unsafe fn from_bytes_unchecked(bytes: &[u8]) -> &Header {
        // SAFETY: Header is repr(C) with u8 array fields only, alignment 1, no padding
        unsafe { &*(bytes.as_ptr() as *const Header) }
    }

    /// # Safety
    /// `bytes` must hold at least [`Header::SIZE`] bytes.
    pub(crate) unsafe fn from_bytes_unchecked_mut(bytes: &mut [u8]) -> &mut Header {
        // SAFETY: see from_bytes_unchecked, the exclusive borrow is carried over
        unsafe { &mut *(bytes.as_mut_ptr() as *mut Header) }
    }

    /// Checks the counter ordering `0 <= valid <= number <= capacity`.
    pub(crate) fn check(&self) -> Result<(), crate::Error> {
        if self.event_capacity() <= 0 {
            return Err(crate::Error::Capacity(self.event_capacity()));
        }
        if self.event_size() <= 0 {
            return Err(crate::Error::Header("event size is not strictly positive"));
        }
        if self.event_ts_offset() < 0 || self.event_ts_offset() > self.event_size() - 4 {
            return Err(crate::Error::Header("timestamp offset outside of the event"));
        }
        if self.event_number() < 0 || self.event_number() > self.event_capacity() {
            return Err(crate::Error::Header("event number outside of [0, capacity]"));
        }
        if self.event_valid() < 0 || self.event_valid() > self.event_number() {
            return Err(crate::Error::Header("valid events outside of [0, event number]"));
        }
        Ok(())
    }
}
