use crate::error::Error;
use crate::header::{EventType, Header};

/// Header and `event_capacity` events in one contiguous, owned allocation.
///
/// The packet is released as a whole when dropped. Typed views (for instance
/// [`crate::spike::SpikeEventPacket`]) borrow its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Vec<u8>,
}

fn packet_size(capacity: i32, event_size: i32) -> Option<usize> {
    (capacity as usize)
        .checked_mul(event_size as usize)?
        .checked_add(Header::SIZE)
}

// the valid mark is bit 0 of every event's first (little-endian) word
fn is_valid(event: &[u8]) -> bool {
    event[0] & 1 == 1
}

impl Packet {
    /// Allocates a zero-initialized packet (every event is invalid).
    pub fn allocate(
        capacity: i32,
        source: i16,
        ts_overflow: i32,
        event_type: EventType,
        event_size: i32,
        ts_offset: i32,
    ) -> Result<Self, Error> {
        Self::allocate_tagged(
            capacity,
            source,
            ts_overflow,
            event_type as i16,
            event_size,
            ts_offset,
        )
    }

    fn allocate_tagged(
        capacity: i32,
        source: i16,
        ts_overflow: i32,
        event_type: i16,
        event_size: i32,
        ts_offset: i32,
    ) -> Result<Self, Error> {
        if capacity <= 0 {
            return Err(Error::Capacity(capacity));
        }
        if event_size <= 0 {
            return Err(Error::Header("event size is not strictly positive"));
        }
        let size = packet_size(capacity, event_size).ok_or(Error::Allocation {
            capacity,
            event_size,
        })?;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| Error::Allocation {
                capacity,
                event_size,
            })?;
        bytes.resize(size, 0);
        let mut packet = Self { bytes };
        let header = packet.header_mut();
        header.set_event_type(event_type);
        header.set_event_source(source);
        header.set_event_size(event_size);
        header.set_event_ts_offset(ts_offset);
        header.set_event_ts_overflow(ts_overflow);
        header.set_event_capacity(capacity);
        header.check()?;
        Ok(packet)
    }

    /// Adopts a buffer produced elsewhere (for instance read from a socket).
    ///
    /// The header counters and the buffer length must agree. The event type
    /// is not checked here; typed views check it.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let header = Header::from_bytes(&bytes).ok_or(Error::Size {
            expected: Header::SIZE,
            read: bytes.len(),
        })?;
        header.check()?;
        let expected = packet_size(header.event_capacity(), header.event_size()).ok_or(
            Error::Header("capacity times event size overflows"),
        )?;
        if bytes.len() != expected {
            return Err(Error::Size {
                expected,
                read: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn header(&self) -> &Header {
        // SAFETY: allocate and from_bytes only build packets that hold a full header
        unsafe { Header::from_bytes_unchecked(&self.bytes) }
    }

    fn header_mut(&mut self) -> &mut Header {
        // SAFETY: see header
        unsafe { Header::from_bytes_unchecked_mut(&mut self.bytes) }
    }

    pub fn event_type(&self) -> Result<EventType, i16> {
        EventType::try_from(self.header().event_type())
    }

    fn event_size(&self) -> usize {
        self.header().event_size() as usize
    }

    /// Raw bytes of the events in `[0, event_number)`.
    fn written_events(&self) -> impl Iterator<Item = &[u8]> {
        let number = self.header().event_number() as usize;
        self.bytes[Header::SIZE..]
            .chunks_exact(self.event_size())
            .take(number)
    }

    fn with_events<'a, Events>(&self, capacity: i32, events: Events) -> Result<Self, Error>
    where
        Events: Iterator<Item = &'a [u8]>,
    {
        let header = self.header();
        let mut packet = Self::allocate_tagged(
            capacity,
            header.event_source(),
            header.event_ts_overflow(),
            header.event_type(),
            header.event_size(),
            header.event_ts_offset(),
        )?;
        let event_size = self.event_size();
        let mut number = 0;
        let mut valid = 0;
        for (target, source) in packet.bytes[Header::SIZE..]
            .chunks_exact_mut(event_size)
            .zip(events)
        {
            target.copy_from_slice(source);
            number += 1;
            if is_valid(source) {
                valid += 1;
            }
        }
        let header = packet.header_mut();
        header.set_event_number(number);
        header.set_event_valid(valid);
        Ok(packet)
    }

    /// Copies the written events into a packet whose capacity is the event
    /// number. Returns `None` if nothing was written.
    pub fn copy_only_events(&self) -> Result<Option<Self>, Error> {
        let header = self.header();
        if header.event_number() == 0 {
            return Ok(None);
        }
        self.with_events(header.event_number(), self.written_events())
            .map(Some)
    }

    /// Copies the valid events, in order, into a packet whose capacity is the
    /// number of valid events. Returns `None` if no event is valid.
    pub fn copy_only_valid_events(&self) -> Result<Option<Self>, Error> {
        let header = self.header();
        if header.event_valid() == 0 {
            return Ok(None);
        }
        self.with_events(
            header.event_valid(),
            self.written_events().filter(|event| is_valid(event)),
        )
        .map(Some)
    }
}
