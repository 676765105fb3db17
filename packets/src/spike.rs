//! Typed views over packets of spikes.
//!
//! A view borrows the bytes of a [`Packet`] (or any buffer with the same
//! layout) and holds no state of its own. Events are addressed by `i32`
//! indices, the width of the header counters.

use crate::configuration::Configuration;
use crate::error::Error;
use crate::header::{EventType, Header};
use crate::iter::{Direction, Filter, Iter, IterMut};
use crate::ledger;
use crate::packet::Packet;
use neuromorphic_event_types::SpikeEvent;

/// Allocates a packet of `capacity` invalid spikes.
///
/// [`Packet::spike`] and [`Packet::spike_mut`] always succeed on the result.
pub fn allocate(capacity: i32, source: i16, ts_overflow: i32) -> Result<Packet, Error> {
    Packet::allocate(
        capacity,
        source,
        ts_overflow,
        EventType::Spike,
        SpikeEvent::SIZE as i32,
        SpikeEvent::TIMESTAMP_OFFSET as i32,
    )
}

pub fn allocate_with(configuration: &Configuration) -> Result<Packet, Error> {
    allocate(
        configuration.capacity,
        configuration.source,
        configuration.ts_overflow,
    )
}

/// Length of the events region if `header` describes a spike packet that
/// fits in `length` bytes.
fn events_length(header: &Header, length: usize) -> Option<usize> {
    if !header.is(EventType::Spike) || header.event_size() != SpikeEvent::SIZE as i32 {
        return None;
    }
    let capacity = usize::try_from(header.event_capacity()).ok()?;
    let events_length = capacity.checked_mul(SpikeEvent::SIZE)?;
    if Header::SIZE.checked_add(events_length)? > length {
        return None;
    }
    Some(events_length)
}

fn out_of_bounds(index: i32, capacity: i32) -> Error {
    let error = Error::OutOfBounds { index, capacity };
    log::error!(
        target: "Spike Event",
        "invalid event offset {index}, while maximum allowed value is {}",
        capacity - 1
    );
    error
}

fn slot(index: i32, capacity: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|index| *index < capacity)
}

/// Read-only spike packet.
#[derive(Debug, Copy, Clone)]
pub struct SpikeEventPacket<'a> {
    header: &'a Header,
    events: &'a [SpikeEvent],
}

impl<'a> SpikeEventPacket<'a> {
    /// Returns `None` if the bytes do not hold a spike packet.
    pub fn from_bytes(bytes: &'a [u8]) -> Option<Self> {
        let header = Header::from_bytes(bytes)?;
        let length = events_length(header, bytes.len())?;
        Some(Self {
            header,
            events: neuromorphic_event_types::events_from_bytes(
                &bytes[Header::SIZE..Header::SIZE + length],
            ),
        })
    }

    pub fn from_packet(packet: &'a Packet) -> Option<Self> {
        Self::from_bytes(packet.as_bytes())
    }

    pub fn header(&self) -> &'a Header {
        self.header
    }

    pub fn capacity(&self) -> i32 {
        self.events.len() as i32
    }

    pub fn event_number(&self) -> i32 {
        self.header.event_number()
    }

    pub fn event_valid(&self) -> i32 {
        self.header.event_valid()
    }

    pub fn ts_overflow(&self) -> i32 {
        self.header.event_ts_overflow()
    }

    /// Bounds-checked access to any slot in `[0, capacity)`.
    pub fn event(&self, index: i32) -> Result<&'a SpikeEvent, Error> {
        let events = self.events;
        slot(index, events.len())
            .map(|index| &events[index])
            .ok_or_else(|| out_of_bounds(index, self.capacity()))
    }

    /// Same as [`Self::event`], with the bounds violation logged and dropped.
    pub fn get(&self, index: i32) -> Option<&'a SpikeEvent> {
        self.event(index).ok()
    }

    pub fn timestamp64(&self, event: &SpikeEvent) -> i64 {
        event.timestamp64(self.ts_overflow())
    }

    /// Events in `[0, event_number)`.
    pub fn events(&self) -> &'a [SpikeEvent] {
        let events = self.events;
        &events[..written(self.header, events.len())]
    }

    pub fn iter(&self, direction: Direction, filter: Filter) -> Iter<'a> {
        Iter::new(self.events().iter().enumerate(), direction, filter)
    }

    pub fn iter_all(&self) -> Iter<'a> {
        self.iter(Direction::Forward, Filter::All)
    }

    pub fn iter_valid(&self) -> Iter<'a> {
        self.iter(Direction::Forward, Filter::Valid)
    }

    pub fn iter_all_rev(&self) -> Iter<'a> {
        self.iter(Direction::Reverse, Filter::All)
    }

    pub fn iter_valid_rev(&self) -> Iter<'a> {
        self.iter(Direction::Reverse, Filter::Valid)
    }
}

// a corrupted event number never reaches past the capacity
fn written(header: &Header, capacity: usize) -> usize {
    usize::try_from(header.event_number())
        .unwrap_or(0)
        .min(capacity)
}

/// Mutable spike packet.
#[derive(Debug)]
pub struct SpikeEventPacketMut<'a> {
    header: &'a mut Header,
    events: &'a mut [SpikeEvent],
}

impl<'a> SpikeEventPacketMut<'a> {
    /// Returns `None` if the bytes do not hold a spike packet.
    pub fn from_bytes(bytes: &'a mut [u8]) -> Option<Self> {
        let length = events_length(Header::from_bytes(bytes)?, bytes.len())?;
        let (header, events) = bytes.split_at_mut(Header::SIZE);
        Some(Self {
            header: Header::from_bytes_mut(header)?,
            events: neuromorphic_event_types::events_from_bytes_mut(&mut events[..length]),
        })
    }

    pub fn from_packet(packet: &'a mut Packet) -> Option<Self> {
        Self::from_bytes(packet.as_bytes_mut())
    }

    /// Read-only view of the same packet.
    pub fn view(&self) -> SpikeEventPacket<'_> {
        SpikeEventPacket {
            header: &*self.header,
            events: &*self.events,
        }
    }

    pub fn header(&self) -> &Header {
        &*self.header
    }

    pub fn capacity(&self) -> i32 {
        self.events.len() as i32
    }

    pub fn event(&self, index: i32) -> Result<&SpikeEvent, Error> {
        self.view().event(index)
    }

    pub fn get(&self, index: i32) -> Option<&SpikeEvent> {
        self.view().get(index)
    }

    pub fn event_mut(&mut self, index: i32) -> Result<&mut SpikeEvent, Error> {
        let capacity = self.capacity();
        match slot(index, self.events.len()) {
            Some(index) => Ok(&mut self.events[index]),
            None => Err(out_of_bounds(index, capacity)),
        }
    }

    pub fn get_mut(&mut self, index: i32) -> Option<&mut SpikeEvent> {
        self.event_mut(index).ok()
    }

    /// Header and events borrowed separately, for use with [`ledger`].
    pub fn split_mut(&mut self) -> (&mut Header, &mut [SpikeEvent]) {
        (&mut *self.header, &mut *self.events)
    }

    /// Validates a written slot or the next one (at `event_number`).
    ///
    /// Slots past `event_number` are rejected, since counting them would
    /// leave `event_valid` out of step with the marks in `[0, event_number)`.
    pub fn validate(&mut self, index: i32) -> Result<(), Error> {
        let slot_index = slot(index, self.events.len())
            .ok_or_else(|| out_of_bounds(index, self.capacity()))?;
        let event_number = self.header.event_number();
        if index > event_number {
            let error = Error::Unwritten {
                index,
                event_number,
            };
            log::error!(target: "Spike Event", "{error}");
            return Err(error);
        }
        ledger::validate(&mut self.events[slot_index], &mut *self.header)
    }

    pub fn invalidate(&mut self, index: i32) -> Result<(), Error> {
        let index = slot(index, self.events.len())
            .ok_or_else(|| out_of_bounds(index, self.capacity()))?;
        ledger::invalidate(&mut self.events[index], &mut *self.header)
    }

    /// Writes the next slot (at `event_number`) and validates it.
    pub fn push(&mut self, mut event: SpikeEvent) -> Result<i32, Error> {
        let index = self.header.event_number();
        if index >= self.capacity() {
            let error = Error::Full {
                capacity: self.capacity(),
            };
            log::error!(target: "Spike Event", "{error}");
            return Err(error);
        }
        event.set_valid_mark(false);
        *self.event_mut(index)? = event;
        self.validate(index)?;
        Ok(index)
    }

    pub fn set_timestamp(&mut self, index: i32, timestamp: i32) -> Result<(), Error> {
        self.event_mut(index)?.set_timestamp(timestamp).map_err(|error| {
            log::error!(target: "Spike Event", "{error}");
            Error::from(error)
        })
    }

    pub fn timestamp64(&self, event: &SpikeEvent) -> i64 {
        self.view().timestamp64(event)
    }

    pub fn iter(&self, direction: Direction, filter: Filter) -> Iter<'_> {
        Iter::new(self.view().events().iter().enumerate(), direction, filter)
    }

    pub fn iter_mut(&mut self, direction: Direction, filter: Filter) -> IterMut<'_> {
        let number = written(self.header, self.events.len());
        IterMut::new(
            self.events[..number].iter_mut().enumerate(),
            direction,
            filter,
        )
    }

    pub fn iter_all_mut(&mut self) -> IterMut<'_> {
        self.iter_mut(Direction::Forward, Filter::All)
    }

    pub fn iter_valid_mut(&mut self) -> IterMut<'_> {
        self.iter_mut(Direction::Forward, Filter::Valid)
    }

    pub fn iter_all_rev_mut(&mut self) -> IterMut<'_> {
        self.iter_mut(Direction::Reverse, Filter::All)
    }

    pub fn iter_valid_rev_mut(&mut self) -> IterMut<'_> {
        self.iter_mut(Direction::Reverse, Filter::Valid)
    }
}

impl Packet {
    /// Read-only spike view, `None` if this is not a spike packet.
    pub fn spike(&self) -> Option<SpikeEventPacket<'_>> {
        SpikeEventPacket::from_packet(self)
    }

    /// Mutable spike view, `None` if this is not a spike packet.
    pub fn spike_mut(&mut self) -> Option<SpikeEventPacketMut<'_>> {
        SpikeEventPacketMut::from_packet(self)
    }
}
