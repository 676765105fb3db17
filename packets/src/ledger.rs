//! Validity transitions and the packet counters they maintain.
//!
//! `event_number` counts the slots written so far and never decreases.
//! `event_valid` counts the written slots that are still valid, so invalid
//! events can be filtered out without compacting the packet.

use crate::error::Error;
use crate::header::Header;
use neuromorphic_event_types::SpikeEvent;

/// Marks an invalid event as valid and counts it as written and valid.
///
/// Validating an event that was previously invalidated counts its slot twice;
/// this is not detected. Validating a valid event, or validating when the
/// packet already counts `event_capacity` written events, changes nothing.
pub fn validate(event: &mut SpikeEvent, header: &mut Header) -> Result<(), Error> {
    if event.is_valid() {
        log::error!(target: "Spike Event", "validate called on an already valid event");
        return Err(Error::AlreadyValid);
    }
    if header.event_number() >= header.event_capacity() {
        let error = Error::Full {
            capacity: header.event_capacity(),
        };
        log::error!(target: "Spike Event", "{error}");
        return Err(error);
    }
    event.set_valid_mark(true);
    header.set_event_number(header.event_number() + 1);
    header.set_event_valid(header.event_valid() + 1);
    Ok(())
}

/// Marks a valid event as invalid. The event number is unchanged.
pub fn invalidate(event: &mut SpikeEvent, header: &mut Header) -> Result<(), Error> {
    if !event.is_valid() {
        log::error!(target: "Spike Event", "invalidate called on an already invalid event");
        return Err(Error::AlreadyInvalid);
    }
    event.set_valid_mark(false);
    header.set_event_valid(header.event_valid() - 1);
    Ok(())
}
