pub mod configuration;
pub mod error;
pub mod header;
pub mod iter;
pub mod ledger;
pub mod packet;
pub mod spike;

pub use crate::configuration::Configuration;
pub use crate::configuration::DEFAULT_CONFIGURATION;
pub use crate::error::Error;
pub use crate::header::EventType;
pub use crate::header::Header;
pub use crate::iter::Direction;
pub use crate::iter::Filter;
pub use crate::packet::Packet;
pub use crate::spike::SpikeEventPacket;
pub use crate::spike::SpikeEventPacketMut;

pub use bincode;
pub use neuromorphic_event_types as types;
pub use neuromorphic_event_types::SpikeEvent;
