use neuromorphic_event_packets::{spike, Configuration, Error, EventType, Header, Packet};

#[test]
fn from_bytes() {
    let mut packet = spike::allocate(4, 2, 0).unwrap();
    {
        let mut spikes = packet.spike_mut().unwrap();
        spikes.get_mut(0).unwrap().set_neuron_id(77);
        spikes.validate(0).unwrap();
    }
    let bytes = packet.clone().into_bytes();
    let received = Packet::from_bytes(bytes).unwrap();
    assert_eq!(received, packet);
    assert_eq!(received.spike().unwrap().get(0).unwrap().neuron_id(), 77);
}

#[test]
fn clone_is_independent() {
    let packet = spike::allocate(2, 0, 0).unwrap();
    let mut copy = packet.clone();
    copy.spike_mut().unwrap().validate(0).unwrap();
    assert_eq!(copy.header().event_valid(), 1);
    assert_eq!(packet.header().event_valid(), 0);
    assert!(!packet.spike().unwrap().get(0).unwrap().is_valid());
}

#[test]
fn header_of_adopted_buffer() {
    let received = Packet::from_bytes(spike::allocate(1, 6, 8).unwrap().into_bytes()).unwrap();
    assert_eq!(received.header().event_source(), 6);
    assert_eq!(received.header().event_ts_overflow(), 8);
    assert_eq!(received.header().event_capacity(), 1);
}

#[test]
fn from_bytes_rejects_inconsistent_buffers() {
    assert_eq!(
        Packet::from_bytes(vec![0; 5]),
        Err(Error::Size {
            expected: Header::SIZE,
            read: 5
        })
    );

    let mut bytes = spike::allocate(4, 0, 0).unwrap().into_bytes();
    bytes.pop();
    assert_eq!(
        Packet::from_bytes(bytes),
        Err(Error::Size {
            expected: 28 + 32,
            read: 28 + 31
        })
    );

    let mut bytes = spike::allocate(4, 0, 0).unwrap().into_bytes();
    // event_valid = 1 while event_number = 0
    bytes[24..28].copy_from_slice(&1_i32.to_le_bytes());
    assert!(matches!(Packet::from_bytes(bytes), Err(Error::Header(_))));

    let mut bytes = spike::allocate(4, 0, 0).unwrap().into_bytes();
    // event_number = 5 > capacity
    bytes[20..24].copy_from_slice(&5_i32.to_le_bytes());
    assert!(matches!(Packet::from_bytes(bytes), Err(Error::Header(_))));
}

#[test]
fn header_layout() {
    let packet = spike::allocate(3, -2, 9).unwrap();
    let bytes = packet.as_bytes();
    assert_eq!(&bytes[0..2], &12_i16.to_le_bytes());
    assert_eq!(&bytes[2..4], &(-2_i16).to_le_bytes());
    assert_eq!(&bytes[4..8], &8_i32.to_le_bytes());
    assert_eq!(&bytes[8..12], &4_i32.to_le_bytes());
    assert_eq!(&bytes[12..16], &9_i32.to_le_bytes());
    assert_eq!(&bytes[16..20], &3_i32.to_le_bytes());
    assert!(bytes[20..].iter().all(|byte| *byte == 0));
}

#[test]
fn copies() {
    let mut packet = spike::allocate(10, 4, 2).unwrap();
    {
        let mut spikes = packet.spike_mut().unwrap();
        for index in 0..4 {
            spikes.get_mut(index).unwrap().set_neuron_id(index as u32);
            spikes.validate(index).unwrap();
        }
        spikes.invalidate(1).unwrap();
    }

    let events = packet.copy_only_events().unwrap().unwrap();
    let header = events.header();
    assert_eq!(header.event_capacity(), 4);
    assert_eq!(header.event_number(), 4);
    assert_eq!(header.event_valid(), 3);
    assert_eq!(header.event_source(), 4);
    assert_eq!(header.event_ts_overflow(), 2);
    assert_eq!(events.event_type(), Ok(EventType::Spike));

    let valid = packet.copy_only_valid_events().unwrap().unwrap();
    let spikes = valid.spike().unwrap();
    assert_eq!(spikes.capacity(), 3);
    assert_eq!(spikes.event_number(), 3);
    assert_eq!(spikes.event_valid(), 3);
    let neurons: Vec<u32> = spikes
        .iter_valid()
        .map(|(_, event)| event.neuron_id())
        .collect();
    assert_eq!(neurons, vec![0, 2, 3]);

    // the source packet is untouched
    assert_eq!(packet.header().event_valid(), 3);
    assert_eq!(packet.header().event_capacity(), 10);
}

#[test]
fn copies_of_empty_packets() {
    let mut packet = spike::allocate(2, 0, 0).unwrap();
    assert_eq!(packet.copy_only_events(), Ok(None));
    assert_eq!(packet.copy_only_valid_events(), Ok(None));
    {
        let mut spikes = packet.spike_mut().unwrap();
        spikes.validate(0).unwrap();
        spikes.invalidate(0).unwrap();
    }
    assert!(packet.copy_only_events().unwrap().is_some());
    assert_eq!(packet.copy_only_valid_events(), Ok(None));
}

#[test]
fn configuration() {
    let configuration = Configuration {
        capacity: 16,
        source: 5,
        ts_overflow: 3,
    };
    let data = configuration.serialize_bincode().unwrap();
    assert_eq!(Configuration::deserialize_bincode(&data).unwrap(), configuration);
    let packet = spike::allocate_with(&configuration).unwrap();
    assert_eq!(packet.header().event_capacity(), 16);
    assert_eq!(packet.header().event_source(), 5);
    assert_eq!(packet.spike().unwrap().ts_overflow(), 3);
    assert_eq!(Configuration::default().capacity, 4096);
}

#[test]
fn event_types() {
    assert_eq!(EventType::Spike.to_string(), "spike");
    assert_eq!("point3d".parse::<EventType>(), Ok(EventType::Point3d));
    assert!("spikes".parse::<EventType>().is_err());
    assert_eq!(EventType::try_from(12_i16), Ok(EventType::Spike));
    assert_eq!(EventType::try_from(13_i16), Err(13));
}
