use super::*;

fn framed(packets: &[&[u8]]) -> Vec<u8> {
    let mut w = CaptureWriter::new(Vec::new());
    for p in packets {
        w.write_packet(p).unwrap();
    }
    assert_eq!(w.packets_written(), packets.len() as u64);
    w.finish().unwrap()
}

#[test]
fn reader_splits_records_in_order() {
    let bytes = framed(&[&b"abc"[..], &[], &b"0123456789"[..]]);
    assert_eq!(&bytes[..4], &3u32.to_le_bytes());

    let packets: Vec<Vec<u8>> = CaptureReader::new(bytes.as_slice())
        .collect::<LayerScopeResult<_>>()
        .unwrap();
    assert_eq!(
        packets,
        vec![b"abc".to_vec(), Vec::new(), b"0123456789".to_vec()]
    );
}

#[test]
fn empty_stream_yields_nothing() {
    assert_eq!(CaptureReader::new(&[0u8; 0][..]).count(), 0);
}

#[test]
fn truncated_payload_is_protocol_error_then_stops() {
    let mut bytes = framed(&[&b"abcdef"[..]]);
    bytes.truncate(bytes.len() - 2);

    let mut reader = CaptureReader::new(bytes.as_slice());
    assert!(matches!(
        reader.next(),
        Some(Err(LayerScopeError::Protocol(_)))
    ));
    assert!(reader.next().is_none());
}

#[test]
fn truncated_header_is_protocol_error() {
    let mut bytes = framed(&[&b"ok"[..]]);
    bytes.extend_from_slice(&[1, 0]);

    let mut reader = CaptureReader::new(bytes.as_slice());
    assert_eq!(reader.next().unwrap().unwrap(), b"ok".to_vec());
    assert!(matches!(
        reader.next(),
        Some(Err(LayerScopeError::Protocol(_)))
    ));
}

#[test]
fn oversized_length_is_rejected_without_allocating() {
    let bytes = 1000u32.to_le_bytes();
    let mut reader = CaptureReader::with_max_packet(&bytes[..], 16);
    assert!(matches!(
        reader.next(),
        Some(Err(LayerScopeError::Protocol(_)))
    ));
}
