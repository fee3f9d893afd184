use nimiqode::bit_buffer::BitBuffer;
use nimiqode::header::{header_length, mask_count, read_header};
use nimiqode::ring::Ring;
use nimiqode::{Nimiqode, VERSION};

fn reassemble(rings: &[Ring]) -> BitBuffer {
    let total: usize = rings.iter().map(Ring::capacity).sum();
    let mut stream = BitBuffer::new(total);
    let mut pos = 0;
    for ring in rings {
        stream.write_range(pos, ring.data().unwrap());
        pos += ring.capacity();
    }
    stream
}

#[test]
fn capacity_exactness() {
    // Sum of ring capacities equals header + payload + ec length for
    // every produced instance.
    for (len, factor) in [(1usize, 0.0), (16, 0.5), (64, 1.0), (127, 2.0)] {
        let payload: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let code = Nimiqode::encode(&payload, factor, VERSION).unwrap();
        let rings = code.rings();
        let total: usize = rings.iter().map(Ring::capacity).sum();
        let stream = reassemble(rings);
        let header = read_header(&stream, rings).unwrap();
        assert_eq!(
            total,
            header_length(mask_count(rings.len())) + header.payload_length + header.ec_length
        );
        assert_eq!(header.payload_length, len * 8);
    }
}

#[test]
fn excess_capacity_becomes_parity() {
    // The realized ec length is never smaller than the preliminary
    // factor-derived request.
    let payload = vec![0xABu8; 16];
    let code = Nimiqode::encode(&payload, 0.5, VERSION).unwrap();
    let stream = reassemble(code.rings());
    let header = read_header(&stream, code.rings()).unwrap();
    assert!(header.ec_length >= 64);
}

#[test]
fn ring_partition_reconstructs_stream() {
    // Concatenating ring data in ring order is the bit-stream; slicing
    // it back by capacity yields each ring's data bit for bit.
    let code = Nimiqode::encode(b"partition invariant", 0.4, VERSION).unwrap();
    let stream = reassemble(code.rings());
    let mut pos = 0;
    for ring in code.rings() {
        let slice = stream.copy_range(pos, pos + ring.capacity());
        assert_eq!(&slice, ring.data().unwrap());
        pos += ring.capacity();
    }
    assert_eq!(pos, stream.len());
}

#[test]
fn mask_ids_recorded_per_masked_ring() {
    let code = Nimiqode::encode(&[0u8; 100], 1.0, VERSION).unwrap();
    let stream = reassemble(code.rings());
    let header = read_header(&stream, code.rings()).unwrap();
    assert_eq!(header.masks.len(), mask_count(code.rings().len()));
    for &id in &header.masks {
        assert!((id as usize) < nimiqode::mask::NUM_MASKS);
    }
}
