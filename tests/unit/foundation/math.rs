use super::*;

#[test]
fn content_hash_is_stable_across_chunking() {
    let mut a = ContentHasher::new();
    a.write_bytes(b"layerscope");
    let mut b = ContentHasher::new();
    b.write_bytes(b"layer");
    b.write_bytes(b"scope");
    assert_eq!(a.finish128(), b.finish128());
    assert_eq!(a.finish128(), content_hash128(b"layerscope"));
}

#[test]
fn content_hash_separates_single_byte_changes() {
    let a = content_hash128(&[125u8, 125, 125, 125]);
    let b = content_hash128(&[1u8, 125, 125, 125]);
    assert_ne!(a, b);
}
