use super::*;
use crate::assets::pixels::{GL_BGRA, GL_RGBA, LZ4_FORMAT_BIT};

#[test]
fn same_payload_same_key_and_single_decode() {
    let mut cache = TextureCache::new();
    let src = vec![125u8; 4];

    let k1 = cache.intern(&src, 1, 1, GL_RGBA, 4).unwrap().unwrap();
    let k2 = cache.intern(&src, 1, 1, GL_RGBA, 4).unwrap().unwrap();
    assert_eq!(k1, k2);
    assert_eq!(cache.decode_count(), 1);
    assert_eq!(cache.len(), 1);

    let k3 = cache.intern(&[1u8; 4], 1, 1, GL_RGBA, 4).unwrap().unwrap();
    assert_ne!(k1, k3);
    assert_eq!(cache.decode_count(), 2);

    assert!(cache.lookup(&k1).is_some());
    assert!(cache.lookup(&ContentKey::from_u128(0)).is_none());
}

#[test]
fn bgra_source_is_stored_as_rgba() {
    let mut cache = TextureCache::new();
    let src = [10u8, 20, 30, 40].repeat(4);
    let key = cache.intern(&src, 2, 2, GL_BGRA, 8).unwrap().unwrap();

    let img = cache.lookup(&key).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
    for px in img.rgba8.chunks_exact(4) {
        assert_eq!(px, &[30, 20, 10, 40]);
    }
}

#[test]
fn padded_stride_is_unpacked() {
    let (w, h, stride) = (3u32, 2u32, 16u32);
    let mut src = vec![0xAAu8; (stride * h) as usize];
    for j in 0..h as usize {
        for b in 0..(w as usize * 4) {
            src[j * stride as usize + b] = (j * 100 + b) as u8;
        }
    }

    let mut cache = TextureCache::new();
    let key = cache.intern(&src, w, h, GL_RGBA, stride).unwrap().unwrap();
    let img = cache.lookup(&key).unwrap();
    assert_eq!(img.rgba8.len(), (w * h * 4) as usize);
    for j in 0..h as usize {
        let row = &img.rgba8[j * 12..(j + 1) * 12];
        assert_eq!(row, &src[j * 16..j * 16 + 12]);
    }
}

#[test]
fn lz4_payload_is_decompressed_before_packing() {
    let raw = [1u8, 2, 3, 4].repeat(16);
    let packed = lz4_flex::block::compress(&raw);

    let mut cache = TextureCache::new();
    let key = cache
        .intern(&packed, 4, 4, GL_RGBA | LZ4_FORMAT_BIT, 16)
        .unwrap()
        .unwrap();
    assert_eq!(key, ContentKey::for_payload(&packed));
    assert_eq!(cache.lookup(&key).unwrap().rgba8.as_slice(), raw.as_slice());
}

#[test]
fn corrupt_lz4_still_yields_an_image() {
    let mut cache = TextureCache::new();
    let key = cache
        .intern(&[0xFF, 0xFF, 0xFF], 2, 2, GL_RGBA | LZ4_FORMAT_BIT, 8)
        .unwrap()
        .unwrap();
    let img = cache.lookup(&key).unwrap();
    assert_eq!(img.rgba8.len(), 16);
}

#[test]
fn zero_area_and_empty_payload() {
    let mut cache = TextureCache::new();
    assert_eq!(cache.intern(&[1, 2, 3, 4], 0, 1, GL_RGBA, 0).unwrap(), None);
    assert_eq!(cache.intern(&[1, 2, 3, 4], 1, 0, GL_RGBA, 4).unwrap(), None);
    assert!(cache.is_empty());

    let err = cache.intern(&[], 1, 1, GL_RGBA, 4).unwrap_err();
    assert!(matches!(err, LayerScopeError::Texture(_)));
}

#[test]
fn oversized_dimensions_are_rejected() {
    let mut cache = TextureCache::new();
    assert_eq!(
        cache.intern(&[1, 2, 3, 4], u32::MAX, u32::MAX, GL_RGBA, 4).unwrap(),
        None
    );
    assert_eq!(cache.decode_count(), 0);
}

#[test]
fn take_new_images_drains_in_intern_order() {
    let mut cache = TextureCache::new();
    let a = cache.intern(&[1u8; 4], 1, 1, GL_RGBA, 4).unwrap().unwrap();
    let b = cache.intern(&[2u8; 4], 1, 1, GL_RGBA, 4).unwrap().unwrap();
    cache.intern(&[1u8; 4], 1, 1, GL_RGBA, 4).unwrap();

    let fresh: Vec<ContentKey> = cache.take_new_images().into_iter().map(|(k, _)| k).collect();
    assert_eq!(fresh, vec![a, b]);
    assert!(cache.take_new_images().is_empty());
    assert_eq!(cache.len(), 2);
}

#[test]
fn content_key_text_form_roundtrips() {
    let key = ContentKey::from_u128(0x0123_4567_89ab_cdef_0011_2233_4455_6677);
    let s = key.to_string();
    assert_eq!(s, "0123456789abcdef0011223344556677");
    assert_eq!(s.parse::<ContentKey>().unwrap(), key);
    assert_eq!(
        serde_json::to_string(&key).unwrap(),
        "\"0123456789abcdef0011223344556677\""
    );
    assert!("xyz".parse::<ContentKey>().is_err());
}
