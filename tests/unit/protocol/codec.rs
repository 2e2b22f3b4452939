use super::*;
use prost::Message;

fn encode(p: wire::Packet) -> Vec<u8> {
    p.encode_to_vec()
}

fn typed(t: wire::DataType) -> wire::Packet {
    wire::Packet {
        r#type: Some(t as i32),
        ..Default::default()
    }
}

fn draw_packet(total_rects: u32, rects: usize, matrix_len: usize) -> wire::DrawPacket {
    wire::DrawPacket {
        offset_x: 1.5,
        offset_y: -2.0,
        mv_matrix: vec![0.0; matrix_len],
        total_rects,
        layer_rect: (0..rects)
            .map(|i| wire::DrawRect {
                x: i as f32,
                y: 0.0,
                w: 10.0,
                h: 10.0,
            })
            .collect(),
        layerref: 0xffff_0000_0000_0001,
        tex_ids: vec![3, 4],
    }
}

#[test]
fn frame_start_keeps_full_64bit_timestamp() {
    let mut p = typed(wire::DataType::FrameStart);
    p.frame = Some(wire::FramePacket {
        value: Some(0x0000_0001_0000_0002),
        scale: None,
    });
    assert_eq!(
        decode(&encode(p)).unwrap(),
        Packet::FrameStart {
            timestamp: 0x0000_0001_0000_0002
        }
    );

    let bare = typed(wire::DataType::FrameStart);
    assert_eq!(
        decode(&encode(bare)).unwrap(),
        Packet::FrameStart { timestamp: 0 }
    );
}

#[test]
fn color_packet_decodes() {
    let mut p = typed(wire::DataType::Color);
    p.color = Some(wire::ColorPacket {
        layerref: 0xdead_beef_cafe_f00d,
        width: Some(4),
        height: Some(5),
        color: Some(0xff00_ff00),
    });
    let Packet::Color(c) = decode(&encode(p)).unwrap() else {
        panic!("expected color");
    };
    assert_eq!(c.layer_ref, 0xdead_beef_cafe_f00d);
    assert_eq!((c.width, c.height, c.color), (4, 5, 0xff00_ff00));
}

#[test]
fn texture_without_bytes_means_reuse() {
    let mut p = typed(wire::DataType::Texture);
    p.texture = Some(wire::TexturePacket {
        layerref: 7,
        width: Some(2),
        height: Some(2),
        stride: Some(8),
        name: Some(11),
        target: Some(0x0DE1),
        dataformat: Some(0x1908),
        glcontext: Some(99),
        data: Some(Vec::new()),
    });
    let Packet::Texture(t) = decode(&encode(p.clone())).unwrap() else {
        panic!("expected texture");
    };
    assert_eq!(t.name, 11);
    assert_eq!(t.target, TextureTarget::Texture2D);
    assert_eq!(t.context_ref, 99);
    assert_eq!(t.pixels, None);

    p.texture.as_mut().unwrap().data = Some(vec![1, 2, 3]);
    let Packet::Texture(t) = decode(&encode(p)).unwrap() else {
        panic!("expected texture");
    };
    assert_eq!(t.pixels.as_deref(), Some(&[1u8, 2, 3][..]));
}

#[test]
fn layers_packet_maps_records_and_display_list() {
    let log = "0x1234\nnsDisplayBackgroundColor p=0x1 f=0x2(Body) layerBounds(0,0,60,60)\n";
    let mut p = typed(wire::DataType::Layers);
    p.layers = Some(wire::LayersPacket {
        layer: vec![
            wire::Layer {
                r#type: wire::LayerType::ContainerLayer as i32,
                ptr: 1,
                parent_ptr: 0,
                opacity: Some(0.5),
                direct: Some(wire::ScrollingDirect::Horizontal as i32),
                ..Default::default()
            },
            wire::Layer {
                r#type: wire::LayerType::PaintedLayer as i32,
                ptr: 2,
                parent_ptr: 1,
                clip: Some(wire::LayerRect {
                    x: Some(1),
                    y: Some(2),
                    w: Some(3),
                    h: Some(4),
                }),
                filter: Some(wire::Filter::Nearest as i32),
                display_list_log: Some(log.as_bytes().to_vec()),
                ..Default::default()
            },
        ],
    });
    let bytes = encode(p);

    let Packet::Layers { records } = decode(&bytes).unwrap() else {
        panic!("expected layers");
    };
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].layer_type, LayerKind::Container);
    assert_eq!(records[0].opacity, Some(0.5));
    assert_eq!(records[0].scroll_dir, Some(ScrollDirection::Horizontal));
    assert_eq!(records[1].clip, Some(IntRect::new(1, 2, 3, 4)));
    assert_eq!(records[1].filter, Some(ScaleFilter::Nearest));
    let list = records[1].display_list.as_ref().unwrap();
    assert_eq!(list.content_layer, "0x1234");
    assert_eq!(list.items.len(), 2);

    let Packet::Layers { records } = decode_with(
        &bytes,
        DecodeOpts {
            parse_display_lists: false,
        },
    )
    .unwrap() else {
        panic!("expected layers");
    };
    assert!(records[1].display_list.is_none());
}

#[test]
fn unknown_layer_type_degrades_to_unknown_kind() {
    let mut p = typed(wire::DataType::Layers);
    p.layers = Some(wire::LayersPacket {
        layer: vec![wire::Layer {
            r#type: 77,
            ptr: 5,
            parent_ptr: 0,
            ..Default::default()
        }],
    });
    let Packet::Layers { records } = decode(&encode(p)).unwrap() else {
        panic!("expected layers");
    };
    assert_eq!(records[0].layer_type, LayerKind::Unknown);
}

#[test]
fn draw_packet_is_validated() {
    let mut p = typed(wire::DataType::Draw);
    p.draw = Some(draw_packet(2, 3, 16));
    let Packet::Draw(d) = decode(&encode(p.clone())).unwrap() else {
        panic!("expected draw");
    };
    assert_eq!(d.layer_ref, 0xffff_0000_0000_0001);
    assert_eq!(d.total_rects, 2);
    assert_eq!(d.layer_rects.len(), 2);
    assert_eq!(d.tex_ids, vec![3, 4]);

    for bad in [
        draw_packet(0, 1, 16),
        draw_packet(5, 5, 16),
        draw_packet(2, 1, 16),
        draw_packet(1, 1, 9),
    ] {
        p.draw = Some(bad);
        assert!(matches!(
            decode(&encode(p.clone())),
            Err(LayerScopeError::Decode(_))
        ));
    }
}

#[test]
fn meta_and_frame_end() {
    let mut p = typed(wire::DataType::Meta);
    p.meta = Some(wire::MetaPacket {
        composed_by_hwc: Some(true),
    });
    assert_eq!(
        decode(&encode(p)).unwrap(),
        Packet::Meta {
            composed_by_hwc: true
        }
    );
    assert_eq!(
        decode(&encode(typed(wire::DataType::FrameEnd))).unwrap(),
        Packet::FrameEnd
    );
}

#[test]
fn unknown_type_is_surfaced_not_failed() {
    let p = wire::Packet {
        r#type: Some(42),
        ..Default::default()
    };
    assert_eq!(decode(&encode(p)).unwrap(), Packet::Unknown(42));
}

#[test]
fn malformed_input_is_a_decode_error() {
    assert!(matches!(decode(&[0x08]), Err(LayerScopeError::Decode(_))));
    assert!(matches!(
        decode(&[0xff, 0xff, 0xff]),
        Err(LayerScopeError::Decode(_))
    ));
    assert!(matches!(decode(&[]), Err(LayerScopeError::Decode(_))));
    assert!(matches!(
        decode(&encode(typed(wire::DataType::Color))),
        Err(LayerScopeError::Decode(_))
    ));
}

#[test]
fn non_finite_floats_are_clamped() {
    let mut p = typed(wire::DataType::Layers);
    p.layers = Some(wire::LayersPacket {
        layer: vec![wire::Layer {
            r#type: wire::LayerType::ContainerLayer as i32,
            ptr: 1,
            parent_ptr: 0,
            opacity: Some(f32::NAN),
            transform: Some(wire::LayerMatrix {
                is_2d: Some(true),
                is_id: Some(false),
                m: vec![f32::INFINITY, 0.0, 0.0, f32::NEG_INFINITY, 3.0, 4.0],
            }),
            ..Default::default()
        }],
    });
    let Packet::Layers { records } = decode(&encode(p)).unwrap() else {
        panic!("expected layers");
    };
    assert_eq!(records[0].opacity, Some(0.0));
    let m = &records[0].transform.as_ref().unwrap().m;
    assert_eq!(m, &vec![f32::MAX, 0.0, 0.0, f32::MIN, 3.0, 4.0]);

    let mut draw = draw_packet(1, 1, 16);
    draw.offset_x = f32::INFINITY;
    draw.mv_matrix[5] = f32::NAN;
    draw.layer_rect[0].w = f32::NEG_INFINITY;
    let mut p = typed(wire::DataType::Draw);
    p.draw = Some(draw);
    let Packet::Draw(d) = decode(&encode(p)).unwrap() else {
        panic!("expected draw");
    };
    assert_eq!(d.offset_x, f32::MAX);
    assert_eq!(d.mv_matrix[5], 0.0);
    assert_eq!(d.layer_rects[0].w, f32::MIN);
}
