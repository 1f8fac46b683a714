use simple_qoi::{
    decode, decode_with_limits, disassemble, encode, Channels, Error, Image, Limits, Op, Pixel,
};

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn ops_of(stream: &[u8]) -> Vec<Op> {
    let (_, ops) = disassemble(stream).unwrap();
    ops.map(|op| op.unwrap().1).collect()
}

fn packed(pixels: &[Pixel]) -> Vec<u32> {
    pixels.iter().copied().map(u32::from).collect()
}

fn round_trip(pixels: &[u32], width: u32, height: u32) {
    let stream = encode(pixels, width, height, Channels::Rgba, 0).unwrap();
    let image = decode(&stream).unwrap();
    assert_eq!(image.width(), width);
    assert_eq!(image.height(), height);
    assert_eq!(image.packed(), pixels);
}

#[test]
fn single_pixel_round_trips() {
    let pixels = packed(&[Pixel::new(10, 20, 30, 255)]);
    let stream = encode(&pixels, 1, 1, Channels::Rgba, 0).unwrap();
    insta::assert_snapshot!(hex(&stream), @"71 6f 69 66 00 00 00 01 00 00 00 01 04 00 fe 0a 14 1e 00 00 00 00");

    let image = decode(&stream).unwrap();
    assert_eq!(image.as_rgba(), [10, 20, 30, 255]);
}

#[test]
fn repeats_of_the_start_pixel_are_one_run() {
    let stream = encode(&packed(&[Pixel::START]), 1, 1, Channels::Rgba, 0).unwrap();
    assert_eq!(ops_of(&stream), [Op::Run8(1)]);
    assert_eq!(stream[14], 0x40);

    let stream = encode(&packed(&[Pixel::START; 2]), 2, 1, Channels::Rgba, 0).unwrap();
    insta::assert_snapshot!(hex(&stream), @"71 6f 69 66 00 00 00 02 00 00 00 01 04 00 41 00 00 00 00");
    assert_eq!(ops_of(&stream), [Op::Run8(2)]);
}

#[test]
fn run_of_32_fits_run8_and_33_needs_run16() {
    let stream = encode(&packed(&[Pixel::START; 32]), 32, 1, Channels::Rgba, 0).unwrap();
    assert_eq!(ops_of(&stream), [Op::Run8(32)]);
    assert_eq!(stream[14], 0x40 | 31);

    let stream = encode(&packed(&[Pixel::START; 33]), 33, 1, Channels::Rgba, 0).unwrap();
    assert_eq!(ops_of(&stream), [Op::Run16(33)]);
    assert_eq!(&stream[14..16], [0x60, 0x00]);
}

#[test]
fn forty_pixel_row_uses_run16() {
    let pixels = packed(&[Pixel::new(5, 5, 5, 255); 40]);
    let stream = encode(&pixels, 40, 1, Channels::Rgba, 0).unwrap();
    insta::assert_snapshot!(hex(&stream), @"71 6f 69 66 00 00 00 28 00 00 00 01 04 00 d5 dd 60 06 00 00 00 00");
    assert_eq!(
        ops_of(&stream),
        [Op::Diff16 { dr: 5, dg: 5, db: 5 }, Op::Run16(39)]
    );

    let image = decode(&stream).unwrap();
    assert_eq!(image.pixels().len(), 40);
    assert!(image.pixels().all(|p| p == Pixel::new(5, 5, 5, 255)));
}

#[test]
fn long_run_is_split_at_8224() {
    let len = 1 + 8224 + 10;
    let pixels = vec![u32::from(Pixel::new(9, 9, 9, 255)); len];
    let stream = encode(&pixels, len as u32, 1, Channels::Rgba, 0).unwrap();
    let ops = ops_of(&stream);
    assert_eq!(ops[1..], [Op::Run16(8224), Op::Run8(10)]);
    assert_eq!(ops.iter().map(Op::pixel_count).sum::<usize>(), len);
    round_trip(&pixels, len as u32, 1);
}

#[test]
fn unchanged_channels_are_not_literals() {
    let pixels = packed(&[Pixel::new(0, 0, 0, 0), Pixel::new(255, 255, 0, 0)]);
    let stream = encode(&pixels, 2, 1, Channels::Rgba, 0).unwrap();
    insta::assert_snapshot!(hex(&stream), @"71 6f 69 66 00 00 00 02 00 00 00 01 04 00 00 fc ff ff 00 00 00 00");
    assert_eq!(
        ops_of(&stream),
        [
            Op::Index(0),
            Op::Color {
                red: Some(255),
                green: Some(255),
                blue: None,
                alpha: None
            }
        ]
    );
    round_trip(&pixels, 2, 1);
}

#[test]
fn every_opcode_kind_in_one_image() {
    let pixels = packed(&[
        Pixel::new(10, 20, 30, 255),
        Pixel::new(11, 21, 31, 255),
        Pixel::new(11, 21, 31, 255),
        Pixel::new(14, 15, 35, 255),
        Pixel::new(30, 0, 30, 250),
        Pixel::new(10, 20, 30, 255),
        Pixel::new(10, 20, 30, 255),
        Pixel::new(200, 20, 30, 128),
    ]);
    let stream = encode(&pixels, 4, 2, Channels::Rgba, 0).unwrap();
    insta::assert_snapshot!(hex(&stream), @"71 6f 69 66 00 00 00 04 00 00 00 02 04 00 fe 0a 14 1e bf 40 d3 2c ff 1e 00 1e fa 3f 40 f9 c8 80 00 00 00 00");
    round_trip(&pixels, 4, 2);
}

#[test]
fn synthetic_images_round_trip() {
    let (width, height) = (67, 45);
    let coords = || (0..height).flat_map(|y| (0..width).map(move |x| (x, y)));

    let gradient: Vec<u32> = coords()
        .map(|(x, y)| u32::from(Pixel::new(x as u8 * 3, y as u8 * 5, (x + y) as u8, 255)))
        .collect();
    round_trip(&gradient, width, height);

    let translucent: Vec<u32> = coords()
        .map(|(x, y)| u32::from(Pixel::new(x as u8, 7, y as u8, (x * y) as u8)))
        .collect();
    round_trip(&translucent, width, height);

    let mut seed = 0x9e37_79b9_u32;
    let noise: Vec<u32> = coords()
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            // Keep some repeats and collisions in the mix.
            if seed % 5 == 0 {
                0x0000_00ff
            } else {
                seed & 0xf0f0_f0ff
            }
        })
        .collect();
    round_trip(&noise, width, height);

    round_trip(&[], 0, 0);
}

#[test]
fn color_space_and_channels_pass_through() {
    let pixels = packed(&[Pixel::new(1, 2, 3, 255); 6]);
    let stream = encode(&pixels, 3, 2, Channels::Rgb, 1).unwrap();
    let image = Image::decode(&stream).unwrap();
    assert_eq!(image.header().channels, Channels::Rgb);
    assert_eq!(image.header().color_space, 1);
    assert_eq!(image.as_rgba().len(), 6 * 4);
    assert_eq!(image.encode().unwrap(), stream);
}

#[test]
fn encoding_is_independent_across_threads() {
    let images: Vec<Vec<u32>> = (0..4u8)
        .map(|i| packed(&[Pixel::new(i, i * 2, 255 - i, 255); 100]))
        .collect();
    let expected: Vec<Vec<u8>> = images
        .iter()
        .map(|pixels| encode(pixels, 10, 10, Channels::Rgba, 0).unwrap())
        .collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = images
            .iter()
            .map(|pixels| scope.spawn(move || encode(pixels, 10, 10, Channels::Rgba, 0).unwrap()))
            .collect();
        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn malformed_streams_are_rejected() {
    let stream = encode(&packed(&[Pixel::new(10, 20, 30, 255)]), 1, 1, Channels::Rgba, 0).unwrap();

    let mut bad_magic = stream.clone();
    bad_magic[0] = b'Q';
    assert!(matches!(decode(&bad_magic), Err(Error::MalformedHeader(_))));

    // Drop the last literal: the COLOR opcode now runs into the trailer.
    let mut truncated = stream[..stream.len() - 5].to_vec();
    truncated.extend([0; 4]);
    assert_eq!(decode(&truncated), Err(Error::TruncatedStream { offset: 14 }));

    assert!(matches!(decode(&stream[..10]), Err(Error::MalformedHeader(_))));
}

#[test]
fn limits_reject_before_decoding() {
    let pixels = packed(&[Pixel::START; 64]);
    let stream = encode(&pixels, 8, 8, Channels::Rgba, 0).unwrap();
    let limits = Limits::default().with_max_width(4);
    assert_eq!(
        decode_with_limits(&stream, &limits),
        Err(Error::LimitExceeded {
            what: "width",
            actual: 8,
            max: 4
        })
    );
    assert!(decode_with_limits(&stream, &Limits::default().with_max_pixels(64)).is_ok());
}
