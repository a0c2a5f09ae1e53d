//! Encoder round-trips: WebP and GIF output decoded back by independent
//! decoders must reproduce the source frames.

mod common;

use std::io::Cursor;

use common::*;
use pixelbean::{decode, encode_gif, encode_webp};

/// A two-frame 16x16 test animation with an asymmetric pattern.
fn test_bean() -> pixelbean::PixelBean {
    let mut bitstream = vec![0u8; 32];
    bitstream[0] = 0b0000_1101; // pixels 0, 2, 3 green
    let mut stream = frame_block(0, 40, &[255, 0, 0, 0, 255, 0], &bitstream);
    // Frame 2: delta adds blue, diagonal-ish stripes at 2 bpp.
    let mut second = vec![0u8; 64];
    for (i, b) in second.iter_mut().enumerate() {
        *b = if i % 3 == 0 { 0b10_01_00_10 } else { 0b00_10_01_00 };
    }
    stream.extend(frame_block(0x01, 40, &[0, 0, 255], &second));
    decode(&container(17, &stream)).unwrap()
}

#[test]
fn webp_output_is_lossless() {
    let bean = test_bean();
    let webp = encode_webp(&bean).unwrap();

    let mut decoder = image_webp::WebPDecoder::new(Cursor::new(&webp)).unwrap();
    assert!(decoder.is_animated());
    assert_eq!(decoder.dimensions(), (bean.width(), bean.height()));
    assert_eq!(decoder.num_frames() as usize, bean.total_frames());

    let channels = if decoder.has_alpha() { 4 } else { 3 };
    let buf_len = decoder.output_buffer_size().unwrap();
    for i in 0..bean.total_frames() {
        let mut buf = vec![0u8; buf_len];
        let duration = decoder.read_frame(&mut buf).unwrap();
        assert_eq!(duration, bean.speed_ms() as u32, "frame {i} duration");
        let rgb: Vec<u8> = if channels == 4 {
            buf.chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect()
        } else {
            buf
        };
        assert_eq!(rgb.as_slice(), bean.frame(i).unwrap(), "frame {i} pixels");
    }
}

#[test]
fn webp_structure_and_loop_count() {
    let webp = encode_webp(&test_bean()).unwrap();
    assert_eq!(&webp[..4], b"RIFF");
    assert_eq!(&webp[8..12], b"WEBP");
    assert_eq!(&webp[12..16], b"VP8X");
    let anim = webp.windows(4).position(|w| w == b"ANIM").unwrap();
    // Loop count is the u16 after the 4-byte background color.
    let loop_count = u16::from_le_bytes([webp[anim + 12], webp[anim + 13]]);
    assert_eq!(loop_count, 0);
}

#[test]
fn webp_roundtrip_with_wide_histograms() {
    // Five palette entries with several distinct values per channel, so
    // every channel's prefix code takes the full RLE-coded form.
    let palette = [
        0, 0, 0, 255, 128, 64, 10, 200, 30, 77, 99, 111, 1, 2, 3,
    ];
    let indices: Vec<u8> = (0..256u32).map(|i| (i % 5) as u8).collect();
    let stream = frame_block(0, 40, &palette, &pack_indices(&indices, 3));
    let bean = decode(&container(17, &stream)).unwrap();
    let webp = encode_webp(&bean).unwrap();

    let mut decoder = image_webp::WebPDecoder::new(Cursor::new(&webp)).unwrap();
    let channels = if decoder.has_alpha() { 4 } else { 3 };
    let mut buf = vec![0u8; decoder.output_buffer_size().unwrap()];
    decoder.read_frame(&mut buf).unwrap();
    let rgb: Vec<u8> = if channels == 4 {
        buf.chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    } else {
        buf
    };
    assert_eq!(rgb.as_slice(), bean.frame(0).unwrap());
}

#[test]
fn webp_encoding_is_deterministic() {
    let bean = test_bean();
    assert_eq!(encode_webp(&bean).unwrap(), encode_webp(&bean).unwrap());
}

#[test]
fn gif_output_is_lossless_for_small_palettes() {
    let bean = test_bean();
    let gif_bytes = encode_gif(&bean).unwrap();

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(Cursor::new(&gif_bytes[..])).unwrap();
    assert_eq!(decoder.width() as u32, bean.width());
    assert_eq!(decoder.height() as u32, bean.height());

    let mut i = 0;
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        assert_eq!(frame.delay, 4, "40 ms is 4 centiseconds");
        let rgb: Vec<u8> = frame
            .buffer
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        assert_eq!(rgb.as_slice(), bean.frame(i).unwrap(), "frame {i} pixels");
        i += 1;
    }
    assert_eq!(i, bean.total_frames());
}

#[test]
fn gif_delay_floor_is_two_centiseconds() {
    let stream = frame_block(0, 10, &[1, 2, 3], &vec![0u8; 32]);
    let bean = decode(&container(17, &stream)).unwrap();
    let gif_bytes = encode_gif(&bean).unwrap();

    let mut decoder = gif::DecodeOptions::new()
        .read_info(Cursor::new(&gif_bytes[..]))
        .unwrap();
    let frame = decoder.read_next_frame().unwrap().unwrap();
    assert_eq!(frame.delay, 2);
}

#[test]
fn gif_handles_a_full_256_color_palette() {
    // Every pixel of frame 2 has its own color: the largest palette a
    // container frame can carry, right at the GIF limit.
    let palette: Vec<u8> = (0..=255u16)
        .flat_map(|i| [i as u8, (i / 2) as u8, (255 - i) as u8])
        .collect();
    // 255 entries fit one delta; start with one and append the rest.
    let mut stream = frame_block(0, 40, &palette[..3], &[]);
    let mut indices = Vec::with_capacity(256);
    for i in 0..=255u8 {
        indices.push(i);
    }
    stream.extend(frame_block(0x01, 40, &palette[3..], &indices));
    let bean = decode(&container(17, &stream)).unwrap();

    let gif_bytes = encode_gif(&bean).unwrap();
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(Cursor::new(&gif_bytes[..])).unwrap();
    let frame = decoder.read_next_frame().unwrap().unwrap();
    assert_eq!(frame.buffer.len(), 16 * 16 * 4);
}
