use std::borrow::Cow;
use std::io::Cursor;
use std::sync::Arc;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use gif_merge::{
    CompatibilityMode, ConfigError, DisposalMethod, FrameBuffer, FrameSource, GifMerger,
    GifSummary, LoopBehaviour, MergeConfig, MergeError, NoTransparency,
};

const BLACK_WHITE: [u8; 6] = [0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF];
const RED_BLUE: [u8; 6] = [0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF];

/// Encodes a 2x2 single-frame GIF using `palette` as its global colour table.
fn encode_frame(palette: &[u8], pixels: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder =
            gif::Encoder::new(&mut bytes, 2, 2, palette).expect("fixture encoder should start");
        let frame = gif::Frame {
            width: 2,
            height: 2,
            buffer: Cow::Borrowed(&pixels),
            ..gif::Frame::default()
        };
        encoder
            .write_frame(&frame)
            .expect("fixture frame should encode");
    }
    bytes
}

/// Moves the global colour table of an encoded frame into a descriptor-level local table.
fn encode_frame_with_local_palette(palette: &[u8], pixels: [u8; 4]) -> Vec<u8> {
    let source = FrameBuffer::try_from(encode_frame(palette, pixels))
        .expect("fixture frame should validate");
    let table = source
        .global_color_table()
        .expect("fixture frame should carry a global table");

    let mut screen = source.logical_screen_descriptor().to_vec();
    screen[4] &= !0x80;
    let mut descriptor = source.image_descriptor().to_vec();
    descriptor[9] |= 0x80 | source.size_exponent();

    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(&screen);
    bytes.extend_from_slice(&descriptor);
    bytes.extend_from_slice(table.as_bytes());
    bytes.extend_from_slice(source.image_data());
    bytes.push(0x3B);
    bytes
}

/// Rewrites the signature so the fixture reads as a GIF87a file.
fn as_gif87a(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes[3..6].copy_from_slice(b"87a");
    bytes
}

fn decoded_pixels(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(Cursor::new(bytes))
        .expect("merged animation should decode");
    let mut frames = Vec::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .expect("merged frame should decode")
    {
        frames.push(frame.buffer.to_vec());
    }
    frames
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn merged_animation_decodes_with_requested_timing() -> anyhow::Result<()> {
    let first = as_gif87a(encode_frame(&BLACK_WHITE, [0, 1, 1, 0]));
    let second = as_gif87a(encode_frame(&BLACK_WHITE, [1, 0, 0, 1]));
    let config = MergeConfig::builder()
        .delays(vec![10, 20])
        .loop_count(0)
        .disposal(DisposalMethod::Background)
        .build();

    let animation = GifMerger::new(config).merge_bytes(vec![first, second])?;

    assert_eq!(2, animation.frame_count());
    assert!(animation.as_bytes().starts_with(b"GIF89a"));
    assert_eq!(Some(&0x3B), animation.as_bytes().last());

    let summary = GifSummary::from_bytes(animation.as_bytes())?;
    assert_eq!((2, 2), summary.size());
    assert_eq!(Some(2), summary.global_palette_entries());
    assert_eq!(LoopBehaviour::Infinite, summary.loop_behaviour());
    let delays: Vec<u16> = summary
        .frames()
        .iter()
        .map(|frame| frame.delay_hundredths())
        .collect();
    assert_eq!(vec![10_u16, 20], delays);
    for frame in summary.frames() {
        assert_eq!(DisposalMethod::Background, frame.disposal());
        assert_eq!(Some(1), frame.transparent_index());
        assert_eq!(None, frame.local_palette_entries());
    }

    assert_eq!(
        vec![vec![0_u8, 1, 1, 0], vec![1, 0, 0, 1]],
        decoded_pixels(animation.as_bytes())
    );
    Ok(())
}

#[test]
fn differing_palette_becomes_local_table() -> anyhow::Result<()> {
    let first = encode_frame(&BLACK_WHITE, [0, 0, 1, 1]);
    let second = encode_frame(&RED_BLUE, [1, 1, 0, 0]);
    let third = encode_frame(&BLACK_WHITE, [1, 0, 1, 0]);
    let config = MergeConfig::builder().delays(vec![5, 5, 5]).build();

    let animation = GifMerger::new(config).merge_bytes(vec![first, second, third])?;

    let summary = GifSummary::from_bytes(animation.as_bytes())?;
    let local_tables: Vec<Option<usize>> = summary
        .frames()
        .iter()
        .map(|frame| frame.local_palette_entries())
        .collect();
    assert_eq!(vec![None, Some(2), None], local_tables);
    // red/blue has no white entry, so nothing is transparent there
    assert_eq!(None, summary.frames()[1].transparent_index());
    assert!(contains(animation.as_bytes(), &RED_BLUE));
    assert_eq!(
        vec![vec![0_u8, 0, 1, 1], vec![1, 1, 0, 0], vec![1, 0, 1, 0]],
        decoded_pixels(animation.as_bytes())
    );
    Ok(())
}

#[test]
fn disabled_transparency_marks_no_index() -> anyhow::Result<()> {
    let config = MergeConfig::builder()
        .delays(vec![7])
        .transparency(Arc::new(NoTransparency))
        .build();

    let animation =
        GifMerger::new(config).merge_bytes(vec![encode_frame(&BLACK_WHITE, [0, 1, 0, 1])])?;

    let summary = GifSummary::from_bytes(animation.as_bytes())?;
    assert_eq!(None, summary.frames()[0].transparent_index());
    assert_eq!(7, summary.frames()[0].delay_hundredths());
    Ok(())
}

#[test]
fn finite_loop_count_is_announced() -> anyhow::Result<()> {
    let config = MergeConfig::builder()
        .delays(vec![10, 10])
        .loop_count(3)
        .build();
    let frames = vec![
        encode_frame(&BLACK_WHITE, [0, 0, 0, 0]),
        encode_frame(&BLACK_WHITE, [1, 1, 1, 1]),
    ];

    let animation = GifMerger::new(config).merge_bytes(frames)?;

    let summary = GifSummary::from_bytes(animation.as_bytes())?;
    assert_eq!(LoopBehaviour::Finite { count: 3 }, summary.loop_behaviour());
    Ok(())
}

#[test]
fn first_frame_without_global_table_gets_bare_legacy_header() -> anyhow::Result<()> {
    let frame = encode_frame_with_local_palette(&BLACK_WHITE, [0, 1, 1, 0]);
    let config = MergeConfig::builder().delays(vec![10]).build();

    let animation = GifMerger::new(config).merge_bytes(vec![frame])?;

    let bytes = animation.as_bytes();
    assert_eq!(b"GIF89a", &bytes[..6]);
    assert_eq!(&[0x21_u8, 0xF9, 0x04], &bytes[6..9]);
    assert!(!contains(bytes, b"NETSCAPE2.0"));
    Ok(())
}

#[test]
fn strict_mode_keeps_header_without_global_table() -> anyhow::Result<()> {
    let frames = vec![
        encode_frame_with_local_palette(&BLACK_WHITE, [0, 1, 1, 0]),
        encode_frame_with_local_palette(&RED_BLUE, [1, 0, 0, 1]),
    ];
    let config = MergeConfig::builder()
        .delays(vec![10, 10])
        .compatibility(CompatibilityMode::Strict)
        .build();

    let animation = GifMerger::new(config).merge_bytes(frames)?;

    assert!(contains(animation.as_bytes(), b"NETSCAPE2.0"));
    let summary = GifSummary::from_bytes(animation.as_bytes())?;
    assert_eq!(None, summary.global_palette_entries());
    assert_eq!(LoopBehaviour::Infinite, summary.loop_behaviour());
    let local_tables: Vec<Option<usize>> = summary
        .frames()
        .iter()
        .map(|frame| frame.local_palette_entries())
        .collect();
    assert_eq!(vec![Some(2), Some(2)], local_tables);
    assert_eq!(Some(1), summary.frames()[0].transparent_index());
    assert_eq!(None, summary.frames()[1].transparent_index());
    Ok(())
}

#[test]
fn delay_count_mismatch_is_a_configuration_error() {
    let config = MergeConfig::builder().delays(vec![10, 10]).build();
    let frames = vec![
        encode_frame(&BLACK_WHITE, [0, 0, 0, 0]),
        encode_frame(&BLACK_WHITE, [0, 0, 0, 0]),
        encode_frame(&BLACK_WHITE, [0, 0, 0, 0]),
    ];

    let result = GifMerger::new(config).merge_bytes(frames);

    assert_matches!(
        result,
        Err(MergeError::Configuration(ConfigError::DelayCountMismatch {
            sources: 3,
            delays: 2
        }))
    );
}

#[test]
fn non_gif_source_names_the_failing_frame() {
    let config = MergeConfig::builder().delays(vec![10, 10]).build();
    let frames = vec![
        encode_frame(&BLACK_WHITE, [0, 0, 0, 0]),
        b"\x89PNG\r\n\x1a\n and then some".to_vec(),
    ];

    let error = GifMerger::new(config)
        .merge_bytes(frames)
        .expect_err("a png source should be rejected");

    assert_matches!(error, MergeError::InvalidFormat { index: 1, .. });
    assert_eq!(Some(1), error.frame_index());
}

#[test]
fn truncated_source_is_malformed() {
    let config = MergeConfig::builder().delays(vec![10]).build();
    let mut frame = encode_frame(&BLACK_WHITE, [0, 0, 0, 0]);
    frame.truncate(16);

    let result = GifMerger::new(config).merge_bytes(vec![frame]);

    assert_matches!(result, Err(MergeError::MalformedFrame { index: 0, .. }));
}

#[test]
fn merge_sources_reads_files_in_order() -> anyhow::Result<()> {
    let directory = tempfile::tempdir()?;
    let first_path = directory.path().join("frame-0.gif");
    std::fs::write(&first_path, encode_frame(&BLACK_WHITE, [0, 0, 1, 1]))?;
    let second = encode_frame(&BLACK_WHITE, [1, 1, 0, 0]);
    let config = MergeConfig::builder().delays(vec![10, 10]).build();

    let animation = GifMerger::new(config).merge_sources(vec![
        FrameSource::from(first_path),
        FrameSource::from(second),
    ])?;

    assert_eq!(
        vec![vec![0_u8, 0, 1, 1], vec![1, 1, 0, 0]],
        decoded_pixels(animation.as_bytes())
    );
    Ok(())
}

#[test]
fn missing_source_file_is_reported_with_index() {
    let directory = tempfile::tempdir().expect("temp dir should be created");
    let config = MergeConfig::builder().delays(vec![10, 10]).build();

    let result = GifMerger::new(config).merge_sources(vec![
        FrameSource::from(encode_frame(&BLACK_WHITE, [0, 0, 0, 0])),
        FrameSource::from(directory.path().join("missing.gif")),
    ]);

    assert_matches!(result, Err(MergeError::Source { index: 1, .. }));
}
