mod common;

use common::{seeded_painter, small_config, CountingRng};
use neural_painter::{
    error::ConfigError, observer::Recorder, Chunking, GenerationConfig, GifAnimation, Painter,
    PainterError, PngFrames, RandomArchitecture,
};

#[test]
fn single_layer_still_image() {
    let config = GenerationConfig {
        layer_count: 1,
        hidden_width: 1000,
        ..small_config()
    }
    .still();
    let mut painter = seeded_painter(config, 11);

    let painting = painter.image(Recorder::default()).unwrap();

    assert_eq!(painting.network.layers().len(), 1);
    assert_eq!(painting.network.out_size(), 3);
    assert_eq!(painting.pixels.as_bytes().len(), 16 * 16 * 4);
    assert!(painting.pixels.as_bytes().chunks(4).all(|p| p[3] == 255));
}

#[test]
fn five_frame_animation() {
    let mut painter = seeded_painter(small_config(), 12);
    let mut recorder = Recorder::default();

    let animation = painter.animation(PngFrames::new(), &mut recorder).unwrap();

    assert_eq!(animation.output.len(), 5);
    let times: Vec<f32> = recorder.frames.iter().map(|(_, t)| *t).collect();
    assert_eq!(times, vec![0., 0.2, 0.4, 0.6, 0.8]);
    let indices: Vec<usize> = recorder.frames.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_eq!(recorder.progress.last(), Some(&1.));
    assert!(recorder.progress.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn empty_canvas_is_rejected_before_drawing() {
    let (rng, draws) = CountingRng::new(13);
    let config = GenerationConfig {
        width: 0,
        ..small_config()
    };

    let result = Painter::with_architecture(config, RandomArchitecture::with_rng(rng));

    assert!(matches!(
        result,
        Err(PainterError::Config(ConfigError::EmptyCanvas { width: 0, .. }))
    ));
    assert_eq!(draws.get(), 0);
}

#[test]
fn valid_config_draws_only_when_generating() {
    let (rng, draws) = CountingRng::new(14);
    let mut painter =
        Painter::with_architecture(small_config().still(), RandomArchitecture::with_rng(rng))
            .unwrap();
    assert_eq!(draws.get(), 0);

    painter.image(Recorder::default()).unwrap();
    assert!(draws.get() > 0);
}

#[test]
fn chunking_does_not_change_the_picture() {
    let rows = small_config().still();
    let field = GenerationConfig {
        chunking: Chunking::Field,
        ..rows.clone()
    };

    let a = seeded_painter(rows, 15).image(Recorder::default()).unwrap();
    let b = seeded_painter(field, 15).image(Recorder::default()).unwrap();

    assert_eq!(a.network, b.network);
    assert_eq!(a.pixels, b.pixels);
}

#[test]
fn same_seed_same_animation() {
    let paint = || {
        let mut bytes = Vec::new();
        let gif = GifAnimation::new(&mut bytes, 40).unwrap();
        seeded_painter(small_config(), 16)
            .animation(gif, Recorder::default())
            .unwrap();
        bytes
    };

    let first = paint();
    assert!(!first.is_empty());
    assert_eq!(first, paint());
}

#[test]
fn pixels_cover_the_canvas() {
    for &(width, height) in &[(1, 1), (7, 3), (3, 7)] {
        let config = GenerationConfig {
            width,
            height,
            ..small_config()
        }
        .still();
        let painting = seeded_painter(config, 17).image(Recorder::default()).unwrap();

        let bytes = painting.pixels.as_bytes();
        assert_eq!(bytes.len(), width as usize * height as usize * 4);
        assert!(bytes.chunks(4).all(|p| p[3] == 255));
    }
}
