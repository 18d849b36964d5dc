use egui::{Pos2, Vec2};
use screengloss::crop::{CropEngine, CropHandle, MIN_CROP_SIZE};
use screengloss::image::SourceImage;

/// A gradient-filled test bitmap where every pixel value encodes its
/// coordinates, so sub-rectangle extraction is easy to verify.
fn coordinate_image(width: u32, height: u32) -> SourceImage {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    SourceImage::from_rgba(width, height, pixels, "grid.png")
}

fn drag(
    engine: &mut CropEngine,
    handle: CropHandle,
    from: Pos2,
    to: Pos2,
    display_size: Vec2,
) {
    engine.begin_drag(handle, from);
    engine.update_drag(to, display_size);
    engine.end_drag();
}

#[test]
fn crop_round_trip_is_pixel_identical() {
    let image = coordinate_image(300, 200);
    let display = image.size();
    let mut engine = CropEngine::new(image.size());

    // Shrink to a 120x90 region at (40, 30) via two handle drags.
    drag(
        &mut engine,
        CropHandle::NorthWest,
        Pos2::new(0.0, 0.0),
        Pos2::new(40.0, 30.0),
        display,
    );
    drag(
        &mut engine,
        CropHandle::SouthEast,
        Pos2::new(300.0, 200.0),
        Pos2::new(160.0, 120.0),
        display,
    );

    let region = engine.region().unwrap();
    assert_eq!(
        (region.x, region.y, region.width, region.height),
        (40.0, 30.0, 120.0, 90.0)
    );

    let cropped = engine.commit(Some(&image)).unwrap();
    assert_eq!(cropped.width(), 120);
    assert_eq!(cropped.height(), 90);
    for y in 0..cropped.height() {
        for x in 0..cropped.width() {
            assert_eq!(cropped.pixel(x, y), image.pixel(x + 40, y + 30));
        }
    }

    // The session is over.
    assert_eq!(engine.region(), None);
}

#[test]
fn southeast_drag_clamps_to_image_not_arbitrary_max() {
    let image_size = Vec2::new(500.0, 400.0);
    let mut engine = CropEngine::new(image_size);

    // Shrink to {10, 10, 100, 80} first.
    drag(
        &mut engine,
        CropHandle::NorthWest,
        Pos2::new(0.0, 0.0),
        Pos2::new(10.0, 10.0),
        image_size,
    );
    drag(
        &mut engine,
        CropHandle::SouthEast,
        Pos2::new(500.0, 400.0),
        Pos2::new(110.0, 90.0),
        image_size,
    );
    let region = engine.region().unwrap();
    assert_eq!(
        (region.x, region.y, region.width, region.height),
        (10.0, 10.0, 100.0, 80.0)
    );

    // Now the scenario: a (1000, 1000) south-east drag.
    drag(
        &mut engine,
        CropHandle::SouthEast,
        Pos2::new(110.0, 90.0),
        Pos2::new(1110.0, 1090.0),
        image_size,
    );
    let region = engine.region().unwrap();
    assert_eq!(
        (region.x, region.y, region.width, region.height),
        (10.0, 10.0, 490.0, 390.0)
    );
}

#[test]
fn any_gesture_sequence_keeps_the_region_contained() {
    let image_size = Vec2::new(640.0, 480.0);
    let mut engine = CropEngine::new(image_size);
    let handles = [
        CropHandle::Move,
        CropHandle::North,
        CropHandle::South,
        CropHandle::East,
        CropHandle::West,
        CropHandle::NorthWest,
        CropHandle::NorthEast,
        CropHandle::SouthWest,
        CropHandle::SouthEast,
    ];

    // A deterministic pseudo-random walk over handles and pointer targets.
    let mut seed = 0x2545_f491u64;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for _ in 0..200 {
        let handle = handles[(next() % handles.len() as u64) as usize];
        let from = Pos2::new((next() % 700) as f32 - 30.0, (next() % 540) as f32 - 30.0);
        let to = Pos2::new((next() % 1400) as f32 - 400.0, (next() % 1000) as f32 - 300.0);
        drag(&mut engine, handle, from, to, image_size);

        let region = engine.region().unwrap();
        assert!(region.x >= 0.0, "{region:?}");
        assert!(region.y >= 0.0, "{region:?}");
        assert!(region.x + region.width <= image_size.x, "{region:?}");
        assert!(region.y + region.height <= image_size.y, "{region:?}");
        assert!(region.width >= MIN_CROP_SIZE, "{region:?}");
        assert!(region.height >= MIN_CROP_SIZE, "{region:?}");
    }
}

#[test]
fn move_never_resizes() {
    let image_size = Vec2::new(500.0, 400.0);
    let mut engine = CropEngine::new(image_size);
    drag(
        &mut engine,
        CropHandle::NorthWest,
        Pos2::new(0.0, 0.0),
        Pos2::new(100.0, 100.0),
        image_size,
    );
    let before = engine.region().unwrap();

    for target in [
        Pos2::new(-500.0, -500.0),
        Pos2::new(900.0, 700.0),
        Pos2::new(250.0, 200.0),
    ] {
        drag(&mut engine, CropHandle::Move, Pos2::new(0.0, 0.0), target, image_size);
        let after = engine.region().unwrap();
        assert_eq!(after.width, before.width);
        assert_eq!(after.height, before.height);
    }
}

#[test]
fn repeated_pointer_positions_are_idempotent_within_a_gesture() {
    let image_size = Vec2::new(500.0, 400.0);
    let mut engine = CropEngine::new(image_size);

    engine.begin_drag(CropHandle::West, Pos2::new(0.0, 0.0));
    engine.update_drag(Pos2::new(80.0, 10.0), image_size);
    let once = engine.region();
    engine.update_drag(Pos2::new(80.0, 10.0), image_size);
    engine.update_drag(Pos2::new(80.0, 10.0), image_size);
    assert_eq!(engine.region(), once);
    engine.end_drag();
}

#[test]
fn display_scale_correction_maps_preview_pixels_to_source_pixels() {
    // 800x600 source shown at 400x300: pointer deltas double.
    let image = coordinate_image(800, 600);
    let mut engine = CropEngine::new(image.size());
    let display = Vec2::new(400.0, 300.0);

    drag(
        &mut engine,
        CropHandle::NorthWest,
        Pos2::new(0.0, 0.0),
        Pos2::new(50.0, 25.0),
        display,
    );
    let region = engine.region().unwrap();
    assert_eq!((region.x, region.y), (100.0, 50.0));
    assert_eq!((region.width, region.height), (700.0, 550.0));
}

#[test]
fn cancel_leaves_the_source_untouched() {
    let image = coordinate_image(100, 100);
    let mut engine = CropEngine::new(image.size());
    drag(
        &mut engine,
        CropHandle::SouthEast,
        Pos2::new(100.0, 100.0),
        Pos2::new(60.0, 60.0),
        image.size(),
    );
    engine.cancel();

    assert_eq!(engine.region(), None);
    assert!(engine.commit(Some(&image)).is_err());
    // Source still intact at full size.
    assert_eq!(image.width(), 100);
    assert_eq!(image.height(), 100);
}

#[test]
fn commit_rounds_fractional_regions_to_whole_pixels() {
    let image = coordinate_image(100, 100);
    let mut engine = CropEngine::new(image.size());

    // A drag that lands on fractional coordinates (display scale 3:1).
    drag(
        &mut engine,
        CropHandle::NorthWest,
        Pos2::new(0.0, 0.0),
        Pos2::new(10.0, 10.0),
        Vec2::new(300.0, 300.0),
    );
    // 10 display px over a 3x-downscaled preview is 3.333 source px.
    let region = engine.region().unwrap();
    assert!((region.x - 10.0 / 3.0).abs() < 1e-3);

    let cropped = engine.commit(Some(&image)).unwrap();
    assert_eq!(cropped.width(), 97);
    assert_eq!(cropped.height(), 97);
}
