mod fixtures;

use core::f32::consts::TAU;

use fixtures::FakeScreen;
use lib::display::{ray_angle, Readout, Sun, TextLine};

fn close(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

fn sun_rows(screen: &FakeScreen) -> Vec<Vec<bool>> {
    screen.pixels[0..40].to_vec()
}

#[test]
fn init_blanks_panel() {
    let display = fixtures::display();
    assert_eq!(display.frame(), 0);
    assert_eq!(display.screen().flushes, 1);
    assert_eq!(display.screen().lit_in(0..128, 0..64), 0);
}

#[test]
fn sun_and_readout_drawn() {
    let mut display = fixtures::display();
    display.render(Readout::Celsius(23.4)).unwrap();
    let screen = display.screen();

    assert!(screen.is_on(Sun::CENTER.x, Sun::CENTER.y));
    // first ray points along +x at frame zero
    assert!(screen.is_on(Sun::CENTER.x + Sun::RADIUS, Sun::CENTER.y));
    assert!(screen.lit_in(48..81, 5..38) > 0);
    // nothing between the sun and the text line
    assert_eq!(screen.lit_in(0..128, 38..50), 0);

    let top = TextLine::POSITION.y as usize;
    let left = TextLine::POSITION.x as usize;
    assert!(screen.lit_in(left..128, top..top + 10) > 0);
    assert_eq!(screen.lit_in(0..left, top..top + 10), 0);
}

#[test]
fn render_advances_frame() {
    let mut display = fixtures::display();
    for expected in 1..=5 {
        display.render(Readout::Unavailable).unwrap();
        assert_eq!(display.frame(), expected);
        assert_eq!(display.screen().flushes, expected as usize + 1);
    }
}

#[test]
fn rays_rotate_between_frames() {
    let mut display = fixtures::display();
    display.render(Readout::Unavailable).unwrap();
    let first = sun_rows(display.screen());
    display.render(Readout::Unavailable).unwrap();
    let second = sun_rows(display.screen());

    assert_ne!(first, second);
}

#[test]
fn frame_redrawn_from_scratch() {
    let mut display = fixtures::display();
    display.render(Readout::Celsius(-12.3)).unwrap();
    display.render(Readout::Unavailable).unwrap();

    let mut fresh = fixtures::display();
    fresh.render(Readout::Unavailable).unwrap();
    assert_eq!(
        display.screen().pixels[50..60],
        fresh.screen().pixels[50..60]
    );
}

#[test]
fn readout_text_depends_on_value() {
    let rows = |readout| {
        let mut display = fixtures::display();
        display.render(readout).unwrap();
        display.screen().pixels[50..60].to_vec()
    };

    let unavailable = rows(Readout::Unavailable);
    let warm = rows(Readout::Celsius(25.0));
    let cold = rows(Readout::Celsius(-5.0));
    assert_ne!(unavailable, warm);
    assert_ne!(warm, cold);
    assert_eq!(warm, rows(Readout::Celsius(25.04)));
}

#[test]
fn ray_phase() {
    assert_eq!(ray_angle(0, 0), 0.0);
    assert!(close(ray_angle(1, 0), TAU / 8.0, 1e-6));
    assert!(close(ray_angle(0, 1), 0.2, 1e-6));
    // 40 * 0.2 = 8 rad, one full turn removed
    assert!(close(ray_angle(0, 40), 8.0 - TAU, 1e-3));
}

#[test]
fn ray_angle_stays_in_one_turn() {
    for frame in (0..10_000).step_by(37) {
        for ray in 0..Sun::RAYS {
            let angle = ray_angle(ray, frame);
            assert!((0.0..TAU).contains(&angle), "ray {} frame {}: {}", ray, frame, angle);
        }
    }
}
