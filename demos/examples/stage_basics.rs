// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage basics.
//!
//! Stack a few shapes, hit-test, raise one to the top, fit the stage into a
//! smaller display, and animate a shape while counting repaints.
//!
//! Run:
//! - `cargo run -p understory_demos --example stage_basics`

use kurbo::{Point, Rect, Size};
use understory_stage::{AnimateTo, Canvas, Content, LocalShape, QueryFilter, Stage};

struct Tile {
    name: &'static str,
    bounds: Rect,
}

impl Content for Tile {
    type Bitmap = &'static str;

    fn render(&self) -> &'static str {
        self.name
    }

    fn contains(&self, local: Point) -> bool {
        self.bounds.contains(local)
    }
}

/// Prints every paint pass.
#[derive(Default)]
struct Console {
    frames: usize,
}

impl Canvas<&'static str> for Console {
    fn clear(&mut self) {
        self.frames += 1;
        println!("-- frame {} --", self.frames);
    }

    fn draw_bitmap(&mut self, bitmap: &&'static str, offset: Point) {
        println!("  {bitmap} at ({}, {})", offset.x, offset.y);
    }
}

fn tile(name: &'static str) -> Tile {
    Tile {
        name,
        bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
    }
}

fn main() {
    env_logger::init();
    log::info!("stacking tiles on an 800 x 600 stage");

    let mut stage = Stage::new(Size::new(800.0, 600.0));
    let back = stage.insert(tile("back"), LocalShape::default());
    let front = stage.insert(
        tile("front"),
        LocalShape {
            position: Point::new(50.0, 50.0),
            ..Default::default()
        },
    );

    let filter = QueryFilter::default();
    let spot = Point::new(75.0, 75.0);
    assert_eq!(stage.hit_test_point(spot, filter), Some(front));

    // Raising `back` takes max_z + 1; it now wins where both overlap.
    stage.move_to_top(back);
    assert_eq!(stage.hit_test_point(spot, filter), Some(back));
    println!("z: back={:?} front={:?}", stage.z_index(back), stage.z_index(front));

    // Shown at 400 x 400, the 800 x 600 stage displays at 400 x 300.
    let display = stage.resize_display(Size::new(400.0, 400.0));
    println!("display {display:?}, scale ratio {}", stage.scale_ratio());
    assert_eq!(display, Size::new(400.0, 300.0));
    assert_eq!(stage.scale_ratio(), 2.0);

    let mut console = Console::default();
    stage.flush(&mut console);

    let mut anim = AnimateTo::new(Point::new(200.0, 50.0));
    while stage.animate_step(front, &mut anim) {
        stage.flush(&mut console);
    }
    assert_eq!(stage.position(front), Some(Point::new(200.0, 50.0)));
    println!("{} frames painted", console.frames);
}
