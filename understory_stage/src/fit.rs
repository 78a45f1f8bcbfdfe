// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aspect-preserving fit of a stage into a display box.

use kurbo::Size;

/// Uniform scale that fits `size` inside `max` while preserving aspect ratio.
///
/// This is the smaller of the per-axis ratios.
///
/// ```
/// use understory_stage::fit_ratio;
/// use kurbo::Size;
///
/// assert_eq!(fit_ratio(Size::new(200.0, 100.0), Size::new(100.0, 100.0)), 0.5);
/// ```
pub fn fit_ratio(size: Size, max: Size) -> f64 {
    let ratio_x = max.width / size.width;
    let ratio_y = max.height / size.height;
    if ratio_x <= ratio_y { ratio_x } else { ratio_y }
}

/// `size` scaled by [`fit_ratio`], rounded to whole pixels.
pub fn fit_size(size: Size, max: Size) -> Size {
    (size * fit_ratio(size, max)).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_picks_tighter_axis() {
        assert_eq!(fit_ratio(Size::new(100.0, 50.0), Size::new(50.0, 50.0)), 0.5);
        assert_eq!(fit_ratio(Size::new(50.0, 100.0), Size::new(50.0, 50.0)), 0.5);
        assert_eq!(fit_ratio(Size::new(10.0, 10.0), Size::new(30.0, 20.0)), 2.0);
    }

    #[test]
    fn size_rounds() {
        let s = fit_size(Size::new(300.0, 200.0), Size::new(100.0, 100.0));
        assert_eq!(s, Size::new(100.0, 67.0));
    }
}
