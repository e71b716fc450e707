#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Fit `size` inside `bound` keeping its aspect ratio.
///
/// Sizes already inside the bound are returned unchanged. Larger ones are
/// scaled by `min(bound.width / width, bound.height / height)` and each side
/// is rounded to the nearest pixel, never below 1.
pub fn aspect_fit(size: Size, bound: Size) -> Size {
    if size.width <= bound.width && size.height <= bound.height {
        return size;
    }
    if size.width == 0 || size.height == 0 {
        return Size::new(size.width.min(bound.width), size.height.min(bound.height));
    }

    let scale = f64::min(
        f64::from(bound.width) / f64::from(size.width),
        f64::from(bound.height) / f64::from(size.height),
    );
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
    Size::new(scaled(size.width), scaled(size.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BOUND: Size = Size::new(600, 450);

    #[rstest]
    #[case::wide(Size::new(1200, 300), Size::new(600, 150))]
    #[case::fits(Size::new(300, 200), Size::new(300, 200))]
    #[case::tall(Size::new(800, 900), Size::new(400, 450))]
    #[case::exact_bound(Size::new(600, 450), Size::new(600, 450))]
    #[case::rounds_to_nearest(Size::new(1000, 333), Size::new(600, 200))]
    #[case::thin_line(Size::new(10_000, 1), Size::new(600, 1))]
    fn fits_within_bound(#[case] input: Size, #[case] expected: Size) {
        assert_eq!(aspect_fit(input, BOUND), expected);
    }
}
