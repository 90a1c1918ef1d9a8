use filter_core::contract::normalize_and_saturate;
use filter_core::{compare_images, filter2d_reference, CoefficientKernel, Scaling, StridedImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn run(kernel: &CoefficientKernel, scaling: Scaling, src: &StridedImage) -> StridedImage {
    let mut dst = StridedImage::new(src.width(), src.height(), src.stride()).unwrap();
    filter2d_reference(kernel, scaling, src, &mut dst);
    dst
}

fn random_image(rng: &mut StdRng, width: usize, height: usize, stride: usize) -> StridedImage {
    let mut image = StridedImage::new(width, height, stride).unwrap();
    rng.fill(image.as_bytes_mut());
    image
}

#[test]
fn border_pixels_see_zero_padding() {
    let kernel = CoefficientKernel::box_filter(3, 3).unwrap();
    let scaling = Scaling::averaging(&kernel);
    let mut src = StridedImage::new(8, 6, 64).unwrap();
    src.fill(255);
    let dst = run(&kernel, scaling, &src);

    let full = 255.0 * 9.0 * scaling.factor;
    let interior = (full as i32).min(255) as u8;
    for y in 1..5 {
        for x in 1..7 {
            assert_eq!(dst.get(x, y), interior, "interior pixel ({x}, {y})");
        }
    }
    // A corner window covers 4 of 9 cells; replicated edges would give `interior` instead.
    for (x, y) in [(0, 0), (7, 0), (0, 5), (7, 5)] {
        assert!(dst.get(x, y) < interior, "corner ({x}, {y}) = {}", dst.get(x, y));
        assert_eq!(dst.get(x, y), normalize_and_saturate(4 * 255, scaling));
    }
    // Edges (not corners) cover 6 of 9 cells.
    assert_eq!(dst.get(3, 0), normalize_and_saturate(6 * 255, scaling));
}

#[test]
fn saturation_pins_to_range_ends() {
    let kernel = CoefficientKernel::box_filter(3, 3).unwrap();
    let mut src = StridedImage::new(5, 5, 8).unwrap();
    src.fill(200);

    let high = run(&kernel, Scaling::new(4.0, 100), &src);
    let low = run(&kernel, Scaling::new(-4.0, -100), &src);
    for y in 0..5 {
        assert!(high.row(y).iter().all(|&p| p == 255));
        assert!(low.row(y).iter().all(|&p| p == 0));
    }

    // Bias alone can push a zero image either way.
    src.fill(0);
    assert!(run(&kernel, Scaling::new(1.0, 1000), &src).row(2).iter().all(|&p| p == 255));
    assert!(run(&kernel, Scaling::new(1.0, -1000), &src).row(2).iter().all(|&p| p == 0));
}

#[test]
fn reference_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(0xF11E);
    let src = random_image(&mut rng, 97, 13, 128);
    let coeffs = (0..25).map(|_| rng.gen_range(-8..=8)).collect();
    let kernel = CoefficientKernel::new(5, 5, coeffs).unwrap();
    let scaling = Scaling::new(0.037, 12);

    let first = run(&kernel, scaling, &src);
    let second = run(&kernel, scaling, &src);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn stride_does_not_change_logical_output() {
    let mut rng = StdRng::seed_from_u64(0x57_21DE);
    let (width, height) = (45, 11);
    let logical: Vec<u8> = (0..width * height).map(|_| rng.gen()).collect();
    let kernel = CoefficientKernel::new(3, 7, (0..21).map(|i| (i % 5) as i8 - 2).collect()).unwrap();
    let scaling = Scaling::new(0.3, 40);

    let tight = StridedImage::from_rows(width, height, width, &logical).unwrap();
    let mut padded = StridedImage::from_rows(width, height, 64, &logical).unwrap();
    // Garbage in the padding columns must not leak into the result.
    for y in 0..height {
        padded.as_bytes_mut()[y * 64 + width..(y + 1) * 64].fill(0xEE);
    }
    let narrow = run(&kernel, scaling, &tight);
    let wide = run(&kernel, scaling, &padded);
    assert!(compare_images(&narrow, &wide).verdict().is_match());
}

#[test]
fn single_impulse_blurs_into_three_pixels() {
    let mut src = StridedImage::new(64, 1, 64).unwrap();
    src.set(32, 0, 9);
    let kernel = CoefficientKernel::box_filter(3, 3).unwrap();
    let scaling = Scaling::new(1.0 / 9.0, 0);
    let dst = run(&kernel, scaling, &src);

    for x in 0..64 {
        let expected = if (31..=33).contains(&x) { 1 } else { 0 };
        assert_eq!(dst.get(x, 0), expected, "output index {x}");
    }
}

#[test]
fn matches_direct_formula_on_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0xD1_2EC7);
    for _ in 0..24 {
        let width = rng.gen_range(1..40);
        let height = rng.gen_range(1..12);
        let stride = width + rng.gen_range(0..9);
        let rows = 2 * rng.gen_range(0..4) + 1;
        let cols = 2 * rng.gen_range(0..4) + 1;
        let src = random_image(&mut rng, width, height, stride);
        let coeffs: Vec<i8> = (0..rows * cols).map(|_| rng.gen()).collect();
        let kernel = CoefficientKernel::new(rows, cols, coeffs).unwrap();
        let scaling = Scaling::new(rng.gen_range(-0.05..0.05), rng.gen_range(-300..300));
        let dst = run(&kernel, scaling, &src);

        for y in 0..height as i64 {
            for x in 0..width as i64 {
                let mut sum = 0i64;
                for r in 0..rows as i64 {
                    for c in 0..cols as i64 {
                        let sx = x + c - cols as i64 / 2;
                        let sy = y + r - rows as i64 / 2;
                        if (0..width as i64).contains(&sx) && (0..height as i64).contains(&sy) {
                            sum += i64::from(src.get(sx as usize, sy as usize))
                                * i64::from(kernel.get(r as usize, c as usize));
                        }
                    }
                }
                let raw = (scaling.factor * sum as f32 + f32::from(scaling.bias)).trunc();
                let expected = raw.clamp(0.0, 255.0) as u8;
                assert_eq!(dst.get(x as usize, y as usize), expected);
            }
        }
    }
}
