use filter_core::{
    compare_images, filter2d_reference, Accelerator, CoefficientKernel, FilterCall, PaddedKernel,
    Scaling, StridedImage,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// One conformance scenario: inputs plus the padded kernel handed to the accelerator.
pub struct Scenario {
    pub label: String,
    pub kernel: CoefficientKernel,
    pub padded: PaddedKernel,
    pub scaling: Scaling,
    pub src: StridedImage,
}

impl Scenario {
    fn new(label: impl Into<String>, kernel: CoefficientKernel, scaling: Scaling, src: StridedImage) -> Self {
        Self {
            label: label.into(),
            padded: kernel.padded(),
            kernel,
            scaling,
            src,
        }
    }

    /// Same scenario with every padding byte of the flattened kernel set to `fill`.
    pub fn with_dirty_padding(mut self, fill: i8) -> Self {
        let mut bytes = self.padded.as_bytes().to_vec();
        bytes[self.kernel.cell_count()..].fill(fill);
        self.padded = PaddedKernel::from_raw(self.kernel.rows(), self.kernel.cols(), bytes).unwrap();
        self.label.push_str("+dirty_padding");
        self
    }
}

pub fn random_image(rng: &mut StdRng, width: usize, height: usize, stride: usize) -> StridedImage {
    let mut image = StridedImage::new(width, height, stride).unwrap();
    rng.fill(image.as_bytes_mut());
    image
}

pub fn scenarios() -> Vec<Scenario> {
    let mut rng = StdRng::seed_from_u64(0xC0FF_EE00);
    let mut out = Vec::new();

    let box15 = CoefficientKernel::box_filter(15, 15).unwrap();
    out.push(Scenario::new(
        "box15_1000x30",
        box15.clone(),
        Scaling::averaging(&box15),
        random_image(&mut rng, 1000, 30, 1024),
    ));

    let box3 = CoefficientKernel::box_filter(3, 3).unwrap();
    let mut impulse = StridedImage::new(64, 1, 64).unwrap();
    impulse.set(32, 0, 9);
    out.push(Scenario::new("impulse_64x1", box3.clone(), Scaling::new(1.0 / 9.0, 0), impulse));

    let mut white = StridedImage::new(20, 9, 64).unwrap();
    white.fill(255);
    out.push(Scenario::new("white_box3", box3.clone(), Scaling::averaging(&box3), white));

    out.push(Scenario::new(
        "saturate_high",
        box3.clone(),
        Scaling::new(3.5, 90),
        random_image(&mut rng, 33, 7, 64),
    ));
    out.push(Scenario::new(
        "saturate_low",
        box3.clone(),
        Scaling::new(-2.0, -5),
        random_image(&mut rng, 33, 7, 64),
    ));

    out.push(Scenario::new(
        "single_pixel",
        CoefficientKernel::box_filter(5, 5).unwrap(),
        Scaling::new(0.5, 3),
        random_image(&mut rng, 1, 1, 64),
    ));

    out.push(Scenario::new(
        "smaller_than_kernel",
        CoefficientKernel::box_filter(15, 15).unwrap(),
        Scaling::new(0.01, 0),
        random_image(&mut rng, 6, 4, 64),
    ));

    for idx in 0..6 {
        let rows = 2 * rng.gen_range(0..5) + 1;
        let cols = 2 * rng.gen_range(0..5) + 1;
        let coeffs = (0..rows * cols).map(|_| rng.gen()).collect();
        let kernel = CoefficientKernel::new(rows, cols, coeffs).unwrap();
        let width: usize = rng.gen_range(1..150);
        let height = rng.gen_range(1..20);
        let stride = width.div_ceil(64) * 64 + 64 * rng.gen_range(0..2);
        // Power-of-two factors keep `factor * sum` exact, so a backend that fuses the
        // multiply and the bias add still lands on the same value.
        let sign = if rng.gen() { 1.0 } else { -1.0 };
        let factor = sign / (1u32 << rng.gen_range(3u32..10)) as f32;
        let scaling = Scaling::new(factor, rng.gen_range(-200..200));
        out.push(Scenario::new(
            format!("random_{idx}_{rows}x{cols}_{width}x{height}"),
            kernel,
            scaling,
            random_image(&mut rng, width, height, stride),
        ));
    }

    // Odd strides exercise byte addressing that is not word aligned.
    let kernel = CoefficientKernel::new(3, 5, (0..15).map(|v| v as i8 * 9 - 60).collect()).unwrap();
    out.push(Scenario::new(
        "odd_stride",
        kernel,
        Scaling::new(1.0 / 64.0, 77),
        random_image(&mut rng, 29, 5, 31),
    ));

    out
}

/// Runs `accel` and the reference on `scenario`, panicking with diagnostics on any difference.
pub fn assert_conforms<A: Accelerator + ?Sized>(accel: &mut A, scenario: &Scenario) {
    let src = &scenario.src;
    let mut expected = StridedImage::new(src.width(), src.height(), src.stride()).unwrap();
    filter2d_reference(&scenario.kernel, scenario.scaling, src, &mut expected);

    let call = FilterCall::for_image(&scenario.padded, scenario.scaling, src).unwrap();
    let mut actual = StridedImage::new(src.width(), src.height(), src.stride()).unwrap();
    accel
        .filter2d(&call, src.as_bytes(), actual.as_bytes_mut())
        .unwrap_or_else(|err| panic!("{}: {} failed: {err:?}", scenario.label, accel.name()));

    let comparison = compare_images(&expected, &actual);
    assert!(
        comparison.verdict().is_match(),
        "{}: {} diverged from reference: {comparison:?}",
        scenario.label,
        accel.name()
    );
}
