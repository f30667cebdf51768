//! Color segmentation regression test
//!
//! Tests color_segment, color_segment_simple, color_segment_cluster and the
//! individual phases on synthetic images with known regions.

use chromaseg_color::{
    ColorSegmentOptions, DistanceMetric, LookupOptions, assign_to_nearest_color, color_distance_sq,
    color_segment, color_segment_cluster, color_segment_remove_colors, color_segment_simple,
};
use chromaseg_core::{LabelImage, Rgb, RgbImage};
use chromaseg_test::RegParams;
use rand::SeedableRng;
use rand::distr::{Bernoulli, Distribution, Uniform};
use rand::rngs::StdRng;

const REGION_COLORS: [Rgb; 7] = [
    Rgb::new(200, 50, 50),
    Rgb::new(50, 200, 50),
    Rgb::new(50, 50, 200),
    Rgb::new(200, 200, 50),
    Rgb::new(200, 50, 200),
    Rgb::new(50, 200, 200),
    Rgb::new(180, 180, 180),
];

/// Region index of (x, y) in a 3-band layout: three blocks on top, two in
/// the middle and two at the bottom.
fn region(x: u32, y: u32, w: u32, h: u32) -> usize {
    if y < h / 3 {
        if x < w / 3 {
            0
        } else if x < 2 * w / 3 {
            1
        } else {
            2
        }
    } else if y < 2 * h / 3 {
        if x < w / 2 { 3 } else { 4 }
    } else if x < w / 2 {
        5
    } else {
        6
    }
}

/// Region image with mild per-pixel jitter and, with probability
/// `speckle`, a pixel of a random region color instead.
fn create_test_image(rng: &mut StdRng, w: u32, h: u32, speckle: f64) -> RgbImage {
    let jitter = Uniform::new_inclusive(-6i32, 6).unwrap();
    let speckle = Bernoulli::new(speckle).unwrap();
    let any = Uniform::new(0usize, REGION_COLORS.len()).unwrap();
    RgbImage::from_fn(w, h, |x, y| {
        let base = if speckle.sample(&mut *rng) {
            REGION_COLORS[any.sample(&mut *rng)]
        } else {
            REGION_COLORS[region(x, y, w, h)]
        };
        let [r, g, b] = base
            .channels()
            .map(|v| (v as i32 + jitter.sample(&mut *rng)).clamp(0, 255) as u8);
        Rgb::new(r, g, b)
    })
    .unwrap()
}

fn create_gradient_image(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| Rgb::new(((x * 255) / w) as u8, ((y * 255) / h) as u8, 100))
        .unwrap()
}

#[test]
fn colorseg_reg() {
    let mut rp = RegParams::new("colorseg");
    let mut rng = StdRng::seed_from_u64(41);

    let (w, h) = (120u32, 90u32);
    let pixs = create_test_image(&mut rng, w, h, 0.01);
    let npix = (w * h) as f64;

    // --- Full pipeline across palette sizes and thresholds ---
    let configs = [(4u32, 4u32), (8, 7), (16, 7)];
    for &(max_colors, final_colors) in &configs {
        for &(max_dist, sel_size) in &[(40u32, 0u32), (100, 0), (60, 4), (180, 6)] {
            let options = ColorSegmentOptions {
                max_dist,
                max_colors,
                sel_size,
                final_colors,
                ..Default::default()
            };
            let seg = color_segment(&pixs, &options).unwrap();
            rp.check_true(seg.palette.len() <= final_colors as usize);
            rp.compare_values(npix, seg.palette.total_population() as f64, 0.0);
            rp.check_true(seg.labels.check_labels(seg.palette.len()).is_ok());
            rp.check_true(seg.attempts >= 1 && seg.max_dist >= max_dist as f32);
        }
    }

    // --- Seven well separated regions are recovered exactly ---
    let clean = create_test_image(&mut rng, w, h, 0.0);
    let options = ColorSegmentOptions {
        max_dist: 60,
        max_colors: 16,
        sel_size: 4,
        final_colors: 7,
        ..Default::default()
    };
    let seg = color_segment(&clean, &options).unwrap();
    rp.compare_values(7.0, seg.palette.len() as f64, 0.0);
    let expected_label: Vec<u8> = REGION_COLORS
        .iter()
        .map(|&c| seg.palette.find_nearest(c).unwrap() as u8)
        .collect();
    let expected = LabelImage::from_labels(
        w,
        h,
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| expected_label[region(x, y, w, h)])
            .collect(),
    )
    .unwrap();
    rp.compare_labels(&expected, &seg.labels);

    // --- Determinism ---
    let again = color_segment(&clean, &options).unwrap();
    rp.compare_labels(&seg.labels, &again.labels);
    rp.check_true(seg.palette == again.palette);

    // --- Simple interface ---
    for final_colors in [3u32, 5, 6] {
        let seg = color_segment_simple(&pixs, final_colors).unwrap();
        rp.check_true(seg.palette.len() <= final_colors as usize);
        rp.compare_values(npix, seg.palette.total_population() as f64, 0.0);
    }

    // --- Phase 1 alone: palette bound and distance expansion ---
    let grad = create_gradient_image(100, 80);
    for &(max_dist, max_colors) in &[(75u32, 10u32), (30, 10), (60, 4)] {
        let result = color_segment_cluster(&grad, max_dist, max_colors).unwrap();
        rp.check_true(result.palette.len() <= max_colors as usize);
        rp.compare_values(8000.0, result.palette.total_population() as f64, 0.0);
        if result.attempts > 1 {
            rp.check_true(result.max_dist > max_dist as f32);
        }
    }
    let tight = color_segment_cluster(&grad, 10, 4).unwrap();
    rp.check_true(tight.attempts > 1);

    // --- Refine is idempotent on a frozen palette ---
    let phase1 = color_segment_cluster(&pixs, 60, 16).unwrap();
    let mut labels = phase1.labels.clone();
    let lookup = LookupOptions::default();
    let counts1 =
        assign_to_nearest_color(&pixs, &mut labels, &phase1.palette, None, lookup).unwrap();
    let once = labels.clone();
    let counts2 =
        assign_to_nearest_color(&pixs, &mut labels, &phase1.palette, None, lookup).unwrap();
    rp.compare_labels(&once, &labels);
    rp.check_true(counts1 == counts2);
    rp.compare_values(npix, counts1.iter().map(|&n| n as f64).sum(), 0.0);

    // --- Reduction sends discarded pixels to the nearest survivor ---
    let mut palette = phase1.palette.clone();
    palette.set_populations(&counts1).unwrap();
    let before = labels.clone();
    let final_colors = 3u32;
    let euclid = LookupOptions {
        metric: DistanceMetric::Euclidean,
        ..lookup
    };
    color_segment_remove_colors(&pixs, &mut labels, &mut palette, &counts1, final_colors, euclid)
        .unwrap();
    rp.check_true(palette.len() <= final_colors as usize);
    let survivors = palette.colors();
    let old_colors = phase1.palette.colors();
    let mut moved_ok = true;
    for (i, (&old, &new)) in before.labels().iter().zip(labels.labels()).enumerate() {
        let old_color = old_colors[old as usize];
        match survivors.iter().position(|&c| c == old_color) {
            // retained pixels keep their color
            Some(k) => moved_ok &= k == new as usize,
            // reassigned pixels take the nearest survivor; a level 4
            // octcube center is within 8 * sqrt(3) of the pixel
            None => {
                let c = pixs.pixels()[i];
                let chosen = color_distance_sq(c, survivors[new as usize]);
                let best = survivors
                    .iter()
                    .map(|&s| color_distance_sq(c, s))
                    .min()
                    .unwrap();
                moved_ok &= (chosen as f64).sqrt() <= (best as f64).sqrt() + 16.0 * 3f64.sqrt();
            }
        }
    }
    rp.check_true(moved_ok);

    assert!(rp.cleanup(), "colorseg regression test failed");
}

#[test]
fn colorseg_quadrants_reg() {
    let mut rp = RegParams::new("colorseg_quadrants");

    let image = RgbImage::from_fn(4, 4, |x, y| match (x < 2, y < 2) {
        (true, true) => Rgb::new(255, 0, 0),
        (false, true) => Rgb::new(0, 255, 0),
        (true, false) => Rgb::new(0, 0, 255),
        (false, false) => Rgb::WHITE,
    })
    .unwrap();
    let expected =
        LabelImage::from_labels(4, 4, vec![0, 0, 1, 1, 0, 0, 1, 1, 2, 2, 3, 3, 2, 2, 3, 3])
            .unwrap();

    for sel_size in [0u32, 2, 4] {
        let options = ColorSegmentOptions {
            max_dist: 10,
            max_colors: 8,
            sel_size,
            final_colors: 4,
            ..Default::default()
        };
        let seg = color_segment(&image, &options).unwrap();
        rp.compare_values(1.0, seg.attempts as f64, 0.0);
        rp.compare_values(4.0, seg.palette.len() as f64, 0.0);
        rp.compare_labels(&expected, &seg.labels);
    }

    assert!(rp.cleanup(), "colorseg_quadrants regression test failed");
}
