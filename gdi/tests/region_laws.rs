//! Algebraic properties of region combination over generated regions.

use gdi_region::{CombineMode, Point, Rect, Region, RegionType};

/// Small deterministic generator so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next() % (hi - lo) as u32) as i32
    }
}

fn random_region(rng: &mut Lcg) -> Region {
    let mut region = Region::new();
    let count = rng.range(0, 6);
    for _ in 0..count {
        let left = rng.range(-20, 20);
        let top = rng.range(-20, 20);
        let rect = Rect::new(left, top, left + rng.range(1, 15), top + rng.range(1, 15));
        region.union_rect(&rect).unwrap();
    }
    region
}

fn regions(seed: u64, n: usize) -> Vec<Region> {
    let mut rng = Lcg(seed);
    (0..n).map(|_| random_region(&mut rng)).collect()
}

/// Pixel-level membership check against the region's own rectangles
fn covers(region: &Region, pt: Point) -> bool {
    region.rects().iter().any(|r| r.contains_point(pt))
}

fn check(region: &Region) {
    assert!(region.is_normalized(), "not normalized: {:?}", region.rects());
    let expected = match region.rect_count() {
        0 => RegionType::Null,
        1 => RegionType::Simple,
        _ => RegionType::Complex,
    };
    assert_eq!(region.region_type(), expected);
}

#[test]
fn test_generated_regions_are_normalized() {
    for region in regions(1, 40) {
        check(&region);
    }
}

#[test]
fn test_union_and_intersection_commute() {
    let rs = regions(2, 12);
    for a in &rs {
        for b in &rs {
            let ab = a.union(b).unwrap();
            check(&ab);
            assert_eq!(ab, b.union(a).unwrap());

            let ab = a.intersection(b).unwrap();
            check(&ab);
            assert_eq!(ab, b.intersection(a).unwrap());
        }
    }
}

#[test]
fn test_union_is_associative() {
    let rs = regions(3, 6);
    for a in &rs {
        for b in &rs {
            for c in &rs {
                let left = a.union(b).unwrap().union(c).unwrap();
                let right = a.union(&b.union(c).unwrap()).unwrap();
                assert_eq!(left, right);
            }
        }
    }
}

#[test]
fn test_idempotence_and_identity() {
    let empty = Region::new();
    for a in regions(4, 20) {
        assert_eq!(a.union(&a).unwrap(), a);
        assert_eq!(a.intersection(&a).unwrap(), a);
        assert_eq!(a.union(&empty).unwrap(), a);
        assert!(a.intersection(&empty).unwrap().is_empty());
        assert_eq!(a.subtract(&empty).unwrap(), a);
        assert!(a.subtract(&a).unwrap().is_empty());
        assert!(a.xor(&a).unwrap().is_empty());
    }
}

#[test]
fn test_difference_and_xor_identities() {
    let rs = regions(5, 10);
    for a in &rs {
        for b in &rs {
            let diff = a.subtract(b).unwrap();
            check(&diff);
            assert!(diff.intersection(b).unwrap().is_empty());

            let inter = a.intersection(b).unwrap();
            assert_eq!(diff.union(&inter).unwrap(), *a);

            let xor = a.xor(b).unwrap();
            check(&xor);
            let both = a.union(b).unwrap().subtract(&inter).unwrap();
            assert_eq!(xor, both);
        }
    }
}

#[test]
fn test_pointwise_semantics() {
    let rs = regions(6, 6);
    for a in &rs {
        for b in &rs {
            let or = a.union(b).unwrap();
            let and = a.intersection(b).unwrap();
            let diff = a.subtract(b).unwrap();
            let xor = a.xor(b).unwrap();
            for y in -22..36 {
                for x in -22..36 {
                    let pt = Point::new(x, y);
                    let (in_a, in_b) = (covers(a, pt), covers(b, pt));
                    assert_eq!(or.contains_point(pt), in_a || in_b);
                    assert_eq!(and.contains_point(pt), in_a && in_b);
                    assert_eq!(diff.contains_point(pt), in_a && !in_b);
                    assert_eq!(xor.contains_point(pt), in_a != in_b);
                }
            }
        }
    }
}

#[test]
fn test_combine_into_source() {
    for (a, b) in regions(7, 8).iter().zip(regions(8, 8).iter()) {
        let expected = a.subtract(b).unwrap();
        let mut dst = a.clone();
        let src = dst.clone();
        dst.combine(&src, b, CombineMode::Diff).unwrap();
        assert_eq!(dst, expected);

        let mut dst = a.clone();
        dst.combine_with(b, CombineMode::Xor).unwrap();
        assert_eq!(dst, a.xor(b).unwrap());
    }
}

#[test]
fn test_offset_preserves_shape() {
    for mut a in regions(9, 10) {
        let original = a.clone();
        a.offset(7, -3).unwrap();
        check(&a);
        if !original.is_empty() {
            let mut expected = original.bounding_box();
            expected.offset(7, -3);
            assert_eq!(a.bounding_box(), expected);
        }
        a.offset(-7, 3).unwrap();
        assert_eq!(a, original);
    }
}

#[test]
fn test_region_data_round_trip() {
    for a in regions(10, 20) {
        let size = a.get_region_data(None).unwrap();
        let mut buf = vec![0u8; size];
        assert_eq!(a.get_region_data(Some(&mut buf)).unwrap(), size);
        let rebuilt = Region::from_region_bytes(&buf).unwrap();
        assert_eq!(rebuilt, a);
        assert_eq!(rebuilt.rects(), a.rects());
    }
}

#[test]
fn test_frame_stays_inside_region() {
    for a in regions(11, 10).into_iter().filter(|r| !r.is_empty()) {
        let frame = a.frame(1, 1).unwrap();
        check(&frame);
        assert!(frame.subtract(&a).unwrap().is_empty());
    }
}
