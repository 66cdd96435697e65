use duel_shooter::collision::is_colliding;
use duel_shooter::entities::Rect;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn random_rect(rng: &mut StdRng) -> Rect {
    Rect::new(
        rng.gen_range(-100.0..900.0),
        rng.gen_range(-100.0..700.0),
        rng.gen_range(1.0..120.0),
        rng.gen_range(1.0..120.0),
    )
}

#[test]
fn overlapping_rects_collide() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(is_colliding(&a, &b));
}

#[test]
fn contained_rect_collides() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
    assert!(is_colliding(&outer, &inner));
    assert!(is_colliding(&inner, &outer));
}

#[test]
fn touching_edges_do_not_collide() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let right = Rect::new(10.0, 0.0, 10.0, 10.0);
    let below = Rect::new(0.0, 10.0, 10.0, 10.0);
    assert!(!is_colliding(&a, &right));
    assert!(!is_colliding(&a, &below));
}

#[test]
fn overlap_on_one_axis_only_is_not_a_collision() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    // Same rows, far apart horizontally
    assert!(!is_colliding(&a, &Rect::new(50.0, 0.0, 10.0, 10.0)));
    // Same columns, far apart vertically
    assert!(!is_colliding(&a, &Rect::new(0.0, 50.0, 10.0, 10.0)));
}

#[test]
fn collision_is_symmetric() {
    let mut rng = seeded_rng();
    for _ in 0..2_000 {
        let a = random_rect(&mut rng);
        let b = random_rect(&mut rng);
        assert_eq!(is_colliding(&a, &b), is_colliding(&b, &a), "{a:?} vs {b:?}");
    }
}

#[test]
fn separated_rects_never_collide() {
    let mut rng = seeded_rng();
    for _ in 0..2_000 {
        let a = random_rect(&mut rng);
        let mut b = random_rect(&mut rng);
        let gap = rng.gen_range(0.0..50.0);
        if rng.gen_bool(0.5) {
            // push b fully to the right of a
            b.x = a.x + a.width + gap;
        } else {
            // push b fully below a
            b.y = a.y + a.height + gap;
        }
        assert!(!is_colliding(&a, &b), "{a:?} vs {b:?}");
        assert!(!is_colliding(&b, &a), "{b:?} vs {a:?}");
    }
}
