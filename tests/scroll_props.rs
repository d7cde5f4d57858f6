// Property tests for scroll state invariants

use crashlens::ui::navigation::ScrollState;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Bounds(usize, usize),
    Scroll(isize),
    Reveal(usize, usize),
    Animate,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..200, 0usize..50).prop_map(|(c, v)| Op::Bounds(c, v)),
        (-50isize..50).prop_map(Op::Scroll),
        (0usize..200, 0usize..50).prop_map(|(r, v)| Op::Reveal(r, v)),
        Just(Op::Animate),
    ]
}

proptest! {
    #[test]
    fn target_stays_in_range(ops in proptest::collection::vec(op(), 1..64), k in 0.05f32..1.0) {
        let mut scroll = ScrollState::new();
        for op in ops {
            match op {
                Op::Bounds(content, visible) => {
                    scroll.set_bounds(content, visible);
                    prop_assert_eq!(scroll.max(), content.saturating_sub(visible));
                }
                Op::Scroll(rows) => scroll.scroll_by(rows),
                Op::Reveal(row, visible) => scroll.ensure_visible(row, visible),
                Op::Animate => scroll.animate(k),
            }
            prop_assert!(scroll.target() <= scroll.max());
        }
    }

    #[test]
    fn smoothing_converges_without_overshoot(
        start in 0usize..100,
        end in 0usize..100,
        k in 0.05f32..1.0,
    ) {
        let mut scroll = ScrollState::new();
        scroll.set_bounds(200, 10);
        scroll.scroll_by(start as isize);
        for _ in 0..200 {
            scroll.animate(1.0);
        }
        prop_assert_eq!(scroll.smoothed(), start as f32);

        scroll.scroll_by(end as isize - start as isize);
        let target = end as f32;
        let mut distance = (target - scroll.smoothed()).abs();
        let below = scroll.smoothed() <= target;

        for _ in 0..400 {
            scroll.animate(k);
            let now = (target - scroll.smoothed()).abs();
            prop_assert!(now <= distance);
            prop_assert_eq!(scroll.smoothed() <= target, below || scroll.smoothed() == target);
            distance = now;
        }
        prop_assert_eq!(scroll.smoothed(), target);
    }
}
