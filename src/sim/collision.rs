//! Basket / item collision
//!
//! Both sprites are treated as circles around their centers. The hit radius
//! is pulled inward by a tolerance so a catch needs real overlap.

use glam::Vec2;

use super::state::{Basket, FallingItem};

/// True when two centers are strictly closer than `reach`
#[inline]
pub fn centers_within(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}

/// Hit radius for a basket/item pair
#[inline]
pub fn catch_reach(basket_width: f32, item_size: f32, tolerance: f32) -> f32 {
    basket_width / 2.0 + item_size / 2.0 - tolerance
}

/// Check whether the basket catches an item
pub fn basket_catches(basket: &Basket, item: &FallingItem, tolerance: f32) -> bool {
    centers_within(
        basket.center(),
        item.center(),
        catch_reach(basket.width, item.size, tolerance),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ItemKind;
    use crate::tuning::Tuning;
    use crate::Viewport;
    use proptest::prelude::*;

    fn basket() -> Basket {
        Basket::new(Viewport::new(600.0, 480.0), &Tuning::default())
    }

    fn item_centered_at(center: Vec2) -> FallingItem {
        FallingItem::new(1, ItemKind::Gold, 1, center - Vec2::splat(25.0), 0.0)
    }

    #[test]
    fn test_reach_with_default_sizes() {
        assert_eq!(catch_reach(80.0, 50.0, 10.0), 55.0);
    }

    #[test]
    fn test_direct_hit() {
        let b = basket();
        assert!(basket_catches(&b, &item_centered_at(b.center()), 10.0));
    }

    #[test]
    fn test_tolerance_tightens_hit() {
        let b = basket();
        // 60px away: inside naive overlap (65) but outside the tightened radius (55)
        let item = item_centered_at(b.center() + Vec2::new(60.0, 0.0));
        assert!(!basket_catches(&b, &item, 10.0));
        assert!(basket_catches(&b, &item, 0.0));
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let b = basket();
        let item = item_centered_at(b.center() + Vec2::new(0.0, -55.0));
        assert!(!basket_catches(&b, &item, 10.0));
        let item = item_centered_at(b.center() + Vec2::new(0.0, -54.9));
        assert!(basket_catches(&b, &item, 10.0));
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
            reach in 0.0f32..200.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(centers_within(a, b, reach), centers_within(b, a, reach));
            prop_assert_eq!(centers_within(a, b, reach), a.distance(b) < reach);
        }
    }
}
