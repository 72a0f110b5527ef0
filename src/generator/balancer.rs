// src/generator/balancer.rs

use rand::Rng;

use crate::models::manual::QuestionCategory;

use super::sampler::draw_without_replacement;

/// Categories allowed to fill the remaining slots of a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryAllocation {
    pub text_categories: Vec<i32>,
    pub image_categories: Vec<i32>,

    /// Upper bound on text questions: half the remainder, rounded down.
    pub max_text_count: usize,
}

/// Draws up to `remainder` distinct categories and splits them into buckets.
///
/// Categories are visited in draw order. A text-eligible category joins the
/// text bucket until it holds `max_text_count` entries; after that every
/// category, text-eligible or not, lands in the image bucket. When fewer
/// categories exist than `remainder`, all of them are used.
pub fn balance_categories<R: Rng + ?Sized>(
    rng: &mut R,
    categories: &[QuestionCategory],
    remainder: usize,
) -> CategoryAllocation {
    let max_text_count = remainder / 2;
    let mut allocation = CategoryAllocation {
        max_text_count,
        ..Default::default()
    };

    if categories.len() < remainder {
        tracing::debug!(
            "Only {} categories for {} open slots",
            categories.len(),
            remainder
        );
    }

    for category in draw_without_replacement(rng, categories, remainder) {
        if !category.image_only && allocation.text_categories.len() < max_text_count {
            allocation.text_categories.push(category.id);
        } else {
            allocation.image_categories.push(category.id);
        }
    }

    allocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn category(id: i32, image_only: bool) -> QuestionCategory {
        QuestionCategory {
            id,
            name: format!("category {id}"),
            is_active: true,
            image_only,
        }
    }

    #[test]
    fn caps_text_bucket_at_half_the_remainder() {
        // Four text-eligible and two image-only categories.
        let categories: Vec<_> = (1..=4)
            .map(|id| category(id, false))
            .chain((5..=6).map(|id| category(id, true)))
            .collect();

        for seed in 0..100 {
            let allocation =
                balance_categories(&mut StdRng::seed_from_u64(seed), &categories, 6);

            assert_eq!(allocation.max_text_count, 3);
            assert_eq!(allocation.text_categories.len(), 3);
            assert_eq!(allocation.image_categories.len(), 3);
            assert!(allocation.image_categories.contains(&5));
            assert!(allocation.image_categories.contains(&6));
            assert!(allocation.text_categories.iter().all(|id| *id <= 4));
        }
    }

    #[test]
    fn overflow_text_categories_go_to_image_bucket() {
        let categories: Vec<_> = (1..=5).map(|id| category(id, false)).collect();
        let allocation = balance_categories(&mut StdRng::seed_from_u64(9), &categories, 5);

        assert_eq!(allocation.max_text_count, 2);
        assert_eq!(allocation.text_categories.len(), 2);
        assert_eq!(allocation.image_categories.len(), 3);
    }

    #[test]
    fn caps_selection_to_available_categories() {
        let categories = vec![category(1, false), category(2, true)];
        let allocation = balance_categories(&mut StdRng::seed_from_u64(2), &categories, 6);

        assert_eq!(allocation.max_text_count, 3);
        assert_eq!(allocation.text_categories, vec![1]);
        assert_eq!(allocation.image_categories, vec![2]);
    }

    #[test]
    fn no_categories_means_empty_buckets() {
        let allocation = balance_categories(&mut StdRng::seed_from_u64(2), &[], 4);
        assert!(allocation.text_categories.is_empty());
        assert!(allocation.image_categories.is_empty());
    }

    #[test]
    fn odd_remainder_rounds_text_cap_down() {
        let categories: Vec<_> = (1..=3).map(|id| category(id, false)).collect();
        let allocation = balance_categories(&mut StdRng::seed_from_u64(4), &categories, 1);

        assert_eq!(allocation.max_text_count, 0);
        assert!(allocation.text_categories.is_empty());
        assert_eq!(allocation.image_categories.len(), 1);
    }
}
