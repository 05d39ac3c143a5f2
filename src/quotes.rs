//! Flavor-text decks
//!
//! Each category owns a shuffled queue of quote indices. Drawing pops from
//! the queue and reshuffles only on exhaustion, so no quote repeats until
//! every quote in its category has been shown. The deck takes the RNG
//! explicitly; there is no module-level state.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Quote categories shown at different moments of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteCategory {
    LevelComplete,
    GameOver,
    ExtraLife,
    Taunt,
}

/// Static quote table per category
fn quotes_for(category: QuoteCategory) -> &'static [&'static str] {
    match category {
        QuoteCategory::LevelComplete => &[
            "Brick by brick.",
            "Demolition complete.",
            "The wall never stood a chance.",
            "Onward and upward.",
            "Cleared for takeoff.",
        ],
        QuoteCategory::GameOver => &[
            "The bricks send their regards.",
            "So close, yet so far.",
            "Gravity always wins.",
            "Another one bites the dust.",
        ],
        QuoteCategory::ExtraLife => &[
            "Back from the brink.",
            "One more chance.",
            "Don't waste it.",
        ],
        QuoteCategory::Taunt => &[
            "Is that all you've got?",
            "The paddle is mightier.",
            "Keep your eye on the ball.",
            "Unbreakable? We'll see.",
        ],
    }
}

/// Shuffled draw-without-repeat decks, one queue per category
#[derive(Debug, Clone, Default)]
pub struct QuoteDeck {
    queues: HashMap<QuoteCategory, Vec<usize>>,
}

impl QuoteDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next quote of a category, reshuffling its queue when empty
    pub fn draw(&mut self, category: QuoteCategory, rng: &mut Pcg32) -> &'static str {
        let table = quotes_for(category);
        let queue = self.queues.entry(category).or_default();

        if queue.is_empty() {
            let mut order: Vec<usize> = (0..table.len()).collect();
            order.shuffle(rng);
            *queue = order;
        }

        match queue.pop() {
            Some(i) => table[i],
            // Unreachable while every table is non-empty
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_no_repeat_until_category_exhausted() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut deck = QuoteDeck::new();
        let table = quotes_for(QuoteCategory::LevelComplete);

        let drawn: HashSet<&str> = (0..table.len())
            .map(|_| deck.draw(QuoteCategory::LevelComplete, &mut rng))
            .collect();
        assert_eq!(drawn.len(), table.len());
    }

    #[test]
    fn test_deck_reshuffles_after_exhaustion() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut deck = QuoteDeck::new();
        let table_len = quotes_for(QuoteCategory::GameOver).len();

        for _ in 0..table_len * 3 {
            let quote = deck.draw(QuoteCategory::GameOver, &mut rng);
            assert!(!quote.is_empty());
        }
    }

    #[test]
    fn test_categories_draw_independently() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut deck = QuoteDeck::new();
        let first = deck.draw(QuoteCategory::Taunt, &mut rng);
        // Drawing from another category does not disturb the taunt queue
        deck.draw(QuoteCategory::ExtraLife, &mut rng);
        let second = deck.draw(QuoteCategory::Taunt, &mut rng);
        assert_ne!(first, second);
    }
}
