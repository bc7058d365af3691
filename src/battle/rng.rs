use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
enum RngSource {
    /// Fixed 1..=100 rolls, replayed in order and cycled when exhausted.
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// The battle's only source of randomness. Every roll is a percentile in `1..=100`.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(1..=100u8),
            RngSource::Scripted { outcomes, index } => {
                if outcomes.is_empty() {
                    50
                } else {
                    if *index >= outcomes.len() {
                        tracing::warn!(reason, "Scripted rolls exhausted, replaying from the start");
                        *index = 0;
                    }
                    let outcome = outcomes[*index].clamp(1, 100);
                    *index += 1;
                    outcome
                }
            }
        };

        tracing::trace!(outcome, reason, "Consumed roll");
        outcome
    }

    /// Map the next roll linearly onto `[min, max]`: a roll of 1 gives `min`, 100 gives `max`.
    pub fn next_in_band(&mut self, min: f32, max: f32, reason: &str) -> f32 {
        let roll = self.next_outcome(reason) as f32;
        min + (max - min) * (roll - 1.0) / 99.0
    }

    /// True with `percent` percent probability.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripted_rolls_replay_in_order() {
        let mut rng = TurnRng::new_for_test(vec![5, 95]);
        assert_eq!(rng.next_outcome("a"), 5);
        assert_eq!(rng.next_outcome("b"), 95);
        assert_eq!(rng.next_outcome("c"), 5);
    }

    #[test]
    fn test_band_endpoints() {
        let mut rng = TurnRng::new_for_test(vec![1, 100]);
        assert!((rng.next_in_band(0.85, 1.10, "low") - 0.85).abs() < 1e-6);
        assert!((rng.next_in_band(0.85, 1.10, "high") - 1.10).abs() < 1e-6);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = TurnRng::from_seed(42);
        let mut b = TurnRng::from_seed(42);
        let rolls_a: Vec<u8> = (0..20).map(|_| a.next_outcome("a")).collect();
        let rolls_b: Vec<u8> = (0..20).map(|_| b.next_outcome("b")).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|r| (1..=100).contains(r)));
    }
}
