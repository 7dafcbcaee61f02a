//! Bounded position history behind a shooting star

use std::collections::VecDeque;

use crate::math::Vec2;

/// One recorded trail point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    pub position: Vec2,
    pub opacity: f32,
}

/// Ring of the most recent samples, oldest first
#[derive(Clone, Debug)]
pub struct Trail {
    samples: VecDeque<TrailSample>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once over capacity
    pub fn push(&mut self, sample: TrailSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Empty the trail and adopt a new bound
    pub fn reset(&mut self, capacity: usize) {
        self.samples.clear();
        self.capacity = capacity.max(1);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Newest sample
    pub fn head(&self) -> Option<&TrailSample> {
        self.samples.back()
    }

    /// Consecutive sample pairs with their position along the trail:
    /// `0.0` just past the tail, `1.0` at the head
    pub fn segments(&self) -> impl Iterator<Item = (f32, &TrailSample, &TrailSample)> {
        let last = self.samples.len().saturating_sub(1).max(1) as f32;
        self.samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .enumerate()
            .map(move |(i, (from, to))| ((i + 1) as f32 / last, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32) -> TrailSample {
        TrailSample {
            position: Vec2::new(x, 0.0),
            opacity: 1.0,
        }
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::with_capacity(3);
        for x in 0..5 {
            trail.push(sample(x as f32));
            assert!(trail.len() <= 3);
        }
        let xs: Vec<(f32, f32)> = trail
            .segments()
            .map(|(_, from, to)| (from.position.x, to.position.x))
            .collect();
        assert_eq!(xs, vec![(2.0, 3.0), (3.0, 4.0)]);
        assert_eq!(trail.head().map(|s| s.position.x), Some(4.0));
    }

    #[test]
    fn test_trail_reset() {
        let mut trail = Trail::with_capacity(3);
        trail.push(sample(1.0));
        trail.reset(20);
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 20);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut trail = Trail::with_capacity(0);
        trail.push(sample(1.0));
        trail.push(sample(2.0));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_segments_scale_toward_head() {
        let mut trail = Trail::with_capacity(10);
        for x in 0..5 {
            trail.push(sample(x as f32));
        }
        let weights: Vec<f32> = trail.segments().map(|(t, _, _)| t).collect();
        assert_eq!(weights, vec![0.25, 0.5, 0.75, 1.0]);

        let (_, from, to) = trail.segments().last().unwrap();
        assert_eq!(from.position.x, 3.0);
        assert_eq!(to.position.x, 4.0);
    }

    #[test]
    fn test_single_sample_has_no_segments() {
        let mut trail = Trail::with_capacity(10);
        trail.push(sample(0.0));
        assert_eq!(trail.segments().count(), 0);
    }
}
