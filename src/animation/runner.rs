//! Keyed tween runner.
//!
//! Holds at most one tween per key. Starting a tween on a key that is
//! already animating supersedes the running one: its payload is handed back
//! to the caller and it never reports completion.

/// One frame of output from [`TweenRunner::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenFrame<'a, K, P> {
    /// Key the tween is registered under.
    pub key: K,
    /// Payload supplied when the tween was started.
    pub payload: &'a P,
    /// Value after this frame's step.
    pub value: f32,
    /// Whether the tween reached its target on this frame.
    pub done: bool,
}

struct Entry<K, P> {
    key: K,
    tween: super::Tween,
    payload: P,
}

/// Runs independent tweens keyed by `K`, each carrying a payload `P`.
pub struct TweenRunner<K, P> {
    entries: Vec<Entry<K, P>>,
}

impl<K: Copy + PartialEq, P> Default for TweenRunner<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq, P> TweenRunner<K, P> {
    /// Create an empty runner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Start animating `key`. Returns the payload of the tween this one
    /// superseded, if any.
    pub fn animate(
        &mut self,
        key: K,
        tween: super::Tween,
        payload: P,
    ) -> Option<P> {
        let replaced = self
            .entries
            .iter()
            .position(|e| e.key == key)
            .map(|i| self.entries.swap_remove(i).payload);
        self.entries.push(Entry {
            key,
            tween,
            payload,
        });
        replaced
    }

    /// Stop animating `key` without completing it.
    pub fn cancel(&mut self, key: K) -> Option<P> {
        self.entries
            .iter()
            .position(|e| e.key == key)
            .map(|i| self.entries.swap_remove(i).payload)
    }

    /// Step every tween once, handing each frame to `apply`. Finished tweens
    /// are removed after their final frame has been applied.
    pub fn tick(&mut self, mut apply: impl FnMut(TweenFrame<'_, K, P>)) {
        for entry in &mut self.entries {
            let value = entry.tween.step();
            apply(TweenFrame {
                key: entry.key,
                payload: &entry.payload,
                value,
                done: entry.tween.is_done(),
            });
        }
        self.entries.retain(|e| !e.tween.is_done());
    }

    /// Whether `key` currently has a running tween.
    #[must_use]
    pub fn is_animating(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Whether any tween is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Drop every running tween.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Rate, Tween};
    use super::*;

    #[test]
    fn superseded_tween_never_completes() {
        let mut runner: TweenRunner<u8, &str> = TweenRunner::new();
        assert!(runner
            .animate(0, Tween::new(0.0, 1.0, Rate::Linear(0.5)), "first")
            .is_none());
        let mut seen = Vec::new();
        runner.tick(|f| seen.push((*f.payload, f.done)));
        assert_eq!(
            runner.animate(0, Tween::new(0.0, 1.0, Rate::Linear(0.5)), "second"),
            Some("first")
        );
        runner.tick(|f| seen.push((*f.payload, f.done)));
        runner.tick(|f| seen.push((*f.payload, f.done)));
        assert_eq!(
            seen,
            vec![("first", false), ("second", false), ("second", true)]
        );
        assert!(!runner.is_active());
    }

    #[test]
    fn keys_animate_independently() {
        let mut runner: TweenRunner<u8, ()> = TweenRunner::new();
        let _ = runner.animate(1, Tween::new(0.0, 1.0, Rate::Linear(1.0)), ());
        let _ = runner.animate(2, Tween::new(0.0, 1.0, Rate::Linear(0.25)), ());
        runner.tick(|_| {});
        assert!(!runner.is_animating(1));
        assert!(runner.is_animating(2));
    }
}
