//! Damage tracking for partial compositing.
//!
//! [`DamageTracker`] accumulates the dirty areas reported by expose-requests
//! into one bounding area, clipped to the viewport. The compositor repaints
//! only that area and hands it to the host as the dirty-rectangle hint.

use crate::types::Area;

/// Tracks damaged (dirty) areas that need compositing.
///
/// # Example
///
/// ```
/// use horizon_strata_render::{Area, DamageTracker};
///
/// let mut tracker = DamageTracker::with_viewport(Area::new(0.0, 0.0, 800.0, 600.0));
/// tracker.add_damage(Area::new(10.0, 10.0, 50.0, 30.0));
/// tracker.add_damage(Area::new(100.0, 100.0, 20.0, 20.0));
///
/// assert_eq!(tracker.take(), Some(Area::new(10.0, 10.0, 110.0, 110.0)));
/// assert!(!tracker.has_damage());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DamageTracker {
    /// The accumulated damage (union of all dirty areas).
    damage: Option<Area>,
    /// Number of areas added since the last reset.
    damage_count: u32,
    /// Viewport bounds used to clip damage.
    viewport: Option<Area>,
}

impl DamageTracker {
    /// Create a new damage tracker without viewport clipping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a damage tracker clipping to the given viewport.
    pub fn with_viewport(viewport: Area) -> Self {
        Self {
            damage: None,
            damage_count: 0,
            viewport: Some(viewport),
        }
    }

    /// Set the viewport bounds.
    ///
    /// Accumulated damage is re-clipped to the new viewport.
    pub fn set_viewport(&mut self, viewport: Area) {
        self.viewport = Some(viewport);
        self.damage = self.damage.and_then(|d| d.intersect(&viewport));
    }

    /// The current viewport, if any.
    pub fn viewport(&self) -> Option<Area> {
        self.viewport
    }

    /// Add a damaged area.
    pub fn add_damage(&mut self, area: Area) {
        if area.is_empty() {
            return;
        }

        let area = match &self.viewport {
            Some(viewport) => match area.intersect(viewport) {
                Some(clipped) => clipped,
                None => return,
            },
            None => area,
        };

        self.damage_count += 1;
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(&area),
            None => area,
        });
    }

    /// Mark the whole viewport as damaged.
    pub fn invalidate_all(&mut self) {
        if let Some(viewport) = self.viewport {
            self.damage = Some(viewport);
            self.damage_count += 1;
        }
    }

    /// The accumulated damage, if any.
    pub fn damage_region(&self) -> Option<Area> {
        self.damage
    }

    /// Whether any damage is pending.
    pub fn has_damage(&self) -> bool {
        self.damage.is_some()
    }

    /// Number of areas merged into the current damage.
    pub fn damage_count(&self) -> u32 {
        self.damage_count
    }

    /// Take the accumulated damage and reset the tracker.
    pub fn take(&mut self) -> Option<Area> {
        self.damage_count = 0;
        self.damage.take()
    }

    /// Drop all pending damage.
    pub fn clear(&mut self) {
        self.damage = None;
        self.damage_count = 0;
    }
}
