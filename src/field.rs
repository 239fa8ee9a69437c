use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};

use crate::util::random_number;

/// What the player can click on. Carrots are the good items, bugs the bad ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ItemKind {
    Carrot,
    Bug,
}

/// A position in field units (not terminal cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Endless horizontal back-and-forth: 0 -> amplitude -> 0 once per period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sway {
    pub amplitude: f64,
    pub period: Duration,
}

impl Sway {
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return 0.0;
        }
        let phase = (elapsed.as_secs_f64() % period) / period;
        let ramp = if phase < 0.5 {
            phase * 2.0
        } else {
            (1.0 - phase) * 2.0
        };
        self.amplitude * ramp
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub kind: ItemKind,
    pub position: Point,
    pub sway: Option<Sway>,
}

impl PlacedItem {
    fn contains(&self, point: Point, size: f64) -> bool {
        point.x >= self.position.x
            && point.x < self.position.x + size
            && point.y >= self.position.y
            && point.y < self.position.y + size
    }
}

/// Field dimensions and animation limits, all in field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub width: f64,
    pub height: f64,
    pub item_size: f64,
    pub max_sway: f64,
    pub min_period: Duration,
    pub max_period: Duration,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            item_size: 80.0,
            max_sway: 300.0,
            min_period: Duration::from_millis(2000),
            max_period: Duration::from_millis(3000),
        }
    }
}

pub type ActivationListener = Box<dyn FnMut(ItemKind)>;

/// The playing surface as seen by the game controller.
pub trait FieldView {
    /// Drop everything and scatter `carrots` then `bugs` at random.
    fn place_items(&mut self, carrots: u32, bugs: u32);
    /// Start the cosmetic sway on every bug.
    fn animate_bad_items(&mut self);
    fn set_activation_listener(&mut self, listener: ActivationListener);
}

pub struct Field {
    geometry: FieldGeometry,
    items: Vec<PlacedItem>,
    rng: StdRng,
    listener: Option<ActivationListener>,
    animated_at: Option<Instant>,
}

impl Field {
    pub fn new(geometry: FieldGeometry) -> Self {
        Self::with_rng(geometry, StdRng::from_entropy())
    }

    pub fn with_seed(geometry: FieldGeometry, seed: u64) -> Self {
        Self::with_rng(geometry, StdRng::seed_from_u64(seed))
    }

    fn with_rng(geometry: FieldGeometry, rng: StdRng) -> Self {
        Self {
            geometry,
            items: Vec::new(),
            rng,
            listener: None,
            animated_at: None,
        }
    }

    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    /// Items in paint order; later items sit on top.
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|i| i.kind == kind).count()
    }

    /// Horizontal render offset of `item` at `now`. Zero until bugs are animated.
    pub fn sway_offset(&self, item: &PlacedItem, now: Instant) -> f64 {
        match (item.sway, self.animated_at) {
            (Some(sway), Some(started)) => sway.offset_at(now.saturating_duration_since(started)),
            _ => 0.0,
        }
    }

    /// Delegated click handler for the whole field. The topmost item under
    /// `point` wins; carrots are pulled out, bugs stay put. Clicks on bare
    /// ground are ignored.
    pub fn click(&mut self, point: Point) -> Option<ItemKind> {
        let size = self.geometry.item_size;
        let idx = self.items.iter().rposition(|i| i.contains(point, size))?;
        let kind = self.items[idx].kind;
        if kind == ItemKind::Carrot {
            self.items.remove(idx);
        }

        log::debug!("{} clicked at ({:.0}, {:.0})", kind, point.x, point.y);
        if let Some(listener) = self.listener.as_mut() {
            listener(kind);
        }
        Some(kind)
    }

    fn add_items(&mut self, kind: ItemKind, count: u32) {
        let x2 = self.geometry.width - self.geometry.item_size;
        let y2 = self.geometry.height - self.geometry.item_size;
        for _ in 0..count {
            let x = random_number(&mut self.rng, 0.0, x2);
            let y = random_number(&mut self.rng, 0.0, y2);
            self.items.push(PlacedItem {
                kind,
                position: Point::new(x, y),
                sway: None,
            });
        }
    }
}

impl FieldView for Field {
    fn place_items(&mut self, carrots: u32, bugs: u32) {
        self.items.clear();
        self.animated_at = None;
        self.add_items(ItemKind::Carrot, carrots);
        self.add_items(ItemKind::Bug, bugs);
    }

    fn animate_bad_items(&mut self) {
        let FieldGeometry {
            max_sway,
            min_period,
            max_period,
            ..
        } = self.geometry;
        for item in self.items.iter_mut().filter(|i| i.kind == ItemKind::Bug) {
            let amplitude = random_number(&mut self.rng, 0.0, max_sway);
            let period_ms = random_number(
                &mut self.rng,
                min_period.as_millis() as f64,
                max_period.as_millis() as f64,
            );
            item.sway = Some(Sway {
                amplitude,
                period: Duration::from_millis(period_ms as u64),
            });
        }
        self.animated_at = Some(Instant::now());
    }

    fn set_activation_listener(&mut self, listener: ActivationListener) {
        self.listener = Some(listener);
    }
}
