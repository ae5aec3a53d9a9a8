//! Procedural decoration for the two background scenes.
//!
//! Fields are generated once per mount and only regenerated when the viewport
//! moves to a different size bucket. Counts shrink on small screens.

use fastrand::Rng;

use crate::theme::DisplayMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Daylight,
    StarryNight,
}

impl SceneKind {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Self::Daylight,
            DisplayMode::Dark => Self::StarryNight,
        }
    }
}

/// Which scene layers are in the DOM and which one is showing. A layer stays
/// mounted once shown, so a mode change fades one out while the other fades in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneLayers {
    active: Option<SceneKind>,
    daylight: bool,
    starry_night: bool,
}

impl SceneLayers {
    pub fn show(&mut self, scene: Option<SceneKind>) {
        match scene {
            Some(SceneKind::Daylight) => self.daylight = true,
            Some(SceneKind::StarryNight) => self.starry_night = true,
            None => {}
        }
        self.active = scene;
    }

    pub fn active(&self) -> Option<SceneKind> {
        self.active
    }

    pub fn is_mounted(&self, kind: SceneKind) -> bool {
        match kind {
            SceneKind::Daylight => self.daylight,
            SceneKind::StarryNight => self.starry_night,
        }
    }

    pub fn is_active(&self, kind: SceneKind) -> bool {
        self.active == Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportBucket {
    Narrow,
    Medium,
    /// Also used before the width is known, e.g. during server rendering.
    #[default]
    Wide,
}

impl ViewportBucket {
    pub fn from_width(width_px: f64) -> Self {
        if width_px < 480.0 {
            Self::Narrow
        } else if width_px < 768.0 {
            Self::Medium
        } else {
            Self::Wide
        }
    }
}

fn range(rng: &mut Rng, min: f64, span: f64) -> f64 {
    rng.f64() * span + min
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: usize,
    /// Percent of the viewport.
    pub x: f64,
    pub y: f64,
    /// Pixels.
    pub size: f64,
    pub speed: f64,
    pub opacity: f64,
}

pub const DEFAULT_PARTICLES: usize = 20;

pub fn daylight_particle_count(base: usize, bucket: ViewportBucket) -> usize {
    match bucket {
        ViewportBucket::Narrow => 8.max(base / 2),
        ViewportBucket::Medium => 12.max(base * 3 / 4),
        ViewportBucket::Wide => base,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DaylightField {
    pub particles: Vec<Particle>,
}

impl DaylightField {
    pub fn generate(base: usize, bucket: ViewportBucket, rng: &mut Rng) -> Self {
        let particles = (0..daylight_particle_count(base, bucket))
            .map(|id| Particle {
                id,
                x: range(rng, 0.0, 100.0),
                y: range(rng, 0.0, 100.0),
                size: range(rng, 1.0, 4.0),
                speed: range(rng, 0.5, 2.0),
                opacity: range(rng, 0.1, 0.3),
            })
            .collect();
        Self { particles }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Seconds per twinkle cycle.
    pub twinkle_speed: f64,
    pub brightness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    /// Degrees.
    pub angle: f64,
    pub speed: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dust {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarCounts {
    pub stars: usize,
    pub meteors: usize,
    pub dust: usize,
}

impl StarCounts {
    pub fn for_bucket(bucket: ViewportBucket) -> Self {
        let (stars, meteors, dust) = match bucket {
            ViewportBucket::Narrow => (90, 3, 18),
            ViewportBucket::Medium => (120, 4, 24),
            ViewportBucket::Wide => (150, 5, 30),
        };
        Self {
            stars,
            meteors,
            dust,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarryField {
    pub stars: Vec<Star>,
    pub meteors: Vec<Meteor>,
    pub dust: Vec<Dust>,
}

impl StarryField {
    pub fn generate(bucket: ViewportBucket, rng: &mut Rng) -> Self {
        let counts = StarCounts::for_bucket(bucket);
        let stars = (0..counts.stars)
            .map(|id| Star {
                id,
                x: range(rng, 0.0, 100.0),
                y: range(rng, 0.0, 100.0),
                size: range(rng, 0.5, 3.0),
                twinkle_speed: range(rng, 1.0, 3.0),
                brightness: range(rng, 0.2, 0.8),
            })
            .collect();
        // meteors may start a little off-screen so they streak in
        let meteors = (0..counts.meteors)
            .map(|id| Meteor {
                id,
                x: range(rng, -20.0, 120.0),
                y: range(rng, -20.0, 120.0),
                angle: range(rng, 30.0, 60.0),
                speed: range(rng, 1.0, 2.0),
                length: range(rng, 40.0, 60.0),
            })
            .collect();
        let dust = (0..counts.dust)
            .map(|id| Dust {
                id,
                x: range(rng, 0.0, 100.0),
                y: range(rng, 0.0, 100.0),
                size: range(rng, 0.5, 2.0),
            })
            .collect();
        Self {
            stars,
            meteors,
            dust,
        }
    }
}

/// Holds a field and rebuilds it only when the size bucket changes.
#[derive(Debug, Clone)]
pub struct FieldCache<F> {
    bucket: Option<ViewportBucket>,
    field: F,
}

impl<F: Default> Default for FieldCache<F> {
    fn default() -> Self {
        Self {
            bucket: None,
            field: F::default(),
        }
    }
}

impl<F: Default> FieldCache<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the field for `bucket`, generating it on first use or after a
    /// bucket change. The flag reports whether a new field was built.
    pub fn get_or_generate(
        &mut self,
        bucket: ViewportBucket,
        generate: impl FnOnce(ViewportBucket) -> F,
    ) -> (&F, bool) {
        let rebuilt = self.bucket != Some(bucket);
        if rebuilt {
            self.field = generate(bucket);
            self.bucket = Some(bucket);
        }
        (&self.field, rebuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_change_keeps_outgoing_layer_mounted() {
        let mut layers = SceneLayers::default();
        assert!(!layers.is_mounted(SceneKind::Daylight));

        layers.show(Some(SceneKind::Daylight));
        assert!(layers.is_active(SceneKind::Daylight));
        assert!(!layers.is_mounted(SceneKind::StarryNight));

        layers.show(Some(SceneKind::StarryNight));
        assert!(layers.is_mounted(SceneKind::Daylight));
        assert!(!layers.is_active(SceneKind::Daylight));
        assert!(layers.is_active(SceneKind::StarryNight));

        layers.show(None);
        assert_eq!(layers.active(), None);
        assert!(layers.is_mounted(SceneKind::StarryNight));
    }

    #[test]
    fn test_bucket_thresholds() {
        assert_eq!(ViewportBucket::from_width(320.0), ViewportBucket::Narrow);
        assert_eq!(ViewportBucket::from_width(479.9), ViewportBucket::Narrow);
        assert_eq!(ViewportBucket::from_width(480.0), ViewportBucket::Medium);
        assert_eq!(ViewportBucket::from_width(767.0), ViewportBucket::Medium);
        assert_eq!(ViewportBucket::from_width(768.0), ViewportBucket::Wide);
        assert_eq!(ViewportBucket::default(), ViewportBucket::Wide);
    }

    #[test]
    fn test_daylight_counts_scale_down() {
        assert_eq!(daylight_particle_count(20, ViewportBucket::Wide), 20);
        assert_eq!(daylight_particle_count(20, ViewportBucket::Medium), 15);
        assert_eq!(daylight_particle_count(20, ViewportBucket::Narrow), 10);
        // floors kick in for small bases
        assert_eq!(daylight_particle_count(10, ViewportBucket::Narrow), 8);
        assert_eq!(daylight_particle_count(10, ViewportBucket::Medium), 12);
    }

    #[test]
    fn test_daylight_values_in_range() {
        let mut rng = Rng::with_seed(7);
        let field = DaylightField::generate(DEFAULT_PARTICLES, ViewportBucket::Wide, &mut rng);
        assert_eq!(field.particles.len(), 20);
        for (i, p) in field.particles.iter().enumerate() {
            assert_eq!(p.id, i);
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..100.0).contains(&p.y));
            assert!((1.0..5.0).contains(&p.size));
            assert!((0.5..2.5).contains(&p.speed));
            assert!((0.1..0.4).contains(&p.opacity));
        }
    }

    #[test]
    fn test_starry_counts_and_ranges() {
        let mut rng = Rng::with_seed(42);
        let field = StarryField::generate(ViewportBucket::Narrow, &mut rng);
        assert_eq!(field.stars.len(), 90);
        assert_eq!(field.meteors.len(), 3);
        assert_eq!(field.dust.len(), 18);
        for s in &field.stars {
            assert!((0.5..3.5).contains(&s.size));
            assert!((1.0..4.0).contains(&s.twinkle_speed));
            assert!((0.2..1.0).contains(&s.brightness));
        }
        for m in &field.meteors {
            assert!((-20.0..100.0).contains(&m.x));
            assert!((30.0..90.0).contains(&m.angle));
            assert!((40.0..100.0).contains(&m.length));
        }
        for d in &field.dust {
            assert!((0.5..2.5).contains(&d.size));
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = StarryField::generate(ViewportBucket::Wide, &mut Rng::with_seed(1));
        let b = StarryField::generate(ViewportBucket::Wide, &mut Rng::with_seed(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_regenerates_only_on_bucket_change() {
        let mut rng = Rng::with_seed(3);
        let mut cache = FieldCache::<DaylightField>::new();

        let (first, rebuilt) =
            cache.get_or_generate(ViewportBucket::Wide, |b| DaylightField::generate(20, b, &mut rng));
        assert!(rebuilt);
        let first = first.clone();

        let (same, rebuilt) =
            cache.get_or_generate(ViewportBucket::Wide, |b| DaylightField::generate(20, b, &mut rng));
        assert!(!rebuilt);
        assert_eq!(*same, first);

        let (narrow, rebuilt) =
            cache.get_or_generate(ViewportBucket::Narrow, |b| DaylightField::generate(20, b, &mut rng));
        assert!(rebuilt);
        assert_eq!(narrow.particles.len(), 10);
    }

    #[test]
    fn test_scene_for_mode() {
        assert_eq!(SceneKind::for_mode(DisplayMode::Light), SceneKind::Daylight);
        assert_eq!(SceneKind::for_mode(DisplayMode::Dark), SceneKind::StarryNight);
    }
}
