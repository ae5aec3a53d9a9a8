//! Timed intro: welcome line, name, a short "screen detected" badge, then the
//! background and bio.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    observe::{Observable, Subscription},
    theme::DisplayMode,
    timeline::{Schedule, Timeline, TimelineDriver},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroStep {
    Welcome,
    Name,
    DetectedShown,
    DetectedHidden,
    Background,
    Bio,
}

/// Cue offsets in milliseconds from the moment the display mode is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroTiming {
    pub welcome_ms: u64,
    pub name_ms: u64,
    pub detected_show_ms: u64,
    pub detected_hide_ms: u64,
    pub background_ms: u64,
    pub bio_delay_ms: u64,
    /// Added to every cue unless reduced motion is requested.
    pub motion_offset_ms: u64,
}

impl Default for HeroTiming {
    fn default() -> Self {
        Self {
            welcome_ms: 100,
            name_ms: 900,
            detected_show_ms: 2000,
            detected_hide_ms: 3000,
            background_ms: 3200,
            bio_delay_ms: 250,
            motion_offset_ms: 200,
        }
    }
}

impl HeroTiming {
    /// Effective offset of each step. Every step lands at least 1ms after the
    /// one before it, whatever the configured values are.
    pub fn offsets(&self, reduced_motion: bool) -> [(HeroStep, u64); 6] {
        let base = if reduced_motion { 0 } else { self.motion_offset_ms };
        let bio_delay = if reduced_motion { 0 } else { self.bio_delay_ms };
        let raw = [
            (HeroStep::Welcome, self.welcome_ms + base),
            (HeroStep::Name, self.name_ms + base),
            (HeroStep::DetectedShown, self.detected_show_ms + base),
            (HeroStep::DetectedHidden, self.detected_hide_ms + base),
            (HeroStep::Background, self.background_ms + base),
            (HeroStep::Bio, self.background_ms + base + bio_delay),
        ];
        let mut out = raw;
        for i in 1..out.len() {
            let floor = out[i - 1].1 + 1;
            if out[i].1 < floor {
                out[i].1 = floor;
            }
        }
        out
    }

    pub fn timeline(&self, reduced_motion: bool) -> Timeline<HeroStep> {
        self.offsets(reduced_motion)
            .into_iter()
            .map(|(step, offset)| (offset, step))
            .collect()
    }
}

/// What the hero currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeroView {
    pub welcome: bool,
    pub name: bool,
    pub detected: bool,
    pub background: bool,
    pub bio: bool,
}

impl HeroView {
    pub fn apply(&mut self, step: HeroStep) {
        match step {
            HeroStep::Welcome => self.welcome = true,
            HeroStep::Name => self.name = true,
            HeroStep::DetectedShown => self.detected = true,
            HeroStep::DetectedHidden => self.detected = false,
            HeroStep::Background => self.background = true,
            HeroStep::Bio => self.bio = true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeroSequencer {
    timing: HeroTiming,
    mode: Option<DisplayMode>,
    driver: Option<TimelineDriver<HeroStep>>,
    view: HeroView,
}

impl HeroSequencer {
    pub fn new(timing: HeroTiming) -> Self {
        Self {
            timing,
            mode: None,
            driver: None,
            view: HeroView::default(),
        }
    }

    pub fn mode(&self) -> Option<DisplayMode> {
        self.mode
    }

    pub fn view(&self) -> HeroView {
        self.view
    }

    pub fn is_started(&self) -> bool {
        self.driver.is_some()
    }

    /// Records the display mode. The first call starts the sequence and
    /// returns `true`; later calls only swap the mode.
    pub fn resolve_mode(&mut self, mode: DisplayMode, reduced_motion: bool, now_ms: i64) -> bool {
        self.mode = Some(mode);
        if self.driver.is_some() {
            return false;
        }
        let mut driver = TimelineDriver::new(self.timing.timeline(reduced_motion));
        driver.start(now_ms);
        self.driver = Some(driver);
        log::debug!("hero sequence started in {mode} mode");
        true
    }

    pub fn teardown(&mut self) {
        self.cancel();
    }

    /// Drives the sequencer from a color-scheme source.
    ///
    /// `on_mode` receives every mode change plus whether that change started
    /// the sequence, which is the caller's cue to arm a timer.
    pub fn follow<O, F>(
        this: &Arc<Mutex<Self>>,
        modes: &O,
        reduced_motion: bool,
        clock: Arc<dyn Clock>,
        on_mode: F,
    ) -> Subscription
    where
        O: Observable<DisplayMode>,
        F: Fn(DisplayMode, bool) + Send + Sync + 'static,
    {
        let sequencer = Arc::clone(this);
        modes.subscribe(Arc::new(move |mode: &DisplayMode| {
            let started = sequencer
                .lock()
                .expect("hero sequencer lock poisoned")
                .resolve_mode(*mode, reduced_motion, clock.now_ms());
            on_mode(*mode, started);
        }))
    }
}

impl Schedule for HeroSequencer {
    type Cue = HeroStep;

    fn next_deadline(&self) -> Option<i64> {
        self.driver.as_ref().and_then(|d| d.next_deadline())
    }

    fn advance_to(&mut self, now_ms: i64) -> Vec<HeroStep> {
        let Some(driver) = self.driver.as_mut() else {
            return Vec::new();
        };
        let steps = driver.advance_to(now_ms);
        for step in &steps {
            self.view.apply(*step);
        }
        steps
    }

    fn cancel(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, observe::PushSource};

    const ORDER: [HeroStep; 5] = [
        HeroStep::Welcome,
        HeroStep::Name,
        HeroStep::DetectedShown,
        HeroStep::DetectedHidden,
        HeroStep::Background,
    ];

    fn assert_strictly_ordered(timing: HeroTiming, reduced: bool) {
        let offsets = timing.offsets(reduced);
        let steps = offsets.iter().map(|(s, _)| *s).collect::<Vec<_>>();
        assert_eq!(&steps[..5], &ORDER);
        for pair in offsets.windows(2) {
            assert!(pair[1].1 > pair[0].1, "{:?} not after {:?}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_default_offsets() {
        let offsets = HeroTiming::default().offsets(false);
        let times = offsets.iter().map(|(_, t)| *t).collect::<Vec<_>>();
        assert_eq!(times, vec![300, 1100, 2200, 3200, 3400, 3650]);

        let reduced = HeroTiming::default().offsets(true);
        let times = reduced.iter().map(|(_, t)| *t).collect::<Vec<_>>();
        assert_eq!(times, vec![100, 900, 2000, 3000, 3200, 3201]);
    }

    #[test]
    fn test_order_is_strict_for_any_configuration() {
        let configs = [
            HeroTiming::default(),
            HeroTiming {
                welcome_ms: 0,
                name_ms: 0,
                detected_show_ms: 0,
                detected_hide_ms: 0,
                background_ms: 0,
                bio_delay_ms: 0,
                motion_offset_ms: 0,
            },
            HeroTiming {
                welcome_ms: 5000,
                name_ms: 10,
                detected_show_ms: 4000,
                detected_hide_ms: 20,
                background_ms: 1,
                bio_delay_ms: 7,
                motion_offset_ms: 50,
            },
        ];
        for timing in configs {
            assert_strictly_ordered(timing, false);
            assert_strictly_ordered(timing, true);
        }
    }

    #[test]
    fn test_sequence_does_not_start_without_mode() {
        let mut seq = HeroSequencer::new(HeroTiming::default());
        assert!(!seq.is_started());
        assert_eq!(seq.next_deadline(), None);
        assert!(seq.advance_to(1_000_000).is_empty());
        assert_eq!(seq.view(), HeroView::default());
    }

    #[test]
    fn test_badge_shows_then_hides_before_background() {
        let mut seq = HeroSequencer::new(HeroTiming::default());
        assert!(seq.resolve_mode(DisplayMode::Dark, false, 0));

        seq.advance_to(1_100);
        let v = seq.view();
        assert!(v.welcome && v.name && !v.detected && !v.background);

        seq.advance_to(2_200);
        assert!(seq.view().detected);

        seq.advance_to(3_200);
        assert!(!seq.view().detected);
        assert!(!seq.view().background);

        assert_eq!(seq.advance_to(3_400), vec![HeroStep::Background]);
        assert!(!seq.view().bio);
        assert_eq!(seq.advance_to(3_650), vec![HeroStep::Bio]);
        assert!(seq.view().bio);
        assert_eq!(seq.next_deadline(), None);
    }

    #[test]
    fn test_mode_change_does_not_restart() {
        let mut seq = HeroSequencer::new(HeroTiming::default());
        assert!(seq.resolve_mode(DisplayMode::Light, false, 0));
        seq.advance_to(5_000);
        assert!(!seq.resolve_mode(DisplayMode::Dark, false, 5_000));
        assert_eq!(seq.mode(), Some(DisplayMode::Dark));
        assert!(seq.advance_to(10_000).is_empty());
        assert!(seq.view().background);
    }

    #[test]
    fn test_teardown_cancels_pending_steps() {
        let mut seq = HeroSequencer::new(HeroTiming::default());
        seq.resolve_mode(DisplayMode::Light, true, 0);
        assert_eq!(seq.advance_to(950), vec![HeroStep::Welcome, HeroStep::Name]);
        seq.teardown();
        assert_eq!(seq.next_deadline(), None);
        assert!(seq.advance_to(100_000).is_empty());
        assert!(!seq.view().background);
    }

    #[test]
    fn test_follow_starts_on_first_mode_only() {
        let clock = ManualClock::at(10_000);
        let modes = PushSource::new();
        let seq = Arc::new(Mutex::new(HeroSequencer::new(HeroTiming::default())));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&calls);

        let sub = HeroSequencer::follow(&seq, &modes, false, Arc::new(clock.clone()), move |m, started| {
            record.lock().unwrap().push((m, started));
        });
        assert!(!seq.lock().unwrap().is_started());

        modes.publish(DisplayMode::Light);
        assert_eq!(seq.lock().unwrap().next_deadline(), Some(10_300));

        clock.advance(1_000);
        modes.publish(DisplayMode::Dark);
        // reference time did not move
        assert_eq!(seq.lock().unwrap().next_deadline(), Some(10_300));

        drop(sub);
        modes.publish(DisplayMode::Light);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![(DisplayMode::Light, true), (DisplayMode::Dark, false)]
        );
    }
}
