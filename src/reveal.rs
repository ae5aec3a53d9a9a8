//! One-way reveal latches for sections further down the page.

use std::sync::{Arc, Mutex};

use crate::observe::{Observable, Subscription};

/// Opens on the first `true` and never closes again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latch {
    open: bool,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` only for the observation that opened the latch.
    pub fn observe(&mut self, condition: bool) -> bool {
        if self.open || !condition {
            return false;
        }
        self.open = true;
        true
    }

    /// Follows a boolean source and calls `on_open` once.
    pub fn follow<O, F>(this: &Arc<Mutex<Self>>, source: &O, on_open: F) -> Subscription
    where
        O: Observable<bool>,
        F: Fn() + Send + Sync + 'static,
    {
        let latch = Arc::clone(this);
        source.subscribe(Arc::new(move |visible: &bool| {
            let opened = latch.lock().expect("latch lock poisoned").observe(*visible);
            if opened {
                on_open();
            }
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGate {
    threshold_px: f64,
    latch: Latch,
}

impl ScrollGate {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            latch: Latch::new(),
        }
    }

    pub fn observe_scroll(&mut self, offset_px: f64) -> bool {
        self.latch.observe(offset_px > self.threshold_px)
    }

    pub fn is_open(&self) -> bool {
        self.latch.is_open()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Bio,
    Portfolio,
    Skills,
    Education,
    Resume,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Bio,
        Section::Portfolio,
        Section::Skills,
        Section::Education,
        Section::Resume,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Bio => "bio",
            Section::Portfolio => "portfolio",
            Section::Skills => "skills",
            Section::Education => "education",
            Section::Resume => "resume",
        }
    }
}

/// Which sections are mounted.
///
/// The bio opens when the hero is scrolled away or when the hero sequence
/// reaches it. Everything from the portfolio down opens the first time the
/// sentinel below the hero enters the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageReveal {
    hero_dismissed: ScrollGate,
    bio: Latch,
    sentinel: Latch,
}

impl PageReveal {
    pub fn new(scroll_threshold_px: f64) -> Self {
        Self {
            hero_dismissed: ScrollGate::new(scroll_threshold_px),
            bio: Latch::new(),
            sentinel: Latch::new(),
        }
    }

    pub fn observe_scroll(&mut self, offset_px: f64) -> bool {
        let dismissed = self.hero_dismissed.observe_scroll(offset_px);
        if dismissed {
            self.bio.observe(true);
        }
        dismissed
    }

    pub fn observe_sentinel(&mut self, intersecting: bool) -> bool {
        self.sentinel.observe(intersecting)
    }

    pub fn reveal_bio(&mut self) -> bool {
        self.bio.observe(true)
    }

    pub fn hero_dismissed(&self) -> bool {
        self.hero_dismissed.is_open()
    }

    pub fn is_revealed(&self, section: Section) -> bool {
        match section {
            Section::Bio => self.bio.is_open(),
            Section::Portfolio | Section::Skills | Section::Education | Section::Resume => {
                self.sentinel.is_open()
            }
        }
    }

    /// Wires scroll offset and sentinel intersection into `this`. `on_change`
    /// runs after any latch opens.
    pub fn follow<S, V, F>(
        this: &Arc<Mutex<Self>>,
        scroll: &S,
        sentinel: &V,
        on_change: F,
    ) -> [Subscription; 2]
    where
        S: Observable<f64>,
        V: Observable<bool>,
        F: Fn(PageReveal) + Send + Sync + 'static,
    {
        let on_change = Arc::new(on_change);
        let scroll_sub = {
            let reveal = Arc::clone(this);
            let on_change = Arc::clone(&on_change);
            scroll.subscribe(Arc::new(move |offset: &f64| {
                let snapshot = {
                    let mut r = reveal.lock().expect("reveal lock poisoned");
                    r.observe_scroll(*offset).then_some(*r)
                };
                if let Some(snapshot) = snapshot {
                    on_change(snapshot);
                }
            }))
        };
        let sentinel_sub = {
            let reveal = Arc::clone(this);
            sentinel.subscribe(Arc::new(move |visible: &bool| {
                let snapshot = {
                    let mut r = reveal.lock().expect("reveal lock poisoned");
                    r.observe_sentinel(*visible).then_some(*r)
                };
                if let Some(snapshot) = snapshot {
                    on_change(snapshot);
                }
            }))
        };
        [scroll_sub, sentinel_sub]
    }
}
