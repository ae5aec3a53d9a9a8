//! Lazy, battery-friendly playback for the project film reels.
//!
//! The controller never touches a media element. It turns preload-margin,
//! on-screen and tab events into [`MediaCommand`]s which the component
//! applies to its `<video>`.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observe::{Observable, Subscription};

pub const DEFAULT_PRELOAD_MARGIN_PX: u32 = 1000;

/// Delay used in place of an idle callback on hosts without one.
pub const IDLE_FALLBACK_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub src: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_margin")]
    pub preload_margin_px: u32,
    #[serde(default)]
    pub orientation: Orientation,
}

/// Frame shape of a reel. Project captures are phone recordings, so portrait
/// is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn frame_class(self) -> &'static str {
        match self {
            Orientation::Portrait => "aspect-[9/16] w-full max-w-sm mx-auto",
            Orientation::Landscape => "aspect-video w-full",
        }
    }
}

fn default_margin() -> u32 {
    DEFAULT_PRELOAD_MARGIN_PX
}

impl VideoConfig {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            poster: None,
            label: None,
            preload_margin_px: DEFAULT_PRELOAD_MARGIN_PX,
            orientation: Orientation::default(),
        }
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Root margin for the preload observer: the element counts as near while
    /// it is still `preload_margin_px` above or below the viewport.
    pub fn root_margin(&self) -> String {
        let m = self.preload_margin_px;
        format!("{m}px 0px {m}px 0px")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCommand {
    /// Assign the source and start buffering.
    Load { src: String },
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabVisibility {
    Visible,
    Hidden,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("autoplay was blocked by the host")]
    Blocked,
}

#[derive(Debug, Clone)]
pub struct VideoController {
    config: VideoConfig,
    /// `None` until the host reports the preference. Nothing loads or plays
    /// before then.
    reduced_motion: Option<bool>,
    near: bool,
    visible: bool,
    tab_hidden: bool,
    loaded: bool,
    playing: bool,
    torn_down: bool,
}

impl VideoController {
    pub fn new(config: VideoConfig) -> Self {
        Self {
            config,
            reduced_motion: None,
            near: false,
            visible: false,
            tab_hidden: false,
            loaded: false,
            playing: false,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn motion_allowed(&self) -> bool {
        self.reduced_motion == Some(false)
    }

    fn load(&mut self, out: &mut Vec<MediaCommand>) {
        if self.loaded || !self.motion_allowed() {
            return;
        }
        self.loaded = true;
        out.push(MediaCommand::Load {
            src: self.config.src.clone(),
        });
    }

    fn resume(&mut self, out: &mut Vec<MediaCommand>) {
        if !self.motion_allowed() || self.tab_hidden || !self.visible || self.playing {
            return;
        }
        self.load(out);
        self.playing = true;
        out.push(MediaCommand::Play);
    }

    fn pause(&mut self, out: &mut Vec<MediaCommand>) {
        if self.playing {
            self.playing = false;
            out.push(MediaCommand::Pause);
        }
    }

    /// Entering the preload margin assigns the source. Leaving it does
    /// nothing; playback follows [`Self::on_visible`].
    pub fn on_near(&mut self, near: bool) -> Vec<MediaCommand> {
        let mut out = Vec::new();
        if self.torn_down || near == self.near {
            return out;
        }
        self.near = near;
        if near {
            self.load(&mut out);
        }
        out
    }

    /// On-screen transitions drive play and pause. Repeating the current
    /// state is a no-op.
    pub fn on_visible(&mut self, visible: bool) -> Vec<MediaCommand> {
        let mut out = Vec::new();
        if self.torn_down || visible == self.visible {
            return out;
        }
        self.visible = visible;
        if visible {
            self.resume(&mut out);
        } else {
            self.pause(&mut out);
        }
        out
    }

    pub fn on_tab(&mut self, visibility: TabVisibility) -> Vec<MediaCommand> {
        let mut out = Vec::new();
        let hidden = visibility == TabVisibility::Hidden;
        if self.torn_down || hidden == self.tab_hidden {
            return out;
        }
        self.tab_hidden = hidden;
        if hidden {
            self.pause(&mut out);
        } else {
            self.resume(&mut out);
        }
        out
    }

    /// The reduced-motion preference was reported or changed. Turning it on
    /// stops playback; turning it off catches up on whatever the viewport
    /// already asked for.
    pub fn set_reduced_motion(&mut self, reduced_motion: bool) -> Vec<MediaCommand> {
        let mut out = Vec::new();
        if self.torn_down || self.reduced_motion == Some(reduced_motion) {
            return out;
        }
        self.reduced_motion = Some(reduced_motion);
        if reduced_motion {
            self.pause(&mut out);
        } else {
            if self.near {
                self.load(&mut out);
            }
            self.resume(&mut out);
        }
        out
    }

    /// Autoplay refusal. Playback is decorative, so this only updates state.
    pub fn play_failed(&mut self, err: PlaybackError) {
        log::debug!("{}: {err}", self.config.src);
        self.playing = false;
    }

    pub fn teardown(&mut self) -> Vec<MediaCommand> {
        let mut out = Vec::new();
        if !self.torn_down {
            self.pause(&mut out);
            self.torn_down = true;
        }
        out
    }

    fn forward<X, O, F>(
        this: &Arc<Mutex<Self>>,
        source: &O,
        sink: &Arc<F>,
        step: fn(&mut Self, X) -> Vec<MediaCommand>,
    ) -> Subscription
    where
        X: Copy + 'static,
        O: Observable<X>,
        F: Fn(MediaCommand) + Send + Sync + 'static,
    {
        let controller = Arc::clone(this);
        let sink = Arc::clone(sink);
        source.subscribe(Arc::new(move |value: &X| {
            let commands = step(
                &mut controller.lock().expect("video controller lock poisoned"),
                *value,
            );
            commands.into_iter().for_each(|c| sink(c));
        }))
    }

    /// Subscribes to the reduced-motion preference first, then to the
    /// preload margin, on-screen visibility and tab sources, forwarding every
    /// command to `sink`.
    pub fn follow<R, N, V, T, F>(
        this: &Arc<Mutex<Self>>,
        reduced_motion: &R,
        near: &N,
        visible: &V,
        tab: &T,
        sink: F,
    ) -> [Subscription; 4]
    where
        R: Observable<bool>,
        N: Observable<bool>,
        V: Observable<bool>,
        T: Observable<TabVisibility>,
        F: Fn(MediaCommand) + Send + Sync + 'static,
    {
        let sink = Arc::new(sink);
        [
            Self::forward(this, reduced_motion, &sink, Self::set_reduced_motion),
            Self::forward(this, near, &sink, Self::on_near),
            Self::forward(this, visible, &sink, Self::on_visible),
            Self::forward(this, tab, &sink, Self::on_tab),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionClass {
    Slow2g,
    TwoG,
    ThreeG,
    FourG,
}

impl ConnectionClass {
    /// Parses `navigator.connection.effectiveType`.
    pub fn from_effective_type(value: &str) -> Option<Self> {
        match value {
            "slow-2g" => Some(Self::Slow2g),
            "2g" => Some(Self::TwoG),
            "3g" => Some(Self::ThreeG),
            "4g" => Some(Self::FourG),
            _ => None,
        }
    }

    pub fn is_slow(self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkHints {
    pub save_data: bool,
    pub effective_type: Option<ConnectionClass>,
}

impl NetworkHints {
    pub fn allows_prefetch(&self) -> bool {
        !self.save_data && !self.effective_type.is_some_and(ConnectionClass::is_slow)
    }
}

/// URLs worth warming in the HTTP cache while the page is idle: the video
/// first, then its poster.
pub fn prefetch_urls(config: &VideoConfig, hints: &NetworkHints) -> Vec<String> {
    if !hints.allows_prefetch() {
        return Vec::new();
    }
    std::iter::once(config.src.clone())
        .chain(config.poster.clone())
        .collect()
}
