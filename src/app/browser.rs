//! Browser glue. Apart from [`LocalStore::new`], which hooks into component
//! setup, everything here is only ever called from effects or event handlers,
//! so none of it runs during server rendering.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

#[cfg(feature = "hydrate")]
use codee::string::FromToStringCodec;
use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_use::storage::use_local_storage;
use web_sys::HtmlVideoElement;

use crate::{
    clock::{Clock, SystemClock},
    media::{MediaCommand, NetworkHints, VideoController, IDLE_FALLBACK_MS},
    outreach::{KeyValueStore, StoreError},
    timeline::Schedule,
};

/// Fires a [`Schedule`] from a single pending `setTimeout`, re-armed after
/// each wake-up for whatever cue is next.
pub struct TimelineRunner<S: Schedule> {
    schedule: Arc<Mutex<S>>,
    pending: Mutex<Option<TimeoutHandle>>,
    on_cue: Box<dyn Fn(S::Cue) + Send + Sync>,
}

impl<S> TimelineRunner<S>
where
    S: Schedule + Send + 'static,
    S::Cue: 'static,
{
    pub fn new(schedule: Arc<Mutex<S>>, on_cue: impl Fn(S::Cue) + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            schedule,
            pending: Mutex::new(None),
            on_cue: Box::new(on_cue),
        })
    }

    pub fn arm(self: &Arc<Self>) {
        let deadline = self
            .schedule
            .lock()
            .expect("schedule lock poisoned")
            .next_deadline();
        let Some(deadline) = deadline else {
            return;
        };
        let delay = (deadline - SystemClock.now_ms()).max(0) as u64;
        let runner = Arc::clone(self);
        match set_timeout_with_handle(move || runner.fire(), Duration::from_millis(delay)) {
            Ok(handle) => {
                let previous = self
                    .pending
                    .lock()
                    .expect("timer lock poisoned")
                    .replace(handle);
                if let Some(previous) = previous {
                    previous.clear();
                }
            }
            Err(err) => log::warn!("couldn't schedule timeline cue: {err:?}"),
        }
    }

    fn fire(self: &Arc<Self>) {
        self.pending.lock().expect("timer lock poisoned").take();
        let due = self
            .schedule
            .lock()
            .expect("schedule lock poisoned")
            .advance_to(SystemClock.now_ms());
        for cue in due {
            (self.on_cue)(cue);
        }
        self.arm();
    }

    pub fn cancel(&self) {
        self.schedule.lock().expect("schedule lock poisoned").cancel();
        if let Some(handle) = self.pending.lock().expect("timer lock poisoned").take() {
            handle.clear();
        }
    }
}

/// One `localStorage` key, read and written through leptos-use. Create it
/// during component setup; during server rendering it stores nothing.
#[derive(Clone, Copy)]
pub struct LocalStore {
    key: &'static str,
    #[cfg(feature = "hydrate")]
    value: Signal<String>,
    #[cfg(feature = "hydrate")]
    set_value: WriteSignal<String>,
}

impl LocalStore {
    pub fn new(key: &'static str) -> Self {
        #[cfg(feature = "hydrate")]
        {
            let (value, set_value, _) = use_local_storage::<String, FromToStringCodec>(key);
            Self {
                key,
                value,
                set_value,
            }
        }
        #[cfg(not(feature = "hydrate"))]
        Self { key }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        if key != self.key {
            return None;
        }
        #[cfg(feature = "hydrate")]
        {
            // leptos-use reports a missing key as the codec default
            let raw = self.value.get_untracked();
            if !raw.is_empty() {
                return Some(raw);
            }
        }
        None
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if key != self.key {
            return Err(StoreError::Rejected(key.to_string()));
        }
        #[cfg(feature = "hydrate")]
        {
            self.set_value.set(value.to_string());
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        Err(StoreError::Unavailable)
    }
}

/// Whether the host can report a color-scheme preference at all.
pub fn color_scheme_supported() -> bool {
    window()
        .match_media(crate::theme::COLOR_SCHEME_QUERY)
        .ok()
        .flatten()
        .is_some()
}

/// Reads `navigator.connection`, which only some browsers expose.
pub fn network_hints() -> NetworkHints {
    #[cfg(feature = "hydrate")]
    {
        use crate::media::ConnectionClass;
        use js_sys::Reflect;
        use wasm_bindgen::JsValue;

        let navigator = window().navigator();
        let connection = match Reflect::get(&navigator, &JsValue::from_str("connection")) {
            Ok(c) if !c.is_undefined() && !c.is_null() => c,
            _ => return NetworkHints::default(),
        };
        let save_data = Reflect::get(&connection, &JsValue::from_str("saveData"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let effective_type = Reflect::get(&connection, &JsValue::from_str("effectiveType"))
            .ok()
            .and_then(|v| v.as_string())
            .and_then(|s| ConnectionClass::from_effective_type(&s));
        NetworkHints {
            save_data,
            effective_type,
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        NetworkHints::default()
    }
}

fn idle_callback_supported() -> bool {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Reflect::has(&window(), &wasm_bindgen::JsValue::from_str("requestIdleCallback"))
            .unwrap_or(false)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

#[derive(Clone, Copy)]
pub enum IdleTask {
    Idle(IdleCallbackHandle),
    Timeout(TimeoutHandle),
}

impl IdleTask {
    pub fn cancel(self) {
        match self {
            IdleTask::Idle(handle) => handle.cancel(),
            IdleTask::Timeout(handle) => handle.clear(),
        }
    }
}

/// Runs `task` when the browser is idle, or after a short timeout where
/// `requestIdleCallback` is missing.
pub fn schedule_idle(task: impl Fn() + 'static) -> Option<IdleTask> {
    let scheduled = if idle_callback_supported() {
        request_idle_callback_with_handle(task).map(IdleTask::Idle)
    } else {
        set_timeout_with_handle(task, Duration::from_millis(IDLE_FALLBACK_MS)).map(IdleTask::Timeout)
    };
    match scheduled {
        Ok(t) => Some(t),
        Err(err) => {
            log::debug!("couldn't schedule idle task: {err:?}");
            None
        }
    }
}

/// Pulls each URL into the HTTP cache, in order. Stops quietly at the first
/// failure.
pub fn warm_cache(urls: Vec<String>) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        use gloo_net::http::Request;
        use web_sys::RequestCache;

        for url in urls {
            if let Err(err) = Request::get(&url).cache(RequestCache::ForceCache).send().await {
                log::debug!("prefetch of {url} failed: {err}");
                break;
            }
        }
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = urls;
}

/// Applies one controller command to the `<video>` element.
pub fn apply_media_command(
    video: &HtmlVideoElement,
    command: MediaCommand,
    controller: &Arc<Mutex<VideoController>>,
) {
    match command {
        MediaCommand::Load { src } => {
            video.set_src(&src);
            if let Err(err) = video.set_attribute("preload", "auto") {
                log::debug!("couldn't set preload on {src}: {err:?}");
            }
            video.load();
        }
        MediaCommand::Pause => {
            if let Err(err) = video.pause() {
                log::debug!("couldn't pause video: {err:?}");
            }
        }
        MediaCommand::Play => {
            let blocked = {
                let controller = Arc::clone(controller);
                move || {
                    controller
                        .lock()
                        .expect("video controller lock poisoned")
                        .play_failed(crate::media::PlaybackError::Blocked)
                }
            };
            match video.play() {
                #[cfg(feature = "hydrate")]
                Ok(promise) => leptos::task::spawn_local(async move {
                    if wasm_bindgen_futures::JsFuture::from(promise).await.is_err() {
                        blocked();
                    }
                }),
                #[cfg(not(feature = "hydrate"))]
                Ok(_) => {}
                Err(_) => blocked(),
            }
        }
    }
}
