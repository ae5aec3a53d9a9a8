use std::sync::{Arc, Mutex};

use leptos::{html, prelude::*};
use leptos_use::{
    use_document_visibility, use_element_visibility, use_intersection_observer_with_options,
    UseIntersectionObserverOptions,
};
use web_sys::VisibilityState;

use super::{
    browser::{self, IdleTask},
    sections::use_latched,
};
use crate::{
    media::{prefetch_urls, TabVisibility, VideoConfig, VideoController},
    observe::PushSource,
};

/// A looping, muted project clip that loads only when it nears the viewport
/// and plays only while it is in view and the tab is visible.
#[component]
pub fn FilmReel(
    video: &'static VideoConfig,
    caption: &'static str,
    #[prop(optional)] reverse: bool,
    reduced_motion: Signal<bool>,
) -> impl IntoView {
    let figure_ref = NodeRef::<html::Figure>::new();
    let video_ref = NodeRef::<html::Video>::new();
    let controller = Arc::new(Mutex::new(VideoController::new(video.clone())));

    let apply = {
        let controller = Arc::clone(&controller);
        move |command| {
            if let Some(el) = video_ref.get_untracked() {
                browser::apply_media_command(&el, command, &controller);
            }
        }
    };

    let reduced = PushSource::<bool>::new();
    let near = PushSource::<bool>::new();
    let visible = PushSource::<bool>::new();
    let tab = PushSource::<TabVisibility>::new();
    let subscriptions =
        VideoController::follow(&controller, &reduced, &near, &visible, &tab, apply.clone());

    Effect::new(move |_| {
        reduced.publish(reduced_motion.get());
    });

    // Preloading uses the widened margin; playback uses the plain viewport.
    let _ = use_intersection_observer_with_options(
        video_ref,
        move |entries, _| {
            if let Some(entry) = entries.last() {
                near.publish(entry.is_intersecting());
            }
        },
        UseIntersectionObserverOptions::default().root_margin(video.root_margin()),
    );
    let _ = use_intersection_observer_with_options(
        video_ref,
        move |entries, _| {
            if let Some(entry) = entries.last() {
                visible.publish(entry.is_intersecting());
            }
        },
        UseIntersectionObserverOptions::default(),
    );

    let visibility = use_document_visibility();
    Effect::new(move |_| {
        let state = match visibility.get() {
            VisibilityState::Hidden => TabVisibility::Hidden,
            _ => TabVisibility::Visible,
        };
        tab.publish(state);
    });

    let idle = Arc::new(Mutex::new(None::<IdleTask>));
    Effect::new({
        let idle = Arc::clone(&idle);
        move |_| {
            let urls = prefetch_urls(video, &browser::network_hints());
            if urls.is_empty() {
                return;
            }
            let task = browser::schedule_idle(move || browser::warm_cache(urls.clone()));
            *idle.lock().expect("idle task lock poisoned") = task;
        }
    });

    on_cleanup(move || {
        if let Some(task) = idle.lock().expect("idle task lock poisoned").take() {
            task.cancel();
        }
        let commands = controller
            .lock()
            .expect("video controller lock poisoned")
            .teardown();
        commands.into_iter().for_each(apply);
        drop(subscriptions);
    });

    let shown = use_latched(use_element_visibility(figure_ref));

    view! {
        <figure
            node_ref=figure_ref
            class=move || {
                format!(
                    "reveal w-full {} {}",
                    if reverse { "md:order-2" } else { "" },
                    if shown.get() { "reveal-shown" } else { "" },
                )
            }
        >
            <div class=format!(
                "relative overflow-hidden rounded-2xl border border-white/10 shadow-2xl bg-black/60 {}",
                video.orientation.frame_class(),
            )>
                <video
                    node_ref=video_ref
                    class="h-full w-full object-cover"
                    poster=video.poster.clone()
                    aria-label=video.label.clone().unwrap_or_else(|| caption.to_string())
                    preload="none"
                    muted=true
                    playsinline=true
                    loop=true
                ></video>
            </div>
            <figcaption class="mt-3 text-sm text-white/70 text-center">{caption}</figcaption>
        </figure>
    }
}
