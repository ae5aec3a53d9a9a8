use std::sync::{Arc, Mutex};

use leptos::prelude::*;
use leptos_use::use_preferred_dark;

use super::browser::{self, TimelineRunner};
use crate::{
    clock::SystemClock,
    content::SITE,
    hero::{HeroSequencer, HeroStep, HeroView},
    observe::{PushSource, Subscription},
    theme::DisplayMode,
};

/// Detects the display mode once the page is live and plays the intro
/// sequence off it.
pub fn use_hero_sequence(
    reduced_motion: Signal<bool>,
) -> (ReadSignal<Option<DisplayMode>>, ReadSignal<HeroView>) {
    let (mode, set_mode) = signal(None::<DisplayMode>);
    let (hero, set_hero) = signal(HeroView::default());

    let prefers_dark = use_preferred_dark();
    let modes = PushSource::<DisplayMode>::new();
    let sequencer = Arc::new(Mutex::new(HeroSequencer::new(SITE.config.hero)));
    let runner = TimelineRunner::new(Arc::clone(&sequencer), move |step: HeroStep| {
        set_hero.update(|view| view.apply(step));
    });
    let subscription = Arc::new(Mutex::new(None::<Subscription>));

    Effect::new({
        let modes = modes.clone();
        let runner = Arc::clone(&runner);
        let subscription = Arc::clone(&subscription);
        move |_| {
            let runner = Arc::clone(&runner);
            let sub = HeroSequencer::follow(
                &sequencer,
                &modes,
                reduced_motion.get_untracked(),
                Arc::new(SystemClock),
                move |mode, started| {
                    set_mode.set(Some(mode));
                    if started {
                        runner.arm();
                    }
                },
            );
            *subscription.lock().expect("subscription lock poisoned") = Some(sub);
        }
    });

    let scheme = PushSource::<bool>::new();
    Effect::new(move |_| {
        let prefers_dark = prefers_dark.get();
        if browser::color_scheme_supported() {
            scheme.publish(prefers_dark);
        }
        if let Some(mode) = DisplayMode::detect(&scheme) {
            modes.publish(mode);
        }
    });

    on_cleanup(move || {
        runner.cancel();
        subscription.lock().expect("subscription lock poisoned").take();
    });

    (mode, hero)
}

#[component]
pub fn HeroCopy(
    greeting: &'static str,
    name: &'static str,
    mode: ReadSignal<Option<DisplayMode>>,
    hero: ReadSignal<HeroView>,
    dismissed: Signal<bool>,
    reduced_motion: Signal<bool>,
) -> impl IntoView {
    let appear = move |shown: bool| {
        if shown {
            "opacity-100 translate-y-0"
        } else {
            "opacity-0 translate-y-2"
        }
    };
    let float_style = move || {
        let lifted = hero.get().background && !reduced_motion.get();
        if lifted {
            "transform: translateY(-35vh) scale(0.96)"
        } else {
            "transform: translateY(0) scale(1)"
        }
    };

    view! {
        <div
            class=move || {
                if dismissed.get() {
                    "text-center transition-all duration-700 ease-out opacity-0"
                } else {
                    "text-center transition-all duration-700 ease-out"
                }
            }
            style=float_style
        >
            <p class=move || {
                format!(
                    "text-lg sm:text-xl font-light tracking-wide transition-all duration-700 {}",
                    appear(hero.get().welcome),
                )
            }>{greeting}</p>
            <h1 class=move || {
                format!(
                    "mt-2 text-4xl sm:text-6xl font-bold tracking-tight transition-all duration-700 {}",
                    appear(hero.get().name),
                )
            }>{name}</h1>
            <div class="mt-6 h-8" aria-live="polite">
                {move || {
                    let detected = hero.get().detected;
                    mode.get()
                        .filter(|_| detected)
                        .map(|mode| {
                            view! {
                                <span class="inline-block px-3 py-1 rounded-full text-sm bg-white/10 backdrop-blur animate-fade-in">
                                    {format!("Screen detected — {}", mode.as_str())}
                                </span>
                            }
                        })
                }}
            </div>
        </div>
    }
}
