use std::sync::{Arc, Mutex};

use fastrand::Rng;
use leptos::prelude::*;
use leptos_use::{use_window_size, UseWindowSizeReturn};

use crate::{
    scene::{DaylightField, FieldCache, SceneKind, SceneLayers, StarryField, ViewportBucket},
    theme::DisplayMode,
};

/// Random fields are built on the client only, so server markup never
/// disagrees with what hydrates.
fn use_field<F>(generate: impl Fn(ViewportBucket, &mut Rng) -> F + 'static) -> ReadSignal<F>
where
    F: Clone + Default + Send + Sync + 'static,
{
    let UseWindowSizeReturn { width, .. } = use_window_size();
    let (field, set_field) = signal(F::default());
    let cache = Arc::new(Mutex::new(FieldCache::<F>::new()));
    Effect::new(move |_| {
        let bucket = ViewportBucket::from_width(width.get());
        let mut cache = cache.lock().expect("field cache lock poisoned");
        let (current, rebuilt) = cache.get_or_generate(bucket, |b| generate(b, &mut Rng::new()));
        if rebuilt {
            log::debug!("regenerated background field for {bucket:?}");
            set_field.set(current.clone());
        }
    });
    field
}

/// Cross-fades to the scene that matches the display mode once the hero
/// sequence reveals the background. Reduced motion swaps scenes instantly.
#[component]
pub fn Backdrop(
    mode: ReadSignal<Option<DisplayMode>>,
    visible: Signal<bool>,
    reduced_motion: Signal<bool>,
    particles: usize,
) -> impl IntoView {
    let layers = Memo::new(move |prev: Option<&SceneLayers>| {
        let mut layers = prev.copied().unwrap_or_default();
        layers.show(mode.get().filter(|_| visible.get()).map(SceneKind::for_mode));
        layers
    });

    // outer div fades between scenes, inner div fades a layer in on mount
    let layer_class = move |kind: SceneKind| {
        move || {
            format!(
                "absolute inset-0 {} {}",
                if reduced_motion.get() { "" } else { "transition-opacity duration-1000" },
                if layers.get().is_active(kind) { "opacity-100" } else { "opacity-0" },
            )
        }
    };
    let mount_class = move || {
        if reduced_motion.get() { "absolute inset-0" } else { "absolute inset-0 animate-fade-in" }
    };

    view! {
        <div class="fixed inset-0 z-0 pointer-events-none" aria-hidden="true">
            <Show when=move || layers.get().is_mounted(SceneKind::Daylight)>
                <div class=layer_class(SceneKind::Daylight)>
                    <div class=mount_class>
                        <DaylightBackground reduced_motion particles />
                    </div>
                </div>
            </Show>
            <Show when=move || layers.get().is_mounted(SceneKind::StarryNight)>
                <div class=layer_class(SceneKind::StarryNight)>
                    <div class=mount_class>
                        <StarryNightBackground reduced_motion />
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
pub fn DaylightBackground(reduced_motion: Signal<bool>, particles: usize) -> impl IntoView {
    let field = use_field(move |bucket, rng| DaylightField::generate(particles, bucket, rng));

    view! {
        <div class="absolute inset-0 overflow-hidden">
            <div class=move || {
                if reduced_motion.get() { "absolute inset-0 sky-day" } else { "absolute inset-0 sky-day animate-sky" }
            }></div>
            <Show when=move || !reduced_motion.get()>
                {(0..5_i32)
                    .map(|i| {
                        let style = format!(
                            "left:{}%;transform:rotate({}deg);animation-delay:{}s",
                            10 + i * 20,
                            -20 + i * 10,
                            f64::from(i) * 0.8,
                        );
                        view! { <div class="absolute top-0 h-full w-24 light-ray animate-ray" style=style></div> }
                    })
                    .collect_view()}
                {(0..3_i32)
                    .map(|i| {
                        let style = format!(
                            "top:{}%;width:{}px;animation-duration:{}s;animation-delay:-{}s",
                            12 + i * 18,
                            180 + i * 60,
                            60 + i * 25,
                            i * 14,
                        );
                        view! { <div class="absolute h-16 cloud animate-cloud" style=style></div> }
                    })
                    .collect_view()}
                <For
                    each=move || field.get().particles
                    key=|p| p.id
                    children=|p| {
                        let drift = (p.id as f64).sin() * 10.0;
                        let style = format!(
                            "left:{:.2}%;top:{:.2}%;width:{:.2}px;height:{:.2}px;opacity:{:.2};animation-duration:{:.2}s;animation-delay:{:.2}s;--drift-x:{:.1}px",
                            p.x,
                            p.y,
                            p.size,
                            p.size,
                            p.opacity,
                            4.0 + p.speed,
                            p.id as f64 * 0.2,
                            drift,
                        );
                        view! { <div class="absolute rounded-full bg-white animate-float" style=style></div> }
                    }
                />
            </Show>
            <div class="absolute inset-0 bg-gradient-to-b from-transparent via-transparent to-black/20"></div>
        </div>
    }
}

const CONSTELLATION: &str = "12,18 18,12 26,15 31,22 38,19";

#[component]
pub fn StarryNightBackground(reduced_motion: Signal<bool>) -> impl IntoView {
    let field = use_field(|bucket, rng| StarryField::generate(bucket, rng));

    view! {
        <div class="absolute inset-0 overflow-hidden sky-night">
            <div class="absolute inset-0 nebula"></div>
            <For
                each=move || field.get().stars
                key=|s| s.id
                children=move |s| {
                    let style = format!(
                        "left:{:.2}%;top:{:.2}%;width:{:.2}px;height:{:.2}px;opacity:{:.2};animation-duration:{:.2}s",
                        s.x,
                        s.y,
                        s.size,
                        s.size,
                        s.brightness,
                        s.twinkle_speed,
                    );
                    view! {
                        <div
                            class=move || {
                                if reduced_motion.get() {
                                    "absolute rounded-full bg-white"
                                } else {
                                    "absolute rounded-full bg-white animate-twinkle"
                                }
                            }
                            style=style
                        ></div>
                    }
                }
            />
            <Show when=move || !reduced_motion.get()>
                <For
                    each=move || field.get().meteors
                    key=|m| m.id
                    children=|m| {
                        let style = format!(
                            "left:{:.2}%;top:{:.2}%;width:{:.0}px;--meteor-angle:{:.1}deg;animation-duration:{:.2}s;animation-delay:{}s",
                            m.x,
                            m.y,
                            m.length,
                            m.angle,
                            m.speed,
                            m.id * 3,
                        );
                        view! { <div class="absolute h-px meteor animate-meteor" style=style></div> }
                    }
                />
                <For
                    each=move || field.get().dust
                    key=|d| d.id
                    children=|d| {
                        let style = format!(
                            "left:{:.2}%;top:{:.2}%;width:{:.2}px;height:{:.2}px",
                            d.x,
                            d.y,
                            d.size,
                            d.size,
                        );
                        view! { <div class="absolute rounded-full bg-white/30 animate-drift" style=style></div> }
                    }
                />
            </Show>
            <svg class="absolute inset-0 w-full h-full opacity-30" viewBox="0 0 100 100" preserveAspectRatio="none">
                <polyline points=CONSTELLATION fill="none" stroke="white" stroke-width="0.1" />
            </svg>
        </div>
    }
}
