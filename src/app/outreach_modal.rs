use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use leptos::{ev, prelude::*};
use leptos_use::{use_clipboard, use_event_listener, use_window, UseClipboardReturn};

use super::browser::LocalStore;
use crate::{
    clock::{Clock, SystemClock},
    outreach::{DismissReason, OutreachConfig, OutreachDecision, OutreachModal},
};

#[component]
pub fn ReachOutModal(config: &'static OutreachConfig) -> impl IntoView {
    let modal = Arc::new(Mutex::new(OutreachModal::new(config.clone())));
    let pending = Arc::new(Mutex::new(None::<TimeoutHandle>));
    let (open, set_open) = signal(false);
    let store = LocalStore::new(config.storage_key.as_str());

    Effect::new({
        let modal = Arc::clone(&modal);
        let pending = Arc::clone(&pending);
        move |_| {
            let decision = modal
                .lock()
                .expect("outreach modal lock poisoned")
                .mount(&store, SystemClock.now_ms());
            let delay_ms = match decision {
                OutreachDecision::Suppressed { until_ms } => {
                    log::debug!("outreach modal suppressed until {until_ms}");
                    return;
                }
                OutreachDecision::Schedule { delay_ms } => delay_ms,
            };
            let modal = Arc::clone(&modal);
            let fire = move || {
                if modal.lock().expect("outreach modal lock poisoned").fire() {
                    set_open.set(true);
                }
            };
            match set_timeout_with_handle(fire, Duration::from_millis(delay_ms)) {
                Ok(handle) => *pending.lock().expect("timer lock poisoned") = Some(handle),
                Err(err) => log::warn!("couldn't schedule outreach modal: {err:?}"),
            }
        }
    });

    let dismiss = Callback::new({
        let modal = Arc::clone(&modal);
        move |reason: DismissReason| {
            let mut store = store;
            let result = modal
                .lock()
                .expect("outreach modal lock poisoned")
                .dismiss(reason, &mut store, SystemClock.now_ms());
            if let Err(err) = result {
                log::debug!("couldn't persist outreach dismissal: {err}");
            }
            set_open.set(false);
        }
    });

    let _ = use_event_listener(use_window(), ev::keydown, move |ev| {
        if ev.key() == "Escape" && open.get_untracked() {
            dismiss.run(DismissReason::Escape);
        }
    });

    on_cleanup(move || {
        if let Some(handle) = pending.lock().expect("timer lock poisoned").take() {
            handle.clear();
        }
        modal.lock().expect("outreach modal lock poisoned").teardown();
    });

    let UseClipboardReturn { copied, copy, .. } = use_clipboard();
    let copy_email = Callback::new(move |_: ()| copy(&config.email));

    view! {
        <Show when=move || open.get()>
            <div
                class="fixed inset-0 z-50 flex items-center justify-center p-4 animate-fade-in"
                role="dialog"
                aria-modal="true"
                aria-labelledby="reach-out-title"
            >
                <div
                    class="absolute inset-0 bg-black/60 backdrop-blur-sm"
                    aria-hidden="true"
                    on:click=move |_| dismiss.run(DismissReason::Backdrop)
                ></div>
                <div class="relative w-full max-w-md rounded-2xl bg-neutral-900/95 border border-white/10 p-8 shadow-2xl text-center">
                    <button
                        type="button"
                        class="absolute top-3 right-3 h-8 w-8 rounded-full hover:bg-white/10"
                        aria-label="Close"
                        on:click=move |_| dismiss.run(DismissReason::CloseButton)
                    >
                        "✕"
                    </button>
                    <h2 id="reach-out-title" class="text-2xl font-bold mb-3">
                        "Like what you see?"
                    </h2>
                    <p class="text-white/80 mb-6">
                        "I'm open to new projects and roles. Let's talk."
                    </p>
                    <a
                        class="inline-block px-6 py-3 rounded-full bg-white text-black font-semibold hover:bg-white/90"
                        href=config.mailto()
                    >
                        "Reach out"
                    </a>
                    <button
                        type="button"
                        class="mt-4 block mx-auto text-sm text-white/70 underline hover:text-white"
                        on:click=move |_| copy_email.run(())
                    >
                        {move || if copied.get() { "Copied!".to_string() } else { config.email.clone() }}
                    </button>
                </div>
            </div>
        </Show>
    }
}
