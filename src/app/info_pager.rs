use leptos::{ev, prelude::*};
use leptos_use::{use_event_listener, use_window};

use crate::pager::{Pager, PagerPage};

/// Paged detail card. Arrow keys page every mounted card.
///
/// Panics if `pages` is empty; content tests keep that from shipping.
#[component]
pub fn InfoPager(
    title: &'static str,
    pages: &'static [PagerPage],
    reduced_motion: Signal<bool>,
) -> impl IntoView {
    let pager = Pager::new(pages.len()).expect("info pager needs at least one page");
    let (pager, set_pager) = signal(pager);

    let _ = use_event_listener(use_window(), ev::keydown, move |ev| {
        set_pager.update(|p| {
            p.handle_key(&ev.key());
        });
    });

    let page_view = move || {
        let state = pager.get();
        let page = &pages[state.index()];
        let style = format!(
            "--enter-x: {}px",
            state.enter_offset(reduced_motion.get())
        );
        view! {
            <div class="page-enter" style=style>
                <h4 class="text-lg font-semibold mb-3">{page.heading.as_str()}</h4>
                <ul class="list-disc pl-5 space-y-2 text-sm leading-relaxed text-white/85">
                    {page
                        .bullets
                        .iter()
                        .map(|bullet| view! { <li>{bullet.as_str()}</li> })
                        .collect_view()}
                </ul>
            </div>
        }
    };

    let dots = (0..pages.len())
        .map(|i| {
            view! {
                <button
                    type="button"
                    aria-label=format!("Go to page {}", i + 1)
                    class=move || {
                        if pager.get().index() == i {
                            "h-2 w-6 rounded-full bg-white transition-all"
                        } else {
                            "h-2 w-2 rounded-full bg-white/40 hover:bg-white/70 transition-all"
                        }
                    }
                    on:click=move |_| {
                        set_pager.update(|p| {
                            p.go_to(i);
                        })
                    }
                />
            }
        })
        .collect_view();

    view! {
        <div class="rounded-2xl bg-black/40 backdrop-blur-md border border-white/10 p-6 shadow-xl">
            <div class="flex items-center justify-between mb-4">
                <h3 class="text-xl font-bold">{title}</h3>
                <span class="text-xs text-white/60" aria-live="polite">
                    {move || pager.get().label()}
                </span>
            </div>
            <div class="min-h-[12rem] overflow-hidden">{page_view}</div>
            <div class="mt-6 flex items-center justify-between">
                <button
                    type="button"
                    class="px-3 py-1 rounded-md bg-white/10 hover:bg-white/20 disabled:opacity-30 disabled:cursor-not-allowed"
                    aria-label="Previous page"
                    disabled=move || !pager.get().can_previous()
                    on:click=move |_| {
                        set_pager.update(|p| {
                            p.previous();
                        })
                    }
                >
                    "←"
                </button>
                <div class="flex gap-2">{dots}</div>
                <button
                    type="button"
                    class="px-3 py-1 rounded-md bg-white/10 hover:bg-white/20 disabled:opacity-30 disabled:cursor-not-allowed"
                    aria-label="Next page"
                    disabled=move || !pager.get().can_next()
                    on:click=move |_| {
                        set_pager.update(|p| {
                            p.next();
                        })
                    }
                >
                    "→"
                </button>
            </div>
        </div>
    }
}
