use std::sync::{Arc, Mutex};

use leptos::{html, prelude::*};
use leptos_use::{use_clipboard, use_element_visibility, UseClipboardReturn};

use crate::{
    content::{Education, Profile, BUILD_TIME},
    observe::{PushSource, Subscription},
    reveal::{Latch, Section},
};

/// Turns a visibility signal into one that flips to `true` the first time it
/// does and never flips back.
pub fn use_latched(visible: Signal<bool>) -> ReadSignal<bool> {
    let (shown, set_shown) = signal(false);
    let source = PushSource::<bool>::new();
    let latch = Arc::new(Mutex::new(Latch::new()));
    let subscription: Subscription = Latch::follow(&latch, &source, move || set_shown.set(true));
    Effect::new(move |_| {
        source.publish(visible.get());
    });
    on_cleanup(move || drop(subscription));
    shown
}

#[component]
pub fn RevealSection(
    section: Section,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let section_ref = NodeRef::<html::Section>::new();
    let shown = use_latched(use_element_visibility(section_ref));

    view! {
        <section
            id=section.id()
            node_ref=section_ref
            class=move || {
                format!("reveal {class} {}", if shown.get() { "reveal-shown" } else { "" })
            }
        >
            {children()}
        </section>
    }
}

#[component]
pub fn BioSection(profile: &'static Profile) -> impl IntoView {
    view! {
        <RevealSection section=Section::Bio class="max-w-3xl mx-auto mt-[42vh] text-center">
            <p class="text-lg sm:text-xl leading-relaxed text-white/90">{profile.bio.as_str()}</p>
            <div class="mt-6 flex justify-center gap-4 text-sm">
                <a class="underline hover:text-white/70" href=profile.linkedin.as_str() target="_blank" rel="noopener noreferrer">
                    "LinkedIn"
                </a>
                <a class="underline hover:text-white/70" href=profile.github.as_str() target="_blank" rel="noopener noreferrer">
                    "GitHub"
                </a>
            </div>
        </RevealSection>
    }
}

#[component]
pub fn SkillsSection(skills: &'static [String]) -> impl IntoView {
    view! {
        <RevealSection section=Section::Skills class="max-w-5xl mx-auto py-16">
            <h2 class="text-3xl font-bold mb-8 text-center">"Skills"</h2>
            <ul class="flex flex-wrap justify-center gap-3">
                {skills
                    .iter()
                    .map(|skill| {
                        view! {
                            <li class="px-4 py-2 rounded-full bg-white/10 border border-white/10 text-sm">
                                {skill.as_str()}
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </RevealSection>
    }
}

#[component]
pub fn EducationSection(education: &'static [Education]) -> impl IntoView {
    view! {
        <RevealSection section=Section::Education class="max-w-4xl mx-auto py-16">
            <h2 class="text-3xl font-bold mb-8 text-center">"Education"</h2>
            <div class="grid gap-6 md:grid-cols-2">
                {education
                    .iter()
                    .map(|entry| {
                        view! {
                            <article class="rounded-2xl bg-black/40 backdrop-blur-md border border-white/10 p-6">
                                <h3 class="text-lg font-semibold">{entry.school.as_str()}</h3>
                                <p class="text-white/80">{entry.credential.as_str()}</p>
                                {entry.years.as_deref().map(|years| view! { <p class="text-sm text-white/60 mt-1">{years}</p> })}
                                {entry.meta.as_deref().map(|meta| view! { <p class="text-sm text-white/60 mt-2">{meta}</p> })}
                            </article>
                        }
                    })
                    .collect_view()}
            </div>
        </RevealSection>
    }
}

#[component]
pub fn ResumeCta(profile: &'static Profile) -> impl IntoView {
    let UseClipboardReturn {
        is_supported,
        copied,
        copy,
        ..
    } = use_clipboard();
    let email = profile.email.as_str();

    view! {
        <RevealSection section=Section::Resume class="max-w-3xl mx-auto py-16 text-center">
            <h2 class="text-3xl font-bold mb-4">"Let's work together"</h2>
            <p class="text-white/80 mb-8">"Grab a copy of my resume or drop me a line."</p>
            <div class="flex flex-wrap justify-center gap-4">
                <a
                    class="px-6 py-3 rounded-full bg-white text-black font-semibold hover:bg-white/90"
                    href=profile.resume_path.as_str()
                    download=""
                >
                    "Download resume"
                </a>
                <a
                    class="px-6 py-3 rounded-full border border-white/40 hover:bg-white/10"
                    href=format!("mailto:{email}")
                >
                    "Email me"
                </a>
                <Show when=move || is_supported.get()>
                    <button
                        type="button"
                        class="px-6 py-3 rounded-full border border-white/40 hover:bg-white/10"
                        on:click={
                            let copy = copy.clone();
                            move |_| copy(email)
                        }
                    >
                        {move || if copied.get() { "Copied!" } else { "Copy email" }}
                    </button>
                </Show>
            </div>
        </RevealSection>
    }
}

#[component]
pub fn Footer(name: &'static str) -> impl IntoView {
    view! {
        <footer class="py-10 text-center text-xs text-white/50">
            <p>{format!("© {name}")}</p>
            <p class="mt-1">{format!("Built {BUILD_TIME}")}</p>
        </footer>
    }
}
