mod background;
mod browser;
mod film_reel;
mod hero;
mod info_pager;
mod outreach_modal;
mod portfolio;
mod sections;

use std::sync::{Arc, Mutex};

use background::Backdrop;
use hero::{use_hero_sequence, HeroCopy};
use leptos::{html, prelude::*};
use leptos_meta::*;
use leptos_router::{components::*, path};
use leptos_use::{use_element_visibility, use_media_query, use_window_scroll};
use outreach_modal::ReachOutModal;
use portfolio::PortfolioSection;
use sections::{BioSection, EducationSection, Footer, ResumeCta, SkillsSection};

use crate::{
    content::SITE,
    hero::HeroView,
    observe::PushSource,
    reveal::{PageReveal, Section},
    theme::REDUCED_MOTION_QUERY,
};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <meta name="color-scheme" content="light dark" />
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico" />
                <link rel="stylesheet" id="leptos" href="/pkg/portfolio-site.css" />
                <MetaTags />
            </head>
            <body class="font-sans bg-black text-white antialiased">
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        <Title formatter=|title| format!("{} - {title}", SITE.config.profile.name) />
        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=path!("/") view=HomePage />
            </Routes>
        </Router>
    }
}

/// Feeds scroll offset, the portfolio sentinel and the hero's bio cue into
/// one [`PageReveal`].
fn use_page_reveal(hero: ReadSignal<HeroView>) -> (ReadSignal<PageReveal>, NodeRef<html::Div>) {
    let threshold = SITE.config.scroll_threshold_px;
    let reveal = Arc::new(Mutex::new(PageReveal::new(threshold)));
    let (revealed, set_revealed) = signal(PageReveal::new(threshold));

    let scroll = PushSource::<f64>::new();
    let sentinel = PushSource::<bool>::new();
    let subscriptions = PageReveal::follow(&reveal, &scroll, &sentinel, move |snapshot| {
        set_revealed.set(snapshot)
    });

    let (_, scroll_y) = use_window_scroll();
    Effect::new(move |_| {
        scroll.publish(scroll_y.get());
    });

    let sentinel_ref = NodeRef::<html::Div>::new();
    let sentinel_visible = use_element_visibility(sentinel_ref);
    Effect::new(move |_| {
        sentinel.publish(sentinel_visible.get());
    });

    Effect::new(move |_| {
        if !hero.get().bio {
            return;
        }
        let mut reveal = reveal.lock().expect("page reveal lock poisoned");
        if reveal.reveal_bio() {
            set_revealed.set(*reveal);
        }
    });

    on_cleanup(move || drop(subscriptions));
    (revealed, sentinel_ref)
}

#[component]
fn HomePage() -> impl IntoView {
    let site = &*SITE;
    let reduced_motion = use_media_query(REDUCED_MOTION_QUERY);
    let (mode, hero) = use_hero_sequence(reduced_motion);
    let (revealed, sentinel_ref) = use_page_reveal(hero);
    let background = Signal::derive(move || hero.get().background);

    view! {
        <Title text="Full-Stack Developer" />
        <div class="relative min-h-screen w-full overflow-x-hidden">
            <Backdrop
                mode
                visible=background
                reduced_motion
                particles=site.config.daylight_particles
            />
            <Show when=move || background.get()>
                <div class="fixed inset-0 z-0 bg-black/30 pointer-events-none animate-fade-in"></div>
            </Show>
            <main class="relative z-10 min-h-screen px-6">
                <div class="h-[10vh] sm:h-[12vh] md:h-[14vh]"></div>
                <HeroCopy
                    greeting=site.config.profile.greeting.as_str()
                    name=site.config.profile.name.as_str()
                    mode
                    hero
                    dismissed=Signal::derive(move || revealed.get().hero_dismissed())
                    reduced_motion
                />
                <Show when=move || revealed.get().is_revealed(Section::Bio)>
                    <BioSection profile={&site.config.profile} />
                    <div node_ref=sentinel_ref class="h-24" aria-hidden="true"></div>
                </Show>
                <Show when=move || revealed.get().is_revealed(Section::Portfolio)>
                    <PortfolioSection projects=site.projects.as_slice() reduced_motion />
                    <SkillsSection skills=site.config.skills.as_slice() />
                    <EducationSection education=site.config.education.as_slice() />
                    <ResumeCta profile={&site.config.profile} />
                </Show>
                <Footer name=site.config.profile.name.as_str() />
            </main>
            <ReachOutModal config={&site.config.outreach} />
        </div>
    }
}
