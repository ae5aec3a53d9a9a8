use leptos::{either::Either, prelude::*};

use super::{film_reel::FilmReel, info_pager::InfoPager, sections::RevealSection};
use crate::{
    content::{Project, ProjectLinks},
    reveal::Section,
};

#[component]
pub fn PortfolioSection(projects: &'static [Project], reduced_motion: Signal<bool>) -> impl IntoView {
    view! {
        <RevealSection section=Section::Portfolio class="max-w-6xl mx-auto py-16">
            <h2 class="text-3xl font-bold mb-12 text-center">"Portfolio"</h2>
            <div class="flex flex-col gap-24">
                {projects
                    .iter()
                    .enumerate()
                    .map(|(i, project)| view! { <ProjectEntry project reverse={i % 2 == 1} reduced_motion /> })
                    .collect_view()}
            </div>
        </RevealSection>
    }
}

#[component]
fn ProjectEntry(project: &'static Project, reverse: bool, reduced_motion: Signal<bool>) -> impl IntoView {
    let details = if project.pages.is_empty() {
        Either::Left(view! {
            <div class="rounded-2xl bg-black/40 backdrop-blur-md border border-white/10 p-6">
                <h3 class="text-xl font-bold mb-3">{project.title.as_str()}</h3>
                <p class="text-sm leading-relaxed text-white/85">
                    {project.summary.as_deref().unwrap_or_default()}
                </p>
            </div>
        })
    } else {
        Either::Right(view! {
            <InfoPager title=project.title.as_str() pages=project.pages.as_slice() reduced_motion />
        })
    };

    view! {
        <article class="grid gap-8 md:grid-cols-2 items-center">
            <FilmReel video={&project.video} caption={project.caption()} reverse reduced_motion />
            <div class="flex flex-col gap-6">
                {details}
                <LinkButtons links={&project.links} />
            </div>
        </article>
    }
}

#[component]
fn LinkButtons(links: &'static ProjectLinks) -> impl IntoView {
    let buttons = links.buttons();
    (!buttons.is_empty()).then(|| {
        view! {
            <div class="flex flex-wrap gap-3">
                {buttons
                    .into_iter()
                    .map(|button| {
                        view! {
                            <a
                                class="px-4 py-2 rounded-full bg-white/10 border border-white/20 text-sm hover:bg-white/20"
                                href=button.href
                                aria-label=button.aria_label
                                target="_blank"
                                rel="noopener noreferrer"
                            >
                                {button.label}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        }
    })
}
