use std::sync::LazyLock;

use rust_embed::Embed;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{hero::HeroTiming, media::VideoConfig, outreach::OutreachConfig, pager::PagerPage, scene};

pub const BUILD_TIME: &str = env!("BUILD_TIME");

pub static SITE: LazyLock<SiteContent> =
    LazyLock::new(|| SiteContent::load().expect("embedded site content should parse"));

#[derive(Embed)]
#[folder = "content"]
pub struct Assets;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("content file {0} not found")]
    Missing(String),
    #[error("couldn't parse {file}: {message}")]
    Parse { file: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub greeting: String,
    pub bio: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub resume_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLinks {
    pub web: Option<String>,
    pub ios: Option<String>,
    pub android: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkButton<'a> {
    pub label: &'static str,
    pub aria_label: &'static str,
    pub href: &'a str,
}

impl ProjectLinks {
    /// Present links in display order.
    pub fn buttons(&self) -> Vec<LinkButton<'_>> {
        [
            (&self.web, "Web Application", "Web Application"),
            (&self.ios, "iOS App Store", "Open on the iOS App Store"),
            (&self.android, "Google Play", "Open on Google Play"),
            (&self.github, "GitHub", "Open GitHub repository"),
        ]
        .into_iter()
        .filter_map(|(href, label, aria_label)| {
            href.as_deref().map(|href| LinkButton {
                label,
                aria_label,
                href,
            })
        })
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub video: VideoConfig,
    /// Detail pages for the info card. Projects without pages show the
    /// summary instead.
    #[serde(default)]
    pub pages: Vec<PagerPage>,
    #[serde(default)]
    pub links: ProjectLinks,
}

impl Project {
    pub fn caption(&self) -> &str {
        self.video.label.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub credential: String,
    #[serde(default)]
    pub years: Option<String>,
    #[serde(default)]
    pub meta: Option<String>,
}

fn default_scroll_threshold() -> f64 {
    120.0
}

fn default_particles() -> usize {
    scene::DEFAULT_PARTICLES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub profile: Profile,
    #[serde(default)]
    pub hero: HeroTiming,
    #[serde(default)]
    pub outreach: OutreachConfig,
    /// Scroll offset past which the hero counts as dismissed.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold_px: f64,
    #[serde(default = "default_particles")]
    pub daylight_particles: usize,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<Education>,
}

#[derive(Debug, Clone)]
pub struct SiteContent {
    pub config: SiteConfig,
    pub projects: Vec<Project>,
}

fn load<T: DeserializeOwned>(name: &str) -> Result<T, ContentError> {
    let file = Assets::get(name).ok_or_else(|| ContentError::Missing(name.to_string()))?;
    serde_json::from_slice(&file.data).map_err(|e| ContentError::Parse {
        file: name.to_string(),
        message: e.to_string(),
    })
}

impl SiteContent {
    pub fn load() -> Result<Self, ContentError> {
        let mut config: SiteConfig = load("site.json")?;
        if config.outreach.email.is_empty() {
            config.outreach.email = config.profile.email.clone();
        }
        let projects = load("projects.json")?;
        Ok(Self { config, projects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::Pager;

    #[test]
    fn test_embedded_content_parses() {
        let site = SiteContent::load().expect("content should load");
        assert!(!site.config.profile.name.is_empty());
        assert!(!site.projects.is_empty());
        assert!(!site.config.skills.is_empty());
        assert!(!site.config.outreach.email.is_empty());
    }

    #[test]
    fn test_every_paged_project_satisfies_pager() {
        for project in &SITE.projects {
            if project.pages.is_empty() {
                assert!(
                    project.summary.is_some(),
                    "{} needs pages or a summary",
                    project.title
                );
                continue;
            }
            assert!(Pager::new(project.pages.len()).is_ok());
            for page in &project.pages {
                assert!(!page.bullets.is_empty(), "{}: {}", project.title, page.heading);
            }
        }
    }

    #[test]
    fn test_project_videos_live_under_media() {
        for project in &SITE.projects {
            assert!(project.video.src.starts_with("/media/"), "{}", project.video.src);
        }
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(
            load::<SiteConfig>("nope.json").unwrap_err(),
            ContentError::Missing("nope.json".to_string())
        );
    }

    #[test]
    fn test_link_buttons_skip_absent() {
        let links = ProjectLinks {
            ios: Some("https://apps.apple.com/x".to_string()),
            github: Some("https://github.com/x".to_string()),
            ..ProjectLinks::default()
        };
        let labels = links.buttons().iter().map(|b| b.label).collect::<Vec<_>>();
        assert_eq!(labels, vec!["iOS App Store", "GitHub"]);
    }
}
