//! Static page content: navigation, services, technologies, experience, contact
//!
//! Content is plain data. It can be written as TOML or JSON; the format is
//! picked from the first non-whitespace character.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

const EMBEDDED_CONTENT_TOML: &str = include_str!("../data/content.toml");

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Duplicate navigation id: {0}")]
    DuplicateNavId(String),
    #[error("Experience has no points: {0}")]
    EmptyExperience(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Section anchor, e.g. "about"
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company_name: String,
    pub icon: String,
    /// CSS colour behind the icon
    #[serde(default = "default_icon_bg")]
    pub icon_bg: String,
    /// Free-form date range, e.g. "June 2017 to Sept 2019"
    pub date: String,
    /// Bullet points, in display order
    pub points: Vec<String>,
}

fn default_icon_bg() -> String {
    "#ffffff".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Short invitation shown above the links
    pub message: String,
    #[serde(default, rename = "link")]
    pub links: Vec<ContactLink>,
}

/// Page section a navigation link opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Services and technologies
    About,
    /// Experience timeline
    Work,
    Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(default, rename = "nav_link")]
    pub nav_links: Vec<NavLink>,
    #[serde(default, rename = "service")]
    pub services: Vec<Service>,
    #[serde(default, rename = "technology")]
    pub technologies: Vec<Technology>,
    #[serde(default, rename = "experience")]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

impl SiteContent {
    /// Parse TOML or JSON content and validate it
    pub fn parse(content: &str) -> Result<Self, ContentError> {
        let trimmed = content.trim_start();
        let parsed: SiteContent = if trimmed.starts_with('{') {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// The content compiled into the binary
    pub fn embedded() -> Result<Self, ContentError> {
        Self::parse(EMBEDDED_CONTENT_TOML)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for link in &self.nav_links {
            if !seen.insert(link.id.as_str()) {
                return Err(ContentError::DuplicateNavId(link.id.clone()));
            }
        }
        if let Some(empty) = self.experiences.iter().find(|e| e.points.is_empty()) {
            return Err(ContentError::EmptyExperience(format!("{} @ {}", empty.title, empty.company_name)));
        }
        Ok(())
    }

    pub fn nav_link(&self, id: &str) -> Option<&NavLink> {
        self.nav_links.iter().find(|l| l.id == id)
    }

    /// Section behind a navigation id, `None` when it would be empty
    pub fn section(&self, id: &str) -> Option<Section> {
        match id {
            "about" if !self.services.is_empty() || !self.technologies.is_empty() => Some(Section::About),
            "work" if !self.experiences.is_empty() => Some(Section::Work),
            "contact" if self.contact.is_some() => Some(Section::Contact),
            _ => None,
        }
    }

    /// Navigation links that lead to a non-empty section, in order
    pub fn visible_nav_links(&self) -> impl Iterator<Item = &NavLink> {
        self.nav_links.iter().filter(|link| self.section(&link.id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content() {
        let content = SiteContent::embedded().unwrap();
        let ids: Vec<&str> = content.nav_links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["about", "work", "contact"]);
        assert!(!content.technologies.is_empty());
        assert!(!content.services.is_empty());
        assert!(content.experiences.iter().all(|e| !e.points.is_empty()));
        assert_eq!(content.nav_link("work").map(|l| l.title.as_str()), Some("Work"));
    }

    #[test]
    fn test_json_content() {
        let json = r#"{
            "nav_link": [{ "id": "about", "title": "About" }],
            "experience": [{
                "title": "Engineer",
                "company_name": "Acme",
                "icon": "acme.png",
                "date": "2020 - 2021",
                "points": ["Shipped things"]
            }]
        }"#;
        let content = SiteContent::parse(json).unwrap();
        assert_eq!(content.experiences[0].icon_bg, "#ffffff");
        assert!(content.technologies.is_empty());
    }

    #[test]
    fn test_duplicate_nav_id_rejected() {
        let toml = r#"
            [[nav_link]]
            id = "about"
            title = "About"

            [[nav_link]]
            id = "about"
            title = "About again"
        "#;
        assert!(matches!(SiteContent::parse(toml), Err(ContentError::DuplicateNavId(id)) if id == "about"));
    }

    #[test]
    fn test_experience_without_points_rejected() {
        let toml = r#"
            [[experience]]
            title = "Intern"
            company_name = "Acme"
            icon = "acme.png"
            date = "2015"
            points = []
        "#;
        assert!(matches!(SiteContent::parse(toml), Err(ContentError::EmptyExperience(_))));
    }

    #[test]
    fn test_every_embedded_link_has_a_section() {
        let content = SiteContent::embedded().unwrap();
        assert_eq!(content.visible_nav_links().count(), content.nav_links.len());
        assert_eq!(content.section("about"), Some(Section::About));
        assert_eq!(content.section("work"), Some(Section::Work));
        assert_eq!(content.section("contact"), Some(Section::Contact));
    }

    #[test]
    fn test_links_to_empty_sections_are_hidden() {
        let toml = r#"
            [[nav_link]]
            id = "about"
            title = "About"

            [[nav_link]]
            id = "contact"
            title = "Contact"

            [[nav_link]]
            id = "blog"
            title = "Blog"

            [[technology]]
            name = "Rust"
            icon = "rust.png"
        "#;
        let content = SiteContent::parse(toml).unwrap();
        let visible: Vec<&str> = content.visible_nav_links().map(|l| l.id.as_str()).collect();
        assert_eq!(visible, vec!["about"]);
        assert_eq!(content.section("contact"), None);
        assert_eq!(content.section("work"), None);
    }

    #[test]
    fn test_contact_from_json() {
        let json = r#"{
            "contact": {
                "message": "Say hello",
                "link": [{ "label": "Email", "url": "mailto:hello@example.com" }]
            }
        }"#;
        let content = SiteContent::parse(json).unwrap();
        let contact = content.contact.as_ref().unwrap();
        assert_eq!(contact.links[0].label, "Email");
        assert_eq!(content.section("contact"), Some(Section::Contact));
    }
}
