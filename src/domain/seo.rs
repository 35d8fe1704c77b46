//! Page metadata for public detail endpoints: title, description, canonical
//! link, Open Graph and Twitter tags, plus a schema.org JSON-LD object.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    entities::{
        blog_post::BlogPost, code_snippet::CodeSnippet, project::Project,
        service_area::ServiceArea,
    },
    settings::AppConfig,
    utils::text::summarize,
};

const DESCRIPTION_CHARS: usize = 160;

#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub name: String,
    pub base_url: String,
}

impl SiteInfo {
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl From<&AppConfig> for SiteInfo {
    fn from(config: &AppConfig) -> Self {
        SiteInfo {
            name: config.site_name.clone(),
            base_url: config.site_base().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub og_type: &'static str,
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub json_ld: Value,
}

/// Detail payload: the entity plus its page metadata.
#[derive(Debug, Serialize)]
pub struct WithSeo<T> {
    pub data: T,
    pub seo: SeoMetadata,
}

pub trait SeoSubject {
    fn seo(&self, site: &SiteInfo) -> SeoMetadata;
}

/// Common fields every page shares before the type-specific JSON-LD.
struct PageFacts<'a> {
    title: &'a str,
    description: String,
    path: String,
    og_type: &'static str,
    image: Option<&'a str>,
    published: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    tags: &'a [String],
}

impl PageFacts<'_> {
    fn build(self, site: &SiteInfo, json_ld: Value) -> SeoMetadata {
        let canonical_url = site.url(&self.path);
        let image = self.image.and_then(|src| shareable_image(src, site));
        let title = format!("{} | {}", self.title, site.name);

        SeoMetadata {
            open_graph: OpenGraph {
                og_type: self.og_type,
                title: self.title.to_string(),
                description: self.description.clone(),
                url: canonical_url.clone(),
                site_name: site.name.clone(),
                image: image.clone(),
                published_time: self.published,
                modified_time: self.modified,
                tags: self.tags.to_vec(),
            },
            twitter: TwitterCard {
                card: if image.is_some() { "summary_large_image" } else { "summary" },
                title: self.title.to_string(),
                description: self.description.clone(),
                image,
            },
            title,
            description: self.description,
            canonical_url,
            json_ld,
        }
    }
}

/// Inline `data:` images cannot be fetched by crawlers; relative paths are
/// resolved against the site.
fn shareable_image(src: &str, site: &SiteInfo) -> Option<String> {
    if src.starts_with("http://") || src.starts_with("https://") {
        Some(src.to_string())
    } else if src.starts_with('/') {
        Some(site.url(src))
    } else {
        None
    }
}

fn publisher(site: &SiteInfo) -> Value {
    json!({
        "@type": "Person",
        "name": site.name,
        "url": site.base_url,
    })
}

fn description_from(text: &str) -> String {
    summarize(text, DESCRIPTION_CHARS)
}

impl SeoSubject for BlogPost {
    fn seo(&self, site: &SiteInfo) -> SeoMetadata {
        let facts = PageFacts {
            title: &self.title,
            description: description_from(&self.excerpt),
            path: format!("blog/{}", self.slug),
            og_type: "article",
            image: self.image_url.as_deref(),
            published: self.published_at,
            modified: Some(self.updated_at),
            tags: &self.tags,
        };

        let json_ld = json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": self.title,
            "description": facts.description,
            "url": site.url(&facts.path),
            "datePublished": self.published_at.unwrap_or(self.created_at),
            "dateModified": self.updated_at,
            "keywords": self.tags.join(", "),
            "articleSection": self.category,
            "timeRequired": format!("PT{}M", self.read_time),
            "author": publisher(site),
            "publisher": publisher(site),
        });

        facts.build(site, json_ld)
    }
}

impl SeoSubject for Project {
    fn seo(&self, site: &SiteInfo) -> SeoMetadata {
        let facts = PageFacts {
            title: &self.title,
            description: description_from(&self.description),
            path: format!("projects/{}", self.slug),
            og_type: "website",
            image: self.image_url.as_deref(),
            published: Some(self.created_at),
            modified: Some(self.updated_at),
            tags: &self.technologies,
        };

        let mut json_ld = json!({
            "@context": "https://schema.org",
            "@type": "CreativeWork",
            "name": self.title,
            "description": facts.description,
            "url": site.url(&facts.path),
            "genre": self.category,
            "keywords": self.technologies.join(", "),
            "dateCreated": self.created_at,
            "dateModified": self.updated_at,
            "creator": publisher(site),
        });
        if let Some(live) = &self.live_url {
            json_ld["sameAs"] = json!(live);
        }
        if let Some(image) = self.image_url.as_deref().and_then(|src| shareable_image(src, site)) {
            json_ld["image"] = json!(image);
        }

        facts.build(site, json_ld)
    }
}

impl SeoSubject for CodeSnippet {
    fn seo(&self, site: &SiteInfo) -> SeoMetadata {
        let facts = PageFacts {
            title: &self.title,
            description: description_from(&self.description),
            path: format!("snippets/{}", self.slug),
            og_type: "article",
            image: None,
            published: Some(self.created_at),
            modified: Some(self.updated_at),
            tags: &self.tags,
        };

        let json_ld = json!({
            "@context": "https://schema.org",
            "@type": "SoftwareSourceCode",
            "name": self.title,
            "description": facts.description,
            "url": site.url(&facts.path),
            "programmingLanguage": self.language,
            "keywords": self.tags.join(", "),
            "educationalLevel": self.difficulty.as_str(),
            "dateCreated": self.created_at,
            "dateModified": self.updated_at,
            "author": publisher(site),
        });

        facts.build(site, json_ld)
    }
}

impl SeoSubject for ServiceArea {
    fn seo(&self, site: &SiteInfo) -> SeoMetadata {
        let title = self.meta_title.as_deref().unwrap_or(&self.title);
        let description = self
            .meta_description
            .clone()
            .unwrap_or_else(|| description_from(&self.intro));
        let facts = PageFacts {
            title,
            description,
            path: format!("services/{}", self.slug),
            og_type: "website",
            image: None,
            published: None,
            modified: Some(self.updated_at),
            tags: &self.local_expertise,
        };

        let area_served = match &self.region {
            Some(region) => json!({
                "@type": "City",
                "name": self.city,
                "containedInPlace": {"@type": "AdministrativeArea", "name": region},
            }),
            None => json!({"@type": "City", "name": self.city}),
        };

        let mut graph = vec![json!({
            "@type": "Service",
            "name": self.title,
            "description": facts.description,
            "url": site.url(&facts.path),
            "areaServed": area_served,
            "provider": publisher(site),
        })];

        if !self.faqs.0.is_empty() {
            let questions: Vec<Value> = self
                .faqs
                .0
                .iter()
                .map(|faq| {
                    json!({
                        "@type": "Question",
                        "name": faq.question,
                        "acceptedAnswer": {"@type": "Answer", "text": faq.answer},
                    })
                })
                .collect();
            graph.push(json!({"@type": "FAQPage", "mainEntity": questions}));
        }

        let json_ld = json!({
            "@context": "https://schema.org",
            "@graph": graph,
        });

        facts.build(site, json_ld)
    }
}

pub fn with_seo<T: SeoSubject>(item: T, site: &SiteInfo) -> WithSeo<T> {
    let seo = item.seo(site);
    WithSeo { data: item, seo }
}
