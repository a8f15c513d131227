// Strong typing over the CMS JSON shapes and the plan vocabulary sent back to JS.
// Content documents default every field so a missing key never fails a section.

use serde::{Deserialize, Serialize};

/// One portfolio entry, parsed from `/content/projects/{slug}.json`
/// (or from legacy Markdown frontmatter).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub details: ProjectDetails,
}

impl Project {
    /// Completeness predicate: incomplete projects are loaded but excluded
    /// from every public view of the store.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.year.trim().is_empty()
            && !self.category.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.image.trim().is_empty()
            && self.gallery.len() >= 3
    }

    /// Year as a sortable integer. Non-numeric years sort as 0.
    pub fn year_num(&self) -> i32 {
        self.year.trim().parse().unwrap_or(0)
    }
}

/// One gallery entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GalleryImage {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub caption: String,
}

/// Where and in what order a project is featured.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplaySettings {
    #[serde(default)]
    pub feature_homepage: bool,
    /// Unordered items sort last.
    #[serde(default = "default_order")]
    pub homepage_order: i32,
    #[serde(default)]
    pub feature_selected: bool,
    #[serde(default = "default_order")]
    pub selected_order: i32,
}

fn default_order() -> i32 {
    99
}

/// Detail-page metadata. All optional; absent values are omitted from the meta list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProjectDetails {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub year_completed: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub full_description: String,
}

/// `/content/projects/_manifest.json`: the slug listing used to discover
/// per-project files without a directory-listing capability.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default)]
    pub projects: Vec<String>,
}

// =============================================================================
// Content documents (one JSON file per page section)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeroContent {
    #[serde(default)]
    pub eyebrow: String,
    #[serde(default)]
    pub title_line_1: String,
    #[serde(default)]
    pub title_line_2: String,
    #[serde(default)]
    pub title_line_3: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scroll_cta: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NumbersContent {
    #[serde(default)]
    pub numbers: Vec<NumberItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NumberItem {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FoundersContent {
    #[serde(default)]
    pub eyebrow: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub paragraph_1: String,
    #[serde(default)]
    pub paragraph_2: String,
    /// Typewriter words for the about hero; empty means keep the defaults.
    #[serde(default)]
    pub typewriter_words: Vec<String>,
}

/// About hero: three title lines, the third carrying the typewriter accent word.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AboutHero {
    #[serde(default)]
    pub eyebrow: String,
    #[serde(default)]
    pub title_line_1: String,
    #[serde(default)]
    pub title_line_2: String,
    #[serde(default)]
    pub title_line_3: String,
    #[serde(default)]
    pub accent_word: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub anchors: Vec<AnchorLink>,
    /// Words the typewriter cycles through; empty means keep the built-in set.
    #[serde(default)]
    pub typewriter_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnchorLink {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValuesContent {
    #[serde(default)]
    pub eyebrow: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub values: Vec<ValueCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValueCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MissionVision {
    #[serde(default)]
    pub mission_eyebrow: String,
    #[serde(default)]
    pub mission_text: String,
    #[serde(default)]
    pub mission_image: String,
    #[serde(default)]
    pub vision_eyebrow: String,
    #[serde(default)]
    pub vision_text: String,
    #[serde(default)]
    pub vision_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientsContent {
    #[serde(default)]
    pub eyebrow: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub logos: Vec<ClientLogo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientLogo {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub alt: String,
}

/// About-page separators (top and bottom of the values section).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeparatorPair {
    #[serde(default)]
    pub top_image: String,
    #[serde(default)]
    pub bottom_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactSettings {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub address_3: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesHero {
    #[serde(default)]
    pub eyebrow: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesList {
    #[serde(default)]
    pub services: Vec<ServiceCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeparatorContent {
    #[serde(default)]
    pub image: String,
}

/// Legal document: structured header plus a Markdown body string.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LegalDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub body: String,
}

/// Per-page SEO overrides from `/content/seo/{page}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeoPage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub og_image: String,
}

/// Site-wide SEO settings, also the source for schema.org structured data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeoGlobal {
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub default_description: String,
    #[serde(default)]
    pub og_image: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default)]
    pub apple_touch_icon: String,
    #[serde(default)]
    pub local_business: LocalBusiness,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalBusiness {
    #[serde(rename = "type", default)]
    pub business_type: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

// =============================================================================
// Engine configuration passed from JS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub content: ContentPaths,
    #[serde(default)]
    pub transition: TransitionSettings,
    #[serde(default)]
    pub typewriter: TypewriterTimings,
    #[serde(default)]
    pub site: SiteSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPaths {
    #[serde(default = "default_content_root")]
    pub root: String,
    /// Slugs assumed to exist when the manifest itself cannot be fetched.
    #[serde(default = "default_fallback_slugs")]
    pub fallback_slugs: Vec<String>,
}

impl Default for ContentPaths {
    fn default() -> Self {
        ContentPaths {
            root: default_content_root(),
            fallback_slugs: default_fallback_slugs(),
        }
    }
}

fn default_content_root() -> String {
    "/content".to_string()
}

fn default_fallback_slugs() -> Vec<String> {
    [
        "the-gantry",
        "lumos",
        "deux-freres",
        "tradies",
        "coffee-emporium",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Loader/transition timings in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransitionSettings {
    #[serde(default = "default_logo_in_ms")]
    pub logo_in_ms: u64,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    #[serde(default = "default_logo_out_ms")]
    pub logo_out_ms: u64,
    #[serde(default = "default_panels_ms")]
    pub panels_ms: u64,
    /// Fraction of the panel-open animation at which the page-ready callback fires.
    #[serde(default = "default_ready_fraction")]
    pub ready_fraction: f32,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        TransitionSettings {
            logo_in_ms: default_logo_in_ms(),
            hold_ms: default_hold_ms(),
            logo_out_ms: default_logo_out_ms(),
            panels_ms: default_panels_ms(),
            ready_fraction: default_ready_fraction(),
        }
    }
}

fn default_logo_in_ms() -> u64 {
    600
}

fn default_hold_ms() -> u64 {
    400
}

fn default_logo_out_ms() -> u64 {
    300
}

fn default_panels_ms() -> u64 {
    1000
}

fn default_ready_fraction() -> f32 {
    0.75
}

/// Typewriter timings in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TypewriterTimings {
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
    #[serde(default = "default_erase_ms")]
    pub erase_ms_per_char: u64,
    #[serde(default = "default_pause_ms")]
    pub pause_before_type_ms: u64,
    #[serde(default = "default_type_ms")]
    pub type_ms_per_char: u64,
    #[serde(default = "default_hold_word_ms")]
    pub hold_ms: u64,
}

impl Default for TypewriterTimings {
    fn default() -> Self {
        TypewriterTimings {
            start_delay_ms: default_start_delay_ms(),
            erase_ms_per_char: default_erase_ms(),
            pause_before_type_ms: default_pause_ms(),
            type_ms_per_char: default_type_ms(),
            hold_ms: default_hold_word_ms(),
        }
    }
}

fn default_start_delay_ms() -> u64 {
    2000
}

fn default_erase_ms() -> u64 {
    60
}

fn default_pause_ms() -> u64 {
    300
}

fn default_type_ms() -> u64 {
    80
}

fn default_hold_word_ms() -> u64 {
    2500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            title_suffix: default_title_suffix(),
            base_url: default_base_url(),
        }
    }
}

fn default_title_suffix() -> String {
    "Buterin L'Estrange".to_string()
}

fn default_base_url() -> String {
    "https://blprojects.com.au".to_string()
}

// =============================================================================
// Plans returned to JS (the applier executes these verbatim)
// =============================================================================

/// One DOM mutation. The applier null-guards every selector: a selector with no
/// match on the current page is silently skipped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomPatch {
    SetText {
        selector: String,
        text: String,
    },
    /// Sets textContent on each matched element in document order.
    SetTextList {
        selector: String,
        texts: Vec<String>,
    },
    SetHtml {
        selector: String,
        html: String,
    },
    InsertHtml {
        selector: String,
        position: InsertPosition,
        html: String,
    },
    SetAttr {
        selector: String,
        name: String,
        value: String,
    },
    /// Sets the attribute on every matched element.
    SetAttrAll {
        selector: String,
        name: String,
        value: String,
    },
    /// Sets the attribute per matched element in document order, one value each.
    SetAttrList {
        selector: String,
        name: String,
        values: Vec<String>,
    },
    AddClass {
        selector: String,
        class: String,
    },
    RemoveClass {
        selector: String,
        class: String,
    },
    SetTitle {
        title: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    Afterbegin,
    Beforeend,
}

/// Custom DOM events the applier dispatches after applying a patch set.
/// Animation-initialization code listens for these to know the DOM is safe to query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PageEvent {
    HomepageProjectsLoaded,
    ProjectsListLoaded,
    SelectedProjectsLoaded,
    ProjectPageLoaded,
    ServicesContentLoaded,
    ComponentsLoaded,
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::HomepageProjectsLoaded => "homepageProjectsLoaded",
            PageEvent::ProjectsListLoaded => "projectsListLoaded",
            PageEvent::SelectedProjectsLoaded => "selectedProjectsLoaded",
            PageEvent::ProjectPageLoaded => "projectPageLoaded",
            PageEvent::ServicesContentLoaded => "servicesContentLoaded",
            PageEvent::ComponentsLoaded => "componentsLoaded",
        }
    }

    pub fn with_detail(self, detail: serde_json::Value) -> EventDispatch {
        EventDispatch {
            name: self.name().to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDispatch {
    pub name: String,
    pub detail: serde_json::Value,
}

/// Result of populating one page region: patches plus the completion event.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PatchSet {
    pub patches: Vec<DomPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventDispatch>,
}

impl PatchSet {
    pub fn merge(&mut self, mut other: PatchSet) {
        self.patches.append(&mut other.patches);
        if other.event.is_some() {
            self.event = other.event;
        }
    }
}

/// Which pre-rendered template the engine is populating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    About,
    Services,
    Projects,
    ProjectsList,
    ProjectDetail,
    Legal,
}

/// Request from JS for one page load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: PageKind,
    /// `?project={slug}` for the detail page.
    #[serde(default)]
    pub project_slug: Option<String>,
    /// `privacy-policy` or `cookie-policy` for legal pages.
    #[serde(default)]
    pub policy: Option<String>,
}

/// Everything the applier needs for one page: patch sets in apply order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageLoadResult {
    pub patch_sets: Vec<PatchSet>,
}
