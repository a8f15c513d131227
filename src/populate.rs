// Page populators: turn CMS documents into DomPatch sets against the
// pre-rendered templates. Sections fail independently; a missing document is
// logged and leaves the hardcoded fallback markup untouched.

use serde_json::json;

use crate::content::{fetch_json, ContentFetcher};
use crate::markdown::markdown_to_html;
use crate::projects::ProjectsStore;
use crate::types::{
    AboutHero, ClientsContent, ContactSettings, DomPatch, EngineConfig, FoundersContent,
    HeroContent, InsertPosition, LegalDocument, MissionVision, NumbersContent, PageEvent,
    PageKind, PageLoadResult, PageRequest, PatchSet, Project, SeoGlobal, SeoPage,
    SeparatorContent, SeparatorPair, ServicesHero, ServicesList, SiteSettings, ValuesContent,
};

/// Build every patch set for one page load, in apply order.
pub async fn build_page<F: ContentFetcher + 'static>(
    request: &PageRequest,
    store: &ProjectsStore<F>,
    fetcher: &F,
    config: &EngineConfig,
) -> PageLoadResult {
    let root = &config.content.root;
    let mut sets = Vec::new();
    match request.page {
        PageKind::Home => {
            sets.push(seo(fetcher, root, "homepage", true).await);
            sets.push(homepage_sections(fetcher, root).await);
            sets.push(homepage_projects(store).await);
        }
        PageKind::About => {
            sets.push(seo(fetcher, root, "about", false).await);
            sets.push(about_sections(fetcher, root).await);
        }
        PageKind::Services => {
            sets.push(seo(fetcher, root, "services", false).await);
            sets.push(services_sections(fetcher, root).await);
        }
        PageKind::Projects => {
            sets.push(seo(fetcher, root, "projects", false).await);
            sets.push(selected_projects(store).await);
        }
        PageKind::ProjectsList => {
            sets.push(seo(fetcher, root, "projects-list", false).await);
            sets.push(projects_list(store).await);
        }
        PageKind::ProjectDetail => {
            sets.push(project_detail(store, request.project_slug.as_deref(), &config.site).await);
        }
        PageKind::Legal => {
            sets.push(legal(fetcher, root, request.policy.as_deref()).await);
        }
    }
    PageLoadResult { patch_sets: sets }
}

fn set_text(selector: &str, text: impl Into<String>) -> DomPatch {
    DomPatch::SetText {
        selector: selector.to_string(),
        text: text.into(),
    }
}

fn set_attr(selector: &str, name: &str, value: impl Into<String>) -> DomPatch {
    DomPatch::SetAttr {
        selector: selector.to_string(),
        name: name.to_string(),
        value: value.into(),
    }
}

// =============================================================================
// Project list views
// =============================================================================

/// List-view card markup shared by the homepage and the projects list.
fn render_project_item(project: &Project, lazy: bool) -> String {
    let loading = if lazy { " loading=\"lazy\"" } else { "" };
    format!(
        concat!(
            "<a href=\"project.html?project={slug}\" class=\"projects__item\" ",
            "data-category=\"{cat_lower}\" data-transition>",
            "<div class=\"projects__item-info\">",
            "<div class=\"projects__item-meta\">",
            "<div class=\"projects__item-year\">{year}</div>",
            "<div class=\"projects__item-type\">{category}</div>",
            "</div>",
            "<div class=\"projects__item-title-wrap\">",
            "<h3 class=\"projects__item-title\">{title}</h3>",
            "<h3 class=\"projects__item-title projects__item-title--hover\">{title}</h3>",
            "</div>",
            "</div>",
            "<div class=\"projects__item-visual\">",
            "<div class=\"projects__item-image-wrap\">",
            "<img src=\"{image}\" alt=\"{title} project\" class=\"projects__item-image\"{loading}>",
            "</div>",
            "<div class=\"projects__item-arrow\">\u{2192}</div>",
            "</div>",
            "</a>"
        ),
        slug = project.slug,
        cat_lower = project.category.to_lowercase(),
        year = project.year,
        category = project.category,
        title = project.title,
        image = project.image,
        loading = loading,
    )
}

/// Homepage featured list. Images load eagerly; they sit above the fold.
pub async fn homepage_projects<F: ContentFetcher + 'static>(store: &ProjectsStore<F>) -> PatchSet {
    let projects = store.homepage_featured().await;
    if projects.is_empty() {
        return PatchSet::default();
    }
    let html: String = projects.iter().map(|p| render_project_item(p, false)).collect();
    PatchSet {
        patches: vec![DomPatch::SetHtml {
            selector: ".projects__list".to_string(),
            html,
        }],
        event: Some(PageEvent::HomepageProjectsLoaded.with_detail(json!({ "projects": projects }))),
    }
}

/// Full projects list: first four eager, the rest lazy.
pub async fn projects_list<F: ContentFetcher + 'static>(store: &ProjectsStore<F>) -> PatchSet {
    let projects = store.all().await;
    if projects.is_empty() {
        return PatchSet::default();
    }
    let html: String = projects
        .iter()
        .enumerate()
        .map(|(index, p)| render_project_item(p, index >= 4))
        .collect();
    PatchSet {
        patches: vec![DomPatch::SetHtml {
            selector: ".projects--page .projects__list".to_string(),
            html,
        }],
        event: Some(PageEvent::ProjectsListLoaded.with_detail(json!({ "projects": projects }))),
    }
}

/// Selected-work slider: no DOM patches, the slide deck travels in the event
/// detail and the slider script builds its own markup from it.
pub async fn selected_projects<F: ContentFetcher + 'static>(store: &ProjectsStore<F>) -> PatchSet {
    let projects = store.selected_featured().await;
    let slides: Vec<serde_json::Value> = projects
        .iter()
        .map(|p| {
            json!({
                "title": p.title,
                "category": p.category,
                "year": p.year,
                "description": p.description,
                "image": p.image,
                "url": format!("project.html?project={}", p.slug),
            })
        })
        .collect();
    PatchSet {
        patches: Vec::new(),
        event: Some(PageEvent::SelectedProjectsLoaded.with_detail(json!({ "projects": slides }))),
    }
}

// =============================================================================
// Project detail page
// =============================================================================

pub async fn project_detail<F: ContentFetcher + 'static>(
    store: &ProjectsStore<F>,
    slug: Option<&str>,
    site: &SiteSettings,
) -> PatchSet {
    let Some(slug) = slug else {
        log::warn!("no project specified in url");
        return PatchSet::default();
    };
    let Some(project) = store.by_slug(slug).await else {
        log::warn!("project not found: {slug}");
        return PatchSet::default();
    };

    let page_title = format!("{} | {}", project.title, site.title_suffix);
    let seo_description = if project.description.is_empty() {
        format!(
            "{} - {} project by {}",
            project.title, project.category, site.title_suffix
        )
    } else {
        project.description.clone()
    };
    let page_url = format!("{}/project?project={}", site.base_url, slug);
    let page_image = if project.image.is_empty() {
        format!("{}/images/og-image.jpg", site.base_url)
    } else {
        format!("{}{}", site.base_url, project.image)
    };

    let mut patches = vec![
        DomPatch::SetTitle {
            title: page_title.clone(),
        },
        set_attr("meta[name=\"description\"]", "content", &seo_description),
        set_attr("meta[property=\"og:title\"]", "content", &page_title),
        set_attr("meta[property=\"og:description\"]", "content", &seo_description),
        set_attr("meta[property=\"og:url\"]", "content", &page_url),
        set_attr("meta[property=\"og:image\"]", "content", &page_image),
        set_attr("meta[name=\"twitter:title\"]", "content", &page_title),
        set_attr("meta[name=\"twitter:description\"]", "content", &seo_description),
        set_attr("meta[name=\"twitter:image\"]", "content", &page_image),
        set_text(".project__title", &project.title),
    ];

    patches.push(DomPatch::SetHtml {
        selector: ".project__meta".to_string(),
        html: meta_items_html(&project),
    });

    let description = if project.details.full_description.is_empty() {
        &project.description
    } else {
        &project.details.full_description
    };
    patches.push(set_text(".project__description-text", description));

    if !project.gallery.is_empty() {
        patches.push(DomPatch::SetHtml {
            selector: ".project__gallery".to_string(),
            html: gallery_html(&project),
        });
    }

    if let Some(next) = store.next_after(slug).await {
        let next_href = format!("project.html?project={}", next.slug);
        patches.push(set_text(".project-next__title", next.title.to_uppercase()));
        patches.push(set_attr(".project-next__button", "href", &next_href));
        patches.push(set_attr(".navbar__action-btn--next", "href", &next_href));
        patches.push(set_attr(".project-next__image", "src", &next.image));
        patches.push(set_attr(".project-next__image", "alt", &next.title));
    }

    PatchSet {
        patches,
        event: Some(PageEvent::ProjectPageLoaded.with_detail(json!({ "project": project }))),
    }
}

/// Meta grid rows; rows with no value are omitted entirely.
fn meta_items_html(project: &Project) -> String {
    let details = &project.details;
    let year_completed = if details.year_completed.is_empty() {
        &project.year
    } else {
        &details.year_completed
    };
    let items = [
        ("Location", details.location.as_str()),
        ("Year Completed", year_completed.as_str()),
        ("Project Type", project.category.as_str()),
        ("Scope of Work", details.scope.as_str()),
        ("Size / Levels", details.size.as_str()),
    ];
    items
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| {
            format!(
                concat!(
                    "<div class=\"project__meta-item\">",
                    "<div class=\"project__meta-label\">{label}</div>",
                    "<div class=\"project__meta-value\">{value}</div>",
                    "</div>"
                ),
                label = label,
                value = value,
            )
        })
        .collect()
}

/// Gallery layout: first two images eager, a side-by-side row at the third
/// position when there are enough images, and the fourth image skipped when the
/// row above already consumed it.
fn gallery_html(project: &Project) -> String {
    let gallery = &project.gallery;
    gallery
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let loading = if index >= 2 { " loading=\"lazy\"" } else { "" };
            let alt = |caption: &str, n: usize| {
                if caption.is_empty() {
                    format!("{} Image {}", project.title, n)
                } else {
                    caption.to_string()
                }
            };

            if index == 2 && gallery.len() > 3 {
                let next = &gallery[index + 1];
                return format!(
                    concat!(
                        "<div class=\"project__image-row\">",
                        "<img src=\"{a}\" alt=\"{a_alt}\" class=\"project__image project__image--half\"{loading}>",
                        "<img src=\"{b}\" alt=\"{b_alt}\" class=\"project__image project__image--half\" loading=\"lazy\">",
                        "</div>"
                    ),
                    a = item.image,
                    a_alt = alt(&item.caption, index + 1),
                    b = next.image,
                    b_alt = alt(&next.caption, index + 2),
                    loading = loading,
                );
            }
            // The fourth image was rendered inside the row above.
            if index == 3 && gallery.len() > 3 {
                return String::new();
            }
            format!(
                "<img src=\"{src}\" alt=\"{alt}\" class=\"project__image\"{loading}>",
                src = item.image,
                alt = alt(&item.caption, index + 1),
                loading = loading,
            )
        })
        .collect()
}

// =============================================================================
// Homepage sections
// =============================================================================

/// Hero, numbers, founders, and footer contact. Each section is independent:
/// one missing document never blanks the others.
pub async fn homepage_sections<F: ContentFetcher>(fetcher: &F, root: &str) -> PatchSet {
    let mut set = PatchSet::default();

    match fetch_json::<HeroContent, _>(fetcher, &format!("{root}/homepage/hero.json")).await {
        Ok(hero) => set.patches.extend([
            set_text(".hero__eyebrow", &hero.eyebrow),
            DomPatch::SetTextList {
                selector: ".hero__title-line".to_string(),
                texts: vec![hero.title_line_1, hero.title_line_2, hero.title_line_3],
            },
            set_text(".hero__description", &hero.description),
            set_text(".hero__scroll-cta", &hero.scroll_cta),
        ]),
        Err(err) => log::warn!("hero content not loaded: {err}"),
    }

    match fetch_json::<NumbersContent, _>(fetcher, &format!("{root}/homepage/numbers.json")).await {
        Ok(numbers) => set.patches.extend([
            DomPatch::SetTextList {
                selector: ".numbers__item .numbers__value".to_string(),
                texts: numbers.numbers.iter().map(|n| n.value.clone()).collect(),
            },
            DomPatch::SetTextList {
                selector: ".numbers__item .numbers__label".to_string(),
                texts: numbers.numbers.iter().map(|n| n.label.clone()).collect(),
            },
        ]),
        Err(err) => log::warn!("numbers content not loaded: {err}"),
    }

    match fetch_json::<FoundersContent, _>(fetcher, &format!("{root}/homepage/founders.json"))
        .await
    {
        Ok(founders) => set.patches.extend([
            set_text(".founders__eyebrow", &founders.eyebrow),
            set_text(".founders__title", &founders.title),
            DomPatch::SetTextList {
                selector: ".founders__text p".to_string(),
                texts: vec![founders.paragraph_1, founders.paragraph_2],
            },
        ]),
        Err(err) => log::warn!("founders content not loaded: {err}"),
    }

    match fetch_json::<ContactSettings, _>(fetcher, &format!("{root}/settings/contact.json")).await
    {
        Ok(contact) => set.patches.extend(contact_patches(&contact)),
        Err(err) => log::warn!("contact settings not loaded: {err}"),
    }

    set
}

fn contact_patches(contact: &ContactSettings) -> Vec<DomPatch> {
    vec![
        DomPatch::SetTextList {
            selector: ".footer__address p".to_string(),
            texts: vec![
                contact.address_1.clone(),
                "1800 BL PROJECTS".to_string(),
                contact.address_2.clone(),
                contact.address_3.clone(),
            ],
        },
        DomPatch::SetAttrAll {
            selector: "a[href^=\"mailto:\"]".to_string(),
            name: "href".to_string(),
            value: format!("mailto:{}", contact.email),
        },
        DomPatch::SetAttrAll {
            selector: "a[href^=\"tel:\"]".to_string(),
            name: "href".to_string(),
            value: format!("tel:{}", contact.phone),
        },
    ]
}

// =============================================================================
// About page sections
// =============================================================================

pub async fn about_sections<F: ContentFetcher>(fetcher: &F, root: &str) -> PatchSet {
    let mut set = PatchSet::default();

    match fetch_json::<AboutHero, _>(fetcher, &format!("{root}/about/hero.json")).await {
        Ok(hero) => {
            set.patches.extend([
                set_text(".hero__eyebrow", &hero.eyebrow),
                DomPatch::SetTextList {
                    selector: ".hero__title-line".to_string(),
                    texts: vec![hero.title_line_1.clone(), hero.title_line_2.clone()],
                },
                DomPatch::SetHtml {
                    selector: ".hero__title-line:nth-of-type(3)".to_string(),
                    html: format!(
                        "{} <span class=\"typewriter-word text-accent\">{}</span>",
                        hero.title_line_3, hero.accent_word
                    ),
                },
                set_text(".hero__description--about", &hero.description),
                DomPatch::SetAttrList {
                    selector: ".hero__anchor".to_string(),
                    name: "href".to_string(),
                    values: hero.anchors.iter().map(|a| a.link.clone()).collect(),
                },
            ]);
            for (index, anchor) in hero.anchors.iter().enumerate() {
                // Both the resting and hover copies of the label.
                set.patches.push(DomPatch::SetTextList {
                    selector: format!(".hero__anchor:nth-of-type({}) .link-text", index + 1),
                    texts: vec![anchor.text.clone(), anchor.text.clone()],
                });
            }
        }
        Err(err) => log::warn!("about hero not loaded: {err}"),
    }

    match fetch_json::<ValuesContent, _>(fetcher, &format!("{root}/about/values.json")).await {
        Ok(values) => {
            set.patches.push(set_text(".values__eyebrow", &values.eyebrow));
            set.patches.push(set_text(".values__title", &values.title));
            set.patches.push(DomPatch::SetTextList {
                selector: ".values__card .values__card-title".to_string(),
                texts: values.values.iter().map(|v| v.title.clone()).collect(),
            });
            set.patches.push(DomPatch::SetTextList {
                selector: ".values__card .values__card-text".to_string(),
                texts: values.values.iter().map(|v| v.description.clone()).collect(),
            });
            set.patches.push(DomPatch::SetAttrList {
                selector: ".values__card .values__card-img".to_string(),
                name: "src".to_string(),
                values: values.values.iter().map(|v| v.image.clone()).collect(),
            });
        }
        Err(err) => log::warn!("values content not loaded: {err}"),
    }

    match fetch_json::<MissionVision, _>(fetcher, &format!("{root}/about/mission-vision.json"))
        .await
    {
        Ok(mv) => set.patches.extend([
            DomPatch::SetTextList {
                selector: ".mission__eyebrow".to_string(),
                texts: vec![mv.mission_eyebrow, mv.vision_eyebrow],
            },
            DomPatch::SetTextList {
                selector: ".mission__text".to_string(),
                texts: vec![mv.mission_text, mv.vision_text],
            },
            DomPatch::SetAttrList {
                selector: ".mission__img".to_string(),
                name: "src".to_string(),
                values: vec![mv.mission_image, mv.vision_image],
            },
        ]),
        Err(err) => log::warn!("mission & vision content not loaded: {err}"),
    }

    match fetch_json::<ClientsContent, _>(fetcher, &format!("{root}/about/clients.json")).await {
        Ok(clients) => {
            set.patches.push(set_text(".clients__eyebrow", &clients.eyebrow));
            set.patches.push(set_text(".clients__title", &clients.title));
            // The marquee renders the logo set twice so the loop is seamless.
            let logos: String = clients
                .logos
                .iter()
                .map(|logo| {
                    format!(
                        "<img src=\"{}\" alt=\"{}\" class=\"clients__logo\">",
                        logo.image, logo.alt
                    )
                })
                .collect();
            set.patches.push(DomPatch::SetHtml {
                selector: ".clients__marquee-track".to_string(),
                html: format!("{logos}{logos}"),
            });
        }
        Err(err) => log::warn!("clients content not loaded: {err}"),
    }

    match fetch_json::<SeparatorPair, _>(fetcher, &format!("{root}/about/separator.json")).await {
        Ok(separator) => set.patches.push(DomPatch::SetAttrList {
            selector: ".image-separator__img".to_string(),
            name: "src".to_string(),
            values: vec![separator.top_image, separator.bottom_image],
        }),
        Err(err) => log::warn!("separator content not loaded: {err}"),
    }

    set
}

// =============================================================================
// Services page
// =============================================================================

/// The completion event fires even when every document fails, so the page
/// animations never hang waiting for it.
pub async fn services_sections<F: ContentFetcher>(fetcher: &F, root: &str) -> PatchSet {
    let mut set = PatchSet::default();

    match fetch_json::<ServicesHero, _>(fetcher, &format!("{root}/services/hero.json")).await {
        Ok(hero) => set.patches.extend([
            set_text(".services-hero__eyebrow", &hero.eyebrow),
            set_text(".services-hero__title", &hero.title),
        ]),
        Err(err) => log::warn!("services hero not loaded: {err}"),
    }

    match fetch_json::<ServicesList, _>(fetcher, &format!("{root}/services/services.json")).await {
        Ok(list) => {
            let cards: String = list
                .services
                .iter()
                .map(|service| {
                    format!(
                        concat!(
                            "<div class=\"service-card\">",
                            "<img src=\"{image}\" alt=\"{title}\" class=\"service-card__image\">",
                            "<div class=\"service-card__content\">",
                            "<h3 class=\"service-card__title\">{title}</h3>",
                            "<p class=\"service-card__description\">{description}</p>",
                            "</div>",
                            "</div>"
                        ),
                        image = service.image,
                        title = service.title,
                        description = service.description,
                    )
                })
                .collect();
            set.patches.push(DomPatch::SetHtml {
                selector: "#services-container".to_string(),
                html: cards,
            });
        }
        Err(err) => log::warn!("services list not loaded: {err}"),
    }

    match fetch_json::<SeparatorContent, _>(fetcher, &format!("{root}/services/separator.json"))
        .await
    {
        Ok(separator) => {
            if !separator.image.is_empty() {
                set.patches
                    .push(set_attr(".image-separator__img", "src", &separator.image));
            }
        }
        Err(err) => log::warn!("separator content not loaded: {err}"),
    }

    set.event = Some(PageEvent::ServicesContentLoaded.with_detail(serde_json::Value::Null));
    set
}

// =============================================================================
// Legal pages
// =============================================================================

/// `policy` is `privacy-policy` or `cookie-policy`; the Markdown body is
/// converted to sectioned HTML.
pub async fn legal<F: ContentFetcher>(fetcher: &F, root: &str, policy: Option<&str>) -> PatchSet {
    let Some(policy) = policy else {
        log::warn!("no legal policy specified");
        return PatchSet::default();
    };
    let doc = match fetch_json::<LegalDocument, _>(fetcher, &format!("{root}/legal/{policy}.json"))
        .await
    {
        Ok(doc) => doc,
        Err(err) => {
            log::warn!("legal content not loaded: {err}");
            return PatchSet::default();
        }
    };

    let mut patches = vec![
        set_text(".legal-page__title", &doc.title),
        set_text(
            ".legal-page__updated",
            format!("Last updated: {}", doc.last_updated),
        ),
    ];
    if !doc.body.trim().is_empty() {
        patches.push(DomPatch::SetHtml {
            selector: ".legal-page__content".to_string(),
            html: markdown_to_html(&doc.body),
        });
    }
    PatchSet {
        patches,
        event: None,
    }
}

// =============================================================================
// SEO
// =============================================================================

/// Global plus per-page SEO overrides. Structured data is injected on the
/// homepage only.
pub async fn seo<F: ContentFetcher>(
    fetcher: &F,
    root: &str,
    page: &str,
    structured_data: bool,
) -> PatchSet {
    let global = match fetch_json::<SeoGlobal, _>(fetcher, &format!("{root}/seo/global.json")).await
    {
        Ok(global) => global,
        Err(err) => {
            log::warn!("global seo settings not loaded: {err}");
            return PatchSet::default();
        }
    };

    let mut patches = Vec::new();
    if !global.favicon.is_empty() {
        patches.push(set_attr("link[rel=\"icon\"]", "href", &global.favicon));
    }
    if !global.apple_touch_icon.is_empty() {
        patches.push(set_attr(
            "link[rel=\"apple-touch-icon\"]",
            "href",
            &global.apple_touch_icon,
        ));
    }
    if !global.site_name.is_empty() {
        patches.push(set_attr(
            "meta[property=\"og:site_name\"]",
            "content",
            &global.site_name,
        ));
    }
    if structured_data {
        if let Some(data) = local_business_json(&global) {
            patches.push(DomPatch::SetHtml {
                selector: "script[type=\"application/ld+json\"]".to_string(),
                html: data.to_string(),
            });
        }
    }

    match fetch_json::<SeoPage, _>(fetcher, &format!("{root}/seo/{page}.json")).await {
        Ok(page_seo) => {
            if !page_seo.title.is_empty() {
                patches.push(DomPatch::SetTitle {
                    title: page_seo.title.clone(),
                });
                patches.push(set_attr("meta[property=\"og:title\"]", "content", &page_seo.title));
                patches.push(set_attr("meta[name=\"twitter:title\"]", "content", &page_seo.title));
            }
            if !page_seo.description.is_empty() {
                patches.push(set_attr(
                    "meta[name=\"description\"]",
                    "content",
                    &page_seo.description,
                ));
                patches.push(set_attr(
                    "meta[property=\"og:description\"]",
                    "content",
                    &page_seo.description,
                ));
                patches.push(set_attr(
                    "meta[name=\"twitter:description\"]",
                    "content",
                    &page_seo.description,
                ));
            }
            let og_image = if page_seo.og_image.is_empty() {
                &global.og_image
            } else {
                &page_seo.og_image
            };
            if !og_image.is_empty() {
                let full = format!("{}{}", global.site_url, og_image);
                patches.push(set_attr("meta[property=\"og:image\"]", "content", &full));
                patches.push(set_attr("meta[name=\"twitter:image\"]", "content", &full));
            }
            let canonical = if page == "homepage" {
                global.site_url.clone()
            } else {
                format!("{}/{page}", global.site_url)
            };
            patches.push(set_attr("link[rel=\"canonical\"]", "href", &canonical));
        }
        Err(err) => log::info!("page seo for {page} not found, using global defaults: {err}"),
    }

    PatchSet {
        patches,
        event: None,
    }
}

/// schema.org LocalBusiness document for the homepage JSON-LD script.
fn local_business_json(global: &SeoGlobal) -> Option<serde_json::Value> {
    if global.site_name.is_empty() {
        return None;
    }
    let lb = &global.local_business;
    let business_type = if lb.business_type.is_empty() {
        "LocalBusiness"
    } else {
        lb.business_type.as_str()
    };
    let image = if global.og_image.is_empty() {
        format!("{}/images/og-image.jpg", global.site_url)
    } else {
        format!("{}{}", global.site_url, global.og_image)
    };
    Some(json!({
        "@context": "https://schema.org",
        "@type": business_type,
        "name": global.site_name,
        "description": global.default_description,
        "url": global.site_url,
        "logo": format!("{}/images/logo.png", global.site_url),
        "image": image,
        "telephone": lb.phone,
        "email": lb.email,
        "address": {
            "@type": "PostalAddress",
            "streetAddress": lb.street,
            "addressLocality": lb.city,
            "addressRegion": lb.region,
            "postalCode": lb.postal_code,
            "addressCountry": lb.country,
        },
    }))
}

// =============================================================================
// Shared components (loader, navbar, footer)
// =============================================================================

/// Inject the shared partials and mark the active nav entry. `current_page` is
/// the last path segment ("" for the site root).
pub async fn components<F: ContentFetcher>(
    fetcher: &F,
    current_page: &str,
    navbar_light: bool,
) -> PatchSet {
    let mut patches = Vec::new();

    // Loader first, then navbar above it, footer at the end of body.
    for (name, path, position) in [
        ("loader", "components/loader.html", InsertPosition::Afterbegin),
        ("navbar", "components/navbar.html", InsertPosition::Afterbegin),
        ("footer", "components/footer.html", InsertPosition::Beforeend),
    ] {
        match fetcher.fetch_text(path).await {
            Ok(html) => patches.push(DomPatch::InsertHtml {
                selector: "body".to_string(),
                position,
                html,
            }),
            Err(err) => log::warn!("failed to load {name} component: {err}"),
        }
    }

    if navbar_light {
        patches.push(DomPatch::AddClass {
            selector: "#navbar".to_string(),
            class: "navbar--light".to_string(),
        });
    }

    if let Some(nav) = active_nav(current_page) {
        let link = format!(".navbar__link[data-nav=\"{nav}\"]");
        patches.push(DomPatch::AddClass {
            selector: link.clone(),
            class: "navbar__link--active".to_string(),
        });
        patches.push(DomPatch::InsertHtml {
            selector: link,
            position: InsertPosition::Afterbegin,
            html: "<span class=\"navbar__link-dot\">\u{2022} </span>".to_string(),
        });
        patches.push(DomPatch::AddClass {
            selector: format!(".footer__nav-link[data-nav=\"{nav}\"]"),
            class: "footer__nav-link--active".to_string(),
        });
    }

    PatchSet {
        patches,
        event: Some(PageEvent::ComponentsLoaded.with_detail(serde_json::Value::Null)),
    }
}

fn active_nav(current_page: &str) -> Option<&'static str> {
    if current_page.is_empty() || current_page == "index.html" {
        return Some("home");
    }
    ["about", "services", "projects"]
        .into_iter()
        .find(|nav| current_page.contains(nav))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_support::FakeFetcher;
    use crate::types::{ContentPaths, GalleryImage};
    use futures::executor::block_on;
    use std::rc::Rc;

    fn project(slug: &str, title: &str, year: &str) -> Project {
        Project {
            slug: slug.to_string(),
            title: title.to_string(),
            category: "Commercial".to_string(),
            year: year.to_string(),
            description: "Warehouse conversion".to_string(),
            image: format!("/images/{slug}.jpg"),
            gallery: (1..=3)
                .map(|n| GalleryImage {
                    image: format!("/images/{slug}-{n}.jpg"),
                    caption: String::new(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn store_with_projects(projects: &[Project]) -> ProjectsStore<FakeFetcher> {
        let slugs: Vec<&str> = projects.iter().map(|p| p.slug.as_str()).collect();
        let manifest = serde_json::to_string(&serde_json::json!({ "projects": slugs })).unwrap();
        let mut entries = vec![("/content/projects/_manifest.json".to_string(), manifest)];
        for p in projects {
            entries.push((
                format!("/content/projects/{}.json", p.slug),
                serde_json::to_string(p).unwrap(),
            ));
        }
        let borrowed: Vec<(&str, &str)> = entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        ProjectsStore::new(Rc::new(FakeFetcher::new(&borrowed)), ContentPaths::default())
    }

    #[test]
    fn homepage_without_featured_projects_is_silent() {
        let store = store_with_projects(&[project("lumos", "Lumos", "2025")]);
        let set = block_on(homepage_projects(&store));
        assert!(set.patches.is_empty());
        assert!(set.event.is_none());
    }

    #[test]
    fn homepage_projects_render_eagerly_and_announce() {
        let mut p = project("lumos", "Lumos", "2025");
        p.display.feature_homepage = true;
        let store = store_with_projects(&[p]);

        let set = block_on(homepage_projects(&store));
        let DomPatch::SetHtml { selector, html } = &set.patches[0] else {
            panic!("expected SetHtml");
        };
        assert_eq!(selector, ".projects__list");
        assert!(html.contains("href=\"project.html?project=lumos\""));
        assert!(html.contains("data-category=\"commercial\""));
        assert!(!html.contains("loading=\"lazy\""));
        assert_eq!(set.event.as_ref().unwrap().name, "homepageProjectsLoaded");
    }

    #[test]
    fn projects_list_lazies_after_the_fourth_item() {
        let projects: Vec<Project> = (1..=6)
            .map(|n| project(&format!("p{n}"), &format!("P{n}"), "2024"))
            .collect();
        let store = store_with_projects(&projects);

        let set = block_on(projects_list(&store));
        let DomPatch::SetHtml { html, .. } = &set.patches[0] else {
            panic!("expected SetHtml");
        };
        assert_eq!(html.matches("loading=\"lazy\"").count(), 2);
    }

    #[test]
    fn selected_projects_travel_in_the_event_detail() {
        let mut p = project("lumos", "Lumos", "2025");
        p.display.feature_selected = true;
        let store = store_with_projects(&[p]);

        let set = block_on(selected_projects(&store));
        assert!(set.patches.is_empty());
        let event = set.event.unwrap();
        assert_eq!(event.name, "selectedProjectsLoaded");
        assert_eq!(
            event.detail["projects"][0]["url"],
            "project.html?project=lumos"
        );
    }

    #[test]
    fn detail_page_sets_title_seo_and_next_project() {
        let store = store_with_projects(&[
            project("lumos", "Lumos", "2025"),
            project("the-gantry", "The Gantry", "2025"),
        ]);

        let set = block_on(project_detail(&store, Some("lumos"), &SiteSettings::default()));
        assert!(set
            .patches
            .contains(&DomPatch::SetTitle {
                title: "Lumos | Buterin L'Estrange".to_string()
            }));
        assert!(set.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetAttr { selector, value, .. }
                if selector == "meta[property=\"og:url\"]"
                    && value == "https://blprojects.com.au/project?project=lumos"
        )));
        // all() orders Lumos before The Gantry, so the next link wraps forward.
        assert!(set.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetText { selector, text }
                if selector == ".project-next__title" && text == "THE GANTRY"
        )));
        assert_eq!(set.event.as_ref().unwrap().name, "projectPageLoaded");
    }

    #[test]
    fn detail_page_without_slug_or_match_stays_empty() {
        let store = store_with_projects(&[project("lumos", "Lumos", "2025")]);
        let set = block_on(project_detail(&store, None, &SiteSettings::default()));
        assert!(set.patches.is_empty());
        let set = block_on(project_detail(&store, Some("nope"), &SiteSettings::default()));
        assert!(set.patches.is_empty());
        assert!(set.event.is_none());
    }

    #[test]
    fn meta_items_omit_missing_values() {
        let mut p = project("lumos", "Lumos", "2025");
        p.details.location = "Sydney".to_string();
        let html = meta_items_html(&p);
        assert!(html.contains("Location"));
        assert!(html.contains("Sydney"));
        // year_completed falls back to the project year.
        assert!(html.contains("2025"));
        assert!(!html.contains("Scope of Work"));
        assert!(!html.contains("Size / Levels"));
    }

    #[test]
    fn gallery_of_three_renders_three_plain_images() {
        let p = project("lumos", "Lumos", "2025");
        let html = gallery_html(&p);
        assert_eq!(html.matches("<img").count(), 3);
        assert!(!html.contains("project__image-row"));
        // First two eager, third lazy.
        assert_eq!(html.matches("loading=\"lazy\"").count(), 1);
    }

    #[test]
    fn gallery_row_of_two_never_duplicates_the_fourth_image() {
        let mut p = project("lumos", "Lumos", "2025");
        p.gallery = (1..=4)
            .map(|n| GalleryImage {
                image: format!("/images/g{n}.jpg"),
                caption: String::new(),
            })
            .collect();
        let html = gallery_html(&p);
        assert!(html.contains("project__image-row"));
        assert_eq!(html.matches("/images/g4.jpg").count(), 1);
        assert_eq!(html.matches("<img").count(), 4);

        p.gallery.push(GalleryImage {
            image: "/images/g5.jpg".to_string(),
            caption: String::new(),
        });
        let html = gallery_html(&p);
        assert_eq!(html.matches("/images/g4.jpg").count(), 1);
        assert_eq!(html.matches("<img").count(), 5);
    }

    #[test]
    fn homepage_sections_survive_a_missing_document() {
        let fetcher = FakeFetcher::new(&[(
            "/content/homepage/hero.json",
            r#"{"eyebrow":"Builders","title_line_1":"We","title_line_2":"Build","title_line_3":"Spaces","description":"d","scroll_cta":"Scroll"}"#,
        )]);
        let set = block_on(homepage_sections(&fetcher, "/content"));
        // Hero patched; numbers, founders, and contact skipped without erroring.
        assert!(set
            .patches
            .contains(&set_text(".hero__eyebrow", "Builders")));
        assert!(!set
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::SetAttrAll { .. })));
    }

    #[test]
    fn contact_settings_rewrite_every_mailto_and_tel_link() {
        let fetcher = FakeFetcher::new(&[(
            "/content/settings/contact.json",
            r#"{"email":"hello@blprojects.com.au","phone":"+61 2 0000 0000","address_1":"1 Example St","address_2":"Sydney NSW","address_3":"Australia"}"#,
        )]);
        let set = block_on(homepage_sections(&fetcher, "/content"));
        assert!(set.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetAttrAll { selector, value, .. }
                if selector == "a[href^=\"mailto:\"]" && value == "mailto:hello@blprojects.com.au"
        )));
    }

    #[test]
    fn services_event_fires_even_when_everything_fails() {
        let fetcher = FakeFetcher::new(&[]);
        let set = block_on(services_sections(&fetcher, "/content"));
        assert!(set.patches.is_empty());
        assert_eq!(set.event.unwrap().name, "servicesContentLoaded");
    }

    #[test]
    fn legal_body_renders_sectioned_html() {
        let fetcher = FakeFetcher::new(&[(
            "/content/legal/privacy-policy.json",
            r#"{"title":"Privacy Policy","last_updated":"January 2025","body":"Intro\n\n## Scope\n\nDetails"}"#,
        )]);
        let set = block_on(legal(&fetcher, "/content", Some("privacy-policy")));
        assert!(set
            .patches
            .contains(&set_text(".legal-page__title", "Privacy Policy")));
        assert!(set
            .patches
            .contains(&set_text(".legal-page__updated", "Last updated: January 2025")));
        let DomPatch::SetHtml { html, .. } = set.patches.last().unwrap() else {
            panic!("expected SetHtml body");
        };
        assert_eq!(html.matches("<section class=\"legal-section\">").count(), 2);
    }

    #[test]
    fn seo_injects_structured_data_on_the_homepage_only() {
        let global = r#"{"site_name":"Buterin L'Estrange","site_url":"https://blprojects.com.au","default_description":"Builders","og_image":"/images/og.jpg","local_business":{"type":"GeneralContractor","phone":"+61","email":"hi@x","street":"1 St","city":"Sydney","region":"NSW","postal_code":"2000","country":"AU"}}"#;
        let fetcher = FakeFetcher::new(&[("/content/seo/global.json", global)]);

        let set = block_on(seo(&fetcher, "/content", "homepage", true));
        let ld = set.patches.iter().find_map(|p| match p {
            DomPatch::SetHtml { selector, html }
                if selector == "script[type=\"application/ld+json\"]" =>
            {
                Some(html)
            }
            _ => None,
        });
        let data: serde_json::Value = serde_json::from_str(ld.unwrap()).unwrap();
        assert_eq!(data["@type"], "GeneralContractor");
        assert_eq!(data["address"]["addressLocality"], "Sydney");

        let set = block_on(seo(&fetcher, "/content", "about", false));
        assert!(!set
            .patches
            .iter()
            .any(|p| matches!(p, DomPatch::SetHtml { .. })));
    }

    #[test]
    fn seo_page_overrides_title_and_og_image() {
        let fetcher = FakeFetcher::new(&[
            (
                "/content/seo/global.json",
                r#"{"site_name":"BL","site_url":"https://blprojects.com.au","og_image":"/images/og.jpg"}"#,
            ),
            (
                "/content/seo/about.json",
                r#"{"title":"About | BL","description":"Who we are"}"#,
            ),
        ]);
        let set = block_on(seo(&fetcher, "/content", "about", false));
        assert!(set.patches.contains(&DomPatch::SetTitle {
            title: "About | BL".to_string()
        }));
        // Page has no og_image, so the global one wins, absolutized.
        assert!(set.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetAttr { selector, value, .. }
                if selector == "meta[property=\"og:image\"]"
                    && value == "https://blprojects.com.au/images/og.jpg"
        )));
        assert!(set.patches.iter().any(|p| matches!(
            p,
            DomPatch::SetAttr { selector, value, .. }
                if selector == "link[rel=\"canonical\"]"
                    && value == "https://blprojects.com.au/about"
        )));
    }

    #[test]
    fn components_mark_the_active_nav_link() {
        let fetcher = FakeFetcher::new(&[
            ("components/loader.html", "<div class=\"loader\"></div>"),
            ("components/navbar.html", "<nav id=\"navbar\"></nav>"),
            ("components/footer.html", "<footer></footer>"),
        ]);
        let set = block_on(components(&fetcher, "projects-list.html", false));
        assert_eq!(
            set.patches
                .iter()
                .filter(|p| matches!(p, DomPatch::InsertHtml { selector, .. } if selector == "body"))
                .count(),
            3
        );
        assert!(set.patches.iter().any(|p| matches!(
            p,
            DomPatch::AddClass { selector, class }
                if selector == ".navbar__link[data-nav=\"projects\"]"
                    && class == "navbar__link--active"
        )));
        assert_eq!(set.event.unwrap().name, "componentsLoaded");
    }

    #[test]
    fn components_tolerate_a_missing_partial() {
        let fetcher = FakeFetcher::new(&[("components/navbar.html", "<nav></nav>")]);
        let set = block_on(components(&fetcher, "", true));
        // Only the navbar landed; active home link and light class still apply.
        assert_eq!(
            set.patches
                .iter()
                .filter(|p| matches!(p, DomPatch::InsertHtml { selector, .. } if selector == "body"))
                .count(),
            1
        );
        assert!(set.patches.contains(&DomPatch::AddClass {
            selector: "#navbar".to_string(),
            class: "navbar--light".to_string(),
        }));
    }

    #[test]
    fn build_page_orders_seo_before_content() {
        let mut p = project("lumos", "Lumos", "2025");
        p.display.feature_homepage = true;
        let store = store_with_projects(&[p]);
        let fetcher = FakeFetcher::new(&[]);
        let request = PageRequest {
            page: PageKind::Home,
            project_slug: None,
            policy: None,
        };

        let result = block_on(build_page(&request, &store, &fetcher, &EngineConfig::default()));
        assert_eq!(result.patch_sets.len(), 3);
        assert_eq!(
            result.patch_sets[2].event.as_ref().unwrap().name,
            "homepageProjectsLoaded"
        );
    }
}
