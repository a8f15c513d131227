// Projects store: discovery via the manifest, completeness filtering, and the
// sorted views the page populators read. Injected per page session, not a global.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;

use crate::content::{fetch_json, ContentFetcher};
use crate::types::{ContentPaths, Manifest, Project};

type SharedLoad = Shared<LocalBoxFuture<'static, Rc<Vec<Project>>>>;

enum LoadState {
    Idle,
    /// All concurrent callers await this same future; at most one load is ever
    /// in flight per store.
    Loading(SharedLoad),
    Loaded(Rc<Vec<Project>>),
}

/// In-memory cache of all complete projects for one page session.
pub struct ProjectsStore<F> {
    fetcher: Rc<F>,
    paths: ContentPaths,
    state: RefCell<LoadState>,
}

impl<F: ContentFetcher + 'static> ProjectsStore<F> {
    pub fn new(fetcher: Rc<F>, paths: ContentPaths) -> Self {
        ProjectsStore {
            fetcher,
            paths,
            state: RefCell::new(LoadState::Idle),
        }
    }

    /// Load every project listed by the manifest (or the fallback slug list),
    /// keeping only complete ones. Idempotent and memoized: concurrent callers
    /// share the single in-flight load and all receive the same sequence.
    pub async fn load_all(&self) -> Rc<Vec<Project>> {
        let shared = {
            let mut state = self.state.borrow_mut();
            match &*state {
                LoadState::Loaded(projects) => return projects.clone(),
                LoadState::Loading(shared) => shared.clone(),
                LoadState::Idle => {
                    let shared = run_load(self.fetcher.clone(), self.paths.clone())
                        .boxed_local()
                        .shared();
                    *state = LoadState::Loading(shared.clone());
                    shared
                }
            }
        };

        let projects = shared.await;
        *self.state.borrow_mut() = LoadState::Loaded(projects.clone());
        projects
    }

    /// Homepage-featured projects, ascending by homepage order.
    /// Unordered items sort last; ties keep manifest order (stable sort).
    pub async fn homepage_featured(&self) -> Vec<Project> {
        let mut featured: Vec<Project> = self
            .load_all()
            .await
            .iter()
            .filter(|p| p.display.feature_homepage)
            .cloned()
            .collect();
        featured.sort_by_key(|p| p.display.homepage_order);
        featured
    }

    /// Selected-work slider projects, ascending by selected order.
    pub async fn selected_featured(&self) -> Vec<Project> {
        let mut selected: Vec<Project> = self
            .load_all()
            .await
            .iter()
            .filter(|p| p.display.feature_selected)
            .cloned()
            .collect();
        selected.sort_by_key(|p| p.display.selected_order);
        selected
    }

    /// Every complete project, newest year first; ties break on ascending title.
    pub async fn all(&self) -> Vec<Project> {
        let mut all: Vec<Project> = self.load_all().await.iter().cloned().collect();
        all.sort_by(|a, b| {
            b.year_num()
                .cmp(&a.year_num())
                .then_with(|| a.title.cmp(&b.title))
        });
        all
    }

    pub async fn by_slug(&self, slug: &str) -> Option<Project> {
        self.load_all()
            .await
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
    }

    /// Circular successor in `all()` order. An unknown slug falls back to the
    /// first project rather than failing; an empty store yields None.
    pub async fn next_after(&self, current_slug: &str) -> Option<Project> {
        let all = self.all().await;
        if all.is_empty() {
            return None;
        }
        match all.iter().position(|p| p.slug == current_slug) {
            Some(index) => Some(all[(index + 1) % all.len()].clone()),
            None => Some(all[0].clone()),
        }
    }
}

/// The actual load: one manifest fetch, one fetch per slug, failures skipped.
/// Free function so the future owns its state and can outlive the caller.
async fn run_load<F: ContentFetcher>(fetcher: Rc<F>, paths: ContentPaths) -> Rc<Vec<Project>> {
    let manifest_path = format!("{}/projects/_manifest.json", paths.root);
    let slugs = match fetch_json::<Manifest, _>(fetcher.as_ref(), &manifest_path).await {
        Ok(manifest) => manifest.projects,
        Err(err) => {
            log::warn!("manifest unavailable ({err}), using fallback slugs");
            paths.fallback_slugs.clone()
        }
    };

    let mut seen = Vec::new();
    let mut projects = Vec::new();
    for slug in slugs {
        if seen.contains(&slug) {
            continue;
        }
        seen.push(slug.clone());

        let path = format!("{}/projects/{}.json", paths.root, slug);
        let mut project = match fetch_json::<Project, _>(fetcher.as_ref(), &path).await {
            Ok(project) => project,
            Err(err) => {
                log::warn!("skipping project {slug}: {err}");
                continue;
            }
        };
        project.slug = slug;

        if project.is_complete() {
            projects.push(project);
        } else {
            log::info!("project {} is incomplete and will not be displayed", project.slug);
        }
    }

    log::info!("loaded {} complete projects", projects.len());
    Rc::new(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_support::FakeFetcher;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;

    fn project_json(title: &str, year: &str, display: &str) -> String {
        format!(
            r#"{{
                "title": "{title}",
                "category": "Commercial",
                "year": "{year}",
                "description": "d",
                "image": "/images/x.jpg",
                "gallery": [{{"image":"1"}},{{"image":"2"}},{{"image":"3"}}],
                "display": {display}
            }}"#
        )
    }

    fn store_with(entries: &[(&str, &str)]) -> ProjectsStore<FakeFetcher> {
        ProjectsStore::new(
            Rc::new(FakeFetcher::new(entries)),
            ContentPaths::default(),
        )
    }

    fn manifest(slugs: &[&str]) -> String {
        serde_json::to_string(&serde_json::json!({ "projects": slugs })).unwrap()
    }

    #[test]
    fn incomplete_projects_are_excluded_from_every_view() {
        let thin = r#"{"title":"Thin","year":"2024","category":"c","description":"d","image":"i","gallery":[]}"#;
        let store = store_with(&[
            ("/content/projects/_manifest.json", &manifest(&["lumos", "thin"])),
            (
                "/content/projects/lumos.json",
                &project_json("Lumos", "2025", "{}"),
            ),
            ("/content/projects/thin.json", thin),
        ]);

        let all = futures::executor::block_on(store.all());
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].slug, "lumos");
    }

    #[test]
    fn failed_project_fetch_is_skipped_not_fatal() {
        let store = store_with(&[
            (
                "/content/projects/_manifest.json",
                &manifest(&["missing", "lumos"]),
            ),
            (
                "/content/projects/lumos.json",
                &project_json("Lumos", "2025", "{}"),
            ),
        ]);

        let all = futures::executor::block_on(store.all());
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn manifest_failure_falls_back_to_configured_slugs() {
        let store = store_with(&[(
            "/content/projects/lumos.json",
            &project_json("Lumos", "2025", "{}"),
        )]);

        let all = futures::executor::block_on(store.all());
        // Fallback list was tried; only the one resolvable project survives.
        assert_eq!(all.len(), 1);
        let calls = store.fetcher.calls.borrow();
        assert!(calls.iter().any(|p| p.ends_with("/the-gantry.json")));
        assert!(calls.iter().any(|p| p.ends_with("/coffee-emporium.json")));
    }

    #[test]
    fn load_all_is_memoized() {
        let store = store_with(&[
            ("/content/projects/_manifest.json", &manifest(&["lumos"])),
            (
                "/content/projects/lumos.json",
                &project_json("Lumos", "2025", "{}"),
            ),
        ]);

        futures::executor::block_on(async {
            let first = store.load_all().await;
            let second = store.load_all().await;
            assert!(Rc::ptr_eq(&first, &second));
        });
        // One manifest fetch plus one project fetch, total.
        assert_eq!(store.fetcher.call_count(), 2);
    }

    #[test]
    fn concurrent_callers_share_one_in_flight_load() {
        let store = Rc::new(store_with(&[
            ("/content/projects/_manifest.json", &manifest(&["lumos"])),
            (
                "/content/projects/lumos.json",
                &project_json("Lumos", "2025", "{}"),
            ),
        ]));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            handles.push(
                spawner
                    .spawn_local_with_handle(async move { store.load_all().await })
                    .unwrap(),
            );
        }
        let results: Vec<Rc<Vec<Project>>> =
            pool.run_until(futures::future::join_all(handles));

        assert_eq!(store.fetcher.call_count(), 2);
        for result in &results {
            assert!(Rc::ptr_eq(result, &results[0]));
        }
    }

    #[test]
    fn all_sorts_year_desc_then_title_asc() {
        let store = store_with(&[
            (
                "/content/projects/_manifest.json",
                &manifest(&["tradies", "the-gantry", "lumos"]),
            ),
            (
                "/content/projects/lumos.json",
                &project_json("Lumos", "2025", "{}"),
            ),
            (
                "/content/projects/the-gantry.json",
                &project_json("The Gantry", "2025", "{}"),
            ),
            (
                "/content/projects/tradies.json",
                &project_json("Tradies", "2024", "{}"),
            ),
        ]);

        let titles: Vec<String> = futures::executor::block_on(store.all())
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Lumos", "The Gantry", "Tradies"]);
    }

    #[test]
    fn homepage_featured_sorts_by_order_with_default_last() {
        let store = store_with(&[
            (
                "/content/projects/_manifest.json",
                &manifest(&["a", "b", "c", "d"]),
            ),
            (
                "/content/projects/a.json",
                &project_json("A", "2024", r#"{"feature_homepage":true}"#),
            ),
            (
                "/content/projects/b.json",
                &project_json("B", "2024", r#"{"feature_homepage":true,"homepage_order":1}"#),
            ),
            (
                "/content/projects/c.json",
                &project_json("C", "2024", r#"{"feature_homepage":true,"homepage_order":2}"#),
            ),
            ("/content/projects/d.json", &project_json("D", "2024", "{}")),
        ]);

        let titles: Vec<String> = futures::executor::block_on(store.homepage_featured())
            .into_iter()
            .map(|p| p.title)
            .collect();
        // Unordered A (default 99) sorts after B and C; D is not featured.
        assert_eq!(titles, vec!["B", "C", "A"]);
    }

    #[test]
    fn next_after_is_circular_and_tolerates_unknown_slugs() {
        let slugs = ["a", "b", "c", "d", "e"];
        let mut entries = vec![(
            "/content/projects/_manifest.json".to_string(),
            manifest(&slugs),
        )];
        // Same year everywhere, so all() orders by title: A, B, C, D, E.
        for slug in slugs {
            entries.push((
                format!("/content/projects/{slug}.json"),
                project_json(&slug.to_uppercase(), "2024", "{}"),
            ));
        }
        let borrowed: Vec<(&str, &str)> = entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let store = store_with(&borrowed);

        futures::executor::block_on(async {
            let next = store.next_after("e").await.unwrap();
            assert_eq!(next.slug, "a");
            let next = store.next_after("b").await.unwrap();
            assert_eq!(next.slug, "c");
            let next = store.next_after("unknown-slug").await.unwrap();
            assert_eq!(next.slug, "a");
        });
    }

    #[test]
    fn next_after_on_empty_store_is_none() {
        let store = store_with(&[("/content/projects/_manifest.json", &manifest(&[]))]);
        assert!(futures::executor::block_on(store.next_after("x")).is_none());
    }
}
