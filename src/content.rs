// Content fetching over a JS-supplied callback, plus the legacy frontmatter parser.
// One attempt per resource per page load: no retries, no timeout, no backoff.

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::EngineError;
use crate::types::Project;

/// Source of raw content documents. The engine never performs I/O itself;
/// the wasm build delegates to a JS fetch callback and tests use in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait ContentFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, EngineError>;
}

/// Fetch a resource and deserialize it as JSON.
pub async fn fetch_json<T, F>(fetcher: &F, path: &str) -> Result<T, EngineError>
where
    T: DeserializeOwned,
    F: ContentFetcher,
{
    let body = fetcher.fetch_text(path).await?;
    serde_json::from_str(&body).map_err(|e| EngineError::json(path, e))
}

/// Fetcher backed by a JS function `(path: string) => Promise<string>`.
/// The JS side resolves with the response body on 2xx and rejects otherwise,
/// so a missing resource and a network error both surface as `EngineError::Fetch`.
pub struct JsFetcher {
    fetch_fn: js_sys::Function,
}

impl JsFetcher {
    pub fn new(fetch_fn: js_sys::Function) -> Self {
        JsFetcher { fetch_fn }
    }
}

impl ContentFetcher for JsFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, EngineError> {
        let promise = self
            .fetch_fn
            .call1(&JsValue::NULL, &JsValue::from_str(path))
            .map_err(|e| fetch_error(path, &e))?;
        let promise = js_sys::Promise::from(promise);
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| fetch_error(path, &e))?;
        value.as_string().ok_or_else(|| EngineError::Fetch {
            path: path.to_string(),
            reason: "response body was not a string".to_string(),
        })
    }
}

fn fetch_error(path: &str, value: &JsValue) -> EngineError {
    let reason = value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_string());
    EngineError::Fetch {
        path: path.to_string(),
        reason,
    }
}

/// Parse a legacy Markdown project document: a `---`-delimited key:value
/// frontmatter block with the slug derived from the filename. The prose body
/// below the block is unused. Returns None when no frontmatter is present.
pub fn parse_frontmatter_markdown(text: &str, filename: &str) -> Option<Project> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;
    let end = rest.find("\n---")?;
    let block = &rest[..end];

    let mut project = Project {
        slug: filename.trim_end_matches(".md").to_string(),
        ..Default::default()
    };

    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = strip_quotes(value.trim()).to_string();
        match key.trim() {
            "title" => project.title = value,
            "category" => project.category = value,
            "year" => project.year = value,
            "description" => project.description = value,
            "image" => project.image = value,
            "location" => project.details.location = value,
            "year_completed" => project.details.year_completed = value,
            "scope" => project.details.scope = value,
            "size" => project.details.size = value,
            _ => {}
        }
    }

    Some(project)
}

fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix('\''))
        .unwrap_or(value)
}

/// In-memory fetcher for native tests.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    pub struct FakeFetcher {
        responses: HashMap<String, String>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn new(entries: &[(&str, &str)]) -> Self {
            FakeFetcher {
                responses: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        /// Number of fetches issued so far.
        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ContentFetcher for FakeFetcher {
        async fn fetch_text(&self, path: &str) -> Result<String, EngineError> {
            self.calls.borrow_mut().push(path.to_string());
            self.responses
                .get(path)
                .cloned()
                .ok_or_else(|| EngineError::Status {
                    path: path.to_string(),
                    status: 404,
                })
        }
    }
}
