//! Confluence REST implementation of [`ContentStore`].
//!
//! Endpoints used, all under `<base_url>/rest/api`:
//!
//! | Operation           | Request                                                  |
//! |---------------------|----------------------------------------------------------|
//! | fetch_page          | `GET content/{id}?expand=body.storage,version,body.view,space` |
//! | update_page         | `PUT content/{id}` with `version.number = expected + 1`  |
//! | create_page         | `POST content` with the parent as the only ancestor      |
//! | delete_page         | `DELETE content/{id}`                                    |
//! | list_child_pages    | `GET content/{id}/child/page?start=&limit=&expand=version` |
//! | current_user        | `GET user/current`                                       |
//! | can_write           | `GET content/{id}/restriction`                           |
//!
//! Statuses map to errors as 403 → PermissionDenied, 404 → NotFound,
//! 409 → VersionConflict; anything else outside 2xx is Unexpected.

use crate::store::{ContentStore, Page, PageSummary, StoreError};
use crate::transport::{Method, Request, Response, Transport};
use serde::Deserialize;
use serde_json::json;
use url::Url;

pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Deserialize)]
struct ContentJson {
    id: String,
    title: String,
    version: VersionJson,
    #[serde(default)]
    body: Option<BodyJson>,
    #[serde(default)]
    space: Option<SpaceJson>,
}

#[derive(Debug, Deserialize)]
struct VersionJson {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct BodyJson {
    storage: Option<ValueJson>,
    view: Option<ValueJson>,
}

#[derive(Debug, Deserialize)]
struct ValueJson {
    value: String,
}

#[derive(Debug, Deserialize)]
struct SpaceJson {
    key: String,
}

#[derive(Debug, Deserialize)]
struct ChildrenJson {
    results: Vec<ContentJson>,
}

#[derive(Debug, Deserialize)]
struct CreatedJson {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserJson {
    display_name: Option<String>,
    username: Option<String>,
}

impl From<ContentJson> for Page {
    fn from(content: ContentJson) -> Self {
        let (storage, view) = match content.body {
            Some(body) => (
                body.storage.map(|v| v.value).unwrap_or_default(),
                body.view.map(|v| v.value),
            ),
            None => (String::new(), None),
        };
        Page {
            id: content.id,
            title: content.title,
            version: content.version.number,
            storage,
            view,
            space_key: content.space.map(|s| s.key),
        }
    }
}

impl From<ContentJson> for PageSummary {
    fn from(content: ContentJson) -> Self {
        PageSummary {
            id: content.id,
            title: content.title,
            version: content.version.number,
        }
    }
}

pub struct ConfluenceStore<T: Transport> {
    api: Url,
    token: String,
    page_size: usize,
    transport: T,
}

impl<T: Transport> ConfluenceStore<T> {
    /// `base_url` is the wiki root, e.g. `https://wiki.example.com/confluence`.
    pub fn new(base_url: &str, token: &str, transport: T) -> Result<Self, StoreError> {
        let mut root = base_url.trim_end_matches('/').to_string();
        root.push_str("/rest/api/");
        Ok(ConfluenceStore {
            api: Url::parse(&root)?,
            token: token.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            transport,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, StoreError> {
        let mut url = self.api.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Response, StoreError> {
        let mut headers = vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        let request = Request {
            method,
            url: url.to_string(),
            headers,
            body: body.map(|b| b.to_string()),
        };
        log::debug!("{} {}", request.method, request.url);
        let response = self.transport.send(&request)?;
        log::debug!("{} {} -> {}", request.method, request.url, response.status);
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    match response.status {
        _ if response.is_success() => Ok(response),
        403 => Err(StoreError::PermissionDenied),
        404 => Err(StoreError::NotFound),
        409 => Err(StoreError::VersionConflict),
        status => {
            log::warn!("unexpected status {status}");
            Err(StoreError::Unexpected {
                status,
                body: response.body,
            })
        }
    }
}

fn decode<D: for<'de> Deserialize<'de>>(response: &Response) -> Result<D, StoreError> {
    serde_json::from_str(&response.body).map_err(|e| StoreError::Decode(e.to_string()))
}

impl<T: Transport> ContentStore for ConfluenceStore<T> {
    fn fetch_page(&self, id: &str) -> Result<Page, StoreError> {
        let url = self.endpoint(
            &format!("content/{id}"),
            &[("expand", "body.storage,version,body.view,space".to_string())],
        )?;
        let response = self.send(Method::Get, url, None)?;
        Ok(decode::<ContentJson>(&response)?.into())
    }

    fn update_page(
        &mut self,
        id: &str,
        storage: &str,
        title: &str,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let next = expected_version + 1;
        let body = json!({
            "version": { "number": next },
            "type": "page",
            "title": title,
            "body": {
                "storage": { "value": storage, "representation": "storage" }
            }
        });
        let url = self.endpoint(&format!("content/{id}"), &[])?;
        let response = self.send(Method::Put, url, Some(body))?;
        Ok(decode::<ContentJson>(&response)
            .map(|content| content.version.number)
            .unwrap_or(next))
    }

    fn create_page(
        &mut self,
        parent_id: &str,
        space_key: &str,
        title: &str,
        storage: &str,
    ) -> Result<String, StoreError> {
        let body = json!({
            "type": "page",
            "title": title,
            "space": { "key": space_key },
            "ancestors": [{ "id": parent_id }],
            "body": {
                "storage": { "value": storage, "representation": "storage" }
            }
        });
        let url = self.endpoint("content", &[])?;
        let response = self.send(Method::Post, url, Some(body))?;
        Ok(decode::<CreatedJson>(&response)?.id)
    }

    fn delete_page(&mut self, id: &str) -> Result<(), StoreError> {
        let url = self.endpoint(&format!("content/{id}"), &[])?;
        self.send(Method::Delete, url, None)?;
        Ok(())
    }

    fn list_child_pages(&self, parent_id: &str) -> Result<Vec<PageSummary>, StoreError> {
        let mut pages = Vec::new();
        let mut start = 0;
        loop {
            let url = self.endpoint(
                &format!("content/{parent_id}/child/page"),
                &[
                    ("start", start.to_string()),
                    ("limit", self.page_size.to_string()),
                    ("expand", "version".to_string()),
                ],
            )?;
            let response = self.send(Method::Get, url, None)?;
            let batch = decode::<ChildrenJson>(&response)?.results;
            let fetched = batch.len();
            pages.extend(batch.into_iter().map(PageSummary::from));
            if fetched < self.page_size {
                break;
            }
            start += self.page_size;
        }
        Ok(pages)
    }

    fn current_user(&self) -> Result<String, StoreError> {
        let url = self.endpoint("user/current", &[])?;
        let response = self.send(Method::Get, url, None)?;
        let user = decode::<UserJson>(&response)?;
        user.display_name
            .or(user.username)
            .ok_or_else(|| StoreError::Decode("user has no display name".to_string()))
    }

    fn can_write(&self, page_id: &str) -> Result<bool, StoreError> {
        let url = self.endpoint(&format!("content/{page_id}/restriction"), &[])?;
        match self.send(Method::Get, url, None) {
            Ok(_) => Ok(true),
            Err(StoreError::PermissionDenied) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<Response>>,
        requests: RefCell<Vec<Request>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Response {
                status,
                body: body.to_string(),
            });
            self
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &Request) -> Result<Response, StoreError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| StoreError::Transport("no scripted response".to_string()))
        }
    }

    fn store(transport: ScriptedTransport) -> ConfluenceStore<ScriptedTransport> {
        ConfluenceStore::new("https://wiki.example.com/confluence/", "pat", transport).unwrap()
    }

    fn body_of(request: &Request) -> serde_json::Value {
        serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn fetch_decodes_page_and_sends_bearer_token() {
        let transport = ScriptedTransport::default().reply(
            200,
            r#"{"id":"42","title":"15-10-2026_Handoff_Alex","version":{"number":7},
               "body":{"storage":{"value":"<p>x</p>"},"view":{"value":"<p>x</p>"}},
               "space":{"key":"NOC"}}"#,
        );
        let store = store(transport);

        let page = store.fetch_page("42").unwrap();
        assert_eq!(page.version, 7);
        assert_eq!(page.storage, "<p>x</p>");
        assert_eq!(page.space_key.as_deref(), Some("NOC"));

        let request = &store.transport().requests()[0];
        assert_eq!(request.method, Method::Get);
        assert!(request
            .url
            .starts_with("https://wiki.example.com/confluence/rest/api/content/42?expand="));
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Bearer pat".to_string())));
    }

    #[test]
    fn update_sends_next_version() {
        let transport = ScriptedTransport::default()
            .reply(200, r#"{"id":"42","title":"t","version":{"number":8}}"#);
        let mut store = store(transport);

        assert_eq!(store.update_page("42", "<p>y</p>", "t", 7).unwrap(), 8);

        let request = &store.transport().requests()[0];
        assert_eq!(request.method, Method::Put);
        let body = body_of(request);
        assert_eq!(body["version"]["number"], 8);
        assert_eq!(body["body"]["storage"]["value"], "<p>y</p>");
        assert_eq!(body["body"]["storage"]["representation"], "storage");
    }

    #[test]
    fn statuses_map_to_errors() {
        let transport = ScriptedTransport::default()
            .reply(409, "")
            .reply(403, "")
            .reply(404, "")
            .reply(500, "boom");
        let mut store = store(transport);

        assert!(matches!(
            store.update_page("1", "", "t", 1),
            Err(StoreError::VersionConflict)
        ));
        assert!(matches!(
            store.update_page("1", "", "t", 1),
            Err(StoreError::PermissionDenied)
        ));
        assert!(matches!(store.delete_page("1"), Err(StoreError::NotFound)));
        match store.fetch_page("1") {
            Err(StoreError::Unexpected { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }

    #[test]
    fn child_listing_pages_until_a_short_batch() {
        let entry = |id: u32| format!(r#"{{"id":"{id}","title":"p{id}","version":{{"number":1}}}}"#);
        let full = format!(r#"{{"results":[{},{}]}}"#, entry(1), entry(2));
        let short = format!(r#"{{"results":[{}]}}"#, entry(3));
        let transport = ScriptedTransport::default()
            .reply(200, &full)
            .reply(200, &short);
        let store = store(transport).with_page_size(2);

        let pages = store.list_child_pages("9").unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].title, "p3");

        let requests = store.transport().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.contains("content/9/child/page?start=0&limit=2"));
        assert!(requests[1].url.contains("start=2&limit=2"));
    }

    #[test]
    fn create_names_parent_and_space() {
        let transport = ScriptedTransport::default().reply(200, r#"{"id":"77"}"#);
        let mut store = store(transport);

        let id = store.create_page("9", "NOC", "title", "<p>b</p>").unwrap();
        assert_eq!(id, "77");

        let body = body_of(&store.transport().requests()[0]);
        assert_eq!(body["ancestors"][0]["id"], "9");
        assert_eq!(body["space"]["key"], "NOC");
        assert_eq!(body["type"], "page");
    }

    #[test]
    fn restriction_probe_reports_write_access() {
        let transport = ScriptedTransport::default().reply(200, "{}").reply(403, "");
        let store = store(transport);

        assert!(store.can_write("9").unwrap());
        assert!(!store.can_write("9").unwrap());
    }

    #[test]
    fn current_user_prefers_display_name() {
        let transport = ScriptedTransport::default()
            .reply(200, r#"{"username":"alex","displayName":"Alex Doe"}"#)
            .reply(200, r#"{"username":"sam"}"#);
        let store = store(transport);

        assert_eq!(store.current_user().unwrap(), "Alex Doe");
        assert_eq!(store.current_user().unwrap(), "sam");
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let transport = ScriptedTransport::default().reply(200, "<html>login</html>");
        let store = store(transport);
        assert!(matches!(store.fetch_page("1"), Err(StoreError::Decode(_))));
    }
}
