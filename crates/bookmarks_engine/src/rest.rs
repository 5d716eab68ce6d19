use bookmarks_logging::{bm_debug, bm_info};
use reqwest::Url;
use serde::Serialize;

use crate::http::{authorize, build_client, endpoint, json_body, read_json, send_checked};
use crate::{
    BookmarkDraft, BookmarkRow, BookmarkStore, ChangeCallback, ChangeHub, ServiceSettings,
    StoreError, SubscriptionId,
};

/// Store client speaking the service's REST dialect (`/rest/v1/<table>`,
/// `column=eq.value` filters).
///
/// Successful writes notify this store's subscribers. Changes made by other
/// clients arrive through [`RestBookmarkStore::notify_remote_change`], driven
/// by whatever delivers the table's realtime events.
pub struct RestBookmarkStore {
    settings: ServiceSettings,
    client: reqwest::Client,
    changes: ChangeHub,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    user_id: &'a str,
    title: &'a str,
    url: &'a str,
}

impl RestBookmarkStore {
    pub fn new(settings: ServiceSettings) -> Result<Self, StoreError> {
        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            client,
            changes: ChangeHub::new(),
        })
    }

    /// Feeds a change event received from the realtime channel.
    pub fn notify_remote_change(&self) -> usize {
        self.changes.notify()
    }

    fn table_url(&self) -> Result<Url, StoreError> {
        endpoint(&self.settings, &format!("rest/v1/{}", self.settings.table))
    }

    fn row_url(&self, id: &str) -> Result<Url, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        authorize(
            self.client.request(method, url),
            &self.settings,
            self.settings.access_token.as_deref(),
        )
    }
}

#[async_trait::async_trait]
impl BookmarkStore for RestBookmarkStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookmarkRow>, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{user_id}"))
            .append_pair("order", "created_at.desc");

        let response = send_checked(self.request(reqwest::Method::GET, url)).await?;
        let rows: Vec<BookmarkRow> = read_json(response).await?;
        bm_debug!("Fetched {} bookmarks", rows.len());
        Ok(rows)
    }

    async fn insert(&self, user_id: &str, draft: &BookmarkDraft) -> Result<(), StoreError> {
        let body = json_body(&[InsertRow {
            user_id,
            title: &draft.title,
            url: &draft.url,
        }])?;
        let request = self
            .request(reqwest::Method::POST, self.table_url()?)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(body);
        send_checked(request).await?;
        bm_info!("Inserted bookmark url_len={}", draft.url.len());
        self.changes.notify();
        Ok(())
    }

    async fn update(&self, id: &str, draft: &BookmarkDraft) -> Result<(), StoreError> {
        let body = json_body(draft)?;
        let request = self
            .request(reqwest::Method::PATCH, self.row_url(id)?)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(body);
        send_checked(request).await?;
        bm_info!("Updated bookmark id={}", id);
        self.changes.notify();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        send_checked(self.request(reqwest::Method::DELETE, self.row_url(id)?)).await?;
        bm_info!("Deleted bookmark id={}", id);
        self.changes.notify();
        Ok(())
    }

    fn subscribe_to_changes(&self, on_change: ChangeCallback) -> SubscriptionId {
        self.changes.subscribe(on_change)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        self.changes.unsubscribe(subscription)
    }
}
