//! REST storage implementation.
//!
//! Maps each collection to `{base}/{collection}`:
//!
//! ```text
//! GET  /developers?name=Dev1   -> [ {id, name, slug, ...} ]
//! POST /developers             -> {id, name, slug, ...}
//! POST /upload                 multipart: refId, ref, field, files
//! ```

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    Collection, GAME_REF, GameRecord, ImageUpload, NewGame, NewRelation, RelationEntity,
    RelationKind, StorageConfig,
};
use crate::storage::CatalogStorage;

/// Storage backend reached over HTTP.
#[derive(Clone)]
pub struct RestStorage {
    client: Client,
    base_url: Url,
}

impl RestStorage {
    /// Create a REST storage client for the configured backend address.
    pub fn new(client: Client, config: &StorageConfig) -> Result<Self> {
        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection) -> Result<Url> {
        Ok(self.base_url.join(collection.path())?)
    }

    fn upload_url(&self) -> Result<Url> {
        Ok(self.base_url.join("upload")?)
    }

    /// Return the first record of `collection` named exactly `name`.
    async fn find_by_name<T: DeserializeOwned>(
        &self,
        collection: Collection,
        name: &str,
    ) -> Result<Option<T>> {
        let mut url = self.collection_url(collection)?;
        url.query_pairs_mut().append_pair("name", name);

        let response = self.client.get(url).send().await?;
        let items: Vec<T> =
            Self::read_json(response, &format!("find {}", collection.path())).await?;
        Ok(items.into_iter().next())
    }

    async fn create<B, T>(&self, collection: Collection, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.collection_url(collection)?;
        let response = self.client.post(url).json(body).send().await?;
        Self::read_json(response, &format!("create {}", collection.path())).await
    }

    /// Decode a success body, or turn the backend's error payload into an error.
    async fn read_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
        let response = Self::check_status(response, operation).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::storage(operation, status.as_u16(), body))
    }
}

#[async_trait]
impl CatalogStorage for RestStorage {
    async fn find_relation(
        &self,
        kind: RelationKind,
        name: &str,
    ) -> Result<Option<RelationEntity>> {
        self.find_by_name(kind.collection(), name).await
    }

    async fn create_relation(
        &self,
        kind: RelationKind,
        relation: &NewRelation,
    ) -> Result<RelationEntity> {
        self.create(kind.collection(), relation).await
    }

    async fn find_game(&self, name: &str) -> Result<Option<GameRecord>> {
        self.find_by_name(Collection::Games, name).await
    }

    async fn create_game(&self, game: &NewGame) -> Result<GameRecord> {
        self.create(Collection::Games, game).await
    }

    async fn upload(&self, upload: ImageUpload) -> Result<()> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .text("refId", upload.ref_id.to_string())
            .text("ref", GAME_REF)
            .text("field", upload.field.as_str())
            .part("files", part);

        let response = self
            .client
            .post(self.upload_url()?)
            .multipart(form)
            .send()
            .await?;
        Self::check_status(response, "upload").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> RestStorage {
        let config = StorageConfig {
            scheme: "http".into(),
            host: "localhost".into(),
            port: 1337,
        };
        RestStorage::new(Client::new(), &config).unwrap()
    }

    #[test]
    fn collection_urls_resolve_against_base() {
        let storage = storage();
        assert_eq!(
            storage
                .collection_url(RelationKind::Category.collection())
                .unwrap()
                .as_str(),
            "http://localhost:1337/categories"
        );
        assert_eq!(
            storage.upload_url().unwrap().as_str(),
            "http://localhost:1337/upload"
        );
    }
}
