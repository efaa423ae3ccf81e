//! Admin record management. Writing a record with a new image is two
//! dependent calls (upload, then write); they are wrapped here so a failed
//! write takes its freshly uploaded image with it.

use super::{
    assets::{AssetStore, ImageUpload, StoredAsset},
    db_ops::{BlogStore, PropertyStore, StoreResult},
    errors::StoreError,
    models::{BlogPost, Property},
    validation::{BlogPostForm, FieldErrors, PropertyForm},
};
use std::future::Future;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Invalid(#[from] FieldErrors),

    #[error("deletion was not confirmed")]
    Unconfirmed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecordError {
    /// Store conflicts on a field (a taken slug) are reported like any
    /// other invalid input.
    pub fn into_field_errors(self) -> Result<FieldErrors, RecordError> {
        match self {
            Self::Invalid(errors) => Ok(errors),
            Self::Store(StoreError::Conflict { field }) => {
                let mut errors = FieldErrors::default();
                errors.push(field, format!("This {field} is already in use"));
                Ok(errors)
            }
            other => Err(other),
        }
    }
}

/// Upload `image` (if any), then run `write` with its view URL. If the
/// write fails, the upload is deleted again before the error is returned.
async fn upload_then_write<T, F, Fut>(
    assets: &dyn AssetStore,
    image: Option<ImageUpload>,
    write: F,
) -> StoreResult<(T, Option<StoredAsset>)>
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let uploaded = match image {
        Some(image) => Some(assets.upload(image).await?),
        None => None,
    };
    match write(uploaded.as_ref().map(|a| a.url.clone())).await {
        Ok(record) => Ok((record, uploaded)),
        Err(err) => {
            if let Some(asset) = uploaded {
                match assets.delete(&asset.file_id).await {
                    Ok(()) => tracing::info!(
                        file_id = %asset.file_id,
                        "rolled back image after failed write"
                    ),
                    Err(e) => tracing::warn!(
                        file_id = %asset.file_id,
                        error = %e,
                        "image rollback failed; asset is orphaned"
                    ),
                }
            }
            Err(err)
        }
    }
}

/// Remove an image we host, if `url` is one. Failures are only logged;
/// the record change they follow has already happened.
async fn discard_image(assets: &dyn AssetStore, url: &str) {
    let Some(file_id) = assets.file_id_for_url(url) else {
        return;
    };
    if let Err(e) = assets.delete(&file_id).await {
        tracing::warn!(%file_id, error = %e, "could not remove replaced image");
    }
}

pub async fn create_property(
    properties: &dyn PropertyStore,
    assets: &dyn AssetStore,
    form: &PropertyForm,
    image: Option<ImageUpload>,
) -> Result<Property, RecordError> {
    let fields = form.validate(String::new())?;
    let (property, _) = upload_then_write(assets, image, |url| async move {
        let mut fields = fields;
        fields.image_url = url.unwrap_or_default();
        properties.create(fields).await
    })
    .await?;
    tracing::info!(id = %property.id, "created property");

    Ok(property)
}

pub async fn update_property(
    properties: &dyn PropertyStore,
    assets: &dyn AssetStore,
    id: &str,
    form: &PropertyForm,
    image: Option<ImageUpload>,
) -> Result<Property, RecordError> {
    let existing = properties.get(id).await?.ok_or(StoreError::NotFound)?;
    let old_url = existing.fields.image_url;
    let fields = form.validate(old_url.clone())?;
    let (property, uploaded) =
        upload_then_write(assets, image, |url| async move {
            let mut fields = fields;
            if let Some(url) = url {
                fields.image_url = url;
            }
            properties.update(id, fields).await
        })
        .await?;
    if uploaded.is_some() {
        discard_image(assets, &old_url).await;
    }
    tracing::info!(id = %property.id, "updated property");

    Ok(property)
}

pub async fn delete_property(
    properties: &dyn PropertyStore,
    assets: &dyn AssetStore,
    id: &str,
    confirmed: bool,
) -> Result<(), RecordError> {
    if !confirmed {
        return Err(RecordError::Unconfirmed);
    }
    let existing = properties.get(id).await?.ok_or(StoreError::NotFound)?;
    properties.delete(id).await?;
    discard_image(assets, &existing.fields.image_url).await;
    tracing::info!(%id, "deleted property");

    Ok(())
}

pub async fn create_post(
    posts: &dyn BlogStore,
    assets: &dyn AssetStore,
    form: &BlogPostForm,
    image: Option<ImageUpload>,
) -> Result<BlogPost, RecordError> {
    let fields = form.validate(String::new())?;
    let (post, _) = upload_then_write(assets, image, |url| async move {
        let mut fields = fields;
        fields.image_url = url.unwrap_or_default();
        posts.create(fields).await
    })
    .await?;
    tracing::info!(id = %post.id, slug = %post.fields.slug, "created post");

    Ok(post)
}

pub async fn update_post(
    posts: &dyn BlogStore,
    assets: &dyn AssetStore,
    id: &str,
    form: &BlogPostForm,
    image: Option<ImageUpload>,
) -> Result<BlogPost, RecordError> {
    let existing = posts.get(id).await?.ok_or(StoreError::NotFound)?;
    let old_url = existing.fields.image_url;
    let fields = form.validate(old_url.clone())?;
    let (post, uploaded) = upload_then_write(assets, image, |url| async move {
        let mut fields = fields;
        if let Some(url) = url {
            fields.image_url = url;
        }
        posts.update(id, fields).await
    })
    .await?;
    if uploaded.is_some() {
        discard_image(assets, &old_url).await;
    }
    tracing::info!(id = %post.id, "updated post");

    Ok(post)
}

pub async fn delete_post(
    posts: &dyn BlogStore,
    assets: &dyn AssetStore,
    id: &str,
    confirmed: bool,
) -> Result<(), RecordError> {
    if !confirmed {
        return Err(RecordError::Unconfirmed);
    }
    let existing = posts.get(id).await?.ok_or(StoreError::NotFound)?;
    posts.delete(id).await?;
    discard_image(assets, &existing.fields.image_url).await;
    tracing::info!(%id, "deleted post");

    Ok(())
}
