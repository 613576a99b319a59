use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use crate::entities::image;
use crate::models::{Image, ImageSummary};
use crate::repos::RepoError;

pub struct ImageRepo;

impl ImageRepo {
    /// Inserts a row for an already-written file. A duplicate filename fails
    /// with `RepoError::Constraint`.
    pub async fn create<C: ConnectionTrait>(db: &C, filename: &str) -> Result<Image, RepoError> {
        let model = image::ActiveModel {
            filename: Set(filename.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(model.into())
    }

    pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Image>, RepoError> {
        let model = image::Entity::find_by_id(id).one(db).await?;
        Ok(model.map(Image::from))
    }

    pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<ImageSummary>, RepoError> {
        let images = image::Entity::find()
            .order_by_asc(image::Column::Id)
            .all(db)
            .await?;

        Ok(images
            .into_iter()
            .map(|model| Image::from(model).summary())
            .collect())
    }

    /// Removes the image row and hands back its filename so the caller can
    /// remove the file. Annotations are the caller's to delete first.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<String>, RepoError> {
        let Some(model) = image::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let res = image::Entity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(model.filename))
    }
}
