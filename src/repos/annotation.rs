use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::codec::{self, CodecError};
use crate::entities::annotation;
use crate::models::Annotation;
use crate::repos::RepoError;

pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Inserts the whole batch inside one transaction: either every record
    /// lands or none does.
    pub async fn save_batch<C: TransactionTrait>(
        db: &C,
        image_id: i32,
        annotations: &[Annotation],
    ) -> Result<usize, RepoError> {
        if annotations.is_empty() {
            return Ok(0);
        }

        let encoded = annotations
            .iter()
            .map(codec::encode)
            .collect::<Result<Vec<_>, _>>()?;

        let txn = db.begin().await?;
        for record in encoded {
            annotation::ActiveModel {
                image_id: Set(image_id),
                kind: Set(record.kind),
                data: Set(record.data),
                label: Set(record.label),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        Ok(annotations.len())
    }

    /// Decoded annotations for one image in insertion order. Unknown ids yield
    /// an empty list.
    pub async fn by_image<C: ConnectionTrait>(
        db: &C,
        image_id: i32,
    ) -> Result<Vec<Annotation>, RepoError> {
        let rows = annotation::Entity::find()
            .filter(annotation::Column::ImageId.eq(image_id))
            .order_by_asc(annotation::Column::Id)
            .all(db)
            .await
            .map_err(|e| match e {
                // `type` column holds something other than a known kind.
                DbErr::Type(msg) => {
                    tracing::error!(image_id, error = %msg, "Undecodable annotation row");
                    RepoError::Codec(CodecError::Corrupt(msg))
                }
                other => RepoError::from(other),
            })?;

        rows.iter()
            .map(|row| {
                codec::decode_row(row.kind, &row.data).map_err(|e| {
                    tracing::error!(annotation_id = row.id, image_id, error = %e, "Undecodable annotation row");
                    RepoError::from(e)
                })
            })
            .collect()
    }

    pub async fn delete_by_image<C: ConnectionTrait>(
        db: &C,
        image_id: i32,
    ) -> Result<u64, RepoError> {
        let res = annotation::Entity::delete_many()
            .filter(annotation::Column::ImageId.eq(image_id))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }
}
