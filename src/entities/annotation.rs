use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "annotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub image_id: i32,
    #[sea_orm(column_name = "type")]
    pub kind: AnnotationKind,
    /// Full annotation (discriminator, label and geometry) as produced by `codec::encode`.
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub label: Option<String>,
}

#[derive(EnumIter, DeriveActiveEnum, Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    #[sea_orm(string_value = "box")]
    Box,
    #[sea_orm(string_value = "polygon")]
    Polygon,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id",
        on_delete = "Cascade"
    )]
    Image,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
