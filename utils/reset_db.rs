use sea_orm::{ConnectionTrait, Database, Statement};
use std::env;

#[tokio::main]
async fn main() -> Result<(), sea_orm::DbErr> {
    dotenvy::dotenv().ok();
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://annotations.db?mode=rwc".to_owned());

    let db = Database::connect(database_url).await?;
    let backend = db.get_database_backend();

    for table in ["annotations", "images", "seaql_migrations"] {
        db.execute(Statement::from_string(
            backend,
            format!("DROP TABLE IF EXISTS {table};"),
        ))
        .await?;
    }

    println!("Database reset successfully");
    Ok(())
}
