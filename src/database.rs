use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};

use crate::config::DbConfig;

pub type Database = Pool<MySql>;

pub async fn create_database_pool(config: &DbConfig) -> Result<Database, sqlx::Error> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    let pool = MySqlPoolOptions::new().connect_with(options).await?;

    // Test the connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    Ok(pool)
}
