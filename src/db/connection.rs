//! Database connection management
//!
//! Maintenance runs use exactly one connection; nothing here is pooled.

use sqlx::{
    Connection, MySqlConnection,
    mysql::MySqlConnectOptions,
};

use crate::config::DatabaseConfig;

/// Connection options from either the explicit URL or the individual parts
pub fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions, sqlx::Error> {
    match &config.url {
        Some(url) => url.parse(),
        None => {
            let mut options = MySqlConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.user)
                .database(&config.name)
                .charset("utf8mb4");
            if !config.password.is_empty() {
                options = options.password(&config.password);
            }
            Ok(options)
        }
    }
}

/// Open a single database connection
pub async fn connect(config: &DatabaseConfig) -> Result<MySqlConnection, sqlx::Error> {
    let options = connect_options(config)?;
    MySqlConnection::connect_with(&options).await
}

/// Test database connection
pub async fn test_connection(conn: &mut MySqlConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(conn).await?;
    Ok(())
}
