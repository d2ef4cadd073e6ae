//! Database module for MongoDB persistence.
//!
//! MongoDB is the source of truth for all application data. Each entity
//! lives in its own collection and is addressed by a 12-byte ObjectId.

#[cfg(test)]
pub mod memory;
mod mongo;
mod repository;

pub use mongo::*;
pub use repository::*;

use bson::doc;
use mongodb::{
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};

use crate::config::{Config, STORE_CONNECT_TIMEOUT};
use crate::models::{Topic, User, Word};

pub const USERS: &str = "users";
pub const TOPICS: &str = "topics";
pub const WORDS: &str = "words";

/// Connect to MongoDB, verify the connection and ensure indexes.
///
/// The timeout only bounds this startup step; later requests run without
/// one.
pub async fn init_database(config: &Config) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.mongo_uri).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.connect_timeout = Some(STORE_CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(STORE_CONNECT_TIMEOUT);

    let client = Client::with_options(options)?;
    let database = client.database(&config.mongo_db);

    database.run_command(doc! { "ping": 1 }, None).await?;
    tracing::info!("Connected to MongoDB database {}", config.mongo_db);

    ensure_indexes(&database).await?;

    Ok(database)
}

/// Create the indexes the repositories rely on.
async fn ensure_indexes(database: &Database) -> Result<(), mongodb::error::Error> {
    let unique_email = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    database
        .collection::<User>(USERS)
        .create_index(unique_email, None)
        .await?;

    let topic_owner = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
    database
        .collection::<Topic>(TOPICS)
        .create_index(topic_owner, None)
        .await?;

    let word_topic = IndexModel::builder().keys(doc! { "topic_id": 1 }).build();
    database
        .collection::<Word>(WORDS)
        .create_index(word_topic, None)
        .await?;

    Ok(())
}
