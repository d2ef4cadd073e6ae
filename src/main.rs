//! Flashcard Backend
//!
//! REST backend for a flashcard study app: users, topics and words stored in
//! MongoDB, guarded by bearer JWTs.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{
    MongoTopicRepository, MongoUserRepository, MongoWordRepository, TopicRepository,
    UserRepository, WordRepository,
};
use services::{TopicService, UserService, WordService};

/// How long browsers may cache a preflight answer.
const CORS_MAX_AGE: Duration = Duration::from_secs(86400);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub topics: Arc<TopicService>,
    pub words: Arc<WordService>,
}

impl AppState {
    pub fn new(
        config: &Config,
        users: Arc<dyn UserRepository>,
        topics: Arc<dyn TopicRepository>,
        words: Arc<dyn WordRepository>,
    ) -> Self {
        let words = Arc::new(WordService::new(words));
        Self {
            users: Arc::new(UserService::new(users, config)),
            topics: Arc::new(TopicService::new(topics, Arc::clone(&words))),
            words,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Flashcard Backend");
    tracing::info!("Database: {}", config.mongo_db);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let database = db::init_database(&config).await?;

    // Create application state
    let state = AppState::new(
        &config,
        Arc::new(MongoUserRepository::new(database.collection(db::USERS))),
        Arc::new(MongoTopicRepository::new(database.collection(db::TOPICS))),
        Arc::new(MongoWordRepository::new(database.collection(db::WORDS))),
    );

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
            header::CACHE_CONTROL,
        ])
        .max_age(CORS_MAX_AGE);

    let public_routes = Router::new()
        .route("/user/register", post(api::register))
        .route("/user/login", post(api::login))
        .route("/user/refresh", post(api::refresh));

    let protected_routes = Router::new()
        // Users
        .route("/user", get(api::list_users))
        .route("/user/logout", post(api::logout))
        .route("/user/me", get(api::get_me).put(api::update_me))
        .route(
            "/user/{user_id}",
            get(api::get_user).delete(api::delete_user),
        )
        // Topics
        .route("/topic", get(api::list_topics).post(api::create_topic))
        .route("/topic/user", get(api::list_my_topics))
        .route(
            "/topic/{topic_id}",
            get(api::get_topic)
                .put(api::update_topic)
                .delete(api::delete_topic),
        )
        // Words
        .route("/word", get(api::search_words).post(api::create_word))
        .route("/word/topic/{topic_id}", get(api::list_topic_words))
        .route(
            "/word/{word_id}",
            get(api::get_word)
                .put(api::update_word)
                .delete(api::delete_word),
        )
        // Bearer auth, only on matched routes
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/v1", public_routes.merge(protected_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
