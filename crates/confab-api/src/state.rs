//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! Services are generic over repository/hasher/issuer/provider traits, but
//! AppState pins them to the concrete infra implementations.

use std::sync::Arc;

use confab_core::auth::service::AuthService;
use confab_core::chat::conversation::ConversationService;
use confab_core::chat::service::ChatService;
use confab_infra::config::AppConfig;
use confab_infra::crypto::password::Argon2PasswordHasher;
use confab_infra::crypto::token::HmacTokenIssuer;
use confab_infra::llm::openrouter::OpenRouterProvider;
use confab_infra::sqlite::chat::SqliteChatRepository;
use confab_infra::sqlite::pool::DatabasePool;
use confab_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, HmacTokenIssuer>;

pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteConversationService =
    ConversationService<SqliteChatRepository, OpenRouterProvider>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub conversation_service: Arc<ConcreteConversationService>,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;

        // Wire auth service
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            HmacTokenIssuer::new(config.token_secret),
        );

        // Wire chat service
        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));

        // Wire the conversation adapter with its own repository handle
        // (repositories are cheap clones over the shared pool).
        let provider = OpenRouterProvider::new(config.provider)
            .map_err(|e| anyhow::anyhow!("provider setup failed: {e}"))?;
        let conversation_service =
            ConversationService::new(SqliteChatRepository::new(db_pool.clone()), provider);

        Ok(Self {
            auth_service: Arc::new(auth_service),
            chat_service: Arc::new(chat_service),
            conversation_service: Arc::new(conversation_service),
        })
    }
}
