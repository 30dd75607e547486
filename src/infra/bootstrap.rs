//! Startup wiring shared by the `serve` and `migrate` commands.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::admin_gate::AdminGate;
use crate::application::repos::{PostsRepo, PostsWriteRepo};
use crate::config::{AdminSettings, DatabaseSettings};

use super::db::PostgresRepositories;
use super::error::InfraError;
use super::memory::MemoryRepositories;

pub const STARTUP_TARGET: &str = "scriptorium::startup";
pub const MIGRATE_TARGET: &str = "scriptorium::migrate";

pub type PostStores = (Arc<dyn PostsRepo>, Arc<dyn PostsWriteRepo>);

/// Postgres when a URL is configured (migrated before use), otherwise the
/// in-memory store.
pub async fn post_stores(database: &DatabaseSettings) -> Result<PostStores, InfraError> {
    let Some(url) = database.url.as_deref() else {
        warn!(
            target: STARTUP_TARGET,
            "database.url is not set; posts are kept in memory and lost on exit"
        );
        let repositories = Arc::new(MemoryRepositories::new());
        return Ok((repositories.clone(), repositories));
    };

    let pool = PostgresRepositories::connect(url, database.max_connections.get()).await?;
    PostgresRepositories::run_migrations(&pool).await?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    Ok((repositories.clone(), repositories))
}

pub fn admin_gate(admin: &AdminSettings) -> AdminGate {
    let gate = AdminGate::new(admin.token.as_deref());
    if gate.is_open() {
        warn!(
            target: STARTUP_TARGET,
            "admin.token is not set; admin API accepts unauthenticated requests"
        );
    }
    gate
}

pub async fn migrate(database: &DatabaseSettings) -> Result<(), InfraError> {
    let url = database
        .url
        .as_deref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool = PostgresRepositories::connect(url, database.max_connections.get()).await?;
    PostgresRepositories::run_migrations(&pool).await?;

    info!(target: MIGRATE_TARGET, "Migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::Mutex;

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedTargets(Arc<Mutex<Vec<(Level, String)>>>);

    impl<S: Subscriber> Layer<S> for CapturedTargets {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            self.0
                .lock()
                .expect("capture lock")
                .push((*metadata.level(), metadata.target().to_string()));
        }
    }

    impl CapturedTargets {
        fn events(&self) -> Vec<(Level, String)> {
            self.0.lock().expect("capture lock").clone()
        }
    }

    fn capture() -> (CapturedTargets, tracing::subscriber::DefaultGuard) {
        let captured = CapturedTargets::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    fn memory_only() -> DatabaseSettings {
        DatabaseSettings {
            url: None,
            max_connections: NonZeroU32::new(8).expect("non-zero"),
        }
    }

    #[tokio::test]
    async fn memory_fallback_warns_under_startup_target() {
        let (captured, _guard) = capture();

        let (reader, _writer) = post_stores(&memory_only()).await.expect("memory store");
        assert!(reader.list_posts().await.expect("list").is_empty());

        assert_eq!(
            captured.events(),
            [(Level::WARN, STARTUP_TARGET.to_string())]
        );
    }

    #[test]
    fn open_admin_gate_warns_under_startup_target() {
        let (captured, _guard) = capture();

        let open = admin_gate(&AdminSettings::default());
        assert!(open.is_open());
        assert_eq!(
            captured.events(),
            [(Level::WARN, STARTUP_TARGET.to_string())]
        );

        let closed = admin_gate(&AdminSettings {
            token: Some("s3cret".to_string()),
        });
        assert!(!closed.is_open());
        assert_eq!(captured.events().len(), 1);
    }

    #[tokio::test]
    async fn migrate_requires_database_url() {
        let err = migrate(&memory_only()).await.expect_err("no url");
        assert!(matches!(err, InfraError::Configuration { .. }));
    }
}
