use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::posts::{
    POST_SLUG_CONFLICTS_METRIC, POSTS_CREATED_METRIC, POSTS_DELETED_METRIC, POSTS_UPDATED_METRIC,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// `RUST_LOG` directives refine the configured level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            POSTS_CREATED_METRIC,
            Unit::Count,
            "Total number of posts created."
        );
        describe_counter!(
            POSTS_UPDATED_METRIC,
            Unit::Count,
            "Total number of post updates applied."
        );
        describe_counter!(
            POSTS_DELETED_METRIC,
            Unit::Count,
            "Total number of posts deleted."
        );
        describe_counter!(
            POST_SLUG_CONFLICTS_METRIC,
            Unit::Count,
            "Total number of writes rejected because the slug was taken."
        );
    });
}
