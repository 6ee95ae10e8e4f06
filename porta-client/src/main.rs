use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use porta_client::{Config, HttpGateway};
use porta_core::SessionState;
use porta_flow::{CheckoutFlow, FlowState, RetryPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "porta=info,porta_flow=debug,porta_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting porta against {}", config.api.base_url);

    let gateway = HttpGateway::new(
        &config.api.base_url,
        config.device.clone(),
        Duration::from_millis(config.api.timeout_ms),
    );

    let mut session = SessionState::new(
        config.profile.auth_token.clone(),
        config.profile.uid.clone(),
    );
    session.address = config.order.address.clone();
    session.store = config.order.store.clone();
    session.floor_id = config.order.floor_id;
    session.cart = config.order.cart.clone();
    tracing::info!("Session {} seeded with {} cart lines", session.id, session.cart.len());

    let policy = RetryPolicy::new(
        config.flow.max_attempts,
        Duration::from_millis(config.flow.backoff_ms),
    );
    let mut flow = CheckoutFlow::standard(policy, config.flow.lookahead_days);

    let state = flow.run(&gateway, &mut session).await;
    match state {
        FlowState::Completed => {
            if let Some(sheet) = session.capacity() {
                tracing::info!(
                    "{} of {} delivery dates still open",
                    sheet.open_dates().count(),
                    sheet.slots.len()
                );
            }
            if let Some(info) = session.settlement() {
                tracing::info!("Settlement quote: {}", serde_json::to_string(info)?);
            }
            Ok(())
        }
        FlowState::Aborted(reason) => anyhow::bail!("checkout flow aborted: {}", reason),
        state => anyhow::bail!("flow halted in non-terminal state: {:?}", state),
    }
}
