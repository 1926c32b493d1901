//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single authenticated connection,
//! dispatching incoming commands and forwarding the user's events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsEvent};
use super::subscription::SubscriptionManager;
use crate::api::dto::round_coins;
use crate::domain::{GameEvent, UserId};
use crate::service::AccountService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards the user's subscribed events from the [`broadcast::Receiver`].
pub async fn run_connection(
    socket: WebSocket,
    user_id: UserId,
    mut event_rx: broadcast::Receiver<GameEvent>,
    accounts: Arc<AccountService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new(user_id);
    tracing::debug!(%user_id, "ws connection opened");

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &accounts).await;
                        if let Some(json) = encode(&reply)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(game_event) => {
                        let Some((topic, outgoing)) = WsEvent::from_game_event(&game_event) else {
                            continue;
                        };
                        if subs.matches(&game_event, topic)
                            && let Some(json) = encode(&outgoing)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%user_id, lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(%user_id, "ws connection closed");
}

fn encode(event: &WsEvent) -> Option<String> {
    serde_json::to_string(event)
        .inspect_err(|e| tracing::error!(error = %e, "failed to encode ws event"))
        .ok()
}

/// Handles a text message from the client and builds the reply.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    accounts: &AccountService,
) -> WsEvent {
    let command = match serde_json::from_str::<WsCommand>(text) {
        Ok(command) => command,
        Err(e) => return WsEvent::error(format!("unrecognized message: {e}")),
    };

    match command {
        WsCommand::UpdateCoins { user_id } => {
            if UserId::from(user_id) != subs.user_id() {
                return WsEvent::error("cannot read another user's balance");
            }
            match accounts.balance_for_reply(subs.user_id()).await {
                Ok(coins) => WsEvent::CoinsUpdated {
                    coins: round_coins(coins),
                },
                Err(e) => WsEvent::error(e.to_string()),
            }
        }
        WsCommand::Subscribe { topics } => {
            subs.subscribe(&topics);
            WsEvent::Subscribed {
                topics: subs.topics(),
            }
        }
        WsCommand::Unsubscribe { topics } => {
            subs.unsubscribe(&topics);
            WsEvent::Subscribed {
                topics: subs.topics(),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventBus, ManualClock};
    use crate::service::test_support::{context, signer};
    use crate::ws::subscription::Topic;

    async fn setup() -> (AccountService, UserId) {
        let (accounts, user, _, _) = setup_with_clock().await;
        (accounts, user)
    }

    async fn setup_with_clock() -> (AccountService, UserId, EventBus, Arc<ManualClock>) {
        let (ctx, clock) = context();
        let bus = ctx.event_bus.clone();
        let accounts = AccountService::new(ctx, signer(), 100.0);
        let Ok(session) = accounts.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        (accounts, session.user.id, bus, clock)
    }

    #[tokio::test]
    async fn update_coins_reports_own_balance() {
        let (accounts, user) = setup().await;
        let mut subs = SubscriptionManager::new(user);
        let text = format!(r#"{{"event":"updateCoins","data":{{"userId":"{user}"}}}}"#);
        let reply = handle_text_message(&text, &mut subs, &accounts).await;
        assert_eq!(reply, WsEvent::CoinsUpdated { coins: 100.0 });
    }

    #[tokio::test]
    async fn update_coins_answers_once_without_a_bus_push() {
        let (accounts, user, bus, clock) = setup_with_clock().await;
        let mut rx = bus.subscribe();
        clock.advance(chrono::Duration::seconds(30));
        let mut subs = SubscriptionManager::new(user);
        let text = format!(r#"{{"event":"updateCoins","data":{{"userId":"{user}"}}}}"#);
        let reply = handle_text_message(&text, &mut subs, &accounts).await;
        assert_eq!(reply, WsEvent::CoinsUpdated { coins: 130.0 });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn update_coins_for_someone_else_is_an_error() {
        let (accounts, user) = setup().await;
        let mut subs = SubscriptionManager::new(user);
        let other = UserId::new();
        let text = format!(r#"{{"event":"updateCoins","data":{{"userId":"{other}"}}}}"#);
        let WsEvent::Error { .. } = handle_text_message(&text, &mut subs, &accounts).await else {
            panic!("expected error event");
        };
    }

    #[tokio::test]
    async fn malformed_messages_are_reported() {
        let (accounts, user) = setup().await;
        let mut subs = SubscriptionManager::new(user);
        let WsEvent::Error { .. } = handle_text_message("nope", &mut subs, &accounts).await else {
            panic!("expected error event");
        };
    }

    #[tokio::test]
    async fn subscribe_returns_active_topics() {
        let (accounts, user) = setup().await;
        let mut subs = SubscriptionManager::new(user);
        let text = r#"{"event":"subscribe","data":{"topics":["games"]}}"#;
        let reply = handle_text_message(text, &mut subs, &accounts).await;
        assert_eq!(
            reply,
            WsEvent::Subscribed {
                topics: vec![Topic::Coins, Topic::Games]
            }
        );
    }
}
