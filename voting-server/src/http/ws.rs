use super::AppState;
use crate::broadcast_hub::Subscription;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{info, trace};
use std::{fmt::Display, time::Duration};
use tokio::time::timeout;

/// How long a subscriber's socket may take to accept one frame.
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        let subscription = state.hub.subscribe();
        let (sender, receiver) = socket.split();
        push_sessions(sender, receiver, subscription, WRITE_TIMEOUT)
    })
}

/// Writer loop of one subscriber. Returning drops the subscription, which the
/// hub notices on its next publish.
async fn push_sessions<S, R, E>(
    mut sender: S,
    mut receiver: R,
    mut subscription: Subscription,
    write_timeout: Duration,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let id = subscription.id();
    info!("WebSocket subscriber {id} connected");

    loop {
        tokio::select! {
            frame = subscription.next_frame() => {
                let Some(frame) = frame else {
                    break;
                };

                let write = sender.send(Message::Text(frame.to_string().into()));
                match timeout(write_timeout, write).await {
                    Ok(Ok(())) => (),
                    Ok(Err(error)) => {
                        info!("Could not write to subscriber {id}: {error}");
                        break;
                    }
                    Err(_) => {
                        info!("Subscriber {id} did not accept a frame within {write_timeout:?}");
                        break;
                    }
                }
            }

            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(error)) => {
                        trace!("Subscriber {id} read error: {error}");
                        break;
                    }
                    Some(Ok(_)) => (),
                }
            }
        }
    }

    info!("WebSocket subscriber {id} disconnected");
}
