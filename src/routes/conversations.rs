use actix_web::{web, HttpResponse};
use futures::stream;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Conversation, ConversationParams, CreateMessageRequest};
use crate::routes::{ApiError, AppState, CurrentUser};
use crate::services::RoomEvent;

const MESSAGE_PAGE: usize = 100;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/conversations", web::get().to(list_conversations))
        .route("/conversations", web::post().to(open_conversation))
        .route("/conversations/{id}/messages", web::get().to(list_messages))
        .route("/conversations/{id}/events", web::get().to(conversation_events))
        .route("/messages", web::post().to(send_message));
}

/// Membership check; non-members get the same 404 as a missing conversation
async fn member_conversation(
    state: &AppState,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<Conversation, ApiError> {
    state
        .postgres
        .get_conversation(conversation_id)
        .await?
        .filter(|c| c.has_member(user_id))
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))
}

async fn list_conversations(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    let conversations = state.postgres.list_conversations(user.id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

/// Find or start the conversation between the caller and another user
///
/// POST /api/conversations?mentor_id=<uuid>
async fn open_conversation(
    state: web::Data<AppState>,
    user: CurrentUser,
    params: web::Query<ConversationParams>,
) -> Result<HttpResponse, ApiError> {
    let other_id = params.mentor_id;

    if other_id == user.id {
        return Err(ApiError::BadRequest("Cannot start a conversation with yourself".to_string()));
    }

    if state.postgres.find_user(other_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let conversation = state
        .postgres
        .find_or_create_conversation(user.id, other_id)
        .await?;

    Ok(HttpResponse::Ok().json(conversation))
}

async fn list_messages(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conversation = member_conversation(&state, path.into_inner(), user.id).await?;

    let messages = state
        .postgres
        .list_messages(conversation.id, MESSAGE_PAGE)
        .await?;

    Ok(HttpResponse::Ok().json(messages))
}

/// Persist a message and push it to everyone watching the conversation
///
/// POST /api/messages
async fn send_message(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let conversation = member_conversation(&state, body.conversation_id, user.id).await?;

    let message = state
        .postgres
        .insert_message(conversation.id, user.id, &body.content)
        .await?;

    let delivered = state
        .hub
        .publish(conversation.id, RoomEvent::NewMessage(message.clone()));

    tracing::debug!(
        "Message {} stored, pushed to {} listeners",
        message.id,
        delivered
    );

    Ok(HttpResponse::Ok().json(message))
}

/// Server-Sent Events stream of a conversation's room
///
/// GET /api/conversations/{id}/events
async fn conversation_events(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conversation = member_conversation(&state, path.into_inner(), user.id).await?;
    let room = conversation.id;
    let receiver = state.hub.subscribe(room);

    tracing::debug!("User {} joined room {}", user.id, room);

    let events = stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let frame = web::Bytes::from(event.to_sse_frame());
                    return Some((Ok::<_, Infallible>(frame), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Listener on room {} lagged, skipped {} events", room, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(events))
}
