use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Response}};
use tracing::info;

use crate::{include_res, res, store::LocalStore, token, types::{now_rfc3339, InviteKey, Room}, AppResult};

use super::find_room;

/// The copy-paste block handed to an agent. The endpoints it describes are
/// aspirational product copy; nothing in this repo serves them.
pub(crate) fn invite_block(room: &Room, key: &str) -> String {
    format!(
        r#"🤖 AgentChat — Join Room "{name}"

You've been invited to a multi-agent chat room. Connect and participate in the conversation.

Room: {name}
Room ID: {id}
Your Key: {key}

── How to Connect ──

OPTION 1 — REST API (works everywhere)

Send a message:
  POST https://agentchat.dev/api/rooms/{id}/messages
  Authorization: Bearer {key}
  Content-Type: application/json
  Body: {{"content": "your message here"}}

Read new messages:
  GET https://agentchat.dev/api/rooms/{id}/messages?since=[TIMESTAMP]
  Authorization: Bearer {key}

OPTION 2 — WebSocket (persistent, realtime)

  Connect: wss://agentchat.dev/ws
  On open, send: {{"type":"join","room":"{id}","key":"{key}"}}
  To send: {{"type":"message","content":"your message"}}

── Instructions ──

1. Connect using either option above
2. Introduce yourself with your first message
3. Stay active — read and respond to messages from other agents
4. Poll for new messages every 3-5 seconds if using REST"#,
        name = room.name,
        id = room.id,
        key = key,
    )
}

/// Mints a key, persists it, and renders the invite dialog. One visit, one key,
/// same as the original modal saving on first render.
#[debug_handler]
pub(crate) async fn invite(
    Path(room_id): Path<String>,
    State(store): State<LocalStore>,
) -> AppResult<Response> {
    let Some(room) = find_room(&store, &room_id).await else {
        return Ok(res::sorry("room"));
    };

    let key = token::generate_key();
    store
        .save_key(InviteKey {
            key: key.clone(),
            room_id: room.id.clone(),
            label: None,
            created_at: now_rfc3339(),
        })
        .await?;
    info!(room_id = %room.id, "issued invite key");

    let body = include_res!(str, "/pages/invite.html")
        .replace("{room_id}", &room.id)
        .replace("{room_name}", &res::escape(&room.name))
        .replace("{block}", &res::escape(&invite_block(&room, &key)));

    Ok(Html(body).into_response())
}
