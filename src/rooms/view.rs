use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Redirect, Response}};
use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime};
use tracing::info;

use crate::{include_res, index, mock, res, store::LocalStore, types::{Agent, AgentStatus, ConnectionType, Message, MessageKind, Room}, AppResult};

pub(crate) async fn find_room(store: &LocalStore, id: &str) -> Option<Room> {
    index::all_rooms(store).await.into_iter().find(|r| r.id == id)
}

const AGENT_COLORS: [&str; 6] = ["blue", "emerald", "purple", "amber", "rose", "cyan"];

/// Stable color per agent, same 31-hash the original view used.
fn agent_color(agent_id: &str) -> &'static str {
    let mut hash: i32 = 0;
    for b in agent_id.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(b as i32);
    }
    AGENT_COLORS[hash.unsigned_abs() as usize % AGENT_COLORS.len()]
}

/// RFC 3339 timestamp as HH:MM, falling back to the raw string.
fn format_time(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc3339)
        .ok()
        .and_then(|t| t.format(format_description!("[hour]:[minute]")).ok())
        .unwrap_or_else(|| ts.to_owned())
}

fn message_items(messages: &[Message]) -> String {
    if messages.is_empty() {
        return include_res!(str, "/pages/no_messages.html").to_owned();
    }

    let mut items = String::new();
    for msg in messages {
        if msg.kind != MessageKind::Message {
            items += &include_res!(str, "/pages/system_line.html")
                .replace("{agent_name}", &res::escape(&msg.agent_name))
                .replace("{content}", &res::escape(&msg.content));
            continue;
        }

        let mut content_html = String::new();
        pulldown_cmark::html::push_html(
            &mut content_html,
            pulldown_cmark::Parser::new(&msg.content),
        );

        items += &include_res!(str, "/pages/message.html")
            .replace("{color}", agent_color(&msg.agent_id))
            .replace("{agent_name}", &res::escape(&msg.agent_name))
            .replace("{time}", &format_time(&msg.timestamp))
            .replace("{content}", &content_html);
    }
    items
}

fn member_items(agents: &[Agent]) -> String {
    let mut items = String::new();
    for agent in agents {
        let (status_class, status_label) = match agent.status {
            AgentStatus::Connected => ("connected", "Live"),
            AgentStatus::Polling => ("polling", "Polling"),
            AgentStatus::Disconnected => ("disconnected", "Offline"),
        };
        let transport = match agent.connection_type {
            ConnectionType::Websocket => "WS",
            ConnectionType::Rest => "REST",
        };

        items += &include_res!(str, "/pages/member_item.html")
            .replace("{status_class}", status_class)
            .replace("{status_label}", status_label)
            .replace("{transport}", transport)
            .replace("{name}", &res::escape(&agent.name));
    }
    items
}

#[debug_handler]
pub(crate) async fn room(
    Path(room_id): Path<String>,
    State(store): State<LocalStore>,
) -> AppResult<Response> {
    let Some(room) = find_room(&store, &room_id).await else {
        return Ok(res::sorry("room"));
    };

    let rooms = index::all_rooms(&store).await;
    let messages = mock::messages_in(&room.id);
    let agents = mock::agents_in(&room.id);

    let description = match &room.description {
        Some(d) => format!(r#"<p class="room-desc">{}</p>"#, res::escape(d)),
        None => String::new(),
    };
    let danger = if mock::is_demo_room(&room.id) {
        String::new()
    } else {
        include_res!(str, "/pages/delete_form.html").replace("{id}", &room.id)
    };

    let body = include_res!(str, "/pages/room.html")
        .replace("{room_items}", &index::room_items(&rooms, Some(&room.id)))
        .replace("{room_id}", &room.id)
        .replace("{room_name}", &res::escape(&room.name))
        .replace("{room_description}", &description)
        .replace("{messages}", &message_items(&messages))
        .replace("{member_items}", &member_items(&agents))
        .replace("{member_count}", &agents.len().to_string())
        .replace("{danger}", &danger);

    Ok(Html(body).into_response())
}

#[debug_handler]
pub(crate) async fn delete_room(
    Path(room_id): Path<String>,
    State(store): State<LocalStore>,
) -> AppResult<Response> {
    if mock::is_demo_room(&room_id) {
        return Ok(res::sorry("room"));
    }

    info!(%room_id, "deleting room and its invite keys");
    store.delete_room(&room_id).await?;

    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_color_is_stable() {
        assert_eq!(agent_color("agt_1"), agent_color("agt_1"));
        assert!(AGENT_COLORS.contains(&agent_color("agt_2")));
    }

    #[test]
    fn format_time_renders_hh_mm() {
        assert_eq!(format_time("2026-02-19T10:05:00Z"), "10:05");
        assert_eq!(format_time("not a time"), "not a time");
    }

    #[test]
    fn demo_conversation_renders() {
        let html = message_items(&mock::messages_in("room_demo1"));
        assert!(html.contains("Claude (Alice)"));
        assert!(html.contains("10:05"));
        // markdown rendering keeps the prose
        assert!(html.contains("real-time sync layer"));
    }

    #[test]
    fn empty_room_shows_placeholder() {
        let html = message_items(&[]);
        assert!(html.contains("No messages yet"));
    }

    #[test]
    fn member_statuses_map_to_labels() {
        let html = member_items(&mock::agents_in("room_demo2"));
        assert!(html.contains("Live"));
        assert!(html.contains("Offline"));
        assert!(html.contains("REST"));
    }
}
