use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};

use crate::{include_res, mock, res, store::LocalStore, types::{AgentStatus, Room}, AppResult};

/// Demo rooms first, then whatever the user has created, like the original
/// sidebar ordering.
pub async fn all_rooms(store: &LocalStore) -> Vec<Room> {
    let mut rooms = mock::rooms();
    rooms.extend(store.rooms().await);
    rooms
}

/// Sidebar items for every room, with the selected one highlighted.
pub fn room_items(rooms: &[Room], selected: Option<&str>) -> String {
    if rooms.is_empty() {
        return include_res!(str, "/pages/no_rooms.html").to_owned();
    }

    let mut items = String::new();
    for room in rooms {
        let online = mock::agents_in(&room.id)
            .iter()
            .filter(|a| a.status != AgentStatus::Disconnected)
            .count();
        let online_badge = if online > 0 {
            format!(r#"<span class="online"><span class="dot"></span>{online}</span>"#)
        } else {
            String::new()
        };
        let description = match &room.description {
            Some(d) => format!(r#"<p class="room-desc">{}</p>"#, res::escape(d)),
            None => String::new(),
        };

        items += &include_res!(str, "/pages/room_item.html")
            .replace("{selected}", if selected == Some(room.id.as_str()) { " selected" } else { "" })
            .replace("{id}", &room.id)
            .replace("{name}", &res::escape(&room.name))
            .replace("{online}", &online_badge)
            .replace("{description}", &description);
    }
    items
}

#[debug_handler]
pub async fn index(State(store): State<LocalStore>) -> AppResult<Response> {
    let rooms = all_rooms(&store).await;

    Ok(Html(
        include_res!(str, "/pages/index.html")
            .replace("{room_items}", &room_items(&rooms, None)),
    )
    .into_response())
}
