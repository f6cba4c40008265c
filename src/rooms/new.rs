use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use tracing::info;

use crate::{include_res, store::LocalStore, token, types::{now_rfc3339, Room}, AppResult};

#[derive(Debug, Deserialize)]
pub(crate) struct NewRoomForm {
    name: String,
    #[serde(default)]
    description: String,
}

#[debug_handler]
pub(crate) async fn new_room_page() -> impl IntoResponse {
    Html(include_res!(str, "/pages/new_room.html"))
}

#[debug_handler]
pub(crate) async fn new_room(
    State(store): State<LocalStore>,
    Form(NewRoomForm { name, description }): Form<NewRoomForm>,
) -> AppResult<Response> {
    let name = name.trim();
    if name.is_empty() {
        // same guard as the create dialog: nothing saved without a name
        return Ok(Redirect::to("/r/new").into_response());
    }

    let description = description.trim();
    let room = Room {
        id: token::generate_id("room"),
        name: name.to_owned(),
        description: (!description.is_empty()).then(|| description.to_owned()),
        created_at: now_rfc3339(),
    };

    info!(room_id = %room.id, name = %room.name, "creating room");
    let id = room.id.clone();
    store.save_room(room).await?;

    Ok(Redirect::to(&format!("/r/{id}")).into_response())
}
