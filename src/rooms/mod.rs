mod invite;
mod new;
mod view;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", get(new::new_room_page).post(new::new_room))
        .route("/{id}", get(view::room))
        .route("/{id}/invite", get(invite::invite))
        .route("/{id}/delete", post(view::delete_room))
}

pub(crate) use view::find_room;
