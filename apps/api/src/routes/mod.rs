pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::questions::handlers as questions;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    let user_routes = Router::new()
        .route("/CreateUser", post(users::handle_create_user))
        .route("/ReadUser", get(users::handle_list_users))
        .route("/ReadUser/:id", get(users::handle_get_user))
        .route("/UpdateUser/:id", put(users::handle_update_user))
        .route("/DeleteUser/:id", delete(users::handle_delete_user))
        .route(
            "/LoginUser",
            post(users::handle_login).get(users::handle_login_verify),
        )
        .route("/LogoutUser", post(users::handle_logout))
        .route("/ChangePassword", put(users::handle_change_password));

    let question_routes = Router::new()
        .route("/", post(questions::handle_submit_questions))
        .route(
            "/upload-pdf",
            post(questions::handle_upload_pdf).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/generate", get(generation::handle_generate))
        .route("/check-plagiarism", post(questions::handle_check_plagiarism))
        .route("/uploaded-questions", get(questions::handle_list_questions))
        .route(
            "/:id",
            get(questions::handle_get_question).delete(questions::handle_delete_question),
        );

    Router::new()
        .route("/api/health", get(health::health_handler))
        .nest("/api/v1/user", user_routes)
        .nest("/api/v1/questions", question_routes)
        .with_state(state)
}
