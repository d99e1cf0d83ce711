//! User endpoints

pub async fn list_users() -> &'static str {
    "respond with a resource"
}
