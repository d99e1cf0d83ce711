//! API integration tests
//!
//! Drive the full router over the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use local_library::{
    api,
    config::AppConfig,
    repository::{CatalogStore, MemoryStore},
    AppState,
};

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut config = AppConfig::default();
    config.database.url = "memory:".to_string();
    let state = AppState::new(config, store.clone());
    (api::create_router(state), store)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    let status = response.status();
    (status, body_text(response).await)
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
        .to_string()
}

/// Id at the end of a detail URL such as `/catalog/book/{id}`
fn id_from(location: &str) -> Uuid {
    let raw = location.rsplit('/').next().unwrap();
    Uuid::parse_str(raw).unwrap()
}

async fn create_author(app: &Router) -> Uuid {
    let response = post_form(
        app,
        "/catalog/author/create",
        "first_name=Frank&family_name=Herbert&date_of_birth=1920-10-08&date_of_death=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    id_from(&location(&response))
}

async fn create_genre(app: &Router, name: &str) -> Uuid {
    let response = post_form(app, "/catalog/genre/create", &format!("name={}", name)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    id_from(&location(&response))
}

#[tokio::test]
async fn test_index_renders_counts() {
    let (app, _) = app();
    create_author(&app).await;

    for uri in ["/", "/catalog"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<strong>Books: </strong>0"));
        assert!(body.contains("<strong>Authors: </strong>1"));
    }
}

#[tokio::test]
async fn test_create_book_scenario() {
    let (app, store) = app();
    let author = create_author(&app).await;
    let genre = create_genre(&app, "Science+Fiction").await;

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!(
            "title=Dune&author={}&summary=desert+planet&isbn=9780441013593&genre={}",
            author, genre
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = location(&response);
    let id = id_from(&location);
    assert_eq!(location, format!("/catalog/book/{}", id));

    let book = store.find_book(id).await.unwrap().unwrap();
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, author);
    assert_eq!(book.summary, "desert planet");
    assert_eq!(book.isbn, "9780441013593");
    assert_eq!(book.genre, vec![genre]);

    let (status, body) = get(&app, &location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Title: Dune"));
    assert!(body.contains("Herbert, Frank"));
    assert!(body.contains("Science Fiction"));
}

#[tokio::test]
async fn test_book_input_is_trimmed_and_escaped() {
    let (app, store) = app();
    let author = create_author(&app).await;

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!(
            "title=++%3Cb%3EDune%3C%2Fb%3E+&author={}&summary=s&isbn=i",
            author
        ),
    )
    .await;
    let id = id_from(&location(&response));

    let book = store.find_book(id).await.unwrap().unwrap();
    assert_eq!(book.title, "&lt;b&gt;Dune&lt;&#x2F;b&gt;");

    let (_, body) = get(&app, &format!("/catalog/book/{}", id)).await;
    assert!(body.contains("&lt;b&gt;Dune"));
    assert!(!body.contains("<b>Dune"));
}

#[tokio::test]
async fn test_missing_fields_rerender_form() {
    let (app, store) = app();

    let response = post_form(&app, "/catalog/book/create", "title=+&author=&summary=&isbn=").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Title must not be empty."));
    assert!(body.contains("Author must not be empty."));
    assert!(body.contains("Summary must not be empty."));
    assert!(body.contains("ISBN must not be empty."));
    assert_eq!(store.count_books().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_author_reference_is_rejected() {
    let (app, store) = app();

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!("title=Dune&author={}&summary=s&isbn=i", Uuid::new_v4()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .contains("Book refers to an author that does not exist"));
    assert_eq!(store.count_books().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_submission_keeps_checked_genres() {
    let (app, store) = app();
    let author = create_author(&app).await;
    let poetry = create_genre(&app, "Poetry").await;
    let drama = create_genre(&app, "Drama").await;

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!("title=Dune&author={}&summary=&isbn=i&genre={}", author, drama),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Summary must not be empty."));
    assert!(body.contains(&format!("value=\"{}\" checked", drama)));
    assert!(!body.contains(&format!("value=\"{}\" checked", poetry)));
    assert!(body.contains("value=\"Dune\""));
    assert_eq!(store.count_books().await.unwrap(), 0);
}

#[tokio::test]
async fn test_genre_field_normalization() {
    let (app, store) = app();
    let author = create_author(&app).await;
    let first = create_genre(&app, "Fantasy").await;
    let second = create_genre(&app, "Poetry").await;

    let cases = [
        (String::new(), vec![]),
        (format!("&genre={}", first), vec![first]),
        (format!("&genre={}&genre={}", second, first), vec![second, first]),
    ];

    for (genre_fields, expected) in cases {
        let response = post_form(
            &app,
            "/catalog/book/create",
            &format!("title=T&author={}&summary=s&isbn=i{}", author, genre_fields),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let book = store
            .find_book(id_from(&location(&response)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(book.genre, expected);
    }
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let (app, _) = app();

    let (status, _) = get(&app, &format!("/catalog/book/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/catalog/book/not-an-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Not Found"));

    let (status, _) = get(&app, &format!("/catalog/book/{}/update", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_preserves_identifier() {
    let (app, store) = app();
    let author = create_author(&app).await;
    let genre = create_genre(&app, "Fantasy").await;

    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!("title=Dune&author={}&summary=s&isbn=i&genre={}", author, genre),
    )
    .await;
    let id = id_from(&location(&response));

    let (status, body) = get(&app, &format!("/catalog/book/{}/update", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!("value=\"{}\" checked", genre)));

    let response = post_form(
        &app,
        &format!("/catalog/book/{}/update", id),
        &format!("title=Dune+Messiah&author={}&summary=s&isbn=i", author),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/catalog/book/{}", id));

    let book = store.find_book(id).await.unwrap().unwrap();
    assert_eq!(book.title, "Dune Messiah");
    assert!(book.genre.is_empty());
    assert_eq!(store.count_books().await.unwrap(), 1);
}

#[tokio::test]
async fn test_book_delete_is_not_implemented() {
    let (app, _) = app();
    let uri = format!("/catalog/book/{}/delete", Uuid::new_v4());

    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "NOT IMPLEMENTED: Book delete GET");

    let response = post_form(&app, &uri, "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "NOT IMPLEMENTED: Book delete POST");
}

#[tokio::test]
async fn test_author_validation_and_delete() {
    let (app, store) = app();

    let response = post_form(
        &app,
        "/catalog/author/create",
        "first_name=Ursula&family_name=Le+Guin&date_of_birth=soon",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Family name has non-alphanumeric characters."));
    assert!(body.contains("Invalid date of birth."));
    assert_eq!(store.count_authors().await.unwrap(), 0);

    let author = create_author(&app).await;
    post_form(
        &app,
        "/catalog/book/create",
        &format!("title=Dune&author={}&summary=s&isbn=i", author),
    )
    .await;

    let uri = format!("/catalog/author/{}/delete", author);
    let response = post_form(&app, &uri, "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Delete the following books before attempting to delete this author."));
    assert_eq!(store.count_authors().await.unwrap(), 1);

    let lonely = create_author(&app).await;
    let response = post_form(&app, &format!("/catalog/author/{}/delete", lonely), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
    assert!(store.find_author(lonely).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_genre_redirects_to_existing() {
    let (app, store) = app();
    let first = create_genre(&app, "Poetry").await;
    let second = create_genre(&app, "+Poetry+").await;

    assert_eq!(first, second);
    assert_eq!(store.count_genres().await.unwrap(), 1);

    let response = post_form(&app, "/catalog/genre/create", "name=ab").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Genre name must contain between 3 and 100 characters."));
}

#[tokio::test]
async fn test_book_instance_lifecycle() {
    let (app, store) = app();
    let author = create_author(&app).await;
    let response = post_form(
        &app,
        "/catalog/book/create",
        &format!("title=Dune&author={}&summary=s&isbn=i", author),
    )
    .await;
    let book = id_from(&location(&response));

    let response = post_form(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Ace%2C+1990&status=Available&due_back=", book),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let copy = id_from(&location(&response));

    let (status, body) = get(&app, "/catalog/bookinstances").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Dune : Ace, 1990"));

    let (_, body) = get(&app, "/").await;
    assert!(body.contains("<strong>Copies available: </strong>1"));

    let response = post_form(
        &app,
        "/catalog/bookinstance/create",
        &format!("book={}&imprint=Ace&status=Lost", book),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid status."));

    let response = post_form(&app, &format!("/catalog/bookinstance/{}/delete", copy), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");
    assert!(store.find_book_instance(copy).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ambient_routes_and_headers() {
    let (app, _) = app();

    let (status, body) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "respond with a resource");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"ready\""));

    let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));

    let (status, body) = get(&app, "/stylesheets/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("text-success"));
}
