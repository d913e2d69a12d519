//! End-to-end exercise of the REST surface over the in-memory store.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use chrono::Utc;
use mockable::DefaultClock;
use serde_json::{Value, json};
use uuid::Uuid;

use backend::domain::ports::UserRepository;
use backend::domain::user::{EmailAddress, User, Username};
use backend::domain::{Error, UserId};
use backend::inbound::http::session::SessionContext;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{configure_api, json_config, path_config, query_config};
use backend::outbound::persistence::MemoryStore;

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stand-in for the external authentication flow.
fn login_route() -> actix_web::Resource {
    web::resource("/login/{id}").route(web::post().to(
        |session: SessionContext, path: web::Path<Uuid>| async move {
            session.persist_user(&UserId::from(path.into_inner()))?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        },
    ))
}

async fn seed_user(store: &MemoryStore, name: &str) -> UserId {
    let user = User::new(
        UserId::random(),
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.org")).expect("valid email"),
        Utc::now(),
    );
    let id = user.id;
    store.insert(user).await.expect("seed user");
    id
}

async fn login<S, B>(app: &S, id: UserId) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/login/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[actix_web::test]
async fn snippets_and_collections_round_trip_through_the_api() {
    let store = MemoryStore::new();
    let state = HttpState::with_memory_store(store.clone(), Arc::new(DefaultClock));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(session_middleware())
            .service(login_route())
            .service(web::scope("/api").configure(configure_api)),
    )
    .await;

    let ada = seed_user(&store, "ada").await;
    let grace = seed_user(&store, "grace").await;
    let ada_cookie = login(&app, ada).await;
    let grace_cookie = login(&app, grace).await;

    // Ada publishes a snippet.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/snippets")
            .cookie(ada_cookie.clone())
            .set_json(json!({
                "title": "Quicksort",
                "codeContent": "def qs(xs): ...",
                "language": "python",
                "description": "Classic divide and conquer",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let snippet: Value = test::read_body_json(res).await;
    assert_eq!(snippet["owner"]["username"], "ada");
    let snippet_id = snippet["id"].as_str().expect("snippet id").to_owned();

    // Grace can see it anonymously-visible listings included.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/snippets")
            .cookie(grace_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = test::read_body_json(res).await;
    assert_eq!(page["items"].as_array().expect("items").len(), 1);

    // Grace likes it.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/snippets/{snippet_id}/like"))
            .cookie(grace_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let toggle: Value = test::read_body_json(res).await;
    assert_eq!(toggle["state"], "liked");
    assert_eq!(toggle["likesCount"], 1);

    // Grace curates the snippet into a collection of her own.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/collections")
            .cookie(grace_cookie.clone())
            .set_json(json!({"name": "Sorting", "description": ""}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let collection: Value = test::read_body_json(res).await;
    let collection_id = collection["id"].as_str().expect("collection id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/collections/{collection_id}/snippets"))
            .cookie(grace_cookie.clone())
            .set_json(json!({"snippetId": snippet_id}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let view: Value = test::read_body_json(res).await;
    assert_eq!(view["snippetCount"], 1);

    // The detail view assembles members with like counts.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/collections/{collection_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = test::read_body_json(res).await;
    assert_eq!(detail["snippets"][0]["likesCount"], 1);

    // Deleting the snippet as its owner removes it from the collection too.
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/snippets/{snippet_id}"))
            .cookie(ada_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/collections/{collection_id}"))
            .to_request(),
    )
    .await;
    let detail: Value = test::read_body_json(res).await;
    assert_eq!(detail["snippets"].as_array().expect("snippets").len(), 0);
}
