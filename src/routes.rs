use super::{
    config::MAX_UPLOAD_BYTES, controllers, errors::not_found_response,
    middleware, models,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post, Router},
};

async fn fallback() -> impl IntoResponse {
    not_found_response()
}

/// HTML pages share the `text/html` middleware; the sitemap, robots.txt,
/// media and the JSON API are merged in afterwards so they keep their own
/// content types.
#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    let pages = Router::new()
        .route("/", get(controllers::root))
        .route("/properties", get(controllers::list_properties))
        .route("/properties/:id", get(controllers::property_detail))
        .route("/blog", get(controllers::blog_index))
        .route("/blog/:slug", get(controllers::blog_post))
        .route("/about", get(controllers::about))
        .route("/auth/signin", get(controllers::get_signin_form))
        .route("/auth/signin", post(controllers::handle_signin))
        .route("/auth/signout", post(controllers::handle_signout))
        .route("/admin", get(controllers::admin_dashboard))
        .route("/admin/properties/new", get(controllers::new_property_form))
        .route("/admin/properties/new", post(controllers::create_property))
        .route("/admin/properties/:id/edit", get(controllers::edit_property_form))
        .route("/admin/properties/:id/edit", post(controllers::update_property))
        .route("/admin/properties/:id/delete", get(controllers::confirm_delete_property))
        .route("/admin/properties/:id/delete", post(controllers::delete_property))
        .route("/admin/posts/new", get(controllers::new_post_form))
        .route("/admin/posts/new", post(controllers::create_post))
        .route("/admin/posts/:id/edit", get(controllers::edit_post_form))
        .route("/admin/posts/:id/edit", post(controllers::update_post))
        .route("/admin/posts/:id/delete", get(controllers::confirm_delete_post))
        .route("/admin/posts/:id/delete", post(controllers::delete_post))
        .fallback(fallback)
        // Room for the image plus the text fields around it
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(from_fn(middleware::html_headers));

    let feeds = Router::new()
        .route("/sitemap.xml", get(controllers::get_sitemap))
        .route("/robots.txt", get(controllers::get_robots_txt))
        .route("/media/:file_id", get(controllers::get_media))
        .route("/api/properties/:id", get(controllers::get_property_json))
        .route("/ping", get(controllers::pong));

    pages.merge(feeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::{memory::MemoryBucket, tests::PNG_BYTES},
        config::test_config,
        db_ops::{BlogStore, PropertyStore},
        listing::models::fixtures,
        memory::{
            MemoryBlogStore, MemoryIdentity, MemoryPageStore,
            MemoryPropertyStore,
        },
        models::{AppState, BlogPostFields, Principal, Role},
        session::{serialize_session, Session},
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use std::sync::{atomic::Ordering, Arc};
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
        properties: Arc<MemoryPropertyStore>,
        posts: Arc<MemoryBlogStore>,
        assets: Arc<MemoryBucket>,
        identity: Arc<MemoryIdentity>,
    }

    impl TestApp {
        fn new() -> Self {
            let properties =
                Arc::new(MemoryPropertyStore::with_rows(fixtures::properties()));
            let posts = Arc::new(MemoryBlogStore::default());
            let assets = Arc::new(MemoryBucket::default());
            let identity = Arc::new(
                MemoryIdentity::default()
                    .with_user("admin@realmarket.test", "hunter2", Role::Admin)
                    .with_user("member@realmarket.test", "hunter2", Role::Member),
            );
            let state = AppState {
                properties: properties.clone(),
                posts: posts.clone(),
                pages: Arc::new(MemoryPageStore::default()),
                assets: assets.clone(),
                identity: identity.clone(),
                config: Arc::new(test_config()),
            };
            Self {
                state,
                properties,
                posts,
                assets,
                identity,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            get_routes()
                .with_state(self.state.clone())
                .oneshot(request)
                .await
                .unwrap()
        }
    }

    /// A session for one of the two users `TestApp` registers.
    fn cookie_for(role: Role) -> String {
        let name = match role {
            Role::Admin => "admin",
            Role::Member => "member",
        };
        let session = Session::new(Principal {
            id: name.into(),
            email: format!("{name}@realmarket.test"),
            name: name.into(),
            role,
        });
        format!("session={}", serialize_session(b"foo", &session))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn get_as(uri: &str, role: Role) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie_for(role))
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, role: Role, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::COOKIE, cookie_for(role))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_multipart(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        post_multipart_with_file(uri, fields, None)
    }

    /// `file` is the `image` part as `(content type, bytes)`.
    fn post_multipart_with_file(
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        let mut body: Vec<u8> = vec![];
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--BOUNDARY\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--BOUNDARY\r\nContent-Disposition: form-data; name=\"image\"; filename=\"photo\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"--BOUNDARY--\r\n");
        Request::post(uri)
            .header(header::COOKIE, cookie_for(Role::Admin))
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_admin_requires_a_session() {
        let app = TestApp::new();
        let response = app.send(get("/admin")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/signin");
    }

    #[tokio::test]
    async fn test_admin_refuses_members() {
        let app = TestApp::new();
        let response = app.send(get_as("/admin/properties/new", Role::Member)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_admin_dashboard_for_admins() {
        let app = TestApp::new();
        let response = app.send(get_as("/admin", Role::Admin)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Admin Dashboard"));
        assert!(html.contains("/admin/properties/p11/edit"));
    }

    #[tokio::test]
    async fn test_tampered_session_is_anonymous() {
        let app = TestApp::new();
        let request = Request::get("/admin")
            .header(header::COOKIE, "session=e30:AAAA")
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.headers()[header::LOCATION], "/auth/signin");
    }

    #[tokio::test]
    async fn test_listing_applies_filters() {
        let app = TestApp::new();
        let response = app
            .send(get("/properties?type=condo&minPrice=2000000&maxPrice=&bedrooms=abc"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let html = body_text(response).await;
        // Beach Condo and Marina Condo; newest first
        let beach = html.find(r#"href="/properties/p08""#).unwrap();
        let marina = html.find(r#"href="/properties/p11""#).unwrap();
        assert!(marina < beach);
        assert!(!html.contains(r#"href="/properties/p05""#));
        assert!(!html.contains(r#"href="/properties/p09""#));
    }

    #[tokio::test]
    async fn test_listing_fragment_for_htmx() {
        let app = TestApp::new();
        let request = Request::get("/properties?type=house&bedrooms=9")
            .header("Hx-Request", "true")
            .body(Body::empty())
            .unwrap();
        let html = body_text(app.send(request).await).await;
        assert!(html.starts_with(r#"<div id="listing-results">"#));
        assert!(html.contains("No properties found"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_not_an_empty_result() {
        let app = TestApp::new();
        app.properties.failing.store(true, Ordering::SeqCst);
        let html = body_text(app.send(get("/properties")).await).await;
        assert!(html.contains(r#"role="alert""#));
        assert!(!html.contains("No properties found"));

        let home = body_text(app.send(get("/")).await).await;
        assert!(home.contains(r#"role="alert""#));
    }

    #[tokio::test]
    async fn test_unknown_records_are_not_found() {
        let app = TestApp::new();
        for uri in ["/properties/nope", "/blog/nope", "/no/such/page"] {
            let response = app.send(get(uri)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
        let response = app.send(get_as("/admin/posts/nope/edit", Role::Admin)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blog_post_by_slug() {
        let app = TestApp::new();
        app.posts
            .create(BlogPostFields {
                title: "Spring Market Report".into(),
                content: "Prices are up.\nInventory is down.".into(),
                slug: "spring-market-report".into(),
                image_url: String::new(),
                author: "Jack".into(),
            })
            .await
            .unwrap();
        let response = app.send(get("/blog/spring-market-report")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<p>Inventory is down.</p>"));
        assert!(html.contains(r#""@type":"BlogPosting""#));
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let app = TestApp::new();
        let response = app
            .send(post_form("/admin/properties/p03/delete", Role::Admin, ""))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.properties.get("p03").await.unwrap().is_some());

        let response = app
            .send(post_form(
                "/admin/properties/p03/delete",
                Role::Admin,
                "confirm=yes",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
        assert!(app.properties.get("p03").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_members_cannot_delete() {
        let app = TestApp::new();
        let response = app
            .send(post_form(
                "/admin/properties/p03/delete",
                Role::Member,
                "confirm=yes",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(app.properties.get("p03").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_property() {
        let app = TestApp::new();
        let fields = [
            ("title", "Harbor View"),
            ("location", "Seattle, WA"),
            ("price", "799000"),
            ("type", "condo"),
            ("bedrooms", "2"),
            ("bathrooms", "1"),
            ("area", "1100"),
            ("description", "Water views"),
        ];
        let response = app
            .send(post_multipart("/admin/properties/new", &fields))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let id = location.strip_prefix("/properties/").unwrap();
        let created = app.properties.get(id).await.unwrap().unwrap();
        assert_eq!(created.fields.title, "Harbor View");
        assert_eq!(created.fields.price, 799_000.0);
    }

    #[tokio::test]
    async fn test_invalid_property_rerenders_form() {
        let app = TestApp::new();
        let fields = [
            ("title", "Harbor View"),
            ("location", "Seattle, WA"),
            ("price", "a lot"),
            ("type", "condo"),
            ("bedrooms", "2"),
            ("bathrooms", "1"),
            ("area", "1100"),
            ("description", "Water views"),
        ];
        let response = app
            .send(post_multipart("/admin/properties/new", &fields))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Price&#32;must&#32;be&#32;a&#32;number"));
        let all = app.properties.list(&Default::default()).await.unwrap();
        assert_eq!(all.len(), fixtures::properties().len());
    }

    #[tokio::test]
    async fn test_sign_in_sets_cookie() {
        let app = TestApp::new();
        let request = Request::post("/auth/signin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=admin%40realmarket.test&password=hunter2"))
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("session="));

        let request = Request::post("/auth/signin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=admin%40realmarket.test&password=wrong"))
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_sitemap_and_robots() {
        let app = TestApp::new();
        let response = app.send(get("/sitemap.xml")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml; charset=utf-8"
        );
        let xml = body_text(response).await;
        assert!(xml.contains("<loc>https://real.example.com/properties/p07</loc>"));

        let robots = body_text(app.send(get("/robots.txt")).await).await;
        assert!(robots.contains("Sitemap: https://real.example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_sitemap_survives_a_failing_collection() {
        let app = TestApp::new();
        app.posts.failing.store(true, Ordering::SeqCst);
        let response = app.send(get("/sitemap.xml")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let xml = body_text(response).await;
        assert!(xml.contains("/properties/p00</loc>"));
    }

    fn property_fields(price: &str) -> [(&'static str, String); 8] {
        [
            ("title", "Harbor View".into()),
            ("location", "Seattle, WA".into()),
            ("price", price.into()),
            ("type", "condo".into()),
            ("bedrooms", "2".into()),
            ("bathrooms", "1".into()),
            ("area", "1100".into()),
            ("description", "Water views".into()),
        ]
    }

    fn as_pairs<'a>(fields: &'a [(&'static str, String)]) -> Vec<(&'a str, &'a str)> {
        fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    #[tokio::test]
    async fn test_infinite_scroll_returns_only_the_next_cards() {
        let app = TestApp::new();
        let template = fixtures::properties().remove(0).fields;
        for i in 0..30 {
            let mut fields = template.clone();
            fields.title = format!("New Listing {i}");
            app.properties.create(fields).await.unwrap();
        }

        let first = Request::get("/properties")
            .header("Hx-Request", "true")
            .body(Body::empty())
            .unwrap();
        let html = body_text(app.send(first).await).await;
        assert!(html.starts_with(r#"<div id="listing-results">"#));
        assert!(html.contains(r#"hx-get="&#47;properties?page&#61;1""#));
        assert!(!html.contains(r#"href="/properties/p00""#));

        let next = Request::get("/properties?page=1")
            .header("Hx-Request", "true")
            .body(Body::empty())
            .unwrap();
        let html = body_text(app.send(next).await).await;
        assert!(!html.contains("listing-results"));
        assert!(!html.contains("<html"));
        // The twelve oldest listings land on the second page
        assert!(html.contains(r#"href="/properties/p00""#));
        assert!(html.contains(r#"href="/properties/p11""#));
        assert!(!html.contains("hx-trigger=\"revealed\""));
    }

    #[tokio::test]
    async fn test_listing_with_absurd_page_number() {
        let app = TestApp::new();
        let response = app.send(get("/properties?page=768614336404564651")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"href="/properties/p00""#));
    }

    #[tokio::test]
    async fn test_create_property_with_image() {
        let app = TestApp::new();
        let fields = property_fields("799000");
        // Browsers that cannot tell send octet-stream; the bytes decide
        let response = app
            .send(post_multipart_with_file(
                "/admin/properties/new",
                &as_pairs(&fields),
                Some(("application/octet-stream", PNG_BYTES)),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let id = location.strip_prefix("/properties/").unwrap();
        let created = app.properties.get(id).await.unwrap().unwrap();
        assert!(created.fields.image_url.starts_with("https://media.test/"));
        assert_eq!(app.assets.file_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_file_part_means_no_image() {
        let app = TestApp::new();
        let fields = property_fields("799000");
        let response = app
            .send(post_multipart_with_file(
                "/admin/properties/new",
                &as_pairs(&fields),
                Some(("application/octet-stream", b"")),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let id = location.strip_prefix("/properties/").unwrap();
        let created = app.properties.get(id).await.unwrap().unwrap();
        assert_eq!(created.fields.image_url, "");
        assert_eq!(app.assets.file_count(), 0);
    }

    #[tokio::test]
    async fn test_unusable_image_rerenders_form() {
        let app = TestApp::new();
        let fields = property_fields("799000");
        let response = app
            .send(post_multipart_with_file(
                "/admin/properties/new",
                &as_pairs(&fields),
                Some(("image/png", b"not really a png")),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app.assets.file_count(), 0);
        let all = app.properties.list(&Default::default()).await.unwrap();
        assert_eq!(all.len(), fixtures::properties().len());
    }

    #[tokio::test]
    async fn test_edit_and_update_property() {
        let app = TestApp::new();
        let response = app
            .send(get_as("/admin/properties/p02/edit", Role::Admin))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Harbor&#32;Condo"));

        let fields = property_fields("655000");
        let response = app
            .send(post_multipart_with_file(
                "/admin/properties/p02/edit",
                &as_pairs(&fields),
                Some(("application/octet-stream", b"")),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/properties/p02");
        let updated = app.properties.get("p02").await.unwrap().unwrap();
        assert_eq!(updated.fields.title, "Harbor View");
        assert_eq!(updated.fields.price, 655_000.0);

        let fields = property_fields("-1");
        let response = app
            .send(post_multipart("/admin/properties/p02/edit", &as_pairs(&fields)))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let unchanged = app.properties.get("p02").await.unwrap().unwrap();
        assert_eq!(unchanged.fields.price, 655_000.0);
    }

    async fn seed_post(app: &TestApp) -> String {
        app.posts
            .create(BlogPostFields {
                title: "Spring Market Report".into(),
                content: "Prices are up.".into(),
                slug: "spring-market-report".into(),
                image_url: String::new(),
                author: "Jack".into(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_edit_and_update_post() {
        let app = TestApp::new();
        let id = seed_post(&app).await;
        let response = app
            .send(get_as(&format!("/admin/posts/{id}/edit"), Role::Admin))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("spring-market-report"));

        let response = app
            .send(post_multipart(
                &format!("/admin/posts/{id}/edit"),
                &[
                    ("title", "Summer Market Report"),
                    ("content", "Prices are flat."),
                    ("slug", "summer-market-report"),
                    ("author", "Jack"),
                ],
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/blog/summer-market-report"
        );
        let updated = app.posts.get(&id).await.unwrap().unwrap();
        assert_eq!(updated.fields.content, "Prices are flat.");
        assert!(app
            .posts
            .get_by_slug("spring-market-report")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_post_delete_needs_confirmation() {
        let app = TestApp::new();
        let id = seed_post(&app).await;
        let uri = format!("/admin/posts/{id}/delete");
        let response = app.send(post_form(&uri, Role::Admin, "confirm=no")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Spring&#32;Market&#32;Report"));
        assert!(app.posts.get(&id).await.unwrap().is_some());

        let response = app.send(post_form(&uri, Role::Admin, "confirm=yes")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(app.posts.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_demoted_admin_loses_access() {
        let app = TestApp::new();
        let response = app.send(get_as("/admin", Role::Admin)).await;
        assert_eq!(response.status(), StatusCode::OK);

        app.identity.set_role("admin", Role::Member).await;
        let response = app.send(get_as("/admin", Role::Admin)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_property_json() {
        let app = TestApp::new();
        let response = app.send(get("/api/properties/p02")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["id"], "p02");
        assert_eq!(json["title"], "Harbor Condo");
        assert_eq!(json["type"], "condo");
        assert_eq!(json["price"], 610_000.0);
        assert_eq!(json["imageUrl"], "");
        assert!(json["createdAt"].is_string());

        let response = app.send(get("/api/properties/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["error"], "Property not found");

        app.properties.failing.store(true, Ordering::SeqCst);
        let response = app.send(get("/api/properties/p02")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["error"], "Failed to fetch property");
    }
}
