use super::{
    assets::ImageUpload,
    auth,
    components::{self, Component},
    config::{PAGE_SIZE, SITE_NAME},
    errors::{not_found_response, ServerError},
    extractors::{AdminPrincipal, MaybePrincipal},
    htmx,
    listing::{
        components::{ListingView, PropertyCards, PropertyResults},
        models::{ListingPage, ListingQuery, RawListingFilters},
    },
    models::{AppState, Capability, Principal},
    records::{self, RecordError},
    seo::{post_url, PageMeta, DEFAULT_DESCRIPTION},
    session::{self, Session},
    sitemap,
    validation::{BlogPostForm, FieldErrors, PropertyForm},
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use chrono::Utc;
use futures::join;
use serde::Deserialize;
use std::collections::HashMap;

fn render_page<'a>(
    title: &str,
    meta: Option<PageMeta>,
    principal: Option<&'a Principal>,
    children: impl Component + 'a,
) -> String {
    components::Page {
        title: title.to_string(),
        meta,
        principal,
        children: Box::new(children),
    }
    .render()
}

/// Unwrap store errors so that a missing record still becomes the 404 page.
fn record_failure(err: RecordError) -> ServerError {
    match err {
        RecordError::Store(e) => e.into(),
        other => other.into(),
    }
}

pub async fn root(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
) -> String {
    let featured = match state.properties.list(&ListingQuery::featured()).await
    {
        Ok(rows) => Some(rows),
        Err(e) => {
            tracing::error!(error = %e, "could not load featured properties");
            None
        }
    };
    render_page(
        SITE_NAME,
        Some(PageMeta::site(&state.config, "/", DEFAULT_DESCRIPTION)),
        principal.as_ref(),
        components::Home {
            featured: featured.as_deref(),
        },
    )
}

pub async fn pong() -> impl IntoResponse {
    "pong"
}

/// The property listing. htmx requests get only the part of the page they
/// replace: the results container for a new filter, or the next batch of
/// cards for infinite scroll.
pub async fn list_properties(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    headers: HeaderMap,
    Query(raw): Query<RawListingFilters>,
) -> String {
    let query = ListingQuery::from_raw(&raw);
    let page_number = query.offset / PAGE_SIZE;
    let page = match state.properties.list(&query).await {
        Ok(rows) => Some(ListingPage::from_rows(rows, page_number, PAGE_SIZE)),
        Err(e) => {
            tracing::error!(error = %e, ?query, "could not list properties");
            None
        }
    };

    if htmx::wants_fragment(&headers) {
        return match &page {
            Some(page) if page_number > 0 => PropertyCards {
                page,
                query: &query,
            }
            .render(),
            _ => PropertyResults {
                page: page.as_ref(),
                query: &query,
            }
            .render(),
        };
    }
    render_page(
        "Properties",
        Some(PageMeta::site(
            &state.config,
            "/properties",
            "Browse houses, apartments, and condos for sale. Filter by type, \
            price and bedrooms.",
        )),
        principal.as_ref(),
        ListingView {
            page: page.as_ref(),
            query: &query,
        },
    )
}

pub async fn property_detail(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let Some(property) = state.properties.get(&id).await? else {
        return Ok(not_found_response());
    };
    Ok(render_page(
        &property.fields.title,
        Some(PageMeta::for_property(&state.config, &property)),
        principal.as_ref(),
        components::PropertyDetail {
            property: &property,
        },
    )
    .into_response())
}

pub async fn blog_index(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
) -> String {
    let posts = match state.posts.list().await {
        Ok(posts) => Some(posts),
        Err(e) => {
            tracing::error!(error = %e, "could not list blog posts");
            None
        }
    };
    render_page(
        "Blog",
        Some(PageMeta::site(
            &state.config,
            "/blog",
            "Market updates, buying guides and news from Real Market.",
        )),
        principal.as_ref(),
        components::BlogList {
            posts: posts.as_deref(),
        },
    )
}

pub async fn blog_post(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let Some(post) = state.posts.get_by_slug(&slug).await? else {
        return Ok(not_found_response());
    };
    let share_url = post_url(&state.config, &post);
    Ok(render_page(
        &post.fields.title,
        Some(PageMeta::for_post(&state.config, &post)),
        principal.as_ref(),
        components::BlogPostView {
            post: &post,
            share_url: &share_url,
        },
    )
    .into_response())
}

pub async fn about(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
) -> String {
    let page = match state.pages.get_by_slug("about").await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(error = %e, "could not load the about page");
            None
        }
    };
    render_page(
        "About",
        Some(PageMeta::site(
            &state.config,
            "/about",
            "About Real Market, a listing site for houses, apartments, and condos.",
        )),
        principal.as_ref(),
        components::ContentPageView {
            page: page.as_ref(),
        },
    )
}

pub async fn get_signin_form(
    MaybePrincipal(principal): MaybePrincipal,
) -> String {
    render_page(
        "Sign in",
        None,
        principal.as_ref(),
        components::SignInForm {
            email: "",
            error: None,
        },
    )
}

#[derive(Deserialize)]
pub struct SignInPayload {
    email: String,
    password: String,
}
pub async fn handle_signin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SignInPayload>,
) -> Result<Response, ServerError> {
    let Some(principal) =
        auth::authenticate(&*state.identity, &form.email, &form.password)
            .await?
    else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            render_page(
                "Sign in",
                None,
                None,
                components::SignInForm {
                    email: &form.email,
                    error: Some("Invalid email or password"),
                },
            ),
        )
            .into_response());
    };
    let destination = if principal.can(Capability::ManageRecords) {
        "/admin"
    } else {
        "/"
    };
    let cookie = session::set_cookie(
        &state.config.session_secret,
        state.config.session_ttl,
        &Session::new(principal),
    );
    let (status, mut response_headers) =
        htmx::redirect_after_post(&headers, destination);
    response_headers.insert(header::SET_COOKIE, HeaderValue::from_str(&cookie)?);

    Ok((status, response_headers).into_response())
}

pub async fn handle_signout(headers: HeaderMap) -> Result<Response, ServerError> {
    let (status, mut response_headers) = htmx::redirect_after_post(&headers, "/");
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&session::clear_cookie())?,
    );

    Ok((status, response_headers).into_response())
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
) -> String {
    let everything = ListingQuery::default();
    let (properties, posts) =
        join!(state.properties.list(&everything), state.posts.list());
    let properties = properties
        .map_err(|e| tracing::error!(error = %e, "dashboard: could not list properties"))
        .ok();
    let posts = posts
        .map_err(|e| tracing::error!(error = %e, "dashboard: could not list posts"))
        .ok();
    render_page(
        "Admin Dashboard",
        None,
        Some(&principal),
        components::AdminDashboard {
            properties: properties.as_deref(),
            posts: posts.as_deref(),
        },
    )
}

/// A multipart admin form: its text fields, plus the image if one was
/// chosen. An unusable image is kept as its error message so it can be
/// shown next to the file input.
struct Submission {
    fields: HashMap<String, String>,
    image: Result<Option<ImageUpload>, &'static str>,
}

impl Submission {
    async fn read(mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut fields = HashMap::new();
        let mut image = Ok(None);
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if name == "image" {
                // Some browsers label every file application/octet-stream;
                // the bytes decide in that case.
                let declared = field
                    .content_type()
                    .filter(|t| t.starts_with("image/"))
                    .map(str::to_string);
                let bytes = field.bytes().await?;
                // An empty file part means nothing was chosen
                if !bytes.is_empty() {
                    image = ImageUpload::new(declared.as_deref(), bytes.to_vec())
                        .map(Some);
                }
            } else {
                fields.insert(name, field.text().await?);
            }
        }

        Ok(Self { fields, image })
    }

    fn image_error(message: &'static str) -> RecordError {
        let mut errors = FieldErrors::default();
        errors.push("image", message);
        RecordError::Invalid(errors)
    }
}

pub async fn new_property_form(
    AdminPrincipal(principal): AdminPrincipal,
) -> String {
    render_page(
        "Add New Property",
        None,
        Some(&principal),
        components::PropertyEditor {
            heading: "Add New Property",
            action: "/admin/properties/new",
            form: &PropertyForm::default(),
            errors: &FieldErrors::default(),
            current_image: None,
        },
    )
}

pub async fn create_property(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let submission = Submission::read(multipart).await?;
    let form = PropertyForm::from_fields(&submission.fields);
    let result = match submission.image {
        Ok(image) => {
            records::create_property(
                &*state.properties,
                &*state.assets,
                &form,
                image,
            )
            .await
        }
        Err(message) => Err(Submission::image_error(message)),
    };
    match result {
        Ok(property) => Ok(htmx::redirect_after_post(
            &headers,
            &format!("/properties/{}", property.id),
        )
        .into_response()),
        Err(e) => {
            let errors = e.into_field_errors().map_err(record_failure)?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                render_page(
                    "Add New Property",
                    None,
                    Some(&principal),
                    components::PropertyEditor {
                        heading: "Add New Property",
                        action: "/admin/properties/new",
                        form: &form,
                        errors: &errors,
                        current_image: None,
                    },
                ),
            )
                .into_response())
        }
    }
}

pub async fn edit_property_form(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let Some(property) = state.properties.get(&id).await? else {
        return Ok(not_found_response());
    };
    Ok(render_page(
        "Edit Property",
        None,
        Some(&principal),
        components::PropertyEditor {
            heading: &format!("Edit {}", property.fields.title),
            action: &format!("/admin/properties/{id}/edit"),
            form: &PropertyForm::from_property(&property),
            errors: &FieldErrors::default(),
            current_image: Some(&property.fields.image_url),
        },
    )
    .into_response())
}

pub async fn update_property(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let Some(existing) = state.properties.get(&id).await? else {
        return Ok(not_found_response());
    };
    let submission = Submission::read(multipart).await?;
    let form = PropertyForm::from_fields(&submission.fields);
    let result = match submission.image {
        Ok(image) => {
            records::update_property(
                &*state.properties,
                &*state.assets,
                &id,
                &form,
                image,
            )
            .await
        }
        Err(message) => Err(Submission::image_error(message)),
    };
    match result {
        Ok(property) => Ok(htmx::redirect_after_post(
            &headers,
            &format!("/properties/{}", property.id),
        )
        .into_response()),
        Err(e) => {
            let errors = e.into_field_errors().map_err(record_failure)?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                render_page(
                    "Edit Property",
                    None,
                    Some(&principal),
                    components::PropertyEditor {
                        heading: &format!("Edit {}", existing.fields.title),
                        action: &format!("/admin/properties/{id}/edit"),
                        form: &form,
                        errors: &errors,
                        current_image: Some(&existing.fields.image_url),
                    },
                ),
            )
                .into_response())
        }
    }
}

#[derive(Deserialize)]
pub struct DeletePayload {
    confirm: Option<String>,
}
impl DeletePayload {
    fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

pub async fn confirm_delete_property(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let Some(property) = state.properties.get(&id).await? else {
        return Ok(not_found_response());
    };
    Ok(render_page(
        "Delete Property",
        None,
        Some(&principal),
        components::ConfirmDelete {
            noun: "property",
            name: &property.fields.title,
            action: &format!("/admin/properties/{id}/delete"),
        },
    )
    .into_response())
}

pub async fn delete_property(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(payload): Form<DeletePayload>,
) -> Result<Response, ServerError> {
    match records::delete_property(
        &*state.properties,
        &*state.assets,
        &id,
        payload.confirmed(),
    )
    .await
    {
        Ok(()) => Ok(htmx::redirect_after_post(&headers, "/admin").into_response()),
        Err(RecordError::Unconfirmed) => {
            let Some(property) = state.properties.get(&id).await? else {
                return Ok(not_found_response());
            };
            Ok((
                StatusCode::BAD_REQUEST,
                render_page(
                    "Delete Property",
                    None,
                    Some(&principal),
                    components::ConfirmDelete {
                        noun: "property",
                        name: &property.fields.title,
                        action: &format!("/admin/properties/{id}/delete"),
                    },
                ),
            )
                .into_response())
        }
        Err(e) => Err(record_failure(e)),
    }
}

pub async fn new_post_form(AdminPrincipal(principal): AdminPrincipal) -> String {
    render_page(
        "New Post",
        None,
        Some(&principal),
        components::PostEditor {
            heading: "New Post",
            action: "/admin/posts/new",
            form: &BlogPostForm {
                author: principal.name.clone(),
                ..Default::default()
            },
            errors: &FieldErrors::default(),
            current_image: None,
        },
    )
}

pub async fn create_post(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let submission = Submission::read(multipart).await?;
    let form = BlogPostForm::from_fields(&submission.fields);
    let result = match submission.image {
        Ok(image) => {
            records::create_post(&*state.posts, &*state.assets, &form, image)
                .await
        }
        Err(message) => Err(Submission::image_error(message)),
    };
    match result {
        Ok(post) => Ok(htmx::redirect_after_post(
            &headers,
            &format!("/blog/{}", post.fields.slug),
        )
        .into_response()),
        Err(e) => {
            let errors = e.into_field_errors().map_err(record_failure)?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                render_page(
                    "New Post",
                    None,
                    Some(&principal),
                    components::PostEditor {
                        heading: "New Post",
                        action: "/admin/posts/new",
                        form: &form,
                        errors: &errors,
                        current_image: None,
                    },
                ),
            )
                .into_response())
        }
    }
}

pub async fn edit_post_form(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let Some(post) = state.posts.get(&id).await? else {
        return Ok(not_found_response());
    };
    Ok(render_page(
        "Edit Post",
        None,
        Some(&principal),
        components::PostEditor {
            heading: &format!("Edit {}", post.fields.title),
            action: &format!("/admin/posts/{id}/edit"),
            form: &BlogPostForm::from_post(&post),
            errors: &FieldErrors::default(),
            current_image: Some(&post.fields.image_url),
        },
    )
    .into_response())
}

pub async fn update_post(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let Some(existing) = state.posts.get(&id).await? else {
        return Ok(not_found_response());
    };
    let submission = Submission::read(multipart).await?;
    let form = BlogPostForm::from_fields(&submission.fields);
    let result = match submission.image {
        Ok(image) => {
            records::update_post(&*state.posts, &*state.assets, &id, &form, image)
                .await
        }
        Err(message) => Err(Submission::image_error(message)),
    };
    match result {
        Ok(post) => Ok(htmx::redirect_after_post(
            &headers,
            &format!("/blog/{}", post.fields.slug),
        )
        .into_response()),
        Err(e) => {
            let errors = e.into_field_errors().map_err(record_failure)?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                render_page(
                    "Edit Post",
                    None,
                    Some(&principal),
                    components::PostEditor {
                        heading: &format!("Edit {}", existing.fields.title),
                        action: &format!("/admin/posts/{id}/edit"),
                        form: &form,
                        errors: &errors,
                        current_image: Some(&existing.fields.image_url),
                    },
                ),
            )
                .into_response())
        }
    }
}

pub async fn confirm_delete_post(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let Some(post) = state.posts.get(&id).await? else {
        return Ok(not_found_response());
    };
    Ok(render_page(
        "Delete Post",
        None,
        Some(&principal),
        components::ConfirmDelete {
            noun: "post",
            name: &post.fields.title,
            action: &format!("/admin/posts/{id}/delete"),
        },
    )
    .into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(payload): Form<DeletePayload>,
) -> Result<Response, ServerError> {
    match records::delete_post(
        &*state.posts,
        &*state.assets,
        &id,
        payload.confirmed(),
    )
    .await
    {
        Ok(()) => Ok(htmx::redirect_after_post(&headers, "/admin").into_response()),
        Err(RecordError::Unconfirmed) => {
            let Some(post) = state.posts.get(&id).await? else {
                return Ok(not_found_response());
            };
            Ok((
                StatusCode::BAD_REQUEST,
                render_page(
                    "Delete Post",
                    None,
                    Some(&principal),
                    components::ConfirmDelete {
                        noun: "post",
                        name: &post.fields.title,
                        action: &format!("/admin/posts/{id}/delete"),
                    },
                ),
            )
                .into_response())
        }
        Err(e) => Err(record_failure(e)),
    }
}

/// A single property as JSON. Errors are JSON too, so API clients never
/// have to parse the HTML 404 page.
pub async fn get_property_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.properties.get(&id).await {
        Ok(Some(property)) => Json(property).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Property not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, %id, "could not fetch property");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch property" })),
            )
                .into_response()
        }
    }
}

/// Every public URL. A collection that fails to load is left out rather
/// than failing the whole document.
pub async fn get_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let everything = ListingQuery::default();
    let (properties, posts) =
        join!(state.properties.list(&everything), state.posts.list());
    let properties = properties.unwrap_or_else(|e| {
        tracing::error!(error = %e, "sitemap: could not list properties");
        vec![]
    });
    let posts = posts.unwrap_or_else(|e| {
        tracing::error!(error = %e, "sitemap: could not list posts");
        vec![]
    });
    let entries =
        sitemap::entries(&state.config, Utc::now(), &properties, &posts);

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap::render_xml(&entries),
    )
}

pub async fn get_robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        sitemap::robots_txt(&state.config),
    )
}

pub async fn get_media(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, ServerError> {
    let Some((kind, bytes)) = state.assets.open(&file_id).await? else {
        return Ok(not_found_response());
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(kind.content_type()),
    );
    // File ids are never reused, so the bytes behind one never change
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    Ok((headers, bytes).into_response())
}
