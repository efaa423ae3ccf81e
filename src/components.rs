// In many cases, we need to do a let binding to satisfy the borrow checker
// and for some reason, clippy identifies those as unnecessary. Maybe there
// are and clippy knows more than me, maybe not.
#![allow(clippy::let_and_return)]

use super::{
    config::SITE_NAME,
    listing::components::PropertyCard,
    models::{BlogPost, Capability, ContentPage, Principal, Property},
    seo::{format_price, PageMeta},
    validation::{BlogPostForm, FieldErrors, PropertyForm},
};
use crate::models::PropertyType;
use ammonia::{clean, clean_text};

pub trait Component {
    /// Render the component to a HTML string. By convention, the
    /// implementation should sanitize all string properties at render-time
    fn render(&self) -> String;
}

pub struct Page<'a> {
    pub title: String,
    pub meta: Option<PageMeta>,
    pub principal: Option<&'a Principal>,
    pub children: Box<dyn Component + 'a>,
}

impl Component for Page<'_> {
    fn render(&self) -> String {
        let full_title = if self.title == SITE_NAME {
            format!("{SITE_NAME} - Find Your Dream Property")
        } else {
            format!("{} | {SITE_NAME}", self.title)
        };
        let meta = self
            .meta
            .as_ref()
            .map(|m| m.render(&self.title))
            .unwrap_or_default();
        let nav = Navbar {
            principal: self.principal,
        }
        .render();
        let body_html = self.children.render();
        format!(
            r#"<!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8" />
                    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
                    <title>{title}</title>
                    {meta}
                    <script src="https://cdn.tailwindcss.com"></script>
                </head>
                <body hx-boost="true" class="bg-gray-50 text-gray-900">
                    {nav}
                    {body_html}
                    <footer class="bg-gray-900 text-gray-400 text-center py-8 mt-16">
                        <p>&copy; {SITE_NAME}. All rights reserved.</p>
                    </footer>
                    <script src="https://unpkg.com/htmx.org@1.9.6"></script>
                    <script>
                        htmx.config.defaultSwapStyle = "outerHTML"
                    </script>
                </body>
            </html>
            "#,
            title = clean_text(&full_title),
        )
    }
}

pub struct Navbar<'a> {
    pub principal: Option<&'a Principal>,
}
impl Component for Navbar<'_> {
    fn render(&self) -> String {
        let account = match self.principal {
            Some(p) => {
                let admin = if p.can(Capability::ManageRecords) {
                    r#"<a class="hover:text-white" href="/admin">Admin</a>"#
                } else {
                    ""
                };
                format!(
                    r#"
                    {admin}
                    <form method="post" action="/auth/signout" class="inline">
                        <button class="hover:text-white">Sign out ({name})</button>
                    </form>
                    "#,
                    name = clean_text(&p.name)
                )
            }
            None => {
                r#"<a class="hover:text-white" href="/auth/signin">Sign in</a>"#
                    .to_string()
            }
        };
        format!(
            r#"
            <nav class="bg-gray-900 text-gray-300">
                <div class="max-w-7xl mx-auto px-4 h-16 flex items-center justify-between">
                    <a href="/" class="text-white text-xl font-bold">{SITE_NAME}</a>
                    <div class="flex items-center gap-6">
                        <a class="hover:text-white" href="/properties">Properties</a>
                        <a class="hover:text-white" href="/blog">Blog</a>
                        <a class="hover:text-white" href="/about">About</a>
                        {account}
                    </div>
                </div>
            </nav>
            "#
        )
    }
}

pub struct Home<'a> {
    /// `None` when the featured listings could not be loaded
    pub featured: Option<&'a [Property]>,
}
impl Component for Home<'_> {
    fn render(&self) -> String {
        let featured = match self.featured {
            Some([]) => r#"<p class="text-gray-600">New listings are coming soon.</p>"#
                .to_string(),
            Some(properties) => {
                let cards = properties
                    .iter()
                    .map(|p| PropertyCard { property: p }.render())
                    .collect::<Vec<String>>()
                    .join("");
                format!(
                    r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-8">{cards}</div>"#
                )
            }
            None => LoadError {
                message: "We couldn't load the featured listings right now.",
            }
            .render(),
        };
        format!(
            r#"
            <section class="bg-gray-900 text-white py-32">
                <div class="max-w-7xl mx-auto px-4 text-center">
                    <h1 class="text-4xl md:text-6xl font-bold mb-6">Find Your Dream Property</h1>
                    <p class="text-xl md:text-2xl mb-8">Discover the perfect home with our extensive property listings</p>
                    <a href="/properties" class="bg-blue-600 hover:bg-blue-700 px-8 py-3 rounded-md text-lg font-medium inline-block">Browse Properties</a>
                </div>
            </section>
            <section class="py-16">
                <div class="max-w-7xl mx-auto px-4">
                    <h2 class="text-3xl font-bold mb-8">Featured Properties</h2>
                    {featured}
                </div>
            </section>
            <section class="bg-blue-600 text-white py-16">
                <div class="max-w-7xl mx-auto px-4 text-center">
                    <h2 class="text-3xl font-bold mb-4">Ready to Find Your Perfect Property?</h2>
                    <p class="text-xl mb-8">Browse our extensive collection of properties and find your dream home today.</p>
                    <a href="/properties" class="bg-white text-blue-600 hover:bg-gray-100 px-8 py-3 rounded-md text-lg font-medium inline-block">Start Browsing</a>
                </div>
            </section>
            "#
        )
    }
}

/// Shown instead of results when the backend call failed, so an outage
/// never looks like "nothing matched".
pub struct LoadError<'a> {
    pub message: &'a str,
}
impl Component for LoadError<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <div role="alert" class="rounded-md bg-red-50 border border-red-200 p-4 text-red-800">
                <p>{}</p>
                <p class="text-sm mt-1">Please try again in a moment.</p>
            </div>
            "#,
            clean_text(self.message)
        )
    }
}

pub struct PropertyDetail<'a> {
    pub property: &'a Property,
}
impl Component for PropertyDetail<'_> {
    fn render(&self) -> String {
        let f = &self.property.fields;
        let image = Image {
            url: &f.image_url,
            alt: &f.title,
            class: "w-full h-[500px] object-cover rounded-lg shadow-lg",
        }
        .render();
        let paragraphs = Paragraphs { text: &f.description }.render();
        format!(
            r#"
            <div class="max-w-7xl mx-auto px-4 py-12">
                <a class="text-blue-600 hover:underline" href="/properties">&larr; All properties</a>
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-12 mt-4">
                    <div>{image}</div>
                    <div>
                        <h1 class="text-4xl font-bold mb-4">{title}</h1>
                        <p class="text-xl text-gray-600 mb-6">{location}</p>
                        <p class="text-3xl font-bold text-blue-600 mb-6">{price}</p>
                        <dl class="grid grid-cols-2 gap-4 mb-8">
                            <div><dt class="text-gray-500">Type</dt><dd class="font-semibold">{kind}</dd></div>
                            <div><dt class="text-gray-500">Bedrooms</dt><dd class="font-semibold">{bedrooms}</dd></div>
                            <div><dt class="text-gray-500">Bathrooms</dt><dd class="font-semibold">{bathrooms}</dd></div>
                            <div><dt class="text-gray-500">Area</dt><dd class="font-semibold">{area} sqft</dd></div>
                        </dl>
                        <div class="prose max-w-none">{paragraphs}</div>
                    </div>
                </div>
            </div>
            "#,
            title = clean_text(&f.title),
            location = clean_text(&f.location),
            price = format_price(f.price),
            kind = f.r#type.get_display_name(),
            bedrooms = f.bedrooms,
            bathrooms = f.bathrooms,
            area = f.area,
        )
    }
}

/// `<img>` when there is a URL, a neutral placeholder otherwise.
pub struct Image<'a> {
    pub url: &'a str,
    pub alt: &'a str,
    pub class: &'a str,
}
impl Component for Image<'_> {
    fn render(&self) -> String {
        if self.url.is_empty() {
            format!(
                r#"<div class="{} bg-gray-200 flex items-center justify-center text-gray-400">No image</div>"#,
                self.class
            )
        } else {
            format!(
                r#"<img src="{}" alt="{}" class="{}" loading="lazy" />"#,
                clean_text(self.url),
                clean_text(self.alt),
                self.class
            )
        }
    }
}

/// One `<p>` per line of text; inline markdown is allowed.
pub struct Paragraphs<'a> {
    pub text: &'a str,
}
impl Component for Paragraphs<'_> {
    fn render(&self) -> String {
        let html = self
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            // A leading tag would make markdown emit the line as a raw HTML
            // block instead of a paragraph.
            .map(|l| markdown::to_html(&l.replace('<', "&lt;")))
            .collect::<Vec<String>>()
            .join("\n");
        clean(&html)
    }
}

pub struct BlogList<'a> {
    /// `None` when the posts could not be loaded
    pub posts: Option<&'a [BlogPost]>,
}
impl Component for BlogList<'_> {
    fn render(&self) -> String {
        let body = match self.posts {
            Some([]) => {
                r#"<p class="text-gray-600">No posts yet.</p>"#.to_string()
            }
            Some(posts) => posts
                .iter()
                .map(|p| BlogPostCard { post: p }.render())
                .collect::<Vec<String>>()
                .join(""),
            None => LoadError {
                message: "We couldn't load the blog right now.",
            }
            .render(),
        };
        format!(
            r#"
            <div class="max-w-4xl mx-auto px-4 py-12">
                <h1 class="text-3xl font-bold mb-8">Blog</h1>
                <div class="space-y-8">{body}</div>
            </div>
            "#
        )
    }
}

pub struct BlogPostCard<'a> {
    pub post: &'a BlogPost,
}
impl Component for BlogPostCard<'_> {
    fn render(&self) -> String {
        let f = &self.post.fields;
        format!(
            r#"
            <article class="bg-white rounded-lg shadow-md p-6">
                <h2 class="text-2xl font-semibold mb-2">
                    <a class="hover:underline" href="/blog/{slug}">{title}</a>
                </h2>
                <p class="text-sm text-gray-500 mb-4">{date} &bull; {author}</p>
                <p class="text-gray-700">{excerpt}</p>
            </article>
            "#,
            slug = clean_text(&f.slug),
            title = clean_text(&f.title),
            date = self.post.created_at.format("%B %-d, %Y"),
            author = clean_text(&f.author),
            excerpt = clean_text(&self.post.excerpt(200)),
        )
    }
}

pub struct BlogPostView<'a> {
    pub post: &'a BlogPost,
    pub share_url: &'a str,
}
impl Component for BlogPostView<'_> {
    fn render(&self) -> String {
        let f = &self.post.fields;
        let image = Image {
            url: &f.image_url,
            alt: &f.title,
            class: "w-full h-[400px] object-cover rounded-lg shadow-lg mb-8",
        }
        .render();
        let body = Paragraphs { text: &f.content }.render();
        let share = clean_text(&urlencoding::encode(self.share_url));
        let share_title = clean_text(&urlencoding::encode(&f.title));
        format!(
            r#"
            <article class="max-w-4xl mx-auto px-4 py-12">
                {image}
                <header class="mb-8">
                    <h1 class="text-4xl font-bold mb-4">{title}</h1>
                    <div class="text-gray-600">
                        <time datetime="{datetime}">{date}</time>
                        <span class="mx-2">&bull;</span>
                        <span>{author}</span>
                    </div>
                </header>
                <div class="prose prose-lg max-w-none">{body}</div>
                <footer class="mt-12 pt-8 border-t border-gray-200 flex items-center justify-between">
                    <div>
                        <h2 class="text-lg font-semibold">About the Author</h2>
                        <p class="mt-2 text-gray-600">{author}</p>
                    </div>
                    <div class="flex gap-4">
                        <a href="https://twitter.com/share?url={share}&amp;text={share_title}" target="_blank" rel="noopener noreferrer" class="text-gray-500 hover:text-gray-700">Share on Twitter</a>
                        <a href="https://www.linkedin.com/shareArticle?mini=true&amp;url={share}&amp;title={share_title}" target="_blank" rel="noopener noreferrer" class="text-gray-500 hover:text-gray-700">Share on LinkedIn</a>
                    </div>
                </footer>
            </article>
            "#,
            title = clean_text(&f.title),
            datetime = self.post.created_at.to_rfc3339(),
            date = self.post.created_at.format("%B %-d, %Y"),
            author = clean_text(&f.author),
        )
    }
}

pub struct ContentPageView<'a> {
    pub page: Option<&'a ContentPage>,
}
impl Component for ContentPageView<'_> {
    fn render(&self) -> String {
        let (title, body) = match self.page {
            Some(page) => (
                clean_text(&page.title),
                Paragraphs { text: &page.content }.render(),
            ),
            None => (
                format!("About {SITE_NAME}"),
                format!(
                    "<p>{SITE_NAME} helps you discover houses, apartments, and \
                    condos from trusted sellers.</p>"
                ),
            ),
        };
        format!(
            r#"
            <div class="max-w-4xl mx-auto px-4 py-12">
                <h1 class="text-4xl font-bold mb-8">{title}</h1>
                <div class="prose prose-lg max-w-none">{body}</div>
            </div>
            "#
        )
    }
}

pub struct NotFound {}
impl Component for NotFound {
    fn render(&self) -> String {
        r#"
        <div class="max-w-xl mx-auto px-4 py-24 text-center">
            <h1 class="text-4xl font-bold mb-4">Not Found</h1>
            <p class="text-gray-600 mb-8">The page you were looking for does not exist.</p>
            <a href="/" class="text-blue-600 hover:underline">Back to home</a>
        </div>
        "#
        .to_string()
    }
}

pub struct SignInForm<'a> {
    pub email: &'a str,
    pub error: Option<&'a str>,
}
impl Component for SignInForm<'_> {
    fn render(&self) -> String {
        let error = self
            .error
            .map(|e| {
                format!(
                    r#"<p role="alert" class="text-red-600 mb-4">{}</p>"#,
                    clean_text(e)
                )
            })
            .unwrap_or_default();
        format!(
            r#"
            <div class="max-w-md mx-auto px-4 py-24">
                <h1 class="text-3xl font-bold mb-8">Sign in</h1>
                {error}
                <form method="post" action="/auth/signin" class="space-y-4">
                    <label class="block">
                        <span class="block text-gray-700 mb-2">Email</span>
                        <input class="w-full border rounded-md p-2" type="email" name="email" value="{email}" required />
                    </label>
                    <label class="block">
                        <span class="block text-gray-700 mb-2">Password</span>
                        <input class="w-full border rounded-md p-2" type="password" name="password" required />
                    </label>
                    <button class="w-full bg-blue-600 hover:bg-blue-700 text-white py-2 rounded-md">Sign in</button>
                </form>
            </div>
            "#,
            email = clean_text(self.email),
        )
    }
}

pub struct AdminDashboard<'a> {
    pub properties: Option<&'a [Property]>,
    pub posts: Option<&'a [BlogPost]>,
}
impl Component for AdminDashboard<'_> {
    fn render(&self) -> String {
        let properties = match self.properties {
            Some(properties) => properties
                .iter()
                .map(|p| AdminRow {
                    title: &p.fields.title,
                    detail: &format!(
                        "{} &bull; {}",
                        clean_text(&p.fields.location),
                        format_price(p.fields.price)
                    ),
                    view_href: &format!("/properties/{}", p.id),
                    edit_href: &format!("/admin/properties/{}/edit", p.id),
                    delete_href: &format!("/admin/properties/{}/delete", p.id),
                }
                .render())
                .collect::<Vec<String>>()
                .join(""),
            None => LoadError {
                message: "We couldn't load the properties.",
            }
            .render(),
        };
        let posts = match self.posts {
            Some(posts) => posts
                .iter()
                .map(|p| AdminRow {
                    title: &p.fields.title,
                    detail: &format!("/{}", clean_text(&p.fields.slug)),
                    view_href: &format!("/blog/{}", p.fields.slug),
                    edit_href: &format!("/admin/posts/{}/edit", p.id),
                    delete_href: &format!("/admin/posts/{}/delete", p.id),
                }
                .render())
                .collect::<Vec<String>>()
                .join(""),
            None => LoadError {
                message: "We couldn't load the blog posts.",
            }
            .render(),
        };
        format!(
            r#"
            <div class="max-w-7xl mx-auto px-4 py-12">
                <h1 class="text-3xl font-bold mb-8">Admin Dashboard</h1>
                <section class="mb-12">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-xl font-semibold">Properties</h2>
                        <a class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-md" href="/admin/properties/new">Add New Property</a>
                    </div>
                    <ul class="bg-white rounded-lg shadow divide-y">{properties}</ul>
                </section>
                <section>
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-xl font-semibold">Blog Posts</h2>
                        <a class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-md" href="/admin/posts/new">New Post</a>
                    </div>
                    <ul class="bg-white rounded-lg shadow divide-y">{posts}</ul>
                </section>
            </div>
            "#
        )
    }
}

/// `detail` is trusted markup; callers escape what goes into it. The hrefs
/// are built from generated ids and validated slugs.
struct AdminRow<'a> {
    title: &'a str,
    detail: &'a str,
    view_href: &'a str,
    edit_href: &'a str,
    delete_href: &'a str,
}
impl Component for AdminRow<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <li class="p-4 flex items-center justify-between">
                <div>
                    <a class="font-semibold hover:underline" href="{view}">{title}</a>
                    <p class="text-sm text-gray-500">{detail}</p>
                </div>
                <div class="flex gap-4">
                    <a class="text-blue-600 hover:underline" href="{edit}">Edit</a>
                    <a class="text-red-600 hover:underline" href="{delete}">Delete</a>
                </div>
            </li>
            "#,
            view = self.view_href,
            title = clean_text(self.title),
            detail = self.detail,
            edit = self.edit_href,
            delete = self.delete_href,
        )
    }
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|m| {
            format!(
                r#"<p class="text-sm text-red-600 mt-1">{}</p>"#,
                clean_text(m)
            )
        })
        .unwrap_or_default()
}

struct TextInput<'a> {
    label: &'a str,
    name: &'a str,
    value: &'a str,
    input_type: &'a str,
    errors: &'a FieldErrors,
}
impl Component for TextInput<'_> {
    fn render(&self) -> String {
        let step = if self.input_type == "number" {
            r#" step="any" min="0""#
        } else {
            ""
        };
        format!(
            r#"
            <label class="block">
                <span class="block text-gray-700 mb-2">{label}</span>
                <input class="w-full border rounded-md p-2" type="{input_type}" name="{name}" value="{value}"{step} required />
                {error}
            </label>
            "#,
            label = self.label,
            input_type = self.input_type,
            name = self.name,
            value = clean_text(self.value),
            error = field_error(self.errors, self.name),
        )
    }
}

struct TextArea<'a> {
    label: &'a str,
    name: &'a str,
    value: &'a str,
    rows: u8,
    errors: &'a FieldErrors,
}
impl Component for TextArea<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <label class="block md:col-span-2">
                <span class="block text-gray-700 mb-2">{label}</span>
                <textarea class="w-full border rounded-md p-2" name="{name}" rows="{rows}" required>{value}</textarea>
                {error}
            </label>
            "#,
            label = self.label,
            name = self.name,
            rows = self.rows,
            value = clean_text(self.value),
            error = field_error(self.errors, self.name),
        )
    }
}

struct ImageInput<'a> {
    current: Option<&'a str>,
    errors: &'a FieldErrors,
}
impl Component for ImageInput<'_> {
    fn render(&self) -> String {
        let current = match self.current.filter(|u| !u.is_empty()) {
            Some(url) => format!(
                r#"<img src="{}" alt="Current image" class="h-24 rounded mb-2" />"#,
                clean_text(url)
            ),
            None => "".to_string(),
        };
        format!(
            r#"
            <label class="block md:col-span-2">
                <span class="block text-gray-700 mb-2">Image (JPEG, PNG or WebP)</span>
                {current}
                <input class="w-full" type="file" name="image" accept="image/jpeg,image/png,image/webp" />
                {error}
            </label>
            "#,
            error = field_error(self.errors, "image"),
        )
    }
}

pub struct PropertyEditor<'a> {
    pub heading: &'a str,
    pub action: &'a str,
    pub form: &'a PropertyForm,
    pub errors: &'a FieldErrors,
    pub current_image: Option<&'a str>,
}
impl Component for PropertyEditor<'_> {
    fn render(&self) -> String {
        let errors = self.errors;
        let input = |label: &str, name: &str, value: &str, input_type: &str| {
            TextInput {
                label,
                name,
                value,
                input_type,
                errors,
            }
            .render()
        };
        let type_options = PropertyType::ALL
            .iter()
            .map(|t| {
                let selected = if t.as_str() == self.form.r#type {
                    " selected"
                } else {
                    ""
                };
                format!(
                    r#"<option value="{}"{selected}>{}</option>"#,
                    t.as_str(),
                    t.get_display_name()
                )
            })
            .collect::<Vec<String>>()
            .join("");
        let fields = [
            input("Title", "title", &self.form.title, "text"),
            input("Location", "location", &self.form.location, "text"),
            input("Price", "price", &self.form.price, "number"),
            format!(
                r#"
                <label class="block">
                    <span class="block text-gray-700 mb-2">Type</span>
                    <select class="w-full border rounded-md p-2" name="type">{type_options}</select>
                    {}
                </label>
                "#,
                field_error(errors, "type")
            ),
            input("Bedrooms", "bedrooms", &self.form.bedrooms, "number"),
            input("Bathrooms", "bathrooms", &self.form.bathrooms, "number"),
            input("Area (sqft)", "area", &self.form.area, "number"),
            TextArea {
                label: "Description",
                name: "description",
                value: &self.form.description,
                rows: 4,
                errors,
            }
            .render(),
            ImageInput {
                current: self.current_image,
                errors,
            }
            .render(),
        ]
        .join("");
        EditorShell {
            heading: self.heading,
            action: self.action,
            fields: &fields,
        }
        .render()
    }
}

pub struct PostEditor<'a> {
    pub heading: &'a str,
    pub action: &'a str,
    pub form: &'a BlogPostForm,
    pub errors: &'a FieldErrors,
    pub current_image: Option<&'a str>,
}
impl Component for PostEditor<'_> {
    fn render(&self) -> String {
        let errors = self.errors;
        let fields = [
            TextInput {
                label: "Title",
                name: "title",
                value: &self.form.title,
                input_type: "text",
                errors,
            }
            .render(),
            format!(
                r#"
                <label class="block">
                    <span class="block text-gray-700 mb-2">Slug (blank to derive from the title)</span>
                    <input class="w-full border rounded-md p-2" type="text" name="slug" value="{}" pattern="[a-z0-9]+(-[a-z0-9]+)*" />
                    {}
                </label>
                "#,
                clean_text(&self.form.slug),
                field_error(errors, "slug")
            ),
            TextInput {
                label: "Author",
                name: "author",
                value: &self.form.author,
                input_type: "text",
                errors,
            }
            .render(),
            TextArea {
                label: "Content (one paragraph per line)",
                name: "content",
                value: &self.form.content,
                rows: 12,
                errors,
            }
            .render(),
            ImageInput {
                current: self.current_image,
                errors,
            }
            .render(),
        ]
        .join("");
        EditorShell {
            heading: self.heading,
            action: self.action,
            fields: &fields,
        }
        .render()
    }
}

struct EditorShell<'a> {
    heading: &'a str,
    action: &'a str,
    fields: &'a str,
}
impl Component for EditorShell<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <div class="max-w-4xl mx-auto px-4 py-12">
                <a class="text-blue-600 hover:underline" href="/admin">&larr; Dashboard</a>
                <div class="bg-white p-6 rounded-lg shadow-md mt-4">
                    <h1 class="text-2xl font-semibold mb-6">{heading}</h1>
                    <form
                        method="post"
                        action="{action}"
                        enctype="multipart/form-data"
                        hx-disabled-elt="find button"
                        class="grid grid-cols-1 md:grid-cols-2 gap-4"
                    >
                        {fields}
                        <div class="md:col-span-2">
                            <button class="bg-blue-600 hover:bg-blue-700 text-white px-6 py-2 rounded-md">Save</button>
                        </div>
                    </form>
                </div>
            </div>
            "#,
            heading = clean_text(self.heading),
            action = clean_text(self.action),
            fields = self.fields,
        )
    }
}

pub struct ConfirmDelete<'a> {
    /// e.g. "property"
    pub noun: &'a str,
    pub name: &'a str,
    pub action: &'a str,
}
impl Component for ConfirmDelete<'_> {
    fn render(&self) -> String {
        let noun = clean_text(self.noun);
        format!(
            r#"
            <div class="max-w-xl mx-auto px-4 py-24">
                <h1 class="text-2xl font-bold mb-4">Delete {noun}?</h1>
                <p class="mb-8">Are you sure you want to delete <strong>{name}</strong>? This cannot be undone.</p>
                <form method="post" action="{action}" class="flex gap-4">
                    <input type="hidden" name="confirm" value="yes" />
                    <button
                        class="bg-red-600 hover:bg-red-700 text-white px-6 py-2 rounded-md"
                        hx-confirm="Are you sure you want to delete this {noun}?"
                    >Delete</button>
                    <a class="px-6 py-2" href="/admin">Cancel</a>
                </form>
            </div>
            "#,
            name = clean_text(self.name),
            action = clean_text(self.action),
        )
    }
}

pub struct InfiniteScroll {
    pub next_href: String,
}
impl Component for InfiniteScroll {
    fn render(&self) -> String {
        format!(
            r#"<div hx-trigger="revealed" hx-get="{}" hx-swap="outerHTML"></div>"#,
            clean_text(&self.next_href)
        )
    }
}
