use super::models::{ListingPage, ListingQuery};
use crate::{
    components::{Component, Image, InfiniteScroll, LoadError},
    models::{Property, PropertyType},
    seo::format_price,
};
use ammonia::clean_text;

pub struct PropertyCard<'a> {
    pub property: &'a Property,
}
impl Component for PropertyCard<'_> {
    fn render(&self) -> String {
        let f = &self.property.fields;
        let image = Image {
            url: &f.image_url,
            alt: &f.title,
            class: "w-full h-48 object-cover",
        }
        .render();
        format!(
            r#"
            <a href="/properties/{id}" class="block bg-white rounded-lg shadow-md overflow-hidden hover:shadow-lg transition-shadow">
                {image}
                <div class="p-4">
                    <h3 class="text-xl font-semibold mb-2">{title}</h3>
                    <p class="text-gray-600 mb-2">{location}</p>
                    <p class="text-2xl font-bold text-blue-600 mb-2">{price}</p>
                    <div class="flex justify-between text-gray-500 text-sm">
                        <span>{bedrooms} beds</span>
                        <span>{bathrooms} baths</span>
                        <span>{area} sqft</span>
                    </div>
                </div>
            </a>
            "#,
            id = clean_text(&self.property.id),
            title = clean_text(&f.title),
            location = clean_text(&f.location),
            price = format_price(f.price),
            bedrooms = f.bedrooms,
            bathrooms = f.bathrooms,
            area = f.area,
        )
    }
}

/// The filter form. It re-renders `#listing-results` via htmx on every
/// change, and still works as a plain GET form without javascript.
pub struct FilterBar<'a> {
    pub query: &'a ListingQuery,
}
impl Component for FilterBar<'_> {
    fn render(&self) -> String {
        let q = self.query;
        let type_options = PropertyType::ALL
            .iter()
            .map(|t| {
                let selected = if q.r#type == Some(*t) { " selected" } else { "" };
                format!(
                    r#"<option value="{}"{selected}>{}</option>"#,
                    t.as_str(),
                    t.get_display_name()
                )
            })
            .collect::<Vec<String>>()
            .join("");
        let number = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        let bedroom_options = (1..=5)
            .map(|n| {
                let selected = if q.bedrooms == Some(n) { " selected" } else { "" };
                format!(r#"<option value="{n}"{selected}>{n}</option>"#)
            })
            .collect::<Vec<String>>()
            .join("");
        format!(
            r##"
            <form
                method="get"
                action="/properties"
                hx-get="/properties"
                hx-target="#listing-results"
                hx-trigger="change, submit"
                hx-push-url="true"
                class="bg-white p-6 rounded-lg shadow-md mb-8 grid grid-cols-1 md:grid-cols-4 gap-4"
            >
                <label class="block">
                    <span class="block text-gray-700 mb-2">Property Type</span>
                    <select class="w-full border rounded-md p-2" name="type">
                        <option value="">All Types</option>
                        {type_options}
                    </select>
                </label>
                <label class="block">
                    <span class="block text-gray-700 mb-2">Min Price</span>
                    <input class="w-full border rounded-md p-2" type="number" min="0" name="minPrice" value="{min}" placeholder="Min Price" />
                </label>
                <label class="block">
                    <span class="block text-gray-700 mb-2">Max Price</span>
                    <input class="w-full border rounded-md p-2" type="number" min="0" name="maxPrice" value="{max}" placeholder="Max Price" />
                </label>
                <label class="block">
                    <span class="block text-gray-700 mb-2">Bedrooms</span>
                    <select class="w-full border rounded-md p-2" name="bedrooms">
                        <option value="">Any</option>
                        {bedroom_options}
                    </select>
                </label>
                <noscript><button class="bg-blue-600 text-white px-4 py-2 rounded-md">Filter</button></noscript>
            </form>
            "##,
            min = number(q.min_price),
            max = number(q.max_price),
        )
    }
}

/// Cards for one page of results, followed by a sentinel that loads the
/// next page when scrolled into view.
pub struct PropertyCards<'a> {
    pub page: &'a ListingPage,
    pub query: &'a ListingQuery,
}
impl Component for PropertyCards<'_> {
    fn render(&self) -> String {
        let cards = self
            .page
            .properties
            .iter()
            .map(|p| PropertyCard { property: p }.render())
            .collect::<Vec<String>>()
            .join("");
        let more = match self.page.next_page {
            Some(next) => InfiniteScroll {
                next_href: format!(
                    "/properties?{}",
                    self.query.to_query_string(next)
                ),
            }
            .render(),
            None => "".to_string(),
        };
        format!("{cards}{more}")
    }
}

/// `None` means the listing could not be fetched, which is reported
/// differently from a query that matched nothing.
pub struct PropertyResults<'a> {
    pub page: Option<&'a ListingPage>,
    pub query: &'a ListingQuery,
}
impl Component for PropertyResults<'_> {
    fn render(&self) -> String {
        let inner = match self.page {
            None => LoadError {
                message: "We couldn't load properties right now.",
            }
            .render(),
            Some(page) if page.properties.is_empty() => {
                let hint = if self.query.has_predicates() {
                    "Try widening your filters."
                } else {
                    "Check back soon for new listings."
                };
                format!(
                    r#"
                    <div class="text-center py-12">
                        <p class="text-xl text-gray-600">No properties found matching your criteria.</p>
                        <p class="text-gray-500 mt-2">{hint}</p>
                    </div>
                    "#
                )
            }
            Some(page) => format!(
                r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-8">{}</div>"#,
                PropertyCards {
                    page,
                    query: self.query,
                }
                .render()
            ),
        };
        format!(r#"<div id="listing-results">{inner}</div>"#)
    }
}

pub struct ListingView<'a> {
    pub page: Option<&'a ListingPage>,
    pub query: &'a ListingQuery,
}
impl Component for ListingView<'_> {
    fn render(&self) -> String {
        let filters = FilterBar { query: self.query }.render();
        let results = PropertyResults {
            page: self.page,
            query: self.query,
        }
        .render();
        format!(
            r#"
            <div class="max-w-7xl mx-auto px-4 py-12">
                <h1 class="text-3xl font-bold mb-8">Properties</h1>
                {filters}
                {results}
            </div>
            "#
        )
    }
}
