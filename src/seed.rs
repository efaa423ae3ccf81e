//! Sample listings for a fresh database (`real-market --seed`).

use super::{
    db_ops::PropertyStore,
    models::{PropertyFields, PropertyType},
};
use anyhow::Result;

pub fn sample_properties() -> Vec<PropertyFields> {
    use PropertyType::*;
    #[rustfmt::skip]
    let rows = [
        ("Modern Luxury Villa", "Beverly Hills, CA", 5_200_000.0, House, 5, 6, 6200.0,
         "https://images.unsplash.com/photo-1613977257363-707ba9348227?w=800&auto=format&fit=crop",
         "Stunning modern villa with panoramic views, infinity pool, and smart home features."),
        ("Cozy Downtown Loft", "Manhattan, NY", 1_200_000.0, Apartment, 1, 1, 950.0,
         "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800&auto=format&fit=crop",
         "Industrial-style loft with high ceilings, exposed brick, and modern amenities."),
        ("Beachfront Paradise", "Miami Beach, FL", 3_500_000.0, House, 4, 4, 3800.0,
         "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?w=800&auto=format&fit=crop",
         "Direct oceanfront property with private beach access and stunning views."),
        ("Mountain Retreat", "Aspen, CO", 4_800_000.0, House, 5, 5, 4500.0,
         "https://images.unsplash.com/photo-1518780664697-55e3ad937233?w=800&auto=format&fit=crop",
         "Luxury ski-in/ski-out chalet with breathtaking mountain views."),
        ("Urban Penthouse", "Chicago, IL", 2_900_000.0, Apartment, 3, 3, 2800.0,
         "https://images.unsplash.com/photo-1567496898669-ee935f5f647a?w=800&auto=format&fit=crop",
         "Spectacular penthouse with wraparound terrace and city views."),
        ("Historic Brownstone", "Boston, MA", 3_200_000.0, House, 4, 3, 3400.0,
         "https://images.unsplash.com/photo-1571055107559-3e67626fa8be?w=800&auto=format&fit=crop",
         "Beautifully restored 19th-century brownstone with modern updates."),
    ];

    rows.into_iter()
        .map(
            |(
                title,
                location,
                price,
                r#type,
                bedrooms,
                bathrooms,
                area,
                image_url,
                description,
            )| PropertyFields {
                title: title.to_string(),
                location: location.to_string(),
                price,
                r#type,
                bedrooms,
                bathrooms,
                area,
                description: description.to_string(),
                image_url: image_url.to_string(),
            },
        )
        .collect()
}

pub async fn seed_properties(store: &dyn PropertyStore) -> Result<usize> {
    let mut count = 0;
    for fields in sample_properties() {
        let title = fields.title.clone();
        store.create(fields).await?;
        tracing::info!(%title, "created property");
        count += 1;
    }
    Ok(count)
}
