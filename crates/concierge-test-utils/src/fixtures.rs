// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned restaurant records for seeding test databases.

use concierge_core::types::Restaurant;

fn restaurant(id: &str, name: &str, cuisine: &str, area: &str, rating: f64) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        address: format!("{} Example Ave", id.len() * 11),
        area: area.to_string(),
        rating,
        review_count: (rating * 100.0) as i64,
        zip_code: Some("10001".to_string()),
    }
}

/// A small index spanning several cuisines and areas, with distinct
/// ratings so ordering assertions are unambiguous.
pub fn sample_restaurants() -> Vec<Restaurant> {
    vec![
        restaurant("thai-qns-1", "Som Tum House", "Thai", "Queens", 4.8),
        restaurant("thai-qns-2", "Bangkok Corner", "Thai", "Queens", 4.5),
        restaurant("thai-bk-1", "Lemongrass Table", "Thai", "Brooklyn", 4.2),
        restaurant("ital-man-1", "Trattoria Vico", "Italian", "Manhattan", 4.7),
        restaurant("ital-man-2", "Osteria Nonna", "Italian", "Manhattan", 4.3),
        restaurant("ital-bk-1", "Via Carota Sud", "Italian", "Brooklyn", 4.9),
        restaurant("jpn-man-1", "Kissa Hanare", "Japanese", "Manhattan", 4.6),
        restaurant("mex-bx-1", "Taqueria del Valle", "Mexican", "Bronx", 4.4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_ids_are_unique() {
        let restaurants = sample_restaurants();
        let mut ids: Vec<&str> = restaurants.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), restaurants.len());
    }
}
