// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restaurant index queries.

use concierge_core::ConciergeError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Restaurant;

fn row_to_restaurant(row: &rusqlite::Row<'_>) -> Result<Restaurant, rusqlite::Error> {
    Ok(Restaurant {
        id: row.get(0)?,
        name: row.get(1)?,
        cuisine: row.get(2)?,
        address: row.get(3)?,
        area: row.get(4)?,
        rating: row.get(5)?,
        review_count: row.get(6)?,
        zip_code: row.get(7)?,
    })
}

/// Insert a restaurant into the index, replacing any record with the same id.
pub async fn insert_restaurant(
    db: &Database,
    restaurant: &Restaurant,
) -> Result<(), ConciergeError> {
    let restaurant = restaurant.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO restaurants
                 (id, name, cuisine, address, area, rating, review_count, zip_code)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    restaurant.id,
                    restaurant.name,
                    restaurant.cuisine,
                    restaurant.address,
                    restaurant.area,
                    restaurant.rating,
                    restaurant.review_count,
                    restaurant.zip_code,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Search the index by cuisine, optionally narrowed to an area.
///
/// Matching is case-insensitive. Results come back ordered by rating,
/// best first, capped at `limit`.
pub async fn search_restaurants(
    db: &Database,
    cuisine: &str,
    area: Option<&str>,
    limit: usize,
) -> Result<Vec<Restaurant>, ConciergeError> {
    let cuisine = cuisine.to_string();
    let area = area.map(|a| a.to_string());
    let limit = limit as i64;
    db.connection()
        .call(move |conn| {
            let mut restaurants = Vec::new();
            match &area {
                Some(area_filter) => {
                    let mut stmt = conn.prepare(
                        "SELECT id, name, cuisine, address, area, rating, review_count, zip_code
                         FROM restaurants
                         WHERE cuisine = ?1 COLLATE NOCASE AND area = ?2 COLLATE NOCASE
                         ORDER BY rating DESC
                         LIMIT ?3",
                    )?;
                    let rows = stmt
                        .query_map(params![cuisine, area_filter, limit], |row| {
                            row_to_restaurant(row)
                        })?;
                    for row in rows {
                        restaurants.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT id, name, cuisine, address, area, rating, review_count, zip_code
                         FROM restaurants
                         WHERE cuisine = ?1 COLLATE NOCASE
                         ORDER BY rating DESC
                         LIMIT ?2",
                    )?;
                    let rows =
                        stmt.query_map(params![cuisine, limit], |row| row_to_restaurant(row))?;
                    for row in rows {
                        restaurants.push(row?);
                    }
                }
            }
            Ok(restaurants)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_restaurant(id: &str, cuisine: &str, area: &str, rating: f64) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: format!("Restaurant {id}"),
            cuisine: cuisine.to_string(),
            address: "123 Main St".to_string(),
            area: area.to_string(),
            rating,
            review_count: 100,
            zip_code: Some("11201".to_string()),
        }
    }

    #[tokio::test]
    async fn search_filters_by_cuisine_and_area() {
        let (db, _dir) = setup_db().await;

        insert_restaurant(&db, &make_restaurant("a", "Thai", "Brooklyn", 4.5))
            .await
            .unwrap();
        insert_restaurant(&db, &make_restaurant("b", "Thai", "Manhattan", 4.8))
            .await
            .unwrap();
        insert_restaurant(&db, &make_restaurant("c", "Italian", "Brooklyn", 4.9))
            .await
            .unwrap();

        let results = search_restaurants(&db, "thai", Some("brooklyn"), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_without_area_spans_all_areas() {
        let (db, _dir) = setup_db().await;

        insert_restaurant(&db, &make_restaurant("a", "Thai", "Brooklyn", 4.5))
            .await
            .unwrap();
        insert_restaurant(&db, &make_restaurant("b", "Thai", "Manhattan", 4.8))
            .await
            .unwrap();

        let results = search_restaurants(&db, "thai", None, 5).await.unwrap();
        assert_eq!(results.len(), 2);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn results_are_ordered_by_rating_descending() {
        let (db, _dir) = setup_db().await;

        insert_restaurant(&db, &make_restaurant("low", "Thai", "Brooklyn", 3.1))
            .await
            .unwrap();
        insert_restaurant(&db, &make_restaurant("high", "Thai", "Brooklyn", 4.9))
            .await
            .unwrap();
        insert_restaurant(&db, &make_restaurant("mid", "Thai", "Brooklyn", 4.0))
            .await
            .unwrap();

        let results = search_restaurants(&db, "thai", Some("brooklyn"), 5)
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn limit_caps_result_count() {
        let (db, _dir) = setup_db().await;

        for i in 0..8 {
            insert_restaurant(
                &db,
                &make_restaurant(&format!("r{i}"), "Thai", "Brooklyn", 4.0 + i as f64 / 10.0),
            )
            .await
            .unwrap();
        }

        let results = search_restaurants(&db, "thai", Some("brooklyn"), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 5);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_cuisine_returns_empty() {
        let (db, _dir) = setup_db().await;
        let results = search_restaurants(&db, "martian", None, 5).await.unwrap();
        assert!(results.is_empty());
        db.close().await.unwrap();
    }
}
