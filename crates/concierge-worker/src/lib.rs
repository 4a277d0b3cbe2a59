// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fulfillment worker: drains the request queue and emails suggestions.
//!
//! [`FulfillmentWorker`] polls the durable queue on a fixed interval,
//! taking a bounded batch per tick. Each leased request is searched,
//! composed into a plain-text suggestion email, and delivered; only a
//! confirmed delivery acks the entry. Delivery failures release the
//! entry for a later tick until its attempt budget dead-letters it, so
//! a flaky relay costs retries, never lost requests.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use concierge_config::model::WorkerConfig;
use concierge_core::types::{QueueEntry, Restaurant, SearchRequest};
use concierge_core::{ConciergeError, Mailer, RequestQueue, RestaurantSearch};

/// The interval-driven queue consumer.
///
/// External handles are injected trait objects so the worker can run
/// over mock adapters in tests.
pub struct FulfillmentWorker {
    queue: Arc<dyn RequestQueue>,
    search: Arc<dyn RestaurantSearch>,
    mailer: Arc<dyn Mailer>,
    config: WorkerConfig,
}

impl FulfillmentWorker {
    pub fn new(
        queue: Arc<dyn RequestQueue>,
        search: Arc<dyn RestaurantSearch>,
        mailer: Arc<dyn Mailer>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            search,
            mailer,
            config,
        }
    }

    /// Runs the poll loop until the cancellation token is triggered.
    ///
    /// The first tick fires immediately, so a backlog left behind by a
    /// restart is drained at startup rather than one interval later. A
    /// batch already in flight finishes before cancellation is observed.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.poll_interval_secs));

        info!(
            interval_secs = self.config.poll_interval_secs,
            batch_size = self.config.batch_size,
            "fulfillment worker running"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let handled = self.drain_batch().await;
                    if handled > 0 {
                        debug!(handled, "fulfillment batch complete");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping fulfillment worker");
                    break;
                }
            }
        }
    }

    /// Drains up to `batch_size` entries and returns how many were taken.
    ///
    /// Each entry is handled in isolation: one bad request is logged and
    /// failed individually while the rest of the batch still processes.
    pub async fn drain_batch(&self) -> usize {
        let mut handled = 0;
        let mut retry: Vec<i64> = Vec::new();

        for _ in 0..self.config.batch_size {
            let entry = match self.queue.dequeue().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "queue dequeue failed");
                    break;
                }
            };
            handled += 1;

            let request: SearchRequest = match serde_json::from_str(&entry.payload) {
                Ok(request) => request,
                Err(e) => {
                    error!(id = entry.id, error = %e, "unparseable queue payload");
                    self.dead_letter(&entry).await;
                    continue;
                }
            };

            match self.fulfill(&request).await {
                Ok(()) => match self.queue.ack(entry.id).await {
                    Ok(()) => {
                        info!(
                            id = entry.id,
                            email = request.email.as_str(),
                            cuisine = request.cuisine.as_str(),
                            "suggestions delivered"
                        );
                    }
                    Err(e) => {
                        error!(id = entry.id, error = %e, "ack failed after delivery");
                    }
                },
                Err(e) => {
                    warn!(
                        id = entry.id,
                        attempt = entry.attempts + 1,
                        error = %e,
                        "fulfillment failed, releasing for retry"
                    );
                    retry.push(entry.id);
                }
            }
        }

        // Failures are released only after the whole batch, so a bad
        // entry at the head of the queue cannot shadow the rest of the
        // tick by going straight back to pending.
        for id in retry {
            if let Err(e) = self.queue.fail(id).await {
                error!(id, error = %e, "failed to release queue entry");
            }
        }

        handled
    }

    /// Searches, composes, and delivers one request.
    ///
    /// An empty retrieval still delivers: the user gets an apology email
    /// and the entry is acked, so a thin index never poisons the queue.
    async fn fulfill(&self, request: &SearchRequest) -> Result<(), ConciergeError> {
        let restaurants = self.find_suggestions(request).await?;

        let subject = format!(
            "Your {} restaurant suggestions",
            title_case(&request.cuisine)
        );
        let body = if restaurants.is_empty() {
            compose_no_results(request)
        } else {
            compose_suggestions(request, &restaurants)
        };

        self.mailer.send(&request.email, &subject, &body).await
    }

    /// Cuisine-and-area retrieval, widening to cuisine-only when the
    /// requested area has no match.
    async fn find_suggestions(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Restaurant>, ConciergeError> {
        let hits = self
            .search
            .search(
                &request.cuisine,
                Some(&request.location),
                self.config.suggestion_limit,
            )
            .await?;
        if !hits.is_empty() {
            return Ok(hits);
        }

        debug!(
            cuisine = request.cuisine.as_str(),
            location = request.location.as_str(),
            "no matches in the requested area, widening to cuisine only"
        );
        self.search
            .search(&request.cuisine, None, self.config.suggestion_limit)
            .await
    }

    /// Spends an entry's remaining attempt budget so it lands in the
    /// failed state now. Used for payloads that can never succeed.
    async fn dead_letter(&self, entry: &QueueEntry) {
        for _ in entry.attempts..entry.max_attempts {
            if let Err(e) = self.queue.fail(entry.id).await {
                error!(id = entry.id, error = %e, "dead-letter update failed");
                break;
            }
        }
    }
}

/// Plain-text suggestion list with the request criteria in the preamble.
fn compose_suggestions(request: &SearchRequest, restaurants: &[Restaurant]) -> String {
    let mut body = format!(
        "Hello!\n\nHere are my top {} {} restaurant suggestions in {} for {} people {} at {}:\n\n",
        restaurants.len(),
        title_case(&request.cuisine),
        request.location,
        request.party_size,
        date_phrase(&request.dining_date),
        request.dining_time,
    );

    for (i, restaurant) in restaurants.iter().enumerate() {
        body.push_str(&format!(
            "{}. {} ({}/5, {} reviews)\n   {}, {}\n\n",
            i + 1,
            restaurant.name,
            restaurant.rating,
            restaurant.review_count,
            restaurant.address,
            restaurant.area,
        ));
    }

    body.push_str("Enjoy your meal!\n");
    body
}

/// Apology body for a retrieval that found nothing anywhere.
fn compose_no_results(request: &SearchRequest) -> String {
    format!(
        "Hello!\n\nUnfortunately I couldn't find any {} restaurants in {} right now. \
         Please try a different cuisine or area next time.\n",
        title_case(&request.cuisine),
        request.location,
    )
}

/// "today" and "tomorrow" read naturally bare; anything else gets "on".
fn date_phrase(dining_date: &str) -> String {
    match dining_date.to_lowercase().as_str() {
        "" | "today" => "today".to_string(),
        "tomorrow" => "tomorrow".to_string(),
        _ => format!("on {dining_date}"),
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
