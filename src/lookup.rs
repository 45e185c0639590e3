//! Bin day lookup: postcode + house number -> next collection dates.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Europe::London;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{Instrument, info, info_span, warn};

use crate::cache::{AddressKeyCache, AddressMap};
use crate::council::{BinDayError, FormPageClient, dates};
use crate::utils::normalize_postcode;

/// Collection type label -> next collection date, in the order the site lists them.
///
/// Serializes as a JSON object of ISO-8601 dates, e.g.
/// `{"Household Waste": "2024-04-05"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BinSchedule(IndexMap<String, NaiveDate>);

impl BinSchedule {
    pub fn get(&self, collection_type: &str) -> Option<NaiveDate> {
        self.0.get(collection_type).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl std::fmt::Display for BinSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (collection_type, date)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{collection_type}: {date}")?;
        }
        f.write_str("}")
    }
}

/// Today's date where the council is.
pub fn council_today() -> NaiveDate {
    Utc::now().with_timezone(&London).date_naive()
}

/// Composes the form client and an address cache into a single lookup.
#[derive(Clone)]
pub struct BinDayLookup {
    client: FormPageClient,
    cache: Arc<dyn AddressKeyCache>,
}

impl BinDayLookup {
    pub fn new(client: FormPageClient, cache: Arc<dyn AddressKeyCache>) -> Self {
        Self { client, cache }
    }

    /// Next collection dates for a house, relative to today's date in the UK.
    pub async fn find_dates(
        &self,
        postcode: &str,
        house_number: &str,
    ) -> Result<BinSchedule, BinDayError> {
        self.find_dates_on(postcode, house_number, council_today())
            .await
    }

    /// As [`find_dates`](Self::find_dates), resolving years against `today`.
    ///
    /// Every step is sequential and no step is retried; the first failure
    /// aborts the lookup.
    pub async fn find_dates_on(
        &self,
        postcode: &str,
        house_number: &str,
        today: NaiveDate,
    ) -> Result<BinSchedule, BinDayError> {
        let postcode = normalize_postcode(postcode);
        let house_number = house_number.trim();
        let span = info_span!("find_dates", postcode = %postcode, house_number);

        async move {
            // Tokens are single-flow; a lookup never reuses another's session
            let tokens = self.client.bootstrap().await?;

            let (tokens, address_key) = match self.cache.lookup(&postcode, house_number).await {
                Some(key) => {
                    info!(address_key = %key, "address key found in cache");
                    (tokens, key)
                }
                None => {
                    let (tokens, addresses) =
                        self.client.submit_postcode(tokens, &postcode).await?;
                    // Shared labels (e.g. "FLAT 1") keep the last key, and the
                    // key is resolved from the stored record so a later cache hit agrees
                    let record: AddressMap = addresses
                        .into_iter()
                        .map(|a| (a.house_number_label, a.address_key))
                        .collect();
                    let key = record.get(house_number).cloned();

                    if let Err(e) = self.cache.store(&postcode, &record).await {
                        warn!(error = ?e, "failed to update address cache");
                    }
                    info!(count = record.len(), "postcode not in cache, addresses stored");

                    let key = key.ok_or_else(|| BinDayError::AddressNotFound {
                        postcode: postcode.clone(),
                        house_number: house_number.to_string(),
                    })?;
                    (tokens, key)
                }
            };

            let (_tokens, rows) = self
                .client
                .submit_address(tokens, &postcode, &address_key)
                .await?;

            let mut schedule = IndexMap::with_capacity(rows.len());
            for row in rows {
                let date = dates::normalize(&row.next_collection, today)?;
                // Repeated types overwrite: the last row wins
                schedule.insert(row.collection_type, date);
            }

            let schedule = BinSchedule(schedule);
            info!(collections = schedule.len(), "collection dates resolved");
            Ok(schedule)
        }
        .instrument(span)
        .await
    }
}
