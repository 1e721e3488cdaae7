//! Subscription service - validated CRUD over the record store

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    BillingCycle, Color, Subscription, SubscriptionDraft, SubscriptionFilter, SubscriptionPatch,
};
use crate::ports::Repository;

/// Shortest ID prefix accepted in place of a full ID
const MIN_ID_PREFIX: usize = 4;

/// Subscription service for creating, listing, editing and deleting records
pub struct SubscriptionService {
    repository: Arc<dyn Repository>,
    default_category: String,
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn Repository>, default_category: impl Into<String>) -> Self {
        Self {
            repository,
            default_category: default_category.into(),
        }
    }

    /// Validate and store a new subscription
    pub fn create(&self, draft: SubscriptionDraft) -> Result<Subscription> {
        let subscription = Subscription::from_draft(draft, &self.default_category, today())?;
        self.repository.insert_subscription(&subscription)?;
        Ok(subscription)
    }

    /// All subscriptions matching `filter`, sorted by name
    pub fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>> {
        let subscriptions = self.repository.get_subscriptions()?;
        Ok(subscriptions.into_iter().filter(|s| filter.matches(s)).collect())
    }

    pub fn list_all(&self) -> Result<Vec<Subscription>> {
        self.repository.get_subscriptions()
    }

    pub fn get(&self, id: Uuid) -> Result<Subscription> {
        self.repository
            .get_subscription(id)?
            .ok_or_else(|| Error::not_found(format!("subscription {}", id)))
    }

    /// Look up by full ID or by a unique ID prefix (as shown by `list`)
    pub fn resolve(&self, id_or_prefix: &str) -> Result<Subscription> {
        let needle = id_or_prefix.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return self.get(id);
        }
        if needle.len() < MIN_ID_PREFIX {
            return Err(Error::validation(format!(
                "Subscription ID must be at least {} characters",
                MIN_ID_PREFIX
            )));
        }

        let mut matches: Vec<Subscription> = self
            .repository
            .get_subscriptions()?
            .into_iter()
            .filter(|s| s.id.to_string().starts_with(&needle))
            .collect();

        match matches.len() {
            0 => Err(Error::not_found(format!("subscription {}", id_or_prefix.trim()))),
            1 => Ok(matches.remove(0)),
            n => Err(Error::validation(format!(
                "ID prefix '{}' matches {} subscriptions; use more characters",
                id_or_prefix.trim(),
                n
            ))),
        }
    }

    /// Apply a partial update. Fields absent from the patch stay as they are.
    pub fn update(&self, id: Uuid, patch: SubscriptionPatch) -> Result<Subscription> {
        let current = self.get(id)?;
        let updated = current.patched(patch, &self.default_category)?;
        if !self.repository.update_subscription(&updated)? {
            return Err(Error::not_found(format!("subscription {}", id)));
        }
        Ok(updated)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        if self.repository.delete_subscription(id)? {
            Ok(())
        } else {
            Err(Error::not_found(format!("subscription {}", id)))
        }
    }

    /// Fill an empty store with the sample records. Returns how many were added.
    pub fn seed_samples(&self) -> Result<usize> {
        if self.repository.count_subscriptions()? > 0 {
            return Ok(0);
        }

        let samples = [
            SubscriptionDraft::new("Netflix", 13900, BillingCycle::Monthly)
                .with_link("https://www.netflix.com")
                .with_category("Entertainment")
                .with_color(Color::RED),
            SubscriptionDraft::new("Spotify", 10900, BillingCycle::Monthly)
                .with_link("https://www.spotify.com")
                .with_category("Music")
                .with_color(Color::GREEN),
        ];

        let count = samples.len();
        for draft in samples {
            self.create(draft)?;
        }
        Ok(count)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DuckDbRepository;
    use crate::domain::DEFAULT_CATEGORY;

    fn service() -> SubscriptionService {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        repo.ensure_schema().unwrap();
        SubscriptionService::new(Arc::new(repo), DEFAULT_CATEGORY)
    }

    #[test]
    fn test_create_then_list_contains_record() {
        let service = service();
        let created = service
            .create(SubscriptionDraft::new("Netflix", 13900, BillingCycle::Monthly))
            .unwrap();

        let all = service.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_create_invalid_is_not_persisted() {
        let service = service();
        let err = service
            .create(SubscriptionDraft::new("", 13900, BillingCycle::Monthly))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let service = service();
        let id = Uuid::new_v4();
        assert!(service.get(id).unwrap_err().is_not_found());
        assert!(service.delete(id).unwrap_err().is_not_found());
        assert!(service
            .update(id, SubscriptionPatch::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_resolve_by_prefix() {
        let service = service();
        let created = service
            .create(SubscriptionDraft::new("Spotify", 10900, BillingCycle::Monthly))
            .unwrap();
        let prefix = &created.id.to_string()[..8];

        assert_eq!(service.resolve(prefix).unwrap().id, created.id);
        assert!(service.resolve("abc").unwrap_err().is_validation());
        assert!(service.resolve("zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_seed_samples_only_on_empty_store() {
        let service = service();
        assert_eq!(service.seed_samples().unwrap(), 2);
        assert_eq!(service.seed_samples().unwrap(), 0);

        let names: Vec<_> = service.list_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Netflix", "Spotify"]);
    }
}
