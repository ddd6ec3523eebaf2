//! In-memory implementations of every driven port.
//!
//! Used by the server when no database is configured and by endpoint tests.
//! One mutex serialises all access, which gives each operation the same
//! single-entity atomicity the PostgreSQL adapters provide per row.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{
    ActivityRepository, ActivityRepositoryError, CommentRepository, CommentRepositoryError,
    ConfirmOutcome, MarkerRepository, MarkerRepositoryError, PaymentRepository,
    PaymentRepositoryError, RatingRepository, RatingRepositoryError, RatingUpsert,
    SubscriptionRepository, SubscriptionRepositoryError, UserInsertOutcome, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Activity, ClientId, Comment, Marker, MarkerId, MarkerStatus, Payment, PaymentId,
    PaymentStatus, Rating, Subscription, SubscriptionStatus, User,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, User>,
    markers: HashMap<Uuid, Marker>,
    comments: Vec<Comment>,
    ratings: Vec<Rating>,
    activities: Vec<Activity>,
    subscriptions: Vec<Subscription>,
    payments: HashMap<Uuid, Payment>,
}

/// Shared in-memory store implementing all driven ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, String> {
        self.state
            .lock()
            .map_err(|_| "memory store mutex poisoned".to_owned())
    }

    /// Snapshot of the audit trail, newest last. Test support.
    pub fn recorded_activities(&self) -> Vec<Activity> {
        self.lock().map(|state| state.activities.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &ClientId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(id.as_str()).cloned())
    }

    async fn insert_if_absent(
        &self,
        user: &User,
    ) -> Result<UserInsertOutcome, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if state.users.contains_key(user.id.as_str()) {
            return Ok(UserInsertOutcome::AlreadyExists);
        }
        state.users.insert(user.id.as_str().to_owned(), user.clone());
        Ok(UserInsertOutcome::Inserted)
    }

    async fn increment_points(
        &self,
        id: &ClientId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if let Some(user) = state.users.get_mut(id.as_str()) {
            user.points += delta;
            user.updated_at = now;
        }
        Ok(())
    }

    async fn record_daily_claim(
        &self,
        id: &ClientId,
        claimed_at: DateTime<Utc>,
        points: i64,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if let Some(user) = state.users.get_mut(id.as_str()) {
            user.daily_claimed_at = Some(claimed_at);
            user.points += points;
            user.updated_at = claimed_at;
        }
        Ok(())
    }

    async fn grant_pro(
        &self,
        id: &ClientId,
        pro_until: DateTime<Utc>,
        points_cost: i64,
        now: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if let Some(user) = state.users.get_mut(id.as_str()) {
            user.points -= points_cost;
            user.is_pro = true;
            user.pro_until = Some(pro_until);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn top_by_points(&self, limit: i64) -> Result<Vec<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        users.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(users)
    }
}

#[async_trait]
impl MarkerRepository for MemoryStore {
    async fn insert(&self, marker: &Marker) -> Result<(), MarkerRepositoryError> {
        let mut state = self.lock().map_err(MarkerRepositoryError::query)?;
        state.markers.insert(*marker.id.as_uuid(), marker.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MarkerId) -> Result<Option<Marker>, MarkerRepositoryError> {
        let state = self.lock().map_err(MarkerRepositoryError::query)?;
        Ok(state.markers.get(id.as_uuid()).cloned())
    }

    async fn list_active(
        &self,
        kinds: Option<Vec<String>>,
        limit: i64,
    ) -> Result<Vec<Marker>, MarkerRepositoryError> {
        let state = self.lock().map_err(MarkerRepositoryError::query)?;
        let mut markers: Vec<Marker> = state
            .markers
            .values()
            .filter(|marker| marker.status == MarkerStatus::Active)
            .filter(|marker| {
                kinds
                    .as_ref()
                    .is_none_or(|kinds| kinds.iter().any(|kind| *kind == marker.kind))
            })
            .cloned()
            .collect();
        markers.sort_by_key(|marker| marker.created_at);
        markers.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(markers)
    }

    async fn add_confirmation(
        &self,
        id: &MarkerId,
        user_id: &ClientId,
    ) -> Result<Option<ConfirmOutcome>, MarkerRepositoryError> {
        let mut state = self.lock().map_err(MarkerRepositoryError::query)?;
        let Some(marker) = state.markers.get_mut(id.as_uuid()) else {
            return Ok(None);
        };

        if marker.confirmations_by.iter().any(|by| by == user_id.as_str()) {
            return Ok(Some(ConfirmOutcome::Duplicate(marker.clone())));
        }

        marker.confirmations_by.push(user_id.as_str().to_owned());
        marker.confirmations += 1;
        Ok(Some(ConfirmOutcome::Recorded(marker.clone())))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut state = self.lock().map_err(CommentRepositoryError::query)?;
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn list_for_marker(
        &self,
        marker_id: &MarkerId,
        limit: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.lock().map_err(CommentRepositoryError::query)?;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.marker_id == *marker_id)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RatingRepository for MemoryStore {
    async fn upsert(&self, candidate: &Rating) -> Result<RatingUpsert, RatingRepositoryError> {
        let mut state = self.lock().map_err(RatingRepositoryError::query)?;
        if let Some(existing) = state
            .ratings
            .iter_mut()
            .find(|r| r.marker_id == candidate.marker_id && r.user_id == candidate.user_id)
        {
            existing.value = candidate.value;
            return Ok(RatingUpsert {
                rating: existing.clone(),
                created: false,
            });
        }

        state.ratings.push(candidate.clone());
        Ok(RatingUpsert {
            rating: candidate.clone(),
            created: true,
        })
    }

    async fn list_for_marker(
        &self,
        marker_id: &MarkerId,
        limit: i64,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        let state = self.lock().map_err(RatingRepositoryError::query)?;
        Ok(state
            .ratings
            .iter()
            .filter(|rating| rating.marker_id == *marker_id)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn append(&self, activity: &Activity) -> Result<(), ActivityRepositoryError> {
        let mut state = self.lock().map_err(ActivityRepositoryError::query)?;
        state.activities.push(activity.clone());
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut state = self.lock().map_err(PaymentRepositoryError::query)?;
        state.payments.insert(*payment.id.as_uuid(), payment.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &PaymentId,
        status: PaymentStatus,
        meta: Option<Value>,
        now: DateTime<Utc>,
    ) -> Result<bool, PaymentRepositoryError> {
        let mut state = self.lock().map_err(PaymentRepositoryError::query)?;
        let Some(payment) = state.payments.get_mut(id.as_uuid()) else {
            return Ok(false);
        };
        payment.status = status;
        payment.meta = meta;
        payment.updated_at = now;
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn insert(
        &self,
        subscription: &Subscription,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut state = self.lock().map_err(SubscriptionRepositoryError::query)?;
        state.subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn find_active_for_user(
        &self,
        user_id: &ClientId,
    ) -> Result<Option<Subscription>, SubscriptionRepositoryError> {
        let state = self.lock().map_err(SubscriptionRepositoryError::query)?;
        Ok(state
            .subscriptions
            .iter()
            .filter(|sub| sub.user_id == *user_id && sub.status == SubscriptionStatus::Active)
            .max_by_key(|sub| sub.created_at)
            .cloned())
    }
}
