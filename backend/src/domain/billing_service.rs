//! Payment, webhook, and pro subscription domain services.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::{Value, json};

use crate::domain::billing::{PRO_ACTIVATION_COST, PRO_GRANT_DAYS};
use crate::domain::ports::{
    PaymentCommand, PaymentIntent, PaymentRepository, PaymentRepositoryError, ProCommand,
    SubscriptionQuery, SubscriptionRepository, SubscriptionRepositoryError, SubscriptionView,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    ClientId, Error, Payment, PaymentId, PaymentPlan, PaymentStatus, Subscription, User,
};

fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
    }
}

fn map_subscription_error(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Billing service implementing payment, pro, and subscription ports.
#[derive(Clone)]
pub struct BillingService<P, S, U> {
    payments: Arc<P>,
    subscriptions: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, S, U> BillingService<P, S, U> {
    /// Create the service over the payment, subscription, and user
    /// repositories.
    pub fn new(
        payments: Arc<P>,
        subscriptions: Arc<S>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            subscriptions,
            users,
            clock,
        }
    }
}

impl<P, S, U> BillingService<P, S, U>
where
    U: UserRepository,
{
    async fn require_user(&self, user_id: &ClientId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal("user record missing after identity resolution"))
    }
}

#[async_trait]
impl<P, S, U> PaymentCommand for BillingService<P, S, U>
where
    P: PaymentRepository,
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn create_payment(
        &self,
        user_id: &ClientId,
        plan: PaymentPlan,
    ) -> Result<PaymentIntent, Error> {
        let payment = Payment::new(user_id.clone(), plan, self.clock.utc());
        let payment_url = payment
            .link_url
            .clone()
            .ok_or_else(|| Error::internal("payment intent created without a checkout link"))?;

        self.payments
            .insert(&payment)
            .await
            .map_err(map_payment_error)?;

        Ok(PaymentIntent {
            payment_url,
            payment_id: payment.id,
        })
    }

    async fn apply_webhook(
        &self,
        payment_id: &PaymentId,
        status: PaymentStatus,
        meta: Option<Value>,
    ) -> Result<(), Error> {
        let applied = self
            .payments
            .update_status(payment_id, status, meta, self.clock.utc())
            .await
            .map_err(map_payment_error)?;

        if applied {
            Ok(())
        } else {
            Err(Error::not_found(format!("payment {payment_id} not found")))
        }
    }
}

#[async_trait]
impl<P, S, U> ProCommand for BillingService<P, S, U>
where
    P: PaymentRepository,
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn activate_from_points(&self, user_id: &ClientId) -> Result<User, Error> {
        let user = self.require_user(user_id).await?;
        if user.points < PRO_ACTIVATION_COST {
            return Err(Error::insufficient_points("not enough points").with_details(json!({
                "required": PRO_ACTIVATION_COST,
                "balance": user.points,
            })));
        }

        let now = self.clock.utc();
        let pro_until = now + Duration::days(PRO_GRANT_DAYS);

        // The deduction and the pro flags move in one single-record write;
        // the subscription insert below is a second, non-transactional write.
        self.users
            .grant_pro(user_id, pro_until, PRO_ACTIVATION_COST, now)
            .await
            .map_err(map_user_error)?;
        self.subscriptions
            .insert(&Subscription::from_points(user_id.clone(), now, pro_until))
            .await
            .map_err(map_subscription_error)?;

        self.require_user(user_id).await
    }
}

#[async_trait]
impl<P, S, U> SubscriptionQuery for BillingService<P, S, U>
where
    P: PaymentRepository,
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn subscription_view(&self, user_id: &ClientId) -> Result<SubscriptionView, Error> {
        let user = self.require_user(user_id).await?;
        let subscription = self
            .subscriptions
            .find_active_for_user(user_id)
            .await
            .map_err(map_subscription_error)?;

        Ok(SubscriptionView {
            is_pro: user.is_pro,
            pro_until: user.pro_until,
            kind: subscription.map(|s| s.kind),
        })
    }
}
