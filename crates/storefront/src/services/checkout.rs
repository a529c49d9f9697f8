//! Mock order placement.
//!
//! The checkout phase is persisted under its own key so a second submission
//! arriving while an order is being placed is ignored. Opening the checkout
//! page starts a fresh attempt.
//!
//! Once an order enters `Processing` it always reaches `Confirmed`: the
//! latency, cart clearing, and confirmation run on their own task, which
//! keeps going if the request that started it is dropped.

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::store::{read_json, write_json};
use bazaar_core::{
    Cart, CartRepository, Checkout, CheckoutForm, CheckoutPhase, KeyValueStore, StoreError,
    SubmitOutcome,
};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::store::keys;

/// What a submission did.
#[derive(Debug, Clone)]
pub struct CheckoutResult {
    /// Cart as it was when the form was submitted.
    pub cart: Cart,
    /// Attempt state after the submission.
    pub checkout: Checkout,
    pub outcome: SubmitOutcome,
}

/// Runs checkout attempts against a store.
#[derive(Debug, Clone)]
pub struct CheckoutService<S> {
    store: S,
    latency: Duration,
    /// Held from reading the phase until the new phase is saved.
    admission: Arc<Mutex<()>>,
}

impl<S: KeyValueStore + Clone + 'static> CheckoutService<S> {
    /// `latency` is the simulated processing time of an accepted order.
    pub fn new(store: S, latency: Duration) -> Self {
        Self {
            store,
            latency,
            admission: Arc::default(),
        }
    }

    /// Share `admission` between services that may submit concurrently, so
    /// an attempt leaves `Idle` at most once.
    #[must_use]
    pub fn with_admission(mut self, admission: Arc<Mutex<()>>) -> Self {
        self.admission = admission;
        self
    }

    /// Start a fresh attempt, discarding any persisted phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn begin(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CHECKOUT).await
    }

    /// Phase of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn phase(&self) -> Result<CheckoutPhase, StoreError> {
        read_json(&self.store, keys::CHECKOUT).await
    }

    /// Submit the checkout form.
    ///
    /// A valid form moves the attempt to `Processing`, waits out the
    /// simulated latency, clears the cart, and confirms the order with the
    /// total captured at submission. An invalid form leaves the cart alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: &CheckoutForm) -> Result<CheckoutResult, StoreError> {
        let admission = self.admission.lock().await;
        let mut checkout = Checkout::resume(self.phase().await?);
        let cart = self.store.load_cart().await?;

        let outcome = checkout.submit(form, cart.snapshot_total());
        if outcome != SubmitOutcome::Ignored {
            self.save_phase(checkout.phase()).await?;
        }
        drop(admission);

        match &outcome {
            SubmitOutcome::Accepted(order) => {
                let placement =
                    tokio::spawn(place_order(self.store.clone(), self.latency, checkout));
                checkout = placement.await.map_err(|e| {
                    StoreError::Backend(format!("Order placement task failed: {e}"))
                })??;

                info!(total = %order.total, items = cart.item_count(), "Order placed");
            }
            SubmitOutcome::Rejected(errors) => {
                tracing::debug!(fields = errors.count(), "Checkout form rejected");
            }
            SubmitOutcome::Ignored => {
                tracing::debug!(phase = %checkout.phase(), "Duplicate checkout submission ignored");
            }
        }

        Ok(CheckoutResult {
            cart,
            checkout,
            outcome,
        })
    }

    async fn save_phase(&self, phase: CheckoutPhase) -> Result<(), StoreError> {
        write_json(&self.store, keys::CHECKOUT, &phase).await
    }
}

/// Wait out the latency, clear the cart, and confirm a `Processing` attempt.
async fn place_order<S: KeyValueStore>(
    store: S,
    latency: Duration,
    mut checkout: Checkout,
) -> Result<Checkout, StoreError> {
    tokio::time::sleep(latency).await;

    store.clear_cart().await?;
    checkout.complete();
    write_json(&store, keys::CHECKOUT, &checkout.phase()).await?;

    Ok(checkout)
}
