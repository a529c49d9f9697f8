//! Mock checkout: form validation and the order state machine.
//!
//! Nothing is charged or stored. A valid submission captures the buyer's
//! name and the cart total, and completing the order yields a confirmation
//! message. Clearing the cart and waiting out the simulated latency are left
//! to the caller, which owns the store and the clock.

use serde::Deserialize;

use crate::types::{CheckoutPhase, Email, Price};

/// Minimum length of the buyer's name, in characters.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum length of the shipping address, in characters.
pub const MIN_ADDRESS_LENGTH: usize = 6;

pub const NAME_ERROR: &str = "Please enter your full name";
pub const EMAIL_ERROR: &str = "Please enter a valid email";
pub const ADDRESS_ERROR: &str = "Please enter a valid address";

/// Raw checkout form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// Per-field validation messages. `None` means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub address: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.address.is_none()
    }

    /// Number of fields with an error.
    #[must_use]
    pub fn count(&self) -> usize {
        [self.name, self.email, self.address]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }
}

/// A validated order waiting to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    pub name: String,
    pub email: Email,
    pub address: String,
    /// Cart total captured when the order was accepted.
    pub total: Price,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub name: String,
    pub total: Price,
}

impl Confirmation {
    /// Message shown to the buyer.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Thanks {}! Your order of ${} has been placed.",
            self.name,
            self.total.display()
        )
    }
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// An order is already being placed or has been placed.
    Ignored,
    /// Validation failed; the flow is back in `Idle`.
    Rejected(FieldErrors),
    /// Validation passed; the flow is in `Processing`.
    Accepted(PendingOrder),
}

/// Validate every field independently, so all errors show at once.
///
/// Name and address are trimmed before their length checks.
///
/// # Errors
///
/// Returns the collected [`FieldErrors`] if any rule fails.
pub fn validate(form: &CheckoutForm) -> Result<(String, Email, String), FieldErrors> {
    let name = form.name.trim();
    let email = Email::parse(form.email.trim());
    let address = form.address.trim();

    let errors = FieldErrors {
        name: (name.chars().count() < MIN_NAME_LENGTH).then_some(NAME_ERROR),
        email: email.is_err().then_some(EMAIL_ERROR),
        address: (address.chars().count() < MIN_ADDRESS_LENGTH).then_some(ADDRESS_ERROR),
    };

    match email {
        Ok(email) if errors.is_empty() => Ok((name.to_string(), email, address.to_string())),
        _ => Err(errors),
    }
}

/// One checkout attempt.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    phase: CheckoutPhase,
    errors: FieldErrors,
    pending: Option<PendingOrder>,
    confirmation: Option<Confirmation>,
}

impl Checkout {
    /// A fresh attempt in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume an attempt whose phase was persisted between requests.
    #[must_use]
    pub fn resume(phase: CheckoutPhase) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Errors from the latest validation attempt.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingOrder> {
        self.pending.as_ref()
    }

    #[must_use]
    pub const fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Submit the form.
    ///
    /// Ignored while `Processing` or `Confirmed`. Otherwise errors are
    /// cleared, the form is validated, and the flow moves to `Processing`
    /// with `cart_total` captured, or back to `Idle` with field errors.
    pub fn submit(&mut self, form: &CheckoutForm, cart_total: Price) -> SubmitOutcome {
        if self.phase.locks_form() {
            return SubmitOutcome::Ignored;
        }

        self.errors = FieldErrors::default();
        self.phase = CheckoutPhase::Validating;

        match validate(form) {
            Ok((name, email, address)) => {
                let order = PendingOrder {
                    name,
                    email,
                    address,
                    total: cart_total,
                };
                self.phase = CheckoutPhase::Processing;
                self.pending = Some(order.clone());
                SubmitOutcome::Accepted(order)
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.phase = CheckoutPhase::Idle;
                SubmitOutcome::Rejected(errors)
            }
        }
    }

    /// Finish placing the pending order.
    ///
    /// Moves `Processing` to `Confirmed`. Returns `None` in any other phase.
    pub fn complete(&mut self) -> Option<&Confirmation> {
        if self.phase != CheckoutPhase::Processing {
            return None;
        }
        let order = self.pending.take()?;

        self.phase = CheckoutPhase::Confirmed;
        self.confirmation = Some(Confirmation {
            name: order.name,
            total: order.total,
        });
        self.confirmation.as_ref()
    }
}
