//! Checkout command.

use std::fmt::Write as _;
use std::time::Duration;

use bazaar_core::{CheckoutForm, Confirmation, FieldErrors, KeyValueStore, SubmitOutcome};
use bazaar_storefront::services::CheckoutService;

use super::{CommandError, print};

/// One line per invalid field.
pub fn format_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, error) in [
        ("name", errors.name),
        ("email", errors.email),
        ("address", errors.address),
    ] {
        if let Some(message) = error {
            let _ = writeln!(out, "{field}: {message}");
        }
    }
    out
}

/// Start a fresh checkout attempt and submit `form`.
pub async fn place_order<S: KeyValueStore + Clone + 'static>(
    store: &S,
    form: &CheckoutForm,
    latency: Duration,
) -> Result<(), CommandError> {
    let service = CheckoutService::new(store.clone(), latency);
    service.begin().await?;

    let result = service.submit(form).await?;

    match result.outcome {
        SubmitOutcome::Accepted(_) => {
            if let Some(message) = result.checkout.confirmation().map(Confirmation::message) {
                print(message);
            }
            Ok(())
        }
        SubmitOutcome::Rejected(errors) => {
            print(format_errors(&errors).trim_end());
            Err(CommandError::CheckoutRejected(errors.count()))
        }
        SubmitOutcome::Ignored => {
            print("An order is already being placed.");
            Ok(())
        }
    }
}
