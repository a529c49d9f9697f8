//! Checkout route handlers.
//!
//! The page and the HTMX fragment share one panel: the order summary and
//! form, or the confirmation once the order is placed. The confirmation
//! navigates back to the catalog on its own after a short delay.

use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
};
use bazaar_core::{
    CartRepository, CartView, CheckoutForm, Confirmation, FieldErrors, SubmitOutcome,
    build_cart_view,
};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::{Badges, CART_UPDATED, is_htmx};
use crate::services::{CheckoutResult, CheckoutService};
use crate::state::AppState;
use crate::store::SessionStore;

/// Checkout panel display data.
#[derive(Debug, Clone, Default)]
pub struct CheckoutPanel {
    /// Order summary built from the cart's snapshots.
    pub summary: CartView,
    /// Values to re-fill the form with.
    pub form: CheckoutForm,
    pub errors: FieldErrors,
    /// Disable the form (order in flight or placed).
    pub locked: bool,
    /// Confirmation message once the order is placed.
    pub message: Option<String>,
    pub redirect: Duration,
}

impl CheckoutPanel {
    /// Delay before the confirmation returns to the catalog, in milliseconds.
    #[must_use]
    pub fn redirect_ms(&self) -> u128 {
        self.redirect.as_millis()
    }

    /// Same delay in seconds, for the no-script refresh.
    #[must_use]
    pub fn redirect_seconds(&self) -> f64 {
        self.redirect.as_secs_f64()
    }

    fn from_result(result: &CheckoutResult, form: CheckoutForm, redirect: Duration) -> Self {
        let mut panel = Self {
            summary: build_cart_view(&result.cart, None),
            form,
            redirect,
            ..Self::default()
        };

        match &result.outcome {
            SubmitOutcome::Rejected(errors) => panel.errors = errors.clone(),
            SubmitOutcome::Accepted(_) => {
                panel.locked = true;
                panel.message = result.checkout.confirmation().map(Confirmation::message);
            }
            SubmitOutcome::Ignored => panel.locked = true,
        }

        panel
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub badges: Badges,
    pub panel: CheckoutPanel,
}

/// Checkout panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_panel.html")]
pub struct CheckoutPanelTemplate {
    pub panel: CheckoutPanel,
}

/// Display the checkout page, starting a fresh attempt.
#[instrument(skip(state, store))]
pub async fn show(
    State(state): State<AppState>,
    store: SessionStore,
) -> Result<CheckoutShowTemplate> {
    CheckoutService::new(store.clone(), state.config().checkout.latency)
        .begin()
        .await?;
    let cart = store.load_cart().await?;

    Ok(CheckoutShowTemplate {
        badges: Badges::load(&store).await?,
        panel: CheckoutPanel {
            summary: build_cart_view(&cart, None),
            redirect: state.config().checkout.redirect_delay,
            ..CheckoutPanel::default()
        },
    })
}

/// Place the mock order.
///
/// Invalid input re-renders the form with per-field errors (422). A
/// submission while an order is already in flight is answered with the
/// locked form (409).
#[instrument(skip(state, store, headers, form))]
pub async fn submit(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let checkout = &state.config().checkout;
    let result = CheckoutService::new(store.clone(), checkout.latency)
        .with_admission(state.checkout_admission())
        .submit(&form)
        .await?;

    let status = match &result.outcome {
        SubmitOutcome::Accepted(_) => {
            add_breadcrumb("checkout", "Order placed", None);
            StatusCode::OK
        }
        SubmitOutcome::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Ignored => StatusCode::CONFLICT,
    };
    let placed = matches!(result.outcome, SubmitOutcome::Accepted(_));
    let panel = CheckoutPanel::from_result(&result, form, checkout.redirect_delay);

    if !is_htmx(&headers) {
        let page = CheckoutShowTemplate {
            badges: Badges::load(&store).await?,
            panel,
        };
        return Ok((status, page).into_response());
    }

    let fragment = CheckoutPanelTemplate { panel };
    Ok(if placed {
        (status, AppendHeaders([("HX-Trigger", CART_UPDATED)]), fragment).into_response()
    } else {
        (status, fragment).into_response()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Cart, CartItem, Checkout, Price, ProductId, Quantity};

    use super::*;

    fn form(name: &str, email: &str, address: &str) -> CheckoutForm {
        CheckoutForm {
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
        }
    }

    fn cart() -> Cart {
        Cart::from_items(vec![CartItem {
            id: ProductId::new(5),
            name: Some("Bracelet".to_string()),
            price: Some(Price::from_cents(2275)),
            image: None,
            quantity: Quantity::new(2),
        }])
    }

    fn result(form: &CheckoutForm, complete: bool) -> CheckoutResult {
        let cart = cart();
        let mut checkout = Checkout::new();
        let outcome = checkout.submit(form, cart.snapshot_total());
        if complete {
            checkout.complete();
        }
        CheckoutResult {
            cart,
            checkout,
            outcome,
        }
    }

    #[test]
    fn test_redirect_units() {
        let panel = CheckoutPanel {
            redirect: Duration::from_millis(4500),
            ..CheckoutPanel::default()
        };
        assert_eq!(panel.redirect_ms(), 4500);
        assert!((panel.redirect_seconds() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejected_panel_keeps_input_and_errors() {
        let input = form("J", "not-an-email", "12 Main Street");
        let panel = CheckoutPanel::from_result(&result(&input, false), input, Duration::ZERO);

        assert!(!panel.locked);
        assert!(panel.message.is_none());
        assert_eq!(panel.errors.count(), 2);

        let html = CheckoutPanelTemplate { panel }.render().unwrap();
        assert!(html.contains("Please enter your full name"));
        assert!(html.contains("Please enter a valid email"));
        assert!(html.contains("value=\"not-an-email\""));
        assert!(html.contains("$45.50"));
    }

    #[test]
    fn test_accepted_panel_shows_confirmation() {
        let input = form("Jane Doe", "jane@example.com", "1 Infinite Loop");
        let panel = CheckoutPanel::from_result(
            &result(&input, true),
            input,
            Duration::from_millis(4500),
        );

        assert!(panel.locked);
        let html = CheckoutPanelTemplate { panel }.render().unwrap();
        assert!(html.contains("Thanks Jane Doe! Your order of $45.50 has been placed."));
        assert!(html.contains("load delay:4500ms"));
        assert!(!html.contains("<form"));
    }
}
