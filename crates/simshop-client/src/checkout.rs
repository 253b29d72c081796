//! Checkout: turn the cart into an order for the signed-in customer.

use tracing::info;

use simshop_core::models::{NewOrder, OrderView, PaymentMethod, ShippingAddress};

use crate::api::ApiClient;
use crate::cart::Cart;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// What the customer fills in at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Build the create-order payload from the cart's price snapshots.
pub fn build_order(
    cart: &Cart,
    session: Option<&Session>,
    form: &CheckoutForm,
) -> ClientResult<NewOrder> {
    if cart.is_empty() {
        return Err(ClientError::EmptyCart);
    }
    let session = session.ok_or(ClientError::NotAuthenticated)?;

    Ok(NewOrder {
        user: Some(session.user_id()),
        items: cart.to_items(),
        total_amount: cart.total(),
        shipping_address: form.shipping_address.clone(),
        payment_method: form.payment_method,
        notes: form
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    })
}

/// Submit the order. The cart is cleared only when the server accepted it.
pub async fn checkout(
    api: &ApiClient,
    cart: &mut Cart,
    session: Option<&Session>,
    form: &CheckoutForm,
) -> ClientResult<OrderView> {
    let order = build_order(cart, session, form)?;
    let session = session.ok_or(ClientError::NotAuthenticated)?;

    let placed = api.create_order(session, &order).await?;
    cart.clear();
    info!(id = %placed.id, total = placed.total_amount, "order placed");
    Ok(placed)
}
