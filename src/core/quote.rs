use crate::domain::model::Slot;
use crate::utils::error::{AvailabilityError, Result};
use serde::Serialize;

pub const SERVICE_FEE_RATE: f64 = 0.12;
pub const PROMO_DISCOUNT_RATE: f64 = 0.10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteOptions {
    /// Per-guest hotel transport price, when the guest opts in.
    pub transport_add_on: Option<f64>,
    pub promo_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingQuote {
    pub guests: u32,
    pub price_per_guest: f64,
    pub subtotal: f64,
    pub service_fee: f64,
    pub discount: f64,
    pub total: f64,
}

impl BookingQuote {
    pub fn compute(price_per_guest: f64, guests: u32, options: &QuoteOptions) -> Result<Self> {
        if guests == 0 {
            return Err(AvailabilityError::InvalidGuestCountError {
                guests,
                reason: "at least one guest is required".to_string(),
            });
        }

        check_amount("price_per_guest", price_per_guest)?;
        if let Some(add_on) = options.transport_add_on {
            check_amount("transport_add_on", add_on)?;
        }

        let base = price_per_guest + options.transport_add_on.unwrap_or(0.0);
        let subtotal = base * f64::from(guests);
        let service_fee = round_cents(subtotal * SERVICE_FEE_RATE);
        let discount = if options.promo_applied {
            round_cents(subtotal * PROMO_DISCOUNT_RATE)
        } else {
            0.0
        };

        Ok(Self {
            guests,
            price_per_guest: base,
            subtotal,
            service_fee,
            discount,
            total: subtotal + service_fee - discount,
        })
    }

    /// Same as [`BookingQuote::compute`], refusing more guests than the slot has seats.
    pub fn for_slot(
        slot: &Slot,
        price_per_guest: f64,
        guests: u32,
        options: &QuoteOptions,
    ) -> Result<Self> {
        if i64::from(guests) > slot.spots_left() {
            return Err(AvailabilityError::InvalidGuestCountError {
                guests,
                reason: format!("only {} spot(s) left", slot.spots_left().max(0)),
            });
        }
        Self::compute(price_per_guest, guests, options)
    }
}

fn check_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AvailabilityError::InvalidAmountError {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
