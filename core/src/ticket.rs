//! Ticket identity and the published price.

use crate::error::GuideError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Configuration key holding the ticket currency (ISO 4217 code).
pub const TICKET_CURRENCY_KEY: &str = "TICKET_CURRENCY";

/// Configuration key holding the ticket price in the currency's smallest unit.
pub const TICKET_PRICE_KEY: &str = "TICKET_PRICE";

/// Opaque ticket code.
///
/// A random 128-bit value minted at invoice time, before payment. Possession
/// of the code is the only proof of ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketCode(Uuid);

impl TicketCode {
    /// Mint a fresh random code.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TicketCode {
    type Err = GuideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| GuideError::Validation(format!("invalid ticket code: {e}")))
    }
}

/// A sold ticket as recorded in the ledger.
///
/// Rows exist only after payment was confirmed. `used` moves from `false`
/// to `true` at most once and never back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Storage row identifier.
    pub id: i64,
    /// Ticket code.
    pub code: TicketCode,
    /// Whether the ticket has been redeemed.
    pub used: bool,
}

/// Published ticket price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPrice {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Total amount in the smallest currency unit.
    pub amount: i64,
}

impl TicketPrice {
    /// Build the price from the two independently optional configuration values.
    ///
    /// Returns `None` (payments disabled) unless both values are present and
    /// the amount is an integer. A missing price never means "free".
    #[must_use]
    pub fn from_config(currency: Option<String>, amount: Option<String>) -> Option<Self> {
        let currency = currency.filter(|c| !c.trim().is_empty())?;
        let amount = amount?.trim().parse::<i64>().ok()?;

        Some(Self {
            currency: currency.trim().to_string(),
            amount,
        })
    }
}
