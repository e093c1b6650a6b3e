//! Presentation helpers exposed to templates.
//!
//! Every helper is total: it returns a display-safe default instead of
//! failing, so rendering never aborts on a missing value. Where failure
//! carries information, the module also exposes the explicit
//! `Result`/`Option` core the default is derived from
//! ([`currency::parse_amount`], [`numeric::try_div`], ...).

pub mod analytics;
pub mod currency;
pub mod lookup;
pub mod numeric;
pub mod text;
pub mod user;
pub mod widget;

pub use currency::{currency, currency_short, Amount, CurrencyFormat};
pub use lookup::{get_item, AttrLookup, Lookup, MapLookup};
