mod calculation_state;
mod driver;
mod origin;
mod quote;
mod quote_status;

pub use calculation_state::{CalculationState, PricingDefaults, QuoteWorkflow};
pub use driver::Driver;
pub use origin::Origin;
pub use quote::{NewQuote, Quote, QuoteDetails};
pub use quote_status::QuoteStatus;
