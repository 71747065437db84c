//! Application services orchestrating repositories and external calls.

pub mod assistant;
pub mod cart_session;
pub mod checkout;
pub mod recovery;

pub use assistant::{AssistantClient, AssistantService};
pub use cart_session::CartSessionService;
pub use checkout::{CheckoutError, CheckoutService};
pub use recovery::RecoveryService;
