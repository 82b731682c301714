pub mod factory;
pub mod html;
pub mod server;

pub use factory::{ClientFactory, GeminiFactory, SharedClientFactory};
pub use server::{AppState, GatewayServer};
