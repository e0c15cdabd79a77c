pub mod error;
pub mod middleware;
pub mod notifications;
pub mod profile;
pub mod push;
pub mod redeem;
pub mod routes;
pub mod state;
pub mod subscriptions;

#[cfg(test)]
mod test_support;
