//! VIP Bot - Paid group membership for a Telegram bot
//!
//! Users pay through a hosted Paystack checkout; a signed webhook grants a
//! fixed access period, renewals stack, and a periodic sweep removes lapsed
//! members from the VIP group. VIP members can also read a cached BTC price.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
