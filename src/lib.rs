pub mod carbon;
pub mod co2;
pub mod config;
pub mod distance;
pub mod fetch;
pub mod forecast;
pub mod modes;
pub mod output;
pub mod services;
