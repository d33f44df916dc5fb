// Domain layer - View models and the pure engines behind them
pub mod business;
pub mod cluster;
pub mod config_form;
pub mod config_record;
pub mod dashboard;
pub mod filter;
pub mod lenient;
pub mod notification;
pub mod pagination;
pub mod section;
pub mod view;
