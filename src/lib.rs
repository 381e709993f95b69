pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod display;
pub mod dto;
pub mod entity;
pub mod error;
pub mod models;
pub mod money;
pub mod orders;
pub mod persistence;
pub mod response;
pub mod routes;
pub mod search;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
