pub mod action;
pub mod auth;
pub mod config;
pub mod doctor;
pub mod entity;
pub mod misc;
mod network;
pub mod raw;
pub mod sparql;
