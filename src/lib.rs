pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod repository;
pub mod service;
pub mod web;
