//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. Translates JSON requests
//! into domain calls and domain results into status codes and JSON bodies.
//! No business rules live here.

pub mod rest;
