// DHIS2 Facility Mediator - OpenHIM mediator for DHIS2 organisation units
// Copyright (c) 2025 DHIS2 Mediator Contributors
// Licensed under the MIT License

//! # DHIS2 Facility Mediator
//!
//! An OpenHIM mediator that serves DHIS2 organisation units as facility
//! records, wrapped in the envelope OpenHIM records transactions with.
//!
//! ## Overview
//!
//! This library provides the functionality for:
//! - **Registering** the mediator and its config schema with OpenHIM
//! - **Syncing** operator config pushed over the OpenHIM heartbeat
//! - **Fetching** organisation unit metadata from the configured DHIS2 instance
//! - **Transforming** the XML into facility records with a generated `systemID`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Lifecycle, heartbeat, config store, request pipeline
//! - [`adapters`] - External integrations (OpenHIM, DHIS2)
//! - [`server`] - HTTP routes
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Process configuration
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dhis_mediator::core::transform::FacilityTransformer;
//!
//! let xml = r#"<metadata><organisationUnits>
//!     <organisationUnit id="1" name="Clinic"/>
//! </organisationUnits></metadata>"#;
//!
//! for record in FacilityTransformer::new().transform(xml)? {
//!     println!("{} -> {}", record.get("name").unwrap(), record.system_id());
//! }
//! # Ok::<(), dhis_mediator::domain::TransformError>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error is
//! [`domain::MediatorError`]. The request pipeline never fails; it renders
//! every error as a `Failed` envelope.
//!
//! ## Logging
//!
//! Logging goes through the `tracing` crate with structured fields:
//!
//! ```rust,no_run
//! tracing::info!(urn = "urn:mediator:dhis2-facilities", "Successfully registered mediator");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
