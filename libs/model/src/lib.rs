//! # eventdesk-model
//!
//! Records exchanged between the eventdesk dashboard and the upstream event API.
//!
//! ## Design Principles
//!
//! - Upstream payloads are decoded into explicit types and checked on ingress;
//!   a malformed response is a [`ModelError`], never a half-filled record
//! - Status transitions go through [`Event::accept`] and [`Event::reject`], which
//!   keep the confirmed date consistent with the status
//! - The vendor display name is derived data and lives on [`EnrichedEvent`],
//!   never on the record sent back upstream
//!
//! ## Records
//!
//! - [`Profile`] / [`Role`]: identity returned by `GET /auth/profile`
//! - [`Event`] / [`EventStatus`]: scheduling record between HR and a vendor
//! - [`CreateEventForm`] / [`NewEvent`]: create payload before and after validation
//! - [`Decision`]: a vendor's accept/reject response

mod error;
mod form;
mod ingress;
mod respond;
mod types;
mod wire;

pub use error::ModelError;
pub use form::{parse_proposed_date, CreateEventForm, NewEvent, PROPOSED_DATE_COUNT};
pub use ingress::{decode, Ingress};
pub use respond::Decision;
pub use types::*;
