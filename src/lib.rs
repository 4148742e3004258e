//! Rate-limited client for the CRPT document registry: a fair, window-based admission gate in
//! front of a pluggable HTTP transport.
//!
//! The crate is organized around two pieces:
//!
//! - [`limiter::RateLimiter`] admits at most `N` operations per fixed window, shared by every task
//!   holding the limiter. Callers over budget wait (without spinning) until the window rolls over.
//! - [`client::RegistryClient`] takes an admission, encodes a [`document::Document`], posts it to
//!   the registry endpoint, and classifies the response as an [`client::Outcome`].
//!
//! ```no_run
//! # use crpt_registry::{document::Document, error::Result};
//! # async fn demo(document: Document) -> Result<()> {
//! use crpt_registry::{client::RegistryClient, config::TimeUnit, signature::Signature};
//!
//! let client = RegistryClient::new(TimeUnit::Seconds, 5)?;
//! let outcome = client.submit(&document, &Signature::new("detached-signature")).await?;
//!
//! outcome.into_result()?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod limiter;
pub mod obs;
pub mod signature;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports, document fixtures, and transport helpers for integration tests;
	//! enabled via `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	#[cfg(feature = "reqwest")]
	use crate::{
		client::ReqwestRegistryClient, config::RegistryConfig, http::ReqwestHttpClient,
	};
	use crate::document::{Description, Document, Product};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ReqwestRegistryClient`] pointed at a mock `endpoint` and backed by
	/// [`test_reqwest_http_client`].
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_client(
		endpoint: &str,
		request_limit: u32,
		window: Duration,
	) -> ReqwestRegistryClient {
		let config = RegistryConfig::with_window(request_limit, window)
			.with_endpoint_str(endpoint)
			.expect("Mock registry endpoint should parse successfully.");

		ReqwestRegistryClient::with_http_client(config, test_reqwest_http_client())
			.expect("Registry client should build successfully.")
	}

	/// Returns a fully populated document with `products` line items.
	pub fn sample_document(products: usize) -> Document {
		let products = (0..products)
			.map(|idx| Product {
				certificate_document: "CONFORMITY_CERTIFICATE".into(),
				certificate_document_date: time::macros::date!(2024-02-29),
				certificate_document_number: format!("RU-C-{idx:04}"),
				owner_inn: "7701234567".into(),
				producer_inn: "7707654321".into(),
				production_date: time::macros::date!(2024-03-01),
				tnved_code: "6403993600".into(),
				uit_code: format!("010461111111111121{idx:08}"),
				uitu_code: format!("00046111111111111{idx:03}"),
			})
			.collect();

		Document {
			description: Description { participant_inn: "7701234567".into() },
			doc_id: "doc-0001".into(),
			doc_status: "DRAFT".into(),
			doc_type: "LP_INTRODUCE_GOODS".into(),
			import_request: true,
			owner_inn: "7701234567".into(),
			participant_inn: "7701234567".into(),
			producer_inn: "7707654321".into(),
			production_date: time::macros::date!(2024-03-01),
			production_type: "OWN_PRODUCTION".into(),
			products,
			reg_date: time::macros::date!(2024-03-05),
			reg_number: "REG-42".into(),
		}
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Date;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
