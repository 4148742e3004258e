//! Line items carried by a registry document.

// self
use crate::{_prelude::*, document::registry_date};

/// Single product entry owned by a [`Document`](crate::document::Document).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	/// Kind of conformity document backing the product.
	pub certificate_document: String,
	/// Issue date of the conformity document.
	#[serde(with = "registry_date")]
	pub certificate_document_date: Date,
	/// Number of the conformity document.
	pub certificate_document_number: String,
	/// Owner tax identifier.
	pub owner_inn: String,
	/// Producer tax identifier.
	pub producer_inn: String,
	/// Date the item was produced.
	#[serde(with = "registry_date")]
	pub production_date: Date,
	/// Foreign-trade commodity (TN VED) code.
	pub tnved_code: String,
	/// Unique item identifier.
	pub uit_code: String,
	/// Unique transport-package identifier.
	pub uitu_code: String,
}
