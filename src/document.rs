//! Registry document value types and their JSON codec.
//!
//! Field names follow the registry's wire contract rather than Rust conventions where the two
//! disagree (`participantInn`, `importRequest`); every date is encoded as an ISO-8601 calendar
//! date (`YYYY-MM-DD`).

pub mod product;

pub use product::*;

// self
use crate::{_prelude::*, error::EncodingError};

time::serde::format_description!(registry_date, Date, "[year]-[month]-[day]");

/// Participant block nested at the top of every document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
	/// Tax identifier of the participant filing the document.
	#[serde(rename = "participantInn")]
	pub participant_inn: String,
}

/// Shipment/production document submitted to the registry.
///
/// A document owns its [`Product`] line items; the client only ever borrows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// Participant block.
	pub description: Description,
	/// Caller-assigned document identifier.
	pub doc_id: String,
	/// Document status label.
	pub doc_status: String,
	/// Document type label (for example `LP_INTRODUCE_GOODS`).
	pub doc_type: String,
	/// Whether the goods are imported.
	#[serde(rename = "importRequest")]
	pub import_request: bool,
	/// Owner tax identifier.
	pub owner_inn: String,
	/// Participant tax identifier.
	pub participant_inn: String,
	/// Producer tax identifier.
	pub producer_inn: String,
	/// Date the goods were produced.
	#[serde(with = "registry_date")]
	pub production_date: Date,
	/// Production type label.
	pub production_type: String,
	/// Ordered line items.
	pub products: Vec<Product>,
	/// Registration date.
	#[serde(with = "registry_date")]
	pub reg_date: Date,
	/// Registration number.
	pub reg_number: String,
}
impl Document {
	/// Encodes the document into the registry's JSON body.
	pub fn to_json(&self) -> Result<Vec<u8>, EncodingError> {
		serde_json::to_vec(self).map_err(EncodingError::Serialize)
	}

	/// Decodes a document from JSON, reporting the failing field path on error.
	pub fn from_json(payload: &[u8]) -> Result<Self, EncodingError> {
		let mut de = serde_json::Deserializer::from_slice(payload);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| EncodingError::Deserialize { source })
	}
}
