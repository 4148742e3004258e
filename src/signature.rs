//! Caller-supplied document signature that stays out of logs.

// self
use crate::_prelude::*;

/// Detached signature attached to every submission as the `signature` query parameter.
///
/// The value is opaque to the client; formatting it through `Debug` or `Display` prints a
/// placeholder so spans and error reports never carry the raw signature.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(String);
impl Signature {
	/// Wraps a new signature string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw signature. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Signature {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for Signature {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Signature {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signature").field(&"<redacted>").finish()
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_formatters_redact() {
		let signature = Signature::new("MIIG-detached");

		assert_eq!(format!("{signature:?}"), "Signature(\"<redacted>\")");
		assert_eq!(format!("{signature}"), "<redacted>");
		assert_eq!(signature.expose(), "MIIG-detached");
	}
}
