//! Result record for update and delete operations.

use serde::{Deserialize, Serialize};

/// Outcome of an update or delete.
///
/// `success` reports whether a document actually matched the criteria;
/// `affected` counts the documents modified or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
	/// Whether the operation matched and acted on a document.
	pub success: bool,
	/// Number of documents modified or removed (0 or 1 for single-document
	/// operations).
	pub affected: u64,
}

impl Outcome {
	pub fn new(success: bool, affected: u64) -> Self {
		Self { success, affected }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_outcome_fields() {
		let outcome = Outcome::new(true, 1);
		assert!(outcome.success);
		assert_eq!(outcome.affected, 1);

		let outcome = Outcome::new(false, 0);
		assert!(!outcome.success);
		assert_eq!(outcome.affected, 0);
	}

	#[test]
	fn test_outcome_serde_round_trip() {
		let outcome = Outcome::new(true, 1);
		let json = serde_json::to_string(&outcome).unwrap();
		assert_eq!(json, r#"{"success":true,"affected":1}"#);

		let restored: Outcome = serde_json::from_str(&json).unwrap();
		assert_eq!(restored, outcome);
	}
}
