//! Authenticated user-details lookup and display-name extraction.

// crates.io
use quick_xml::{Reader, events::Event};
// self
use crate::{
	_prelude::*,
	error::ProfileError,
	flows::Broker,
	http::ApiHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const USER_TAG: &[u8] = b"user";
const DISPLAY_NAME_ATTR: &[u8] = b"display_name";

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches the authenticated user's profile document and extracts the display name.
	///
	/// Issues a signed GET against the descriptor's user-details endpoint; the response is
	/// expected to be an XML document carrying a `<user display_name="...">` element.
	/// Returns `None` when the document holds no such attribute.
	pub async fn user_display_name(&self) -> Result<Option<String>> {
		const KIND: FlowKind = FlowKind::Profile;

		let span = FlowSpan::new(KIND, "user_display_name");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.descriptor.endpoints.user_details.clone();
				let response = self.signed_get(url).await?;

				if !response.is_success() {
					return Err(ProfileError::Endpoint { status: response.status }.into());
				}

				parse_display_name(&response.body).map_err(Error::from)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

/// Stream-parses a profile document for the `display_name` attribute of its `user` tag.
///
/// The whole document is walked and the last matching attribute wins, mirroring the
/// provider's single-user response shape while staying deterministic on documents that
/// carry more than one `user` element.
pub fn parse_display_name(document: &[u8]) -> Result<Option<String>, ProfileError> {
	let mut reader = Reader::from_reader(document);
	let mut display_name = None;
	let mut buf = Vec::new();

	loop {
		match reader.read_event_into(&mut buf)? {
			Event::Start(ref tag) | Event::Empty(ref tag) if tag.name().as_ref() == USER_TAG => {
				for attribute in tag.attributes() {
					let attribute = attribute?;

					if attribute.key.as_ref() == DISPLAY_NAME_ATTR {
						display_name = Some(attribute.unescape_value()?.into_owned());
					}
				}
			},
			Event::Eof => break,
			_ => {},
		}

		buf.clear();
	}

	Ok(display_name)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn single_user_tag_yields_its_display_name() {
		let document = br#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="OpenStreetMap server">
  <user id="42" display_name="Alice" account_created="2020-01-01T00:00:00Z">
    <description/>
  </user>
</osm>"#;
		let parsed = parse_display_name(document).expect("Well-formed document should parse.");

		assert_eq!(parsed.as_deref(), Some("Alice"));
	}

	#[test]
	fn self_closing_user_tag_is_recognized() {
		let parsed = parse_display_name(br#"<osm><user display_name="Bob"/></osm>"#)
			.expect("Self-closing tag should parse.");

		assert_eq!(parsed.as_deref(), Some("Bob"));
	}

	#[test]
	fn last_user_tag_wins() {
		let document = br#"<osm>
  <user display_name="first"/>
  <user display_name="second"/>
</osm>"#;
		let parsed = parse_display_name(document).expect("Well-formed document should parse.");

		assert_eq!(parsed.as_deref(), Some("second"));
	}

	#[test]
	fn missing_user_tag_yields_none() {
		let parsed = parse_display_name(b"<osm><changeset id=\"7\"/></osm>")
			.expect("Well-formed document should parse.");

		assert_eq!(parsed, None);

		let parsed = parse_display_name(b"<osm><user id=\"42\"/></osm>")
			.expect("User tag without the attribute should parse.");

		assert_eq!(parsed, None);
	}

	#[test]
	fn escaped_attribute_values_are_unescaped() {
		let parsed = parse_display_name(br#"<osm><user display_name="A &amp; B"/></osm>"#)
			.expect("Escaped attribute should parse.");

		assert_eq!(parsed.as_deref(), Some("A & B"));
	}

	#[test]
	fn malformed_documents_error() {
		let err = parse_display_name(b"<osm><user display_name=\"broken\"")
			.expect_err("Truncated document should fail.");

		assert!(matches!(err, ProfileError::Xml(_)));
	}
}
