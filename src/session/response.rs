//! Response text returned by the runtime.

use serde::Serialize;

/// A response paired with the ID of the request it answers.
///
/// The payload is kept as raw text; [`Response::attribute`] offers a light
/// lookup for the common `<Response ID=".." Reason=".."/>` shape without
/// parsing XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    request_id: u64,
    text: String,
}

impl Response {
    /// Wrap response text.
    #[must_use]
    pub const fn new(request_id: u64, text: String) -> Self { Self { request_id, text } }

    /// ID of the request this response answers.
    #[must_use]
    pub const fn request_id(&self) -> u64 { self.request_id }

    /// Raw response text.
    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    /// Consume the response, returning its text.
    #[must_use]
    pub fn into_text(self) -> String { self.text }

    /// Value of the first attribute called `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let needle = format!(" {name}=\"");
        let (_, rest) = self.text.split_once(needle.as_str())?;
        let (value, _) = rest.split_once('"')?;
        Some(value)
    }

    /// The `ID` echoed by the runtime, when numeric.
    #[must_use]
    pub fn reply_id(&self) -> Option<u64> { self.attribute("ID")?.parse().ok() }

    /// The `Reason` attribute the runtime sets when it rejects a request.
    #[must_use]
    pub fn reason(&self) -> Option<&str> { self.attribute("Reason") }
}
