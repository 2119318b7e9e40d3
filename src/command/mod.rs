//! Request document construction.
//!
//! [`build`] maps an [`Action`] and its [`Params`] to the XML request the
//! runtime expects. Building is pure: the caller supplies the request ID, so
//! the same inputs always produce the same document.

pub mod action;
pub mod document;
pub mod errors;
pub mod params;

pub use action::Action;
pub use document::AttributeEscaping;
use document::Element;
pub use errors::ConfigError;
pub use params::{Params, parse_pair};

/// Resource name used when an action does not specify one.
pub const DEFAULT_RESOURCE: &str = "APP";

/// Build a request document with attribute values inserted verbatim.
///
/// # Errors
/// Returns [`ConfigError::MissingParam`] when a parameter the action needs
/// is absent.
pub fn build(action: &Action, params: &Params, request_id: u64) -> Result<String, ConfigError> {
    build_with(action, params, request_id, AttributeEscaping::Verbatim)
}

/// Build a request document using the given attribute escaping.
///
/// # Errors
/// Returns [`ConfigError::MissingParam`] when a parameter the action needs
/// is absent.
pub fn build_with(
    action: &Action,
    params: &Params,
    request_id: u64,
    escaping: AttributeEscaping,
) -> Result<String, ConfigError> {
    Command {
        action,
        params,
        request_id,
    }
    .encode(escaping)
}

/// A single request, borrowed from its parts for the duration of encoding.
#[derive(Debug, Clone, Copy)]
pub struct Command<'a> {
    /// Requested action.
    pub action: &'a Action,
    /// Action parameters.
    pub params: &'a Params,
    /// Request correlation ID.
    pub request_id: u64,
}

impl Command<'_> {
    /// Render the request document.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingParam`] when a required parameter is
    /// absent.
    pub fn encode(&self, escaping: AttributeEscaping) -> Result<String, ConfigError> {
        let mut request = Element::new("Request")
            .attr("ID", self.request_id.to_string())
            .attr("Action", self.action.wire_verb());
        if let Some(body) = self.body()? {
            request = request.child(body);
        }
        Ok(request.render(escaping))
    }

    fn body(&self) -> Result<Option<Element>, ConfigError> {
        let p = self.params;
        let element = match self.action {
            Action::Query => Element::new("FB").attr("Name", "").attr("Type", ""),
            Action::CreateResource | Action::Start | Action::Stop => {
                Element::new("Resource").attr("Name", p.optional("name", DEFAULT_RESOURCE))
            }
            Action::CreateFb => Element::new("FB")
                .attr("Name", p.required("name")?)
                .attr("Type", p.required("type")?)
                .attr("Resource", p.optional("resource", DEFAULT_RESOURCE)),
            Action::CreateConnection => Element::new("Connection")
                .attr("Source", p.required("source")?)
                .attr("Destination", p.required("destination")?)
                .attr("Resource", p.optional("resource", DEFAULT_RESOURCE)),
            Action::WriteParam => Element::new("FB")
                .attr("Name", p.required("fb_name")?)
                .attr("Resource", p.optional("resource", DEFAULT_RESOURCE))
                .child(
                    Element::new("Parameter")
                        .attr("Name", p.required("param_name")?)
                        .attr("Value", p.required("param_value")?),
                ),
            Action::Raw(_) => return Ok(None),
        };
        Ok(Some(element))
    }
}
