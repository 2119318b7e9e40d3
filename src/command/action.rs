//! Logical management actions understood by the runtime.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A logical action the client can request.
///
/// Several actions share a wire verb: resource, function block and
/// connection creation are all sent as `Action="CREATE"` and differ only in
/// the child element. Anything not recognised is carried as [`Action::Raw`]
/// and sent with its literal name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// List function blocks.
    Query,
    /// Create a resource.
    CreateResource,
    /// Create a function block inside a resource.
    CreateFb,
    /// Connect two function block ports.
    CreateConnection,
    /// Write a function block input parameter.
    WriteParam,
    /// Start a resource.
    Start,
    /// Stop a resource.
    Stop,
    /// Any other action, sent verbatim.
    Raw(String),
}

impl Action {
    /// Logical name, e.g. `CREATE_FB`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Query => "QUERY",
            Self::CreateResource => "CREATE_RESOURCE",
            Self::CreateFb => "CREATE_FB",
            Self::CreateConnection => "CREATE_CONNECTION",
            Self::WriteParam => "WRITE_PARAM",
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Raw(literal) => literal,
        }
    }

    /// Value of the `Action` attribute on the wire.
    #[must_use]
    pub fn wire_verb(&self) -> &str {
        match self {
            Self::Query => "QUERY",
            Self::CreateResource | Self::CreateFb | Self::CreateConnection => "CREATE",
            Self::WriteParam => "WRITE",
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Raw(literal) => literal,
        }
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        match name {
            "QUERY" => Self::Query,
            "CREATE_RESOURCE" => Self::CreateResource,
            "CREATE_FB" => Self::CreateFb,
            "CREATE_CONNECTION" => Self::CreateConnection,
            "WRITE_PARAM" => Self::WriteParam,
            "START" => Self::Start,
            "STOP" => Self::Stop,
            other => Self::Raw(other.to_owned()),
        }
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::from(s)) }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("QUERY", Action::Query, "QUERY")]
    #[case("CREATE_RESOURCE", Action::CreateResource, "CREATE")]
    #[case("CREATE_FB", Action::CreateFb, "CREATE")]
    #[case("CREATE_CONNECTION", Action::CreateConnection, "CREATE")]
    #[case("WRITE_PARAM", Action::WriteParam, "WRITE")]
    #[case("START", Action::Start, "START")]
    #[case("STOP", Action::Stop, "STOP")]
    fn parses_known_names(#[case] name: &str, #[case] expected: Action, #[case] verb: &str) {
        let action = Action::from(name);
        assert_eq!(action, expected);
        assert_eq!(action.name(), name);
        assert_eq!(action.wire_verb(), verb);
    }

    #[test]
    fn unknown_names_become_raw() {
        let action = Action::from("KILL");
        assert_eq!(action, Action::Raw("KILL".to_owned()));
        assert_eq!(action.wire_verb(), "KILL");
        assert_eq!(action.to_string(), "KILL");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(Action::from("query"), Action::Raw("query".to_owned()));
    }
}
