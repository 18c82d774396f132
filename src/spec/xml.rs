use serde::{Deserialize, Serialize};
use url::Url;

/// A metadata object that allows for more fine-tuned XML model definitions.
///
/// See <https://spec.openapis.org/oas/v3.1.1#xml-object>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct Xml {
    /// Replaces the name of the element/attribute used for the described schema property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The URI of the namespace definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Url>,

    /// The prefix to be used for the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Declares whether the property definition translates to an attribute instead of an
    /// element.
    ///
    /// Default value is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,

    /// MAY be used only for an array definition.
    ///
    /// Signifies whether the array is wrapped (for example, `<books><book/><book/></books>`) or
    /// unwrapped (`<book/><book/>`). Default value is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,
}
