#![forbid(unsafe_code)]

//! Content items shown by a pivot.
//!
//! The pivot never owns an item's lifecycle. It needs three things from an
//! item: a header label, a stable identity (the `Rc` it is shared through),
//! and a lazy activation step it can poll before showing the item.

use std::fmt;

use serde_json::Value;

/// Label shown in an item's header.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderLabel {
    /// Plain text.
    Text(String),
    /// Structured value; the default template renders it as JSON.
    Structured(Value),
}

impl HeaderLabel {
    /// Plain-text label.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl From<&str> for HeaderLabel {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for HeaderLabel {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for HeaderLabel {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

impl fmt::Display for HeaderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

/// State of an item's lazy activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Content is ready to show.
    Ready,
    /// Content is still being created; poll again later.
    Pending,
}

/// An item the pivot can show.
///
/// Items are shared as `Rc<I>`; two entries are the same item when their
/// `Rc`s point to the same allocation.
pub trait ContentItem {
    /// Current header label.
    fn header(&self) -> HeaderLabel;

    /// Ensure the item's content exists.
    ///
    /// Called each time the pivot wants to show the item and on every tick
    /// until it returns [`Activation::Ready`]. Must be idempotent.
    fn activate(&self) -> Activation {
        Activation::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_strings_become_text() {
        assert_eq!(HeaderLabel::from(json!("Inbox")), HeaderLabel::text("Inbox"));
        assert!(matches!(
            HeaderLabel::from(json!({ "n": 1 })),
            HeaderLabel::Structured(_)
        ));
    }

    #[test]
    fn display_renders_json_for_structured() {
        assert_eq!(HeaderLabel::from("Mail").to_string(), "Mail");
        assert_eq!(
            HeaderLabel::Structured(json!({ "count": 3 })).to_string(),
            r#"{"count":3}"#
        );
    }

    #[test]
    fn activation_defaults_to_ready() {
        struct Plain;
        impl ContentItem for Plain {
            fn header(&self) -> HeaderLabel {
                "plain".into()
            }
        }
        assert_eq!(Plain.activate(), Activation::Ready);
    }
}
