//! # Capability module
//!
//! This module contains the [`Capability`] and [`Operation`] types which
//! describe what a token is allowed to do.
//!
//! Capability is only built and serialized here. Intersection with the key
//! capability is performed by the service when the token is issued.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::AblyError;

/// Wildcard which matches every resource or every operation.
pub const WILDCARD: &str = "*";

/// Operation which can be allowed for the resource.
///
/// Operations are ordered and compared by their wire name. Names which are
/// not known to the client are kept as [`Operation::Other`] so the service
/// can decide on them.
#[derive(Debug, Clone, Eq)]
pub enum Operation {
    /// Any operation (`*`).
    All,

    /// Publish messages.
    Publish,

    /// Subscribe to messages.
    Subscribe,

    /// Register presence.
    Presence,

    /// Fetch channel history.
    History,

    /// Fetch application statistics.
    Stats,

    /// Fetch channel metadata.
    ChannelMetadata,

    /// Subscribe for push notifications.
    PushSubscribe,

    /// Manage push registrations.
    PushAdmin,

    /// Operation unknown to the client.
    Other(String),
}

impl Operation {
    /// Operation name used on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Operation::All => WILDCARD,
            Operation::Publish => "publish",
            Operation::Subscribe => "subscribe",
            Operation::Presence => "presence",
            Operation::History => "history",
            Operation::Stats => "stats",
            Operation::ChannelMetadata => "channel-metadata",
            Operation::PushSubscribe => "push-subscribe",
            Operation::PushAdmin => "push-admin",
            Operation::Other(name) => name,
        }
    }
}

impl From<&str> for Operation {
    fn from(value: &str) -> Self {
        match value {
            WILDCARD => Operation::All,
            "publish" => Operation::Publish,
            "subscribe" => Operation::Subscribe,
            "presence" => Operation::Presence,
            "history" => Operation::History,
            "stats" => Operation::Stats,
            "channel-metadata" => Operation::ChannelMetadata,
            "push-subscribe" => Operation::PushSubscribe,
            "push-admin" => Operation::PushAdmin,
            other => Operation::Other(other.into()),
        }
    }
}

impl From<String> for Operation {
    fn from(value: String) -> Self {
        Operation::from(value.as_str())
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Hash for Operation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialOrd for Operation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Operation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Operation::from)
    }
}

/// Token capability.
///
/// Maps resource patterns (channel names, `namespace:*`, `*`) to the set of
/// allowed operations. Resources and operations are kept sorted, which makes
/// serialized form canonical and comparison order-insensitive.
///
/// # Examples
/// ```rust
/// use ably::dx::auth::{Capability, Operation};
///
/// let capability = Capability::new()
///     .with("chat", [Operation::Subscribe, Operation::Publish])
///     .with("notifications:*", ["subscribe"]);
///
/// assert_eq!(
///     capability.to_json(),
///     r#"{"chat":["publish","subscribe"],"notifications:*":["subscribe"]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(BTreeMap<String, BTreeSet<Operation>>);

impl Capability {
    /// Create capability without resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capability which allows any operation on any resource.
    pub fn all() -> Self {
        Self::new().with(WILDCARD, [Operation::All])
    }

    /// Add `operations` for the `resource` pattern.
    ///
    /// Operations are merged with ones which has been added for the same
    /// resource before. Empty `operations` list is kept as is.
    pub fn with<R, I, O>(mut self, resource: R, operations: I) -> Self
    where
        R: Into<String>,
        I: IntoIterator<Item = O>,
        O: Into<Operation>,
    {
        self.insert(resource, operations);
        self
    }

    /// Add `operations` for the `resource` pattern.
    pub fn insert<R, I, O>(&mut self, resource: R, operations: I)
    where
        R: Into<String>,
        I: IntoIterator<Item = O>,
        O: Into<Operation>,
    {
        self.0
            .entry(resource.into())
            .or_default()
            .extend(operations.into_iter().map(Into::into));
    }

    /// Operations allowed for the `resource` pattern.
    pub fn operations(&self, resource: &str) -> Option<&BTreeSet<Operation>> {
        self.0.get(resource)
    }

    /// Sorted resource patterns.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether capability doesn't have any resource.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical JSON representation.
    pub fn to_json(&self) -> String {
        // Map of strings can't fail serialization.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl FromStr for Capability {
    type Err = AblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|err| AblyError::Deserialization {
            details: format!("Invalid capability: {err}"),
        })
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl<R, O> FromIterator<(R, Vec<O>)> for Capability
where
    R: Into<String>,
    O: Into<Operation>,
{
    fn from_iter<I: IntoIterator<Item = (R, Vec<O>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Capability::new(), |capability, (resource, operations)| {
                capability.with(resource, operations)
            })
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use test_case::test_case;

    #[test]
    fn serialize_in_canonical_form() {
        let capability = Capability::new()
            .with("channel2", ["subscribe", "publish"])
            .with("channel0", ["publish"])
            .with("channel1", ["*"]);

        assert_eq!(
            capability.to_json(),
            r#"{"channel0":["publish"],"channel1":["*"],"channel2":["publish","subscribe"]}"#
        );
    }

    #[test]
    fn compare_ignoring_order() {
        let first: Capability = r#"{"a":["subscribe","publish"],"b":["presence"]}"#
            .parse()
            .unwrap();
        let second: Capability = r#"{"b":["presence"],"a":["publish","subscribe","publish"]}"#
            .parse()
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_json(), second.to_json());
    }

    #[test_case("publish" => Operation::Publish)]
    #[test_case("*" => Operation::All)]
    #[test_case("channel-metadata" => Operation::ChannelMetadata)]
    #[test_case("publish_" => Operation::Other("publish_".into()); "unknown operation")]
    fn parse_operation(name: &str) -> Operation {
        Operation::from(name)
    }

    #[test]
    fn keep_unknown_operations_and_empty_lists() {
        let capability = Capability::new()
            .with("cansubscribe", ["publish_"])
            .with("empty", Vec::<Operation>::new());

        assert_eq!(
            capability.to_json(),
            r#"{"cansubscribe":["publish_"],"empty":[]}"#
        );
    }

    #[test]
    fn order_wildcard_first() {
        let capability = Capability::new().with("mixed", ["subscribe", "*", "publish"]);

        assert_eq!(capability.to_json(), r#"{"mixed":["*","publish","subscribe"]}"#);
    }

    #[test]
    fn treat_known_other_as_known_operation() {
        assert_eq!(Operation::Other("history".into()), Operation::History);
    }

    #[test]
    fn collect_from_pairs() {
        let capability: Capability = vec![("cansubscribe:*", vec!["subscribe"])]
            .into_iter()
            .collect();

        assert_eq!(
            capability.operations("cansubscribe:*"),
            Some(&BTreeSet::from([Operation::Subscribe]))
        );
        assert_eq!(capability.resources().collect::<Vec<_>>(), vec!["cansubscribe:*"]);
    }

    #[test]
    fn reject_malformed_json() {
        assert!(matches!(
            "[\"publish\"]".parse::<Capability>(),
            Err(AblyError::Deserialization { .. })
        ));
    }

    #[test]
    fn allow_everything() {
        assert_eq!(Capability::all().to_json(), r#"{"*":["*"]}"#);
    }
}
