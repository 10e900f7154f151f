//! Feature tokens
//!
//! A token is an opaque, case-sensitive flag such as `_MAX8TEXTURES`. Modules
//! declare the tokens they own as a closed enum through [`feature_tokens!`];
//! anything else that shows up in a feature set is carried as
//! [`TokenKind::Unknown`] so configurations written by newer modules survive.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A single feature flag
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureToken(Arc<str>);

impl FeatureToken {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(Arc::from(token.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the token begins with `prefix`
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Debug for FeatureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for FeatureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for FeatureToken {
    fn from(token: String) -> Self {
        Self(Arc::from(token))
    }
}

impl From<&FeatureToken> for FeatureToken {
    fn from(token: &FeatureToken) -> Self {
        token.clone()
    }
}

impl AsRef<str> for FeatureToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FeatureToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FeatureToken {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for FeatureToken {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Closed set of tokens owned by one module
///
/// Implemented by the enums generated with [`feature_tokens!`].
pub trait TokenEnum: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in declaration order
    const ALL: &'static [Self];

    /// Wire spelling of this token
    fn as_str(&self) -> &'static str;

    fn parse(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|known| known.as_str() == token)
    }

    fn token(&self) -> FeatureToken {
        FeatureToken::from(self.as_str())
    }

    fn owns(token: &str) -> bool {
        Self::parse(token).is_some()
    }
}

/// A token classified against one module's closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<K> {
    Known(K),
    Unknown(FeatureToken),
}

impl<K: TokenEnum> TokenKind<K> {
    pub fn classify(token: &FeatureToken) -> Self {
        match K::parse(token.as_str()) {
            Some(known) => TokenKind::Known(known),
            None => TokenKind::Unknown(token.clone()),
        }
    }

    pub fn known(&self) -> Option<K> {
        match self {
            TokenKind::Known(known) => Some(*known),
            TokenKind::Unknown(_) => None,
        }
    }
}

/// Declare the closed token enum of a module
///
/// ```
/// stratum_features::feature_tokens! {
///     /// Tokens owned by the example module
///     pub enum ExampleToken {
///         Fast => "_EXAMPLEFAST",
///         Precise => "_EXAMPLEPRECISE",
///     }
/// }
///
/// use stratum_features::TokenEnum;
/// assert_eq!(ExampleToken::parse("_EXAMPLEFAST"), Some(ExampleToken::Fast));
/// assert_eq!(ExampleToken::Precise.as_str(), "_EXAMPLEPRECISE");
/// ```
#[macro_export]
macro_rules! feature_tokens {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::TokenEnum for $name {
            const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }
    };
}
