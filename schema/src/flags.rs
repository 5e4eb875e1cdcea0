//! Usage flags: what a command needs from the server that exposes it.

use std::{fmt, ops::BitOr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::error::SchemaError;

/// A single capability tag attached to a command.
#[repr(u8)]
#[derive(
    Clone,
    Copy,
    Debug,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UsageFlag {
    /// Needs an authenticated wallet session.
    WalletOnly = 0,
    /// Served by the chain server and never needs a wallet.
    ChainOnly = 1,
    /// Only usable over the streaming (websocket) transport.
    WebsocketOnly = 2,
    /// A server-to-client notification; its result carries no JSON payload.
    Notification = 3,
}

impl UsageFlag {
    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Name as used in configuration and on the command line.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for UsageFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of `UsageFlag`s.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct UsageFlags(u8);

impl UsageFlags {
    /// The empty set: usable over any transport, with or without a wallet.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `flag` is set.
    pub fn contains(self, flag: UsageFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Whether every flag of `other` is set.
    pub fn contains_all(self, other: UsageFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether at least one flag of `other` is set.
    pub fn intersects(self, other: UsageFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Set `flag`.
    pub fn insert(&mut self, flag: UsageFlag) {
        self.0 |= flag.bit();
    }

    /// The flags in this set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = UsageFlag> + Clone {
        UsageFlag::iter().filter(move |flag| self.contains(*flag))
    }

    /// Reject combinations that no server could honour.
    pub fn validate(self) -> Result<(), SchemaError> {
        let contradiction = if self.contains(UsageFlag::WalletOnly)
            && self.contains(UsageFlag::ChainOnly)
        {
            Some("a command cannot both require and never require a wallet")
        } else if self.contains(UsageFlag::Notification)
            && !self.contains(UsageFlag::WebsocketOnly)
        {
            Some("notifications are only delivered over websockets")
        } else {
            None
        };

        match contradiction {
            Some(reason) => Err(SchemaError::ContradictoryFlags {
                flags: self,
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl From<UsageFlag> for UsageFlags {
    fn from(flag: UsageFlag) -> Self {
        Self(flag.bit())
    }
}

impl FromIterator<UsageFlag> for UsageFlags {
    fn from_iter<I: IntoIterator<Item = UsageFlag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl BitOr for UsageFlags {
    type Output = UsageFlags;

    fn bitor(self, rhs: UsageFlags) -> UsageFlags {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<UsageFlag> for UsageFlags {
    type Output = UsageFlags;

    fn bitor(self, rhs: UsageFlag) -> UsageFlags {
        self | UsageFlags::from(rhs)
    }
}

impl BitOr for UsageFlag {
    type Output = UsageFlags;

    fn bitor(self, rhs: UsageFlag) -> UsageFlags {
        UsageFlags::from(self) | rhs
    }
}

impl fmt::Display for UsageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("none")
        } else {
            write!(f, "{}", self.iter().join("|"))
        }
    }
}

impl fmt::Debug for UsageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UsageFlags({})", self)
    }
}

/// Predicate over usage flags, used to pick which commands a server exposes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FlagFilter {
    required: UsageFlags,
    excluded: UsageFlags,
}

impl FlagFilter {
    /// Matches every command.
    pub fn all() -> Self {
        Self::default()
    }

    /// Additionally require all of `flags`.
    pub fn with<F: Into<UsageFlags>>(mut self, flags: F) -> Self {
        self.required = self.required | flags.into();
        self
    }

    /// Additionally reject commands having any of `flags`.
    pub fn without<F: Into<UsageFlags>>(mut self, flags: F) -> Self {
        self.excluded = self.excluded | flags.into();
        self
    }

    /// Whether a command with `flags` passes this filter.
    pub fn matches(&self, flags: UsageFlags) -> bool {
        flags.contains_all(self.required) && !flags.intersects(self.excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_names_round_trip() {
        for flag in UsageFlag::iter() {
            assert_eq!(flag.as_str().parse::<UsageFlag>(), Ok(flag));
        }
        assert_eq!("wallet-only".parse::<UsageFlag>(), Ok(UsageFlag::WalletOnly));
        assert!("walletonly".parse::<UsageFlag>().is_err());
    }

    #[test]
    fn set_operations() {
        let flags = UsageFlag::WebsocketOnly | UsageFlag::Notification;
        assert!(flags.contains(UsageFlag::Notification));
        assert!(!flags.contains(UsageFlag::WalletOnly));
        assert!(flags.contains_all(UsageFlag::WebsocketOnly.into()));
        assert!(!flags.intersects(UsageFlag::WalletOnly.into()));
        assert_eq!(flags.to_string(), "websocket-only|notification");
        assert_eq!(UsageFlags::empty().to_string(), "none");
        assert_eq!(
            flags.iter().collect::<Vec<_>>(),
            vec![UsageFlag::WebsocketOnly, UsageFlag::Notification]
        );
    }

    #[test]
    fn contradictory_flags() {
        assert!(UsageFlags::from(UsageFlag::WalletOnly).validate().is_ok());
        assert!(
            (UsageFlag::WebsocketOnly | UsageFlag::Notification)
                .validate()
                .is_ok()
        );
        assert!(matches!(
            (UsageFlag::WalletOnly | UsageFlag::ChainOnly).validate(),
            Err(SchemaError::ContradictoryFlags { .. })
        ));
        assert!(matches!(
            UsageFlags::from(UsageFlag::Notification).validate(),
            Err(SchemaError::ContradictoryFlags { .. })
        ));
    }

    #[test]
    fn filter_matches() {
        let wallet: UsageFlags = UsageFlag::WalletOnly.into();
        let ws = UsageFlag::WebsocketOnly | UsageFlag::WalletOnly;
        let plain = UsageFlags::empty();

        let only_wallet = FlagFilter::all().with(UsageFlag::WalletOnly);
        assert!(only_wallet.matches(wallet));
        assert!(only_wallet.matches(ws));
        assert!(!only_wallet.matches(plain));

        let http = FlagFilter::all().without(UsageFlag::WebsocketOnly);
        assert!(http.matches(wallet));
        assert!(!http.matches(ws));
        assert!(http.matches(plain));

        assert!(FlagFilter::all().matches(ws));
    }
}
