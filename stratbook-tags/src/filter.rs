//! Nade selection filters
//!
//! A [`FilterOptions`] value names one map and, optionally, sets of sides, grenade types and sites.
//! An empty set places no restriction; a non-empty set admits a nade whose field equals any member.

use crate::metadata::NadeMetadata;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident, $what:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Spelling used in tag files
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Whether a tag file value names this variant (case-insensitive)
            pub fn matches(&self, value: &str) -> bool {
                value.eq_ignore_ascii_case(self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($text) {
                    return Ok($name::$variant);
                })+
                let expected: &[&str] = &[$($text),+];
                Err(format!("unknown {} '{}' (expected one of: {})", $what, s, expected.join(", ")))
            }
        }
    };
}

tag_enum!(
    /// Team side a nade is thrown from
    Side, "side", { T => "T", Ct => "CT" }
);

tag_enum!(
    NadeType, "nade type", {
        Smoke => "smoke",
        Flash => "flash",
        Molotov => "molotov",
        HeGrenade => "he_grenade",
    }
);

tag_enum!(
    /// Bomb site or area a nade lands at
    Site, "site", { A => "A", B => "B", Mid => "Mid" }
);

/// Which nades to select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    map: String,
    sides: BTreeSet<Side>,
    types: BTreeSet<NadeType>,
    sites: BTreeSet<Site>,
}

impl FilterOptions {
    /// Select every nade on `map` (compared case-insensitively).
    pub fn for_map(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            ..Default::default()
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.sides.insert(side);
        self
    }

    pub fn with_type(mut self, nade_type: NadeType) -> Self {
        self.types.insert(nade_type);
        self
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.sites.insert(site);
        self
    }

    pub fn map(&self) -> &str {
        &self.map
    }

    pub fn matches(&self, nade: &NadeMetadata) -> bool {
        nade.map_name.to_lowercase() == self.map.to_lowercase()
            && admits(&self.sides, &nade.side, Side::matches)
            && admits(&self.types, &nade.nade_type, NadeType::matches)
            && admits(&self.sites, &nade.site, Site::matches)
    }
}

fn admits<T>(allowed: &BTreeSet<T>, value: &str, matches: fn(&T, &str) -> bool) -> bool {
    allowed.is_empty() || allowed.iter().any(|item| matches(item, value))
}

/// Nades matching `options`, in their original order.
pub fn filter<'a>(nades: &'a [NadeMetadata], options: &FilterOptions) -> Vec<&'a NadeMetadata> {
    nades.iter().filter(|nade| options.matches(nade)).collect()
}
