// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supported social networks.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A social network the backend can publish to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    TikTok,
    Facebook,
    Instagram,
    LinkedIn,
    WhatsApp,
}

impl Network {
    /// All networks, in display order.
    pub const ALL: [Network; 5] = [
        Network::TikTok,
        Network::Facebook,
        Network::Instagram,
        Network::LinkedIn,
        Network::WhatsApp,
    ];

    /// Key of this network's entry inside message content (`"TikTok"`).
    pub fn content_key(self) -> &'static str {
        match self {
            Network::TikTok => "TikTok",
            Network::Facebook => "Facebook",
            Network::Instagram => "Instagram",
            Network::LinkedIn => "LinkedIn",
            Network::WhatsApp => "WhatsApp",
        }
    }

    /// Lowercase URL segment and provider name (`"tiktok"`).
    pub fn slug(self) -> &'static str {
        match self {
            Network::TikTok => "tiktok",
            Network::Facebook => "facebook",
            Network::Instagram => "instagram",
            Network::LinkedIn => "linkedin",
            Network::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.content_key())
    }
}

impl FromStr for Network {
    type Err = ClientError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Network::ALL
            .into_iter()
            .find(|n| n.content_key().eq_ignore_ascii_case(name))
            .ok_or_else(|| ClientError::UnsupportedNetwork(name.to_string()))
    }
}
