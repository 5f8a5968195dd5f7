// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Replica role derivation from a committed configuration.

use crate::model::{CommittedConfig, MemberType};
use std::fmt;

/// Role of a replica in its replication group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Leader,
    Follower,
    Learner,
    Unknown,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Self::Leader => "LEADER",
            Self::Follower => "FOLLOWER",
            Self::Learner => "LEARNER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derive the role of `uuid` from `config`.
///
/// A uuid absent from the config is `Unknown`; this is a normal transient
/// state during reconfiguration.
pub fn consensus_role(uuid: &str, config: &CommittedConfig) -> Role {
    let Some(peer) = config.peer(uuid) else {
        return Role::Unknown;
    };
    if config.leader_uuid.as_deref() == Some(uuid) {
        return Role::Leader;
    }
    match peer.member_type {
        MemberType::Voter => Role::Follower,
        MemberType::NonVoter => Role::Learner,
    }
}
