// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Display order of a tablet's replicas.

use tabula_catalog::Role;

fn priority(role: Role) -> u8 {
    match role {
        Role::Leader => 0,
        Role::Follower => 1,
        Role::Learner => 2,
        Role::Unknown => 3,
    }
}

/// Order rendered replicas leader first, then followers, learners and unknown.
///
/// The sort is stable: replicas with the same role keep their input order,
/// which is the committed config's peer order.
pub fn order_replicas<T>(mut replicas: Vec<(T, Role)>) -> Vec<T> {
    replicas.sort_by_key(|(_, role)| priority(*role));
    replicas.into_iter().map(|(fragment, _)| fragment).collect()
}
