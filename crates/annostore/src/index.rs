// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Reverse indices: grouping key → sorted member identities.

use crate::{
    Error, Matrix,
    pad::{self, SENTINEL},
    schema::{IndexSpec, Member},
    table::ObjectTable,
};
use itertools::Itertools;

/// Buckets of member identities, one per key identity of the group kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseIndex {
    /// Persisted name (`list_boxes_per_image`, ...).
    pub name: String,
    /// Group key kind.
    pub group: String,
    /// `buckets[k]` holds the sorted, duplicate-free members of key `k`.
    pub buckets: Vec<Vec<i32>>,
}

impl ReverseIndex {
    /// Padded matrix form persisted in the store.
    pub fn to_matrix(&self) -> Result<Matrix<i32>, Error> {
        pad::pad(&self.buckets, SENTINEL)
    }
}

/// Group `members` by `groups`, row by row.
///
/// Row `i` contributes `members[i]` to bucket `groups[i]`. Rows where either
/// side is [`SENTINEL`] contribute nothing. One bucket is produced for every
/// key identity in `0..universe_len`, empty ones included. Members are
/// de-duplicated and then sorted, so bucket order is value order rather than
/// visit order.
pub fn build_reverse_index(
    groups: &[i32],
    members: &[i32],
    universe_len: usize,
) -> Result<Vec<Vec<i32>>, Error> {
    if groups.len() != members.len() {
        return Err(Error::InvalidInput(format!(
            "Group column has {} rows but member column has {}",
            groups.len(),
            members.len()
        )));
    }

    let mut buckets: Vec<Vec<i32>> = vec![Vec::new(); universe_len];
    for (row, (&group, &member)) in groups.iter().zip(members).enumerate() {
        if group == SENTINEL || member == SENTINEL {
            continue;
        }
        let bucket = usize::try_from(group)
            .ok()
            .and_then(|g| buckets.get_mut(g))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Row {} has group identity {} outside 0..{}",
                    row, group, universe_len
                ))
            })?;
        bucket.push(member);
    }

    Ok(buckets
        .into_iter()
        .map(|bucket| bucket.into_iter().unique().sorted_unstable().collect())
        .collect())
}

/// Build the reverse index described by `spec` over `table`.
///
/// A key kind never declared by the table's records yields all-empty
/// buckets.
pub fn reverse_index(
    table: &ObjectTable,
    spec: &IndexSpec,
    universe_len: usize,
) -> Result<ReverseIndex, Error> {
    let absent = vec![SENTINEL; table.len];
    let groups = table.key_column(&spec.group).unwrap_or(absent.as_slice());
    let members: Vec<i32> = match &spec.member {
        Member::Row => table.identities().collect(),
        Member::Key(kind) => table.key_column(kind).unwrap_or(absent.as_slice()).to_vec(),
    };

    let buckets = build_reverse_index(groups, &members, universe_len)?;
    log::debug!(
        "Index '{}': {} buckets over {} rows of '{}'",
        spec.name,
        buckets.len(),
        table.len,
        table.name
    );

    Ok(ReverseIndex {
        name: spec.name.clone(),
        group: spec.group.clone(),
        buckets,
    })
}
