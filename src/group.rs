// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Namespace grouping for category pages.
//!
//! Records are partitioned by the namespace part of their qualified name.
//! Both the groups and the records inside them come out sorted, so the
//! rendered pages do not depend on the order input files were read in.

use crate::parser::{CompoundRecord, MemberRecord};
use std::collections::BTreeMap;

/// Group key for names without any `::` scope.
pub const GLOBAL_NAMESPACE: &str = "Global";

const SCOPE_SEPARATOR: &str = "::";

/// Returns the namespace part of a qualified name.
///
/// # Example
///
/// ```
/// use doxy2md::group::namespace_of;
///
/// assert_eq!(namespace_of("ccx::assets_v2::AdobeAsset"), "ccx::assets_v2");
/// assert_eq!(namespace_of("Standalone"), "Global");
/// ```
#[must_use]
pub fn namespace_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once(SCOPE_SEPARATOR)
        .map_or(GLOBAL_NAMESPACE, |(namespace, _)| namespace)
}

/// A record that can be grouped by namespace.
pub trait Named {
    /// The qualified name used for both grouping and ordering.
    fn name(&self) -> &str;
    /// Tie-breaker when two records share a name.
    fn id(&self) -> &str;
}

impl Named for CompoundRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Named for MemberRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partitions records by namespace.
///
/// Groups are ordered by key; records inside a group by name, then id.
/// Records with an empty name are left out.
#[must_use]
pub fn group_by_namespace<'a, T: Named>(records: &'a [T]) -> BTreeMap<&'a str, Vec<&'a T>> {
    let mut groups: BTreeMap<&str, Vec<&T>> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.name().is_empty()) {
        groups
            .entry(namespace_of(record.name()))
            .or_default()
            .push(record);
    }
    for group in groups.values_mut() {
        sort_by_name(group);
    }
    groups
}

/// Sorts records by name, then id.
pub fn sort_by_name<T: Named>(records: &mut [&T]) {
    records.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CompoundKind, Protection};

    fn class(id: &str, name: &str) -> CompoundRecord {
        CompoundRecord {
            id: id.into(),
            kind: CompoundKind::Class,
            name: name.into(),
            language: "C++".into(),
            protection: Protection::Public,
            brief_description: String::new(),
            detailed_description: String::new(),
            base_classes: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    #[test]
    fn strips_last_scope_segment() {
        assert_eq!(namespace_of("ccx::assets_v2::AdobeAsset"), "ccx::assets_v2");
        assert_eq!(namespace_of("a::b"), "a");
    }

    #[test]
    fn unscoped_names_are_global() {
        assert_eq!(namespace_of("Standalone"), GLOBAL_NAMESPACE);
        assert_eq!(namespace_of(""), GLOBAL_NAMESPACE);
    }

    #[test]
    fn keeps_template_arguments_in_last_segment() {
        assert_eq!(namespace_of("ns::Box< ns::T >"), "ns::Box< ns");
    }

    #[test]
    fn groups_and_sorts() {
        let records = vec![
            class("c3", "ccx::util::Zeta"),
            class("c1", "Standalone"),
            class("c2", "ccx::util::Alpha"),
            class("c4", "ccx::Base"),
        ];
        let groups = group_by_namespace(&records);

        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["Global", "ccx", "ccx::util"]);

        let util: Vec<&str> = groups["ccx::util"].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(util, vec!["ccx::util::Alpha", "ccx::util::Zeta"]);
    }

    #[test]
    fn grouping_ignores_input_order() {
        let forward = vec![class("a", "n::A"), class("b", "n::B"), class("b2", "n::B")];
        let mut backward = forward.clone();
        backward.reverse();

        let ids = |records: &[CompoundRecord]| -> Vec<String> {
            group_by_namespace(records)
                .values()
                .flatten()
                .map(|c| c.id.clone())
                .collect()
        };
        assert_eq!(ids(&forward), ids(&backward));
        assert_eq!(ids(&forward), vec!["a", "b", "b2"]);
    }

    #[test]
    fn skips_unnamed_records() {
        let records = vec![class("anon", ""), class("named", "X")];
        let groups = group_by_namespace(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[GLOBAL_NAMESPACE].len(), 1);
    }
}
