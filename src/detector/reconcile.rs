//! Set reconciliation between the allow-list and live inventories.
//!
//! Every function here is pure. Member lists are sorted so results compare
//! deterministically; the order carries no meaning.

use std::collections::{HashMap, HashSet};

use crate::config::{AppConfig, SpaceConfig};
use crate::detector::Kind;

/// Partition of the union of expected and live names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Live but not in the allow-list.
    pub unknown: Vec<String>,
    /// In the allow-list, not optional, and not live.
    pub missing: Vec<String>,
    /// Both live and in the allow-list.
    pub matched: Vec<String>,
}

/// Result of reconciling one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindReport {
    pub kind: Kind,
    pub diff: Diff,
    /// Spaces whose live SSH setting disagrees with the allow-list.
    pub ssh_violations: Vec<String>,
}

#[derive(Default)]
struct Presence {
    expected: bool,
    optional: bool,
    live: bool,
}

/// Diff `live` names against `expected` `(name, optional)` pairs.
///
/// A name declared more than once is optional only if every declaration is.
pub fn diff<'a, E, L>(expected: E, live: L) -> Diff
where
    E: IntoIterator<Item = (&'a str, bool)>,
    L: IntoIterator<Item = &'a str>,
{
    let mut presence: HashMap<&'a str, Presence> = HashMap::new();

    for (name, optional) in expected {
        let entry = presence.entry(name).or_default();
        entry.optional = if entry.expected { entry.optional && optional } else { optional };
        entry.expected = true;
    }
    for name in live {
        presence.entry(name).or_default().live = true;
    }

    let mut result = Diff::default();
    for (name, p) in presence {
        match (p.expected, p.live) {
            (true, true) => result.matched.push(name.to_string()),
            (false, true) => result.unknown.push(name.to_string()),
            (true, false) if !p.optional => result.missing.push(name.to_string()),
            _ => {}
        }
    }

    result.unknown.sort();
    result.missing.sort();
    result.matched.sort();
    result
}

pub fn reconcile_apps(config: &AppConfig, live: &HashSet<String>) -> KindReport {
    let expected = config.apps.iter().map(|a| (a.name.as_str(), a.optional));
    KindReport {
        kind: Kind::Apps,
        diff: diff(expected, live.iter().map(String::as_str)),
        ssh_violations: Vec::new(),
    }
}

/// Routes are compared as `host.domain` strings; each inherits `optional`
/// from the application declaring it.
pub fn reconcile_routes(config: &AppConfig, live: &HashSet<String>) -> KindReport {
    let declared: Vec<(String, bool)> = config
        .apps
        .iter()
        .flat_map(|app| app.routes.iter().map(move |r| (r.to_string(), app.optional)))
        .collect();
    let expected = declared.iter().map(|(route, optional)| (route.as_str(), *optional));

    KindReport {
        kind: Kind::Routes,
        diff: diff(expected, live.iter().map(String::as_str)),
        ssh_violations: Vec::new(),
    }
}

/// Spaces are never optional. SSH is only checked for matched spaces.
///
/// A name may be live more than once (one per organization); it is a
/// violation if any of those spaces disagrees with the allow-list.
pub fn reconcile_spaces(config: &SpaceConfig, live: &HashSet<(String, bool)>) -> KindReport {
    let expected = config.spaces.iter().map(|s| (s.name.as_str(), false));
    let diff = diff(expected, live.iter().map(|(name, _)| name.as_str()));

    let mut live_ssh: HashMap<&str, Vec<bool>> = HashMap::new();
    for (name, ssh) in live {
        live_ssh.entry(name.as_str()).or_default().push(*ssh);
    }

    let mut checked = HashSet::new();
    let mut ssh_violations: Vec<String> = config
        .spaces
        .iter()
        .filter(|&s| checked.insert(s.name.as_str()))
        .filter(|s| {
            live_ssh
                .get(s.name.as_str())
                .is_some_and(|states| states.iter().any(|&ssh| ssh != s.allow_ssh))
        })
        .map(|s| s.name.clone())
        .collect();
    ssh_violations.sort();

    KindReport {
        kind: Kind::Spaces,
        diff,
        ssh_violations,
    }
}
