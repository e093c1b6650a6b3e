//! Dependency graph over migrations.

use std::collections::{BTreeMap, BTreeSet};

use super::{Migration, MigrationError, MigrationKey};

#[derive(Debug, Clone, Default)]
pub struct MigrationGraph {
    nodes: BTreeMap<MigrationKey, Migration>,
    order: Vec<MigrationKey>,
}

impl MigrationGraph {
    /// Build and check the graph: keys must be unique, every dependency
    /// must exist, and there must be no cycle.
    pub fn build(migrations: Vec<Migration>) -> Result<Self, MigrationError> {
        let mut nodes = BTreeMap::new();
        for migration in migrations {
            let key = migration.key.clone();
            if nodes.insert(key.clone(), migration).is_some() {
                return Err(MigrationError::Duplicate(key));
            }
        }

        for migration in nodes.values() {
            for dep in &migration.dependencies {
                if !nodes.contains_key(dep) {
                    return Err(MigrationError::MissingDependency {
                        migration: migration.key.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let order = topological_order(&nodes)?;
        Ok(Self { nodes, order })
    }

    #[must_use]
    pub fn get(&self, key: &MigrationKey) -> Option<&Migration> {
        self.nodes.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &MigrationKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every migration, dependencies first. Ties are broken by key order so
    /// the plan is the same on every run.
    pub fn ordered(&self) -> impl Iterator<Item = &Migration> {
        self.order.iter().filter_map(|k| self.nodes.get(k))
    }

    /// Migrations nothing else depends on.
    #[must_use]
    pub fn leaf_nodes(&self) -> Vec<&MigrationKey> {
        let depended_on: BTreeSet<&MigrationKey> = self
            .nodes
            .values()
            .flat_map(|m| m.dependencies.iter())
            .collect();
        self.nodes
            .keys()
            .filter(|k| !depended_on.contains(k))
            .collect()
    }
}

fn topological_order(
    nodes: &BTreeMap<MigrationKey, Migration>,
) -> Result<Vec<MigrationKey>, MigrationError> {
    let mut pending: BTreeMap<&MigrationKey, usize> = nodes
        .iter()
        .map(|(k, m)| (k, m.dependencies.iter().collect::<BTreeSet<_>>().len()))
        .collect();
    let mut dependants: BTreeMap<&MigrationKey, Vec<&MigrationKey>> = BTreeMap::new();
    for (key, migration) in nodes {
        for dep in migration.dependencies.iter().collect::<BTreeSet<_>>() {
            dependants.entry(dep).or_default().push(key);
        }
    }

    let mut ready: BTreeSet<&MigrationKey> = pending
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(k, _)| *k)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(key) = ready.pop_first() {
        order.push(key.clone());
        pending.remove(key);
        for dependant in dependants.get(key).into_iter().flatten() {
            if let Some(n) = pending.get_mut(dependant) {
                *n -= 1;
                if *n == 0 {
                    ready.insert(*dependant);
                }
            }
        }
    }

    if pending.is_empty() {
        Ok(order)
    } else {
        Err(MigrationError::Cycle(
            pending.into_keys().cloned().collect(),
        ))
    }
}
