use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolves table dependencies for schema generation
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Given a set of requested tables, resolve all required FK parents.
    /// Returns tables in dependency order (parents before children)
    pub fn resolve_includes(
        &self,
        requested: &[&str],
    ) -> Result<Vec<&'static TableSchema>, String> {
        let mut included: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = requested.iter().copied().collect();

        while let Some(table_name) = queue.pop_front() {
            if included.contains(table_name) {
                continue;
            }

            if get_table(table_name).is_none() {
                return Err(format!("Unknown table: {}", table_name));
            }

            included.insert(table_name);

            if let Some(table_deps) = self.deps.get(table_name) {
                for dep in table_deps {
                    if !included.contains(dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        self.topological_sort(&included)
    }

    /// Return all tables in dependency order
    pub fn all_tables_ordered(&self) -> Result<Vec<&'static TableSchema>, String> {
        let all: HashSet<&str> = ALL_TABLES.iter().map(|t| t.name).collect();
        self.topological_sort(&all)
    }

    /// Topological sort of tables by dependencies, stable with respect to
    /// the registry order
    fn topological_sort(
        &self,
        included: &HashSet<&str>,
    ) -> Result<Vec<&'static TableSchema>, String> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in ALL_TABLES {
            if included.contains(table.name) && !visited.contains(table.name) {
                self.visit(
                    table.name,
                    included,
                    &mut visited,
                    &mut temp_visited,
                    &mut result,
                )?;
            }
        }

        Ok(result)
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        included: &HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<(), String> {
        if temp_visited.contains(name) {
            return Err(format!("Circular dependency detected at: {}", name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<_> = deps.iter().copied().collect();
            deps.sort_unstable();
            for dep in deps {
                if dep != name && included.contains(dep) {
                    self.visit(dep, included, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        if let Some(table) = get_table(name) {
            result.push(table);
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
