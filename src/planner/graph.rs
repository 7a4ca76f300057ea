//! Граф зависимостей грантов и их упорядочивание
//!
//! Ребро `A -> B` означает, что платформа отклонит A без B:
//! грант на объект схемы требует USAGE на схему, грант на схему требует
//! USAGE на базу. Порядок вывода строится алгоритмом Кана с детерминированным
//! выбором среди готовых вершин.

use super::shares::SharesPolicy;
use crate::common::{Error, ParentGrantPolicy, Result};
use crate::grant::{Grant, GrantId, GrantOrderKey};
use crate::privilege::Privilege;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Грант после построения графа
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedGrant {
    /// Стабильный идентификатор (адресуемое имя ресурса)
    pub id: GrantId,
    pub grant: Grant,
    /// Грант адресуется по имени из-за шаринга
    pub shares_excluded: bool,
    /// Грант выведен как отсутствующий родитель
    pub inferred: bool,
    /// Родитель отсутствует и ребро не построено
    pub detached: bool,
    /// Идентификаторы грантов, которые должны быть применены раньше
    pub depends_on: Vec<GrantId>,
    /// Глубина зависимостей; гранты одной волны независимы друг от друга
    pub wave: usize,
}

#[derive(Debug, Clone)]
struct Node {
    grant: Grant,
    shares_excluded: bool,
    inferred: bool,
    detached: bool,
    depends_on: IndexSet<GrantId>,
}

/// Граф зависимостей грантов одного окружения
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: IndexMap<GrantId, Node>,
    index: HashMap<Grant, GrantId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Строит граф по набору грантов
    ///
    /// Родительские гранты ищутся среди входных; если родителя нет,
    /// поведение определяет `policy`.
    pub fn build(
        grants: impl IntoIterator<Item = Grant>,
        shares: &SharesPolicy,
        policy: ParentGrantPolicy,
    ) -> Result<Self> {
        let mut graph = Self::new();
        for grant in grants {
            graph.insert(grant, shares, false)?;
        }

        // Выведенные родители добавляются в конец и тоже обрабатываются
        let mut position = 0;
        while position < graph.nodes.len() {
            graph.attach_parent(position, shares, policy)?;
            position += 1;
        }

        log::debug!("Построен граф зависимостей: {} грантов", graph.len());
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &GrantId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Идентификатор гранта, если он есть в графе
    pub fn id_of(&self, grant: &Grant) -> Option<&GrantId> {
        self.index.get(grant)
    }

    /// Прямые зависимости гранта
    pub fn dependencies(&self, id: &GrantId) -> Vec<&GrantId> {
        self.nodes
            .get(id)
            .map(|node| node.depends_on.iter().collect())
            .unwrap_or_default()
    }

    /// Добавляет ребро, заданное вызывающим
    pub fn add_dependency(&mut self, dependent: &GrantId, dependency: &GrantId) -> Result<()> {
        if !self.nodes.contains_key(dependency) {
            return Err(Error::validation(format!(
                "Unknown grant in dependency: '{}'",
                dependency
            )));
        }
        let node = self.nodes.get_mut(dependent).ok_or_else(|| {
            Error::validation(format!("Unknown grant in dependency: '{}'", dependent))
        })?;
        node.depends_on.insert(dependency.clone());
        Ok(())
    }

    /// Стабильный топологический порядок
    pub fn order(&self) -> Result<Vec<PlannedGrant>> {
        let mut remaining: HashMap<&GrantId, usize> = HashMap::with_capacity(self.nodes.len());
        let mut dependents: HashMap<&GrantId, Vec<&GrantId>> = HashMap::new();
        let mut ready: BTreeSet<(GrantOrderKey, &GrantId)> = BTreeSet::new();

        for (id, node) in &self.nodes {
            remaining.insert(id, node.depends_on.len());
            for dependency in &node.depends_on {
                dependents.entry(dependency).or_default().push(id);
            }
            if node.depends_on.is_empty() {
                ready.insert((node.grant.order_key(), id));
            }
        }

        let mut waves: HashMap<&GrantId, usize> = HashMap::with_capacity(self.nodes.len());
        let mut ordered = Vec::with_capacity(self.nodes.len());

        while let Some((_, id)) = ready.pop_first() {
            let node = &self.nodes[id];
            let wave = node
                .depends_on
                .iter()
                .filter_map(|dependency| waves.get(dependency))
                .map(|wave| wave + 1)
                .max()
                .unwrap_or(0);
            waves.insert(id, wave);

            let mut depends_on: Vec<GrantId> = node.depends_on.iter().cloned().collect();
            depends_on.sort();

            ordered.push(PlannedGrant {
                id: id.clone(),
                grant: node.grant.clone(),
                shares_excluded: node.shares_excluded,
                inferred: node.inferred,
                detached: node.detached,
                depends_on,
                wave,
            });

            for dependent in dependents.get(id).into_iter().flatten() {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert((self.nodes[*dependent].grant.order_key(), *dependent));
                    }
                }
            }
        }

        if ordered.len() < self.nodes.len() {
            let unresolved: HashSet<&GrantId> = remaining
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(id, _)| id)
                .collect();
            let cycle = self.find_cycle(&unresolved);
            log::error!("Обнаружен цикл зависимостей: {:?}", cycle);
            return Err(Error::dependency_cycle(cycle));
        }

        Ok(ordered)
    }

    fn insert(&mut self, grant: Grant, shares: &SharesPolicy, inferred: bool) -> Result<GrantId> {
        if let Some(id) = self.index.get(&grant) {
            return Ok(id.clone());
        }

        let shares_excluded = shares.routes_by_name(&grant);
        let id = grant.id(shares_excluded);
        if let Some(existing) = self.nodes.get(&id) {
            return Err(Error::validation(format!(
                "Grant id collision '{}' between '{}' and '{}'",
                id, existing.grant, grant
            )));
        }

        self.index.insert(grant.clone(), id.clone());
        self.nodes.insert(
            id.clone(),
            Node {
                grant,
                shares_excluded,
                inferred,
                detached: false,
                depends_on: IndexSet::new(),
            },
        );
        Ok(id)
    }

    fn attach_parent(
        &mut self,
        position: usize,
        shares: &SharesPolicy,
        policy: ParentGrantPolicy,
    ) -> Result<()> {
        let Some((id, node)) = self.nodes.get_index(position) else {
            return Ok(());
        };
        let Some(parent) = parent_grant(&node.grant) else {
            return Ok(());
        };
        let id = id.clone();

        let parent_id = match (self.index.get(&parent).cloned(), policy) {
            (Some(parent_id), _) => parent_id,
            (None, ParentGrantPolicy::Infer) => {
                log::debug!("Выведен родительский грант '{}' для '{}'", parent, id);
                self.insert(parent, shares, true)?
            }
            (None, ParentGrantPolicy::Detached) => {
                log::warn!(
                    "Грант '{}' выпущен без родительского гранта '{}'",
                    id,
                    parent
                );
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.detached = true;
                }
                return Ok(());
            }
            (None, ParentGrantPolicy::Reject) => {
                return Err(Error::MissingParentGrant {
                    grant: id.to_string(),
                    parent: parent.id(false).to_string(),
                });
            }
        };

        self.add_dependency(&id, &parent_id)
    }

    /// Поиск в глубину по неразрешенным вершинам
    fn find_cycle(&self, unresolved: &HashSet<&GrantId>) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for id in self.nodes.keys().filter(|id| unresolved.contains(id)) {
            if !visited.contains(id) {
                if let Some(cycle) =
                    self.dfs_detect_cycle(id, unresolved, &mut visited, &mut rec_stack, &mut path)
                {
                    return cycle.into_iter().map(|id| id.to_string()).collect();
                }
            }
        }

        let mut ids: Vec<String> = unresolved.iter().map(|id| id.to_string()).collect();
        ids.sort();
        ids
    }

    fn dfs_detect_cycle<'a>(
        &'a self,
        id: &'a GrantId,
        unresolved: &HashSet<&GrantId>,
        visited: &mut HashSet<&'a GrantId>,
        rec_stack: &mut HashSet<&'a GrantId>,
        path: &mut Vec<&'a GrantId>,
    ) -> Option<Vec<&'a GrantId>> {
        visited.insert(id);
        rec_stack.insert(id);
        path.push(id);

        for dependency in self.nodes[id].depends_on.iter() {
            if !unresolved.contains(dependency) {
                continue;
            }
            if !visited.contains(dependency) {
                if let Some(cycle) =
                    self.dfs_detect_cycle(dependency, unresolved, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(dependency) {
                // Замыкаем цикл на вершине, с которой он начался
                let start = path.iter().position(|node| *node == dependency)?;
                let mut cycle = path[start..].to_vec();
                cycle.push(dependency);
                return Some(cycle);
            }
        }

        path.pop();
        rec_stack.remove(id);
        None
    }
}

/// Грант USAGE, без которого платформа отклонит данный грант
fn parent_grant(grant: &Grant) -> Option<Grant> {
    match grant {
        Grant::SchemaObject(grant) => Some(Grant::schema(
            &grant.database,
            &grant.schema,
            Privilege::Usage,
            &grant.role,
        )),
        Grant::Schema(grant) => Some(Grant::database(
            &grant.database,
            Privilege::Usage,
            &grant.role,
        )),
        Grant::Database(_) | Grant::VirtualWarehouse(_) => None,
    }
}
