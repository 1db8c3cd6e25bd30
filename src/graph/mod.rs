use crate::calendar::{CalendarMut, CalendarRef, ProjectCalendar};
use crate::defaults::ProjectDefaults;
use crate::error::CalendarError;
use crate::week::{DayType, WEEKDAYS, is_weekend};
use log::{trace, warn};
use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef};

/// Handle to a calendar stored in a [`CalendarGraph`]. Stays valid until the
/// calendar is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarId(NodeIndex);

impl CalendarId {
    pub fn index(&self) -> usize {
        self.0.index()
    }
}

/// Every calendar of a project plus the derivation links between them.
///
/// An edge runs from a base calendar to each calendar derived from it. A
/// calendar has at most one incoming edge and the graph never contains a
/// cycle.
#[derive(Debug, Clone, Default)]
pub struct CalendarGraph {
    graph: StableDiGraph<ProjectCalendar, ()>,
    defaults: ProjectDefaults,
}

impl CalendarGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: ProjectDefaults) -> Self {
        Self {
            graph: StableDiGraph::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &ProjectDefaults {
        &self.defaults
    }

    /// Cached results depend on the defaults, so every calendar is
    /// invalidated.
    pub fn set_defaults(&mut self, defaults: ProjectDefaults) {
        self.defaults = defaults;
        for calendar in self.graph.node_weights_mut() {
            calendar.caches.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Add an empty root calendar.
    pub fn add_calendar(&mut self, name: impl Into<String>) -> CalendarId {
        self.insert(ProjectCalendar::new(name))
    }

    pub(crate) fn insert(&mut self, calendar: ProjectCalendar) -> CalendarId {
        CalendarId(self.graph.add_node(calendar))
    }

    /// "Standard": Monday to Friday working with the default hours stored
    /// explicitly on every day.
    pub fn add_default_base_calendar(&mut self) -> CalendarId {
        let mut calendar = ProjectCalendar::new(ProjectCalendar::DEFAULT_BASE_NAME);
        for day in WEEKDAYS {
            calendar.week.set_working_day(day, !is_weekend(day));
        }
        calendar.week.add_default_hours();
        self.insert(calendar)
    }

    /// A calendar deriving every day from `parent`.
    pub fn add_default_derived_calendar(
        &mut self,
        parent: CalendarId,
    ) -> Result<CalendarId, CalendarError> {
        self.calendar(parent)?;
        let mut calendar = ProjectCalendar::new("");
        for day in WEEKDAYS {
            calendar.week.set_day_type(day, Some(DayType::Default));
        }
        let id = self.insert(calendar);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Remove a calendar. Calendars derived from it become roots.
    pub fn remove_calendar(&mut self, id: CalendarId) -> Option<ProjectCalendar> {
        if !self.graph.contains_node(id.0) {
            return None;
        }
        self.invalidate(id);
        let derived: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(id.0, Direction::Outgoing)
            .collect();
        for child in derived {
            if let Some(calendar) = self.graph.node_weight_mut(child) {
                calendar.week.set_derived(false);
            }
        }
        self.graph.remove_node(id.0)
    }

    pub fn get(&self, id: CalendarId) -> Option<CalendarRef<'_>> {
        self.graph
            .node_weight(id.0)
            .map(|calendar| CalendarRef::new(self, id, calendar))
    }

    pub fn get_mut(&mut self, id: CalendarId) -> Option<CalendarMut<'_>> {
        if self.graph.contains_node(id.0) {
            Some(CalendarMut::new(self, id))
        } else {
            None
        }
    }

    pub fn calendar(&self, id: CalendarId) -> Result<CalendarRef<'_>, CalendarError> {
        self.get(id).ok_or(CalendarError::UnknownCalendar(id))
    }

    pub fn calendar_mut(&mut self, id: CalendarId) -> Result<CalendarMut<'_>, CalendarError> {
        self.get_mut(id).ok_or(CalendarError::UnknownCalendar(id))
    }

    /// Case-insensitive lookup; the first match wins.
    pub fn by_name(&self, name: &str) -> Option<CalendarRef<'_>> {
        self.iter()
            .find(|calendar| calendar.name().eq_ignore_ascii_case(name))
    }

    pub fn ids(&self) -> impl Iterator<Item = CalendarId> + '_ {
        self.graph.node_indices().map(CalendarId)
    }

    pub fn iter(&self) -> impl Iterator<Item = CalendarRef<'_>> + '_ {
        self.ids().filter_map(|id| self.get(id))
    }

    pub fn parent_of(&self, id: CalendarId) -> Option<CalendarId> {
        self.graph
            .neighbors_directed(id.0, Direction::Incoming)
            .next()
            .map(CalendarId)
    }

    pub fn derived_of(&self, id: CalendarId) -> Vec<CalendarId> {
        let mut derived: Vec<CalendarId> = self
            .graph
            .neighbors_directed(id.0, Direction::Outgoing)
            .map(CalendarId)
            .collect();
        derived.sort();
        derived
    }

    /// Link `id` to a new base calendar, or detach it with `None`.
    ///
    /// Returns `Ok(false)` without changing anything when `parent` is `id`
    /// itself or one of its derived calendars.
    pub fn set_parent(
        &mut self,
        id: CalendarId,
        parent: Option<CalendarId>,
    ) -> Result<bool, CalendarError> {
        self.calendar(id)?;
        if let Some(parent) = parent {
            self.calendar(parent)?;
            if parent == id || has_path_connecting(&self.graph, id.0, parent.0, None) {
                warn!(
                    "rejected parent {} for calendar {}: derivation would form a cycle",
                    parent.index(),
                    id.index()
                );
                return Ok(false);
            }
        }

        self.invalidate(id);
        let incoming: Vec<_> = self
            .graph
            .edges_directed(id.0, Direction::Incoming)
            .map(|edge| edge.id())
            .collect();
        for edge in incoming {
            self.graph.remove_edge(edge);
        }

        if let Some(parent) = parent {
            self.graph.add_edge(parent.0, id.0, ());
        }
        self.graph[id.0].week.set_derived(parent.is_some());
        Ok(true)
    }

    /// Clear the caches of `id` and of every calendar derived from it,
    /// directly or transitively.
    pub(crate) fn invalidate(&mut self, id: CalendarId) {
        let mut dfs = Dfs::new(&self.graph, id.0);
        let mut cleared = 0_usize;
        while let Some(node) = dfs.next(&self.graph) {
            if let Some(calendar) = self.graph.node_weight_mut(node) {
                calendar.caches.clear();
                cleared += 1;
            }
        }
        trace!("invalidated {cleared} calendar cache(s) from {}", id.index());
    }

    pub(crate) fn node(&self, id: CalendarId) -> &ProjectCalendar {
        &self.graph[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: CalendarId) -> &mut ProjectCalendar {
        &mut self.graph[id.0]
    }
}
