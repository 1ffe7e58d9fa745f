//! Workbench: the application state shared by the filter, compare and combine views.
//!
//! All derived data (filtered rows, combined table, shared columns, pages) is recomputed
//! from the current state on demand. Loaded files live in slots; every slot carries a
//! generation counter so a load that finishes after its slot was replaced or deleted is
//! dropped instead of overwriting newer data.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::action::{Action, View};
use crate::config::Config;
use crate::core::{ColumnRegistry, ColumnSelection, Row, Table};
use crate::error::{Result, WorkbenchError};
use crate::services::{BatchReport, ExportService, ExportTarget};
use crate::transform::{FilterSet, Paginator, combine, filter_rows, shared_columns};

pub const COMBINED_TABLE_NAME: &str = "Combined Data";

impl From<View> for ExportTarget {
    fn from(view: View) -> Self {
        match view {
            View::Filtered => ExportTarget::Filtered,
            View::Combined => ExportTarget::Combined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(u64);

/// Proof of a started load; only the newest ticket of a slot may complete it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub slot: SlotId,
    pub generation: u64,
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// The table was installed under this file name
    Applied(String),
    /// The slot was replaced or deleted while loading; the result was dropped
    Stale,
    Failed(WorkbenchError),
}

#[derive(Debug, Clone)]
struct Slot {
    id: SlotId,
    generation: u64,
    /// `None` while the first load of the slot is in flight
    table: Option<Table>,
}

#[derive(Debug, Clone)]
pub struct Workbench {
    config: Config,
    slots: Vec<Slot>,
    next_slot: u64,
    registry: ColumnRegistry,
    /// Index into the loaded tables of the file shown in the filtered view
    active: usize,
    filters: FilterSet,
    column: usize,
    filtered_pager: Paginator,
    combined_pager: Paginator,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Workbench {
    pub fn new(config: Config) -> Self {
        Self {
            filtered_pager: Paginator::new(config.page_size),
            combined_pager: Paginator::new(config.page_size),
            config,
            slots: Vec::new(),
            next_slot: 0,
            registry: ColumnRegistry::new(),
            active: 0,
            filters: FilterSet::new(),
            column: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- loaded files ----

    pub fn tables(&self) -> Vec<&Table> {
        self.slots.iter().filter_map(|s| s.table.as_ref()).collect()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.slots
            .iter()
            .filter_map(|s| s.table.as_ref())
            .find(|t| t.name == name)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.tables().into_iter().map(|t| t.name.as_str()).collect()
    }

    fn slot_by_name(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.table.as_ref().is_some_and(|t| t.name == name))
    }

    fn slot_by_id(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    fn new_slot(&mut self, table: Option<Table>) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        self.slots.push(Slot {
            id,
            generation: 0,
            table,
        });
        id
    }

    /// Put a decoded table into a slot. File names stay unique: another slot holding the
    /// same name is dropped and its selections now refer to this table.
    fn install(&mut self, idx: usize, table: Table) -> String {
        let name = table.name.clone();
        let id = self.slots[idx].id;
        // an active duplicate hands its place to the slot taking over its name
        let previous = self.active_slot().map(|active| {
            let displaced = self.slots.iter().any(|s| {
                s.id == active && s.id != id && s.table.as_ref().is_some_and(|t| t.name == name)
            });
            if displaced { id } else { active }
        });
        let headers = table.header_names().into_iter().map(str::to_string).collect();
        match self.slots[idx].table.as_ref().map(|t| t.name.clone()) {
            Some(old_name) => self.registry.replace_file(&old_name, &name, headers),
            None => self.registry.register(&name, headers),
        }
        self.slots[idx].table = Some(table);

        self.slots
            .retain(|s| s.id == id || s.table.as_ref().is_none_or(|t| t.name != name));
        self.follow_active(previous);
        name
    }

    /// Slot of the file the filtered view shows
    fn active_slot(&self) -> Option<SlotId> {
        self.slots
            .iter()
            .filter(|s| s.table.is_some())
            .nth(self.active)
            .map(|s| s.id)
    }

    /// Point `active` back at `previous` after slots moved; falls back to clamping when it is gone
    fn follow_active(&mut self, previous: Option<SlotId>) {
        let position = previous.and_then(|id| {
            self.slots
                .iter()
                .filter(|s| s.table.is_some())
                .position(|s| s.id == id)
        });
        match position {
            Some(pos) => self.active = pos,
            None => self.clamp_active(),
        }
    }

    fn clamp_active(&mut self) {
        let loaded = self.tables().len();
        self.active = self.active.min(loaded.saturating_sub(1));
    }

    /// Add a decoded table. A table whose name is already loaded replaces that file in place.
    pub fn add_table(&mut self, table: Table) -> SlotId {
        let idx = match self.slot_by_name(&table.name) {
            Some(idx) => {
                self.slots[idx].generation += 1;
                idx
            }
            None => {
                self.new_slot(None);
                self.slots.len() - 1
            }
        };
        let name = self.install(idx, table);
        info!("Loaded '{}'", name);
        self.slots[self.slot_by_name(&name).unwrap_or(idx)].id
    }

    pub fn add_tables(&mut self, tables: impl IntoIterator<Item = Table>) -> Vec<SlotId> {
        tables.into_iter().map(|t| self.add_table(t)).collect()
    }

    /// Install everything a batch loaded and hand back what failed
    pub fn apply_report(&mut self, report: BatchReport) -> Vec<WorkbenchError> {
        self.add_tables(report.loaded);
        report.failed
    }

    /// Reserve a new slot for a file whose bytes are still being read
    pub fn begin_load(&mut self) -> LoadTicket {
        let slot = self.new_slot(None);
        let idx = self.slots.len() - 1;
        self.slots[idx].generation = 1;
        LoadTicket {
            slot,
            generation: 1,
        }
    }

    /// Start replacing a loaded file. Any earlier ticket for the slot becomes stale.
    pub fn begin_replace(&mut self, file_name: &str) -> Result<LoadTicket> {
        let idx = self
            .slot_by_name(file_name)
            .ok_or_else(|| WorkbenchError::UnknownFile(file_name.to_string()))?;
        let slot = &mut self.slots[idx];
        slot.generation += 1;
        Ok(LoadTicket {
            slot: slot.id,
            generation: slot.generation,
        })
    }

    /// Finish a load started with [`begin_load`](Self::begin_load) or
    /// [`begin_replace`](Self::begin_replace)
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Table>) -> LoadOutcome {
        let Some(idx) = self.slot_by_id(ticket.slot) else {
            info!("Dropping load for removed slot {:?}", ticket.slot);
            return LoadOutcome::Stale;
        };
        if self.slots[idx].generation != ticket.generation {
            info!(
                "Dropping stale load for slot {:?} (generation {} < {})",
                ticket.slot, ticket.generation, self.slots[idx].generation
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(table) => {
                let name = self.install(idx, table);
                info!("Loaded '{}'", name);
                LoadOutcome::Applied(name)
            }
            Err(e) => {
                // a failed first load leaves nothing behind; a failed replace keeps the old file
                if self.slots[idx].table.is_none() {
                    self.slots.remove(idx);
                }
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Swap a loaded file for a new table; selections follow the new file name
    pub fn replace_file(&mut self, file_name: &str, table: Table) -> Result<()> {
        let ticket = self.begin_replace(file_name)?;
        match self.complete_load(ticket, Ok(table)) {
            LoadOutcome::Failed(e) => Err(e),
            _ => Ok(()),
        }
    }

    pub fn delete_file(&mut self, file_name: &str) -> Result<()> {
        let idx = self
            .slot_by_name(file_name)
            .ok_or_else(|| WorkbenchError::UnknownFile(file_name.to_string()))?;
        let previous = self.active_slot().filter(|&id| id != self.slots[idx].id);
        self.slots.remove(idx);
        self.registry.remove_file(file_name);
        self.follow_active(previous);
        self.filtered_pager.reset();
        self.column = 0;
        info!("Deleted '{}'", file_name);
        Ok(())
    }

    // ---- column selection & comparison ----

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    pub fn selections(&self) -> &[ColumnSelection] {
        self.registry.selections()
    }

    /// Select or unselect a column of a loaded file; returns whether it is now selected
    pub fn toggle_selection(&mut self, file_name: &str, column: &str) -> Result<bool> {
        let table = self
            .table(file_name)
            .ok_or_else(|| WorkbenchError::UnknownFile(file_name.to_string()))?;
        if table.column_index(column).is_none() {
            return Err(WorkbenchError::UnknownColumn {
                table: file_name.to_string(),
                column: column.to_string(),
            });
        }
        let selected = self.registry.toggle(file_name, column);
        debug!("{} {}:{}", if selected { "Selected" } else { "Unselected" }, file_name, column);
        Ok(selected)
    }

    /// Select a column unless it already is; returns whether it was newly added
    pub fn select_column(&mut self, file_name: &str, column: &str) -> Result<bool> {
        if self.registry.is_selected(file_name, column) {
            return Ok(false);
        }
        self.toggle_selection(file_name, column)
    }

    /// Columns every loaded file has (empty with fewer than two files)
    pub fn shared_columns(&self) -> Vec<String> {
        shared_columns(&self.tables())
    }

    /// The selected columns reshaped into one table
    pub fn combined(&self) -> Table {
        combine(
            COMBINED_TABLE_NAME,
            self.selections(),
            &self.tables(),
            self.config.date_detection,
        )
    }

    // ---- active file & filters ----

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_table(&self) -> Option<&Table> {
        self.tables().get(self.active).copied()
    }

    pub fn select_table(&mut self, index: usize) -> Result<()> {
        if index >= self.tables().len() {
            return Err(WorkbenchError::UnknownFile(format!("#{index}")));
        }
        self.active = index;
        self.filtered_pager.reset();
        self.column = 0;
        Ok(())
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn set_filter(&mut self, column: &str, pattern: &str) {
        self.filters.set(column, pattern);
        self.filtered_pager.reset();
    }

    pub fn clear_filter(&mut self, column: &str) {
        if self.filters.clear(column) {
            self.filtered_pager.reset();
        }
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear_all();
        self.filtered_pager.reset();
    }

    /// Rows of the active file that pass every filter
    pub fn filtered(&self) -> Option<Table> {
        let table = self.active_table()?;
        let rows: Vec<Row> = filter_rows(table, &self.filters).into_iter().cloned().collect();
        Some(table.with_rows(rows))
    }

    // ---- pagination ----

    fn view_table(&self, view: View) -> Option<Table> {
        match view {
            View::Filtered => self.filtered(),
            View::Combined => Some(self.combined()),
        }
    }

    fn total_rows(&self, view: View) -> usize {
        self.view_table(view).map_or(0, |t| t.row_count())
    }

    fn pager_mut(&mut self, view: View) -> &mut Paginator {
        match view {
            View::Filtered => &mut self.filtered_pager,
            View::Combined => &mut self.combined_pager,
        }
    }

    /// Pagination state of a view, clamped to its current row count
    pub fn pager(&self, view: View) -> Paginator {
        let mut pager = match view {
            View::Filtered => self.filtered_pager,
            View::Combined => self.combined_pager,
        };
        pager.resize(self.total_rows(view));
        pager
    }

    /// The rows of the current page of a view
    pub fn page(&self, view: View) -> Option<Table> {
        let table = self.view_table(view)?;
        let mut pager = match view {
            View::Filtered => self.filtered_pager,
            View::Combined => self.combined_pager,
        };
        pager.resize(table.row_count());
        let rows = pager.slice(&table.rows).to_vec();
        Some(table.with_rows(rows))
    }

    pub fn set_page(&mut self, view: View, page: isize) {
        let total = self.total_rows(view);
        let pager = self.pager_mut(view);
        pager.resize(total);
        pager.set_page(page);
    }

    pub fn next_page(&mut self, view: View) {
        let total = self.total_rows(view);
        let pager = self.pager_mut(view);
        pager.resize(total);
        pager.next();
    }

    pub fn prev_page(&mut self, view: View) {
        let total = self.total_rows(view);
        let pager = self.pager_mut(view);
        pager.resize(total);
        pager.prev();
    }

    // ---- column cursor of the filtered view ----

    pub fn current_column(&self) -> usize {
        self.column
    }

    /// Move the column cursor right; stays put while the current page is empty
    pub fn next_column(&mut self) {
        let Some(page) = self.page(View::Filtered) else {
            return;
        };
        if page.is_empty() {
            return;
        }
        self.column = (self.column + 1).min(page.column_count().saturating_sub(1));
    }

    pub fn prev_column(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    // ---- export ----

    /// The full (unpaged) table a view exports
    pub fn export_table(&self, view: View) -> Result<Table> {
        self.view_table(view).ok_or(WorkbenchError::NoActiveFile)
    }

    pub fn export_buffer(&self, view: View) -> Result<Vec<u8>> {
        ExportService::to_buffer(&self.export_table(view)?, view.into())
    }

    /// Write a view to the configured output directory
    pub fn export(&self, view: View) -> Result<PathBuf> {
        ExportService::to_dir(&self.export_table(view)?, view.into(), &self.config.output_dir)
    }

    // ---- actions ----

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        debug!("Dispatch {}", action);
        match action {
            Action::SelectTable(index) => self.select_table(index)?,
            Action::DeleteFile(name) => self.delete_file(&name)?,
            Action::ToggleSelection { file, column } => {
                self.toggle_selection(&file, &column)?;
            }
            Action::SetFilter { column, pattern } => self.set_filter(&column, &pattern),
            Action::ClearFilter(column) => self.clear_filter(&column),
            Action::ClearAllFilters => self.clear_all_filters(),
            Action::SetPage { view, page } => self.set_page(view, page),
            Action::NextPage(view) => self.next_page(view),
            Action::PrevPage(view) => self.prev_page(view),
            Action::NextColumn => self.next_column(),
            Action::PrevColumn => self.prev_column(),
        }
        Ok(())
    }
}
